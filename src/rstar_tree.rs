//! [`SpatialTree`] for [`rstar::RTree`].
//!
//! `rstar` trees are dynamic: items can be inserted and removed at any time, and rstar provides
//! its own bounds, size, envelope search and iteration. This module only adds the traversal
//! needed for [`nearby`][crate::knn::nearby], so any rstar tree of objects with 2D `f64`
//! envelopes can be searched incrementally.
//!
//! ```
//! use geo_knn::bbox::BoundingBox;
//! use geo_knn::knn::box_metric;
//! use geo_knn::SpatialTree;
//! use rstar::RTree;
//!
//! let mut tree = RTree::new();
//! tree.insert([0., 0.]);
//! tree.insert([5., 5.]);
//! tree.insert([1., 1.]);
//! tree.remove(&[0., 0.]);
//!
//! let nearest: Vec<[f64; 2]> = tree
//!     .nearest_iter(box_metric(BoundingBox::from_point([0., 0.]), false))
//!     .map(|neighbor| *neighbor.item)
//!     .collect();
//! assert_eq!(nearest, vec![[1., 1.], [5., 5.]]);
//! ```

use ::rstar::{ParentNode, RTree, RTreeNode, RTreeObject, RTreeParams, AABB};

use crate::bbox::BoundingBox;
use crate::tree::{SpatialTree, TreeChild};

impl From<AABB<[f64; 2]>> for BoundingBox {
    fn from(value: AABB<[f64; 2]>) -> Self {
        BoundingBox::new(value.lower(), value.upper())
    }
}

impl From<BoundingBox> for AABB<[f64; 2]> {
    fn from(value: BoundingBox) -> Self {
        AABB::from_corners(value.min, value.max)
    }
}

impl<T, Params> SpatialTree for RTree<T, Params>
where
    T: RTreeObject<Envelope = AABB<[f64; 2]>>,
    Params: RTreeParams,
{
    type Node<'a>
        = &'a ParentNode<T>
    where
        Self: 'a;
    type Item<'a>
        = &'a T
    where
        Self: 'a;

    fn children<'a>(
        &'a self,
        parent: Option<&'a ParentNode<T>>,
        out: &mut Vec<TreeChild<&'a ParentNode<T>, &'a T>>,
    ) {
        let parent = parent.unwrap_or_else(|| self.root());
        out.extend(parent.children().iter().map(|child| match child {
            RTreeNode::Leaf(item) => TreeChild::Leaf {
                bbox: item.envelope().into(),
                item,
            },
            RTreeNode::Parent(node) => TreeChild::Internal {
                bbox: node.envelope().into(),
                node,
            },
        }));
    }
}
