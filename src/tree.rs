//! The contract a hierarchical bounding-box index must satisfy to be searched by
//! [`nearby`][crate::knn::nearby].

use crate::bbox::BoundingBox;
use crate::knn::{nearby, ChildDistance, NearestNeighbors, Neighbor};

/// One immediate child of a tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeChild<N, I> {
    /// An internal node. `node` is handed back to [`SpatialTree::children`] to descend into it.
    Internal {
        /// Bounding box covering everything stored below this node.
        bbox: BoundingBox,
        /// Opaque handle to this node.
        node: N,
    },
    /// A stored item. Leaves are terminal and never expanded.
    Leaf {
        /// Bounding box of the item.
        bbox: BoundingBox,
        /// Opaque payload of the item.
        item: I,
    },
}

impl<N, I> TreeChild<N, I> {
    /// The bounding box of this child.
    pub fn bbox(&self) -> &BoundingBox {
        match self {
            Self::Internal { bbox, .. } | Self::Leaf { bbox, .. } => bbox,
        }
    }

    /// Returns `true` if this child is a stored item.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }

    /// The payload of this child, or `None` for internal nodes.
    pub fn item(&self) -> Option<&I> {
        match self {
            Self::Leaf { item, .. } => Some(item),
            Self::Internal { .. } => None,
        }
    }
}

/// A trait for hierarchical bounding-box indexes that support incremental nearest-neighbor
/// search.
///
/// The only required capability is listing the immediate children of a node. Everything else
/// (insertion, removal, balancing, storage) belongs to the implementing tree.
pub trait SpatialTree {
    /// Handle to an internal node, passed back to [`SpatialTree::children`].
    type Node<'a>
    where
        Self: 'a;

    /// Payload of a stored item.
    type Item<'a>
    where
        Self: 'a;

    /// Append the immediate children of `parent` to `out`, or the children of the root when
    /// `parent` is `None`.
    ///
    /// Children may be appended in any order. `out` is only a reusable allocation: callers clear
    /// it before each call and never rely on what a previous call left in it.
    fn children<'a>(
        &'a self,
        parent: Option<Self::Node<'a>>,
        out: &mut Vec<TreeChild<Self::Node<'a>, Self::Item<'a>>>,
    );

    /// Visit items in order of increasing distance.
    ///
    /// See [`nearby`] for details.
    fn nearby<'a, D, C>(&'a self, distance: D, consumer: C)
    where
        Self: Sized,
        D: ChildDistance<Self::Node<'a>, Self::Item<'a>>,
        C: FnMut(&BoundingBox, Self::Item<'a>, f64) -> bool,
    {
        nearby(self, distance, consumer)
    }

    /// A lazy iterator over items in order of increasing distance.
    ///
    /// ```
    /// use geo_knn::bbox::BoundingBox;
    /// use geo_knn::knn::box_metric;
    /// use geo_knn::rtree::{HilbertSort, RTreeBuilder};
    /// use geo_knn::SpatialTree;
    ///
    /// let mut builder = RTreeBuilder::new(3);
    /// builder.add(0., 0., 2., 2.);
    /// builder.add(1., 1., 3., 3.);
    /// builder.add(2., 2., 4., 4.);
    /// let tree = builder.finish::<HilbertSort>().unwrap();
    ///
    /// let query = BoundingBox::from_point([5., 5.]);
    /// let items: Vec<u32> = tree
    ///     .nearest_iter(box_metric(query, false))
    ///     .map(|neighbor| neighbor.item)
    ///     .collect();
    /// assert_eq!(items, vec![2, 1, 0]);
    /// ```
    fn nearest_iter<'a, D>(&'a self, distance: D) -> NearestNeighbors<'a, Self, D>
    where
        Self: Sized,
        D: ChildDistance<Self::Node<'a>, Self::Item<'a>>,
    {
        NearestNeighbors::new(self, distance)
    }

    /// Collect neighbors in order of increasing distance, stopping after `max_results` items or
    /// at the first item farther than `max_distance`.
    ///
    /// `max_distance` is compared against the output of `distance`, so it is in whatever units
    /// that function uses.
    fn neighbors<'a, D>(
        &'a self,
        distance: D,
        max_results: Option<usize>,
        max_distance: Option<f64>,
    ) -> Vec<Neighbor<Self::Item<'a>>>
    where
        Self: Sized,
        D: ChildDistance<Self::Node<'a>, Self::Item<'a>>,
    {
        let max_results = max_results.unwrap_or(usize::MAX);
        let max_distance = max_distance.unwrap_or(f64::INFINITY);
        self.nearest_iter(distance)
            .take_while(|neighbor| neighbor.distance <= max_distance)
            .take(max_results)
            .collect()
    }
}
