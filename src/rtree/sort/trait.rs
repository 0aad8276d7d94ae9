use crate::bbox::BoundingBox;

/// Inputs to a [`Sort`] implementation.
#[derive(Debug, Clone)]
pub struct SortParams {
    pub(crate) num_items: usize,
    pub(crate) node_size: usize,
    /// Extent of all items.
    pub(crate) bounds: BoundingBox,
}

impl SortParams {
    /// The number of items to sort.
    pub fn num_items(&self) -> usize {
        self.num_items
    }

    /// The maximum number of children of each node.
    pub fn node_size(&self) -> usize {
        self.node_size
    }

    /// The extent of all items.
    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }
}

/// Orders the items of a tree before the nodes are packed bottom-up.
///
/// Only the first `num_items * 4` values of `boxes` and the first `num_items` values of `indices`
/// are items. An implementation must move each item's box and its entry in `indices` together.
pub trait Sort {
    /// Reorder the items in place so that items close together end up in the same nodes.
    fn sort(params: &mut SortParams, boxes: &mut [f64], indices: &mut [usize]);
}
