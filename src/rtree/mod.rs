//! A static, Hilbert-packed RTree that can be searched by the nearest-neighbor engine.

pub mod builder;
pub mod index;
pub mod sort;
pub mod traversal;
pub mod util;

pub use builder::{RTreeBuilder, DEFAULT_RTREE_NODE_SIZE};
pub use index::{RTree, RTreeMetadata};
pub use sort::{HilbertSort, Sort};
