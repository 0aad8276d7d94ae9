#![doc = include_str!("../README.md")]

pub mod bbox;
pub mod distance;
mod error;
pub mod knn;
pub mod rstar_tree;
pub mod rtree;
mod tree;

pub use bbox::BoundingBox;
pub use error::{GeoKnnError, Result};
pub use knn::{nearby, Neighbor};
pub use tree::{SpatialTree, TreeChild};

#[cfg(test)]
pub(crate) mod test;
