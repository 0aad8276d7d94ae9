use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoKnnError {
    /// A bounding box with `min > max` on some axis.
    #[error("Invalid bounding box: min {min:?} is greater than max {max:?}")]
    InvalidBox { min: [f64; 2], max: [f64; 2] },

    /// The number of boxes added to a builder does not match the declared count.
    #[error("Added {added} items when expected {expected}.")]
    ItemCount { expected: u32, added: usize },

    /// A node size below 2, which could never hold more than one child per node.
    #[error("Node size must be at least 2, got {0}.")]
    InvalidNodeSize(u16),

    /// A level index at or above the height of the tree.
    #[error("Level {0} out of bounds")]
    LevelOutOfBounds(usize),
}

pub type Result<T> = std::result::Result<T, GeoKnnError>;
