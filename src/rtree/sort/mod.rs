//! Sorting implementations for packed RTrees.

mod hilbert;
mod r#trait;
mod util;

pub use hilbert::HilbertSort;
pub use r#trait::{Sort, SortParams};
