//! Row partitioning: the seeded train/test split and contiguous k-fold
//! cross-validation.

mod cross_validation;
mod split;


pub use cross_validation::{cross_validate, FoldOutcome, KFold};
pub use split::{split, Split};
