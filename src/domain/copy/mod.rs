pub mod entity;
pub mod invariants;

pub use entity::{CopyCondition, CopyMedium, MovieCopy, UnitRemoval};
pub use invariants::{validate_copy, MAX_QUANTITY};
