pub mod entity;
pub mod invariants;

pub use entity::Movie;
pub use invariants::{validate_movie, MAX_DESCRIPTION_LEN, MAX_TEXT_LEN, MAX_YEAR, MIN_YEAR};
