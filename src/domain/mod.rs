// src/domain/mod.rs
//
// Domain Root - entities, value types and invariants.
// All other modules import from `crate::domain::*`

pub mod copy;
pub mod movie;
pub mod user;

// Movie catalog
pub use movie::{validate_movie, Movie};

// Physical copies
pub use copy::{validate_copy, CopyCondition, CopyMedium, MovieCopy, UnitRemoval, MAX_QUANTITY};

// Accounts
pub use user::{validate_user, User};

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
/// These represent violations of business rules and invariants
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
