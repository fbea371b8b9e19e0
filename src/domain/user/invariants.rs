use super::entity::User;
use crate::domain::{DomainError, DomainResult};

pub const MAX_EMAIL_LEN: usize = 255;

/// Validates all User invariants
pub fn validate_user(user: &User) -> DomainResult<()> {
    if user.email.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "User email cannot be empty".to_string(),
        ));
    }
    if user.email.chars().count() > MAX_EMAIL_LEN {
        return Err(DomainError::InvariantViolation(format!(
            "User email cannot exceed {} characters",
            MAX_EMAIL_LEN
        )));
    }
    if user.password_hash.is_empty() {
        return Err(DomainError::InvariantViolation(
            "User must have a password".to_string(),
        ));
    }
    Ok(())
}
