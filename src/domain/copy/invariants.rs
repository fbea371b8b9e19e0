use super::entity::MovieCopy;
use crate::domain::{DomainError, DomainResult};

/// Largest quantity a single copy row may hold
pub const MAX_QUANTITY: u32 = 9999;

/// Validates all Copy invariants
pub fn validate_copy(copy: &MovieCopy) -> DomainResult<()> {
    if copy.quantity == 0 || copy.quantity > MAX_QUANTITY {
        return Err(DomainError::InvariantViolation(format!(
            "Quantity must be between 1 and {}, got {}",
            MAX_QUANTITY, copy.quantity
        )));
    }
    if copy.movie.id.is_none() {
        return Err(DomainError::InvariantViolation(
            "Copy must reference a stored movie".to_string(),
        ));
    }
    Ok(())
}

/// Invariants that must hold true for Copy domain:
///
/// 1. A copy references exactly one movie and one owner
/// 2. 1 <= quantity <= MAX_QUANTITY while the row exists
/// 3. Removing the last unit deletes the row (no zero-quantity rows)

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::copy::{CopyCondition, CopyMedium};
    use crate::domain::movie::Movie;

    fn stored_movie() -> Movie {
        let mut movie = Movie::new("Dune", "Sci-Fi", 2021, "Villeneuve", "Arrakis");
        movie.id = Some(1);
        movie
    }

    #[test]
    fn test_valid_copy() {
        let copy = MovieCopy::new(stored_movie(), CopyCondition::Good, CopyMedium::Dvd, 2);
        assert!(validate_copy(&copy).is_ok());
    }

    #[test]
    fn test_quantity_bounds() {
        let mut copy = MovieCopy::new(stored_movie(), CopyCondition::Worn, CopyMedium::BluRay, 0);
        assert!(validate_copy(&copy).is_err());
        copy.quantity = MAX_QUANTITY;
        assert!(validate_copy(&copy).is_ok());
        copy.quantity = MAX_QUANTITY + 1;
        assert!(validate_copy(&copy).is_err());
    }

    #[test]
    fn test_unsaved_movie_fails() {
        let movie = Movie::new("Dune", "Sci-Fi", 2021, "Villeneuve", "Arrakis");
        let copy = MovieCopy::new(movie, CopyCondition::Good, CopyMedium::Dvd, 1);
        assert!(validate_copy(&copy).is_err());
    }
}
