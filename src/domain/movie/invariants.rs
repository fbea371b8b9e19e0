use std::sync::LazyLock;

use regex::Regex;

use super::entity::Movie;
use crate::domain::{DomainError, DomainResult};

pub const MAX_TEXT_LEN: usize = 255;
pub const MAX_DESCRIPTION_LEN: usize = 500;
pub const MIN_YEAR: i32 = 1950;
pub const MAX_YEAR: i32 = 2025;

static HAS_LETTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-zA-Z]").unwrap());

/// Validates all Movie invariants.
/// Both the add and the edit path go through this same rule set.
pub fn validate_movie(movie: &Movie) -> DomainResult<()> {
    require_text("title", &movie.title, MAX_TEXT_LEN)?;
    require_text("genre", &movie.genre, MAX_TEXT_LEN)?;
    require_text("director", &movie.director, MAX_TEXT_LEN)?;
    require_text("description", &movie.description, MAX_DESCRIPTION_LEN)?;
    require_letters("genre", &movie.genre)?;
    require_letters("director", &movie.director)?;
    validate_year(movie.year)?;
    Ok(())
}

fn require_text(field: &str, value: &str, max_len: usize) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::InvariantViolation(format!(
            "Movie {} cannot be empty",
            field
        )));
    }
    if value.chars().count() > max_len {
        return Err(DomainError::InvariantViolation(format!(
            "Movie {} cannot exceed {} characters",
            field, max_len
        )));
    }
    Ok(())
}

/// Genre and director cannot be made only of digits or symbols
fn require_letters(field: &str, value: &str) -> DomainResult<()> {
    if !HAS_LETTER.is_match(value) {
        return Err(DomainError::InvariantViolation(format!(
            "Movie {} must contain at least one letter",
            field
        )));
    }
    Ok(())
}

fn validate_year(year: i32) -> DomainResult<()> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(DomainError::InvariantViolation(format!(
            "Year {} must be between {} and {}",
            year, MIN_YEAR, MAX_YEAR
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dune() -> Movie {
        Movie::new("Dune", "Sci-Fi", 2021, "Villeneuve", "Desert planet epic")
    }

    #[test]
    fn test_valid_movie() {
        assert!(validate_movie(&dune()).is_ok());
    }

    #[test]
    fn test_blank_fields_fail() {
        let mut movie = dune();
        movie.title = "   ".to_string();
        assert!(validate_movie(&movie).is_err());

        let mut movie = dune();
        movie.description = String::new();
        assert!(validate_movie(&movie).is_err());
    }

    #[test]
    fn test_length_limits() {
        let mut movie = dune();
        movie.title = "a".repeat(MAX_TEXT_LEN);
        assert!(validate_movie(&movie).is_ok());
        movie.title = "a".repeat(MAX_TEXT_LEN + 1);
        assert!(validate_movie(&movie).is_err());

        let mut movie = dune();
        movie.description = "ñ".repeat(MAX_DESCRIPTION_LEN);
        assert!(validate_movie(&movie).is_ok());
        movie.description = "ñ".repeat(MAX_DESCRIPTION_LEN + 1);
        assert!(validate_movie(&movie).is_err());
    }

    #[test]
    fn test_numeric_genre_and_director_fail() {
        let mut movie = dune();
        movie.genre = "1234".to_string();
        assert!(validate_movie(&movie).is_err());

        let mut movie = dune();
        movie.director = "42".to_string();
        assert!(validate_movie(&movie).is_err());
    }

    #[test]
    fn test_year_range() {
        let mut movie = dune();
        movie.year = MIN_YEAR;
        assert!(validate_movie(&movie).is_ok());
        movie.year = MAX_YEAR;
        assert!(validate_movie(&movie).is_ok());
        movie.year = MIN_YEAR - 1;
        assert!(validate_movie(&movie).is_err());
        movie.year = MAX_YEAR + 1;
        assert!(validate_movie(&movie).is_err());
    }
}
