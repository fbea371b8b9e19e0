// src/application/dto/mod.rs
//
// Data Transfer Objects
//
// CRITICAL PRINCIPLES:
// - DTOs are console-friendly representations
// - DTOs are simple, serializable structs
// - Output DTOs convert FROM domain entities only
// - Input DTOs carry raw text and are parsed by the commands

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::{CopyCondition, CopyMedium, Movie, MovieCopy, User, MAX_QUANTITY};
use crate::error::{AppError, AppResult};
use crate::services::UserService;

// ============================================================================
// MOVIE DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieDto {
    pub id: Option<i64>,
    pub title: String,
    pub genre: String,
    pub year: i32,
    pub director: String,
    pub description: String,
}

impl From<Movie> for MovieDto {
    fn from(movie: Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title,
            genre: movie.genre,
            year: movie.year,
            director: movie.director,
            description: movie.description,
        }
    }
}

/// Fields to change on the selected movie; `None` keeps the current value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MovieChangesDto {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub year: Option<String>,
    pub director: Option<String>,
    pub description: Option<String>,
}

// ============================================================================
// COPY DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyDto {
    pub id: Option<i64>,
    pub movie_id: Option<i64>,
    pub title: String,
    pub year: i32,
    pub director: String,
    pub condition: String,
    pub medium: String,
    pub quantity: u32,
}

impl From<&MovieCopy> for CopyDto {
    fn from(copy: &MovieCopy) -> Self {
        Self {
            id: copy.id,
            movie_id: copy.movie.id,
            title: copy.movie.title.clone(),
            year: copy.movie.year,
            director: copy.movie.director.clone(),
            condition: copy.condition.to_string(),
            medium: copy.medium.to_string(),
            quantity: copy.quantity,
        }
    }
}

static QUANTITY_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").unwrap());

/// Copy fields as typed on the console
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CopyInputDto {
    pub condition: String,
    pub medium: String,
    pub quantity: String,
}

impl CopyInputDto {
    pub fn parse_condition(&self) -> AppResult<CopyCondition> {
        Ok(self.condition.trim().parse::<CopyCondition>()?)
    }

    pub fn parse_medium(&self) -> AppResult<CopyMedium> {
        Ok(self.medium.trim().parse::<CopyMedium>()?)
    }

    /// Whole number in 1..=MAX_QUANTITY
    pub fn parse_quantity(&self) -> AppResult<u32> {
        let text = self.quantity.trim();
        if text.is_empty() {
            return Err(AppError::Validation("Please fill in all fields".to_string()));
        }
        if !QUANTITY_FORMAT.is_match(text) {
            return Err(AppError::Validation(
                "Quantity must be a whole number".to_string(),
            ));
        }

        let out_of_range = || {
            AppError::Validation(format!(
                "Quantity must be a number between 1 and {}",
                MAX_QUANTITY
            ))
        };
        let quantity: u32 = text.parse().map_err(|_| out_of_range())?;
        if !(1..=MAX_QUANTITY).contains(&quantity) {
            return Err(out_of_range());
        }
        Ok(quantity)
    }

    pub fn into_copy(self, movie: Movie) -> AppResult<MovieCopy> {
        Ok(MovieCopy::new(
            movie,
            self.parse_condition()?,
            self.parse_medium()?,
            self.parse_quantity()?,
        ))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CopyChangesDto {
    pub condition: Option<String>,
    pub medium: Option<String>,
    pub quantity: Option<String>,
}

// ============================================================================
// USER DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDto {
    pub id: Option<i64>,
    pub email: String,
    pub is_admin: bool,
    pub copies: usize,
    pub units: u32,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            is_admin: user.is_admin,
            copies: UserService::copy_count(user),
            units: user.total_units(),
        }
    }
}

/// A password is only changed when `password` is given
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserChangesDto {
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
    pub is_admin: Option<bool>,
}

// ============================================================================
// SESSION DTOs
// ============================================================================

/// Which command set a login lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Admin,
    Collection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDto {
    pub email: String,
    pub is_admin: bool,
    pub view: View,
}

impl From<&User> for SessionDto {
    fn from(user: &User) -> Self {
        Self {
            email: user.email.clone(),
            is_admin: user.is_admin,
            view: if user.is_admin {
                View::Admin
            } else {
                View::Collection
            },
        }
    }
}
