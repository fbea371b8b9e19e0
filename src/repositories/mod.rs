// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers
// - NO business logic
// - NO invariant enforcement
// - Explicit SQL only
// - One pooled connection per call, never two at once

pub mod copy_repository;
pub mod movie_repository;
pub mod user_repository;

pub use movie_repository::{MovieRepository, SqliteMovieRepository};
pub use user_repository::{SqliteUserRepository, UserRepository};

use crate::error::AppResult;

/// CRUD contract shared by every entity repository
pub trait Repository<T>: Send + Sync {
    /// Insert when the entity has no id, update otherwise.
    /// Returns the stored entity with its id populated.
    fn save(&self, entity: &T) -> AppResult<T>;

    /// Remove the row of `entity`; `None` when it was not stored
    fn delete(&self, entity: &T) -> AppResult<Option<T>>;

    fn delete_by_id(&self, id: i64) -> AppResult<Option<T>>;

    fn find_by_id(&self, id: i64) -> AppResult<Option<T>>;

    /// Every row in storage order
    fn find_all(&self) -> AppResult<Vec<T>>;

    fn count(&self) -> AppResult<i64>;
}
