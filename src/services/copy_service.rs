// src/services/copy_service.rs
//
// Copy lifecycle for the logged-in user.
//
// Every operation runs in its own transaction and hands back the user
// reloaded from the database, so the caller can replace its in-memory copy.

use std::sync::Arc;

use log::{error, info, warn};
use rusqlite::Connection;

use crate::db::ConnectionPool;
use crate::domain::{validate_copy, MovieCopy, UnitRemoval, User};
use crate::error::{AppError, AppResult};
use crate::repositories::copy_repository::{delete_copy, fetch_copy, insert_copy, update_copy};
use crate::repositories::SqliteUserRepository;

pub struct CopyService {
    pool: Arc<ConnectionPool>,
}

impl CopyService {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn stored_user_id(user: &User) -> AppResult<i64> {
        user.id
            .ok_or_else(|| AppError::Validation("User has not been saved yet".to_string()))
    }

    fn reload_user(conn: &Connection, user_id: i64) -> AppResult<User> {
        SqliteUserRepository::fetch(conn, user_id)?.ok_or(AppError::NotFound)
    }

    /// Attach `copy` to `user` and insert it
    pub fn create_new_copy(&self, mut copy: MovieCopy, user: &User) -> AppResult<User> {
        let user_id = Self::stored_user_id(user)?;
        copy.user_id = Some(user_id);
        validate_copy(&copy)?;
        let movie_id = copy.movie.id.ok_or(AppError::NotFound)?;

        info!(
            "Adding copy of '{}' for user {}",
            copy.movie.title, user.email
        );

        let mut conn = self.pool.get()?;
        let result = (|| -> AppResult<i64> {
            let tx = conn.transaction()?;
            let id = insert_copy(&tx, &copy, movie_id, user_id)?;
            tx.commit()?;
            Ok(id)
        })();

        let copy_id = result.inspect_err(|e| {
            error!("Failed to add copy for user {}: {}", user.email, e)
        })?;
        info!("Copy {} added to user {}", copy_id, user.email);

        Self::reload_user(&conn, user_id)
    }

    /// Persist condition, medium and quantity of an existing copy
    pub fn update_copy(&self, copy: &MovieCopy, user: &User) -> AppResult<User> {
        let user_id = Self::stored_user_id(user)?;
        let copy_id = copy.id.ok_or(AppError::NotFound)?;
        validate_copy(copy)?;

        let mut conn = self.pool.get()?;
        let result = (|| -> AppResult<()> {
            let tx = conn.transaction()?;
            match fetch_copy(&tx, copy_id)? {
                Some(stored) if stored.user_id == Some(user_id) => {
                    update_copy(&tx, copy_id, copy)?;
                }
                _ => {
                    warn!("Copy {} not found for user {}", copy_id, user.email);
                    return Err(AppError::NotFound);
                }
            }
            tx.commit()?;
            Ok(())
        })();

        result.inspect_err(|e| error!("Failed to update copy {}: {}", copy_id, e))?;
        info!("Copy {} updated", copy_id);

        Self::reload_user(&conn, user_id)
    }

    /// Remove one unit of a copy.
    ///
    /// With more than one unit the quantity goes down by one; the last unit
    /// deletes the row and drops it from `user.copies`. A copy that no longer
    /// exists is left alone. Returns the reloaded user.
    pub fn delete_copy_from_user(&self, user: &mut User, copy: &MovieCopy) -> AppResult<User> {
        let user_id = Self::stored_user_id(user)?;
        let Some(copy_id) = copy.id else {
            warn!("Copy of '{}' was never stored, nothing to remove", copy.movie.title);
            let conn = self.pool.get()?;
            return Self::reload_user(&conn, user_id);
        };
        info!("Removing one unit of copy {} for user {}", copy_id, user.email);

        let mut conn = self.pool.get()?;
        let result = (|| -> AppResult<Option<UnitRemoval>> {
            let tx = conn.transaction()?;

            let outcome = match fetch_copy(&tx, copy_id)? {
                Some(mut stored) if stored.user_id == Some(user_id) => {
                    let outcome = stored.remove_unit();
                    match outcome {
                        UnitRemoval::Decremented { .. } => {
                            update_copy(&tx, copy_id, &stored)?;
                        }
                        UnitRemoval::Exhausted => {
                            delete_copy(&tx, copy_id)?;
                        }
                    }
                    Some(outcome)
                }
                _ => None,
            };

            tx.commit()?;
            Ok(outcome)
        })();

        let outcome = result.inspect_err(|e| {
            error!("Failed to remove copy {} for user {}: {}", copy_id, user.email, e)
        })?;

        match outcome {
            Some(UnitRemoval::Decremented { remaining }) => {
                if let Some(copy) = user.copies.iter_mut().find(|c| c.id == Some(copy_id)) {
                    copy.quantity = remaining;
                }
                info!("Copy {} decremented to {}", copy_id, remaining);
            }
            Some(UnitRemoval::Exhausted) => {
                user.remove_copy(copy_id);
                info!("Copy {} removed", copy_id);
            }
            None => warn!("Copy {} not found for user {}", copy_id, user.email),
        }

        Self::reload_user(&conn, user_id)
    }

    /// Case-insensitive filter over the user's copies (title, condition, medium)
    pub fn search_copies<'a>(&self, user: &'a User, filter: &str) -> Vec<&'a MovieCopy> {
        user.copies.iter().filter(|c| c.matches_filter(filter)).collect()
    }
}
