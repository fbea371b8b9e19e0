// src/repositories/user_repository.rs
//
// User persistence (table `user`), copies loaded eagerly

use std::sync::Arc;

use log::{error, info, warn};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::copy_repository::fetch_copies_for_user;
use super::Repository;
use crate::db::ConnectionPool;
use crate::domain::User;
use crate::error::AppResult;

pub trait UserRepository: Repository<User> {
    /// Exact, case-sensitive lookup by login email
    fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
}

pub struct SqliteUserRepository {
    pool: Arc<ConnectionPool>,
}

const USER_COLUMNS: &str = "id, email, password, is_admin";

impl SqliteUserRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &Row) -> Result<User, rusqlite::Error> {
        Ok(User {
            id: Some(row.get("id")?),
            email: row.get("email")?,
            password_hash: row.get("password")?,
            is_admin: row.get("is_admin")?,
            copies: Vec::new(),
        })
    }

    fn with_copies(conn: &Connection, user: Option<User>) -> Result<Option<User>, rusqlite::Error> {
        match user {
            Some(mut user) => {
                if let Some(id) = user.id {
                    user.copies = fetch_copies_for_user(conn, id)?;
                }
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    /// Load a user and its copies on an already open connection or transaction
    pub(crate) fn fetch(conn: &Connection, id: i64) -> Result<Option<User>, rusqlite::Error> {
        let user = conn
            .query_row(
                &format!("SELECT {} FROM \"user\" WHERE id = ?1", USER_COLUMNS),
                params![id],
                Self::row_to_user,
            )
            .optional()?;
        Self::with_copies(conn, user)
    }
}

impl Repository<User> for SqliteUserRepository {
    fn save(&self, user: &User) -> AppResult<User> {
        let conn = self.pool.get()?;

        let result = match user.id {
            None => conn
                .execute(
                    "INSERT INTO \"user\" (email, password, is_admin) VALUES (?1, ?2, ?3)",
                    params![user.email, user.password_hash, user.is_admin],
                )
                .map(|_| conn.last_insert_rowid()),
            Some(id) => conn
                .execute(
                    "INSERT INTO \"user\" (id, email, password, is_admin) VALUES (?1, ?2, ?3, ?4)
                     ON CONFLICT(id) DO UPDATE SET
                        email = excluded.email,
                        password = excluded.password,
                        is_admin = excluded.is_admin",
                    params![id, user.email, user.password_hash, user.is_admin],
                )
                .map(|_| id),
        };

        let id = result.inspect_err(|e| error!("Failed to save user {}: {}", user.email, e))?;
        info!("User {} saved with id {}", user.email, id);

        let saved = Self::fetch(&conn, id)?.unwrap_or_else(|| {
            let mut saved = user.clone();
            saved.id = Some(id);
            saved
        });
        Ok(saved)
    }

    fn delete(&self, user: &User) -> AppResult<Option<User>> {
        match user.id {
            Some(id) => self.delete_by_id(id),
            None => {
                warn!("User {} has no id, nothing to delete", user.email);
                Ok(None)
            }
        }
    }

    fn delete_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;

        let Some(user) = Self::fetch(&tx, id)? else {
            warn!("User {} not found for deletion", id);
            return Ok(None);
        };

        // copia rows go with the user (ON DELETE CASCADE)
        tx.execute("DELETE FROM \"user\" WHERE id = ?1", params![id])
            .inspect_err(|e| error!("Failed to delete user {}: {}", id, e))?;
        tx.commit()?;

        info!(
            "User {} ({}) deleted together with {} copies",
            user.email,
            id,
            user.copies.len()
        );
        Ok(Some(user))
    }

    fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let conn = self.pool.get()?;
        Ok(Self::fetch(&conn, id)?)
    }

    fn find_all(&self) -> AppResult<Vec<User>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM \"user\" ORDER BY id",
            USER_COLUMNS
        ))?;

        let mut users: Vec<User> = stmt
            .query_map([], Self::row_to_user)?
            .collect::<Result<Vec<_>, _>>()?;

        for user in users.iter_mut() {
            if let Some(id) = user.id {
                user.copies = fetch_copies_for_user(&conn, id)?;
            }
        }

        Ok(users)
    }

    fn count(&self) -> AppResult<i64> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM \"user\"", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl UserRepository for SqliteUserRepository {
    fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let conn = self.pool.get()?;

        let user = conn
            .query_row(
                &format!("SELECT {} FROM \"user\" WHERE email = ?1", USER_COLUMNS),
                params![email],
                Self::row_to_user,
            )
            .optional()
            .inspect_err(|e| error!("Failed to look up user by email {}: {}", email, e))?;

        let user = Self::with_copies(&conn, user)?;
        if user.is_none() {
            info!("No user with email {}", email);
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::{insert_copy_row, insert_movie_row, test_pool};

    #[test]
    fn test_save_and_find_by_email() {
        let repo = SqliteUserRepository::new(test_pool());

        let saved = repo.save(&User::new("ana@example.com", "$argon2id$x", true)).unwrap();
        assert!(saved.id.is_some());
        assert!(saved.is_admin);

        let found = repo.find_by_email("ana@example.com").unwrap().unwrap();
        assert_eq!(found.id, saved.id);
        assert!(repo.find_by_email("ANA@example.com").unwrap().is_none());
        assert!(repo.find_by_email("bob@example.com").unwrap().is_none());
    }

    #[test]
    fn test_update_existing_user() {
        let repo = SqliteUserRepository::new(test_pool());
        let mut user = repo.save(&User::new("ana@example.com", "$argon2id$x", false)).unwrap();

        user.email = "ana@example.org".to_string();
        user.is_admin = true;
        let updated = repo.save(&user).unwrap();

        assert_eq!(updated.id, user.id);
        assert_eq!(repo.count().unwrap(), 1);
        let stored = repo.find_by_id(user.id.unwrap()).unwrap().unwrap();
        assert_eq!(stored.email, "ana@example.org");
        assert!(stored.is_admin);
    }

    #[test]
    fn test_duplicate_email_rejected_by_store() {
        let repo = SqliteUserRepository::new(test_pool());
        repo.save(&User::new("ana@example.com", "$argon2id$x", false)).unwrap();

        let err = repo
            .save(&User::new("ana@example.com", "$argon2id$y", false))
            .unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[test]
    fn test_copies_loaded_with_user() {
        let pool = test_pool();
        let repo = SqliteUserRepository::new(pool.clone());
        let user = repo.save(&User::new("ana@example.com", "$argon2id$x", false)).unwrap();
        let user_id = user.id.unwrap();
        let movie_id = insert_movie_row(&pool, "Dune");
        insert_copy_row(&pool, movie_id, user_id, 2);

        let loaded = repo.find_by_id(user_id).unwrap().unwrap();
        assert_eq!(loaded.copies.len(), 1);
        assert_eq!(loaded.copies[0].quantity, 2);
        assert_eq!(loaded.copies[0].movie.title, "Dune");

        let all = repo.find_all().unwrap();
        assert_eq!(all[0].copies.len(), 1);
    }

    #[test]
    fn test_delete_user_cascades_to_copies() {
        let pool = test_pool();
        let repo = SqliteUserRepository::new(pool.clone());
        let user_id = repo
            .save(&User::new("ana@example.com", "$argon2id$x", false))
            .unwrap()
            .id
            .unwrap();
        let movie_id = insert_movie_row(&pool, "Dune");
        insert_copy_row(&pool, movie_id, user_id, 2);

        let removed = repo.delete_by_id(user_id).unwrap().unwrap();
        assert_eq!(removed.copies.len(), 1);
        assert!(repo.find_by_id(user_id).unwrap().is_none());

        let conn = pool.get().unwrap();
        let copies: i64 = conn
            .query_row("SELECT COUNT(*) FROM copia", [], |row| row.get(0))
            .unwrap();
        assert_eq!(copies, 0);
    }

    #[test]
    fn test_delete_missing_user_returns_none() {
        let repo = SqliteUserRepository::new(test_pool());
        assert!(repo.delete_by_id(42).unwrap().is_none());
    }
}
