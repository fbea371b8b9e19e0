// src/services/user_service.rs
use std::sync::Arc;

use log::{info, warn};

use crate::domain::{validate_user, User};
use crate::error::{AppError, AppResult};
use crate::infrastructure::hash_password;
use crate::repositories::UserRepository;

#[derive(Debug, Clone, Default)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub is_admin: bool,
}

/// An empty `new_password` keeps the current one
#[derive(Debug, Clone, Default)]
pub struct UpdateUserRequest {
    pub email: String,
    pub new_password: String,
    pub confirm_password: String,
    pub is_admin: bool,
}

pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
        Self { user_repo }
    }

    fn ensure_email_free(&self, email: &str, own_id: Option<i64>) -> AppResult<()> {
        match self.user_repo.find_by_email(email)? {
            Some(other) if other.id != own_id => {
                warn!("Email {} is already registered", email);
                Err(AppError::DuplicateEmail(email.to_string()))
            }
            _ => Ok(()),
        }
    }

    pub fn create_user(&self, request: &CreateUserRequest) -> AppResult<User> {
        let email = request.email.trim();
        if email.is_empty() || request.password.is_empty() || request.confirm_password.is_empty() {
            return Err(AppError::Validation("All fields are required".to_string()));
        }
        if request.password != request.confirm_password {
            return Err(AppError::Validation("Passwords do not match".to_string()));
        }
        self.ensure_email_free(email, None)?;

        let user = User::new(email, hash_password(&request.password)?, request.is_admin);
        validate_user(&user)?;

        let saved = self.user_repo.save(&user).map_err(|e| {
            if e.is_unique_violation() {
                AppError::DuplicateEmail(email.to_string())
            } else {
                e
            }
        })?;
        info!("User {} created (admin: {})", saved.email, saved.is_admin);
        Ok(saved)
    }

    pub fn update_user(&self, id: i64, request: &UpdateUserRequest) -> AppResult<User> {
        let email = request.email.trim();
        if email.is_empty() {
            return Err(AppError::Validation("Email cannot be empty".to_string()));
        }
        if !request.new_password.is_empty() && request.new_password != request.confirm_password {
            return Err(AppError::Validation("New passwords do not match".to_string()));
        }

        let mut user = self.user_repo.find_by_id(id)?.ok_or(AppError::NotFound)?;
        self.ensure_email_free(email, user.id)?;

        user.email = email.to_string();
        user.is_admin = request.is_admin;
        if !request.new_password.is_empty() {
            user.password_hash = hash_password(&request.new_password)?;
        }
        validate_user(&user)?;

        let saved = self.user_repo.save(&user)?;
        info!("User {} updated", id);
        Ok(saved)
    }

    /// Removes the user and, through the foreign key, all of its copies
    pub fn delete_user(&self, id: i64) -> AppResult<User> {
        self.user_repo.delete_by_id(id)?.ok_or(AppError::NotFound)
    }

    pub fn get_user(&self, id: i64) -> AppResult<Option<User>> {
        self.user_repo.find_by_id(id)
    }

    pub fn list_users(&self) -> AppResult<Vec<User>> {
        self.user_repo.find_all()
    }

    pub fn search_users(&self, filter: &str) -> AppResult<Vec<User>> {
        Ok(self
            .list_users()?
            .into_iter()
            .filter(|u| u.matches_filter(filter))
            .collect())
    }

    pub fn count_users(&self) -> AppResult<i64> {
        self.user_repo.count()
    }

    /// Create an admin account when no user exists yet.
    /// Returns the new admin, or `None` when users were already present.
    pub fn ensure_bootstrap_admin(&self, email: &str, password: &str) -> AppResult<Option<User>> {
        if self.user_repo.count()? > 0 {
            return Ok(None);
        }

        let admin = self.create_user(&CreateUserRequest {
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: password.to_string(),
            is_admin: true,
        })?;
        info!("Bootstrap administrator {} created", admin.email);
        Ok(Some(admin))
    }

    /// Number of copy entries (not units) the user owns
    pub fn copy_count(user: &User) -> usize {
        user.copies.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::verify_password;
    use crate::repositories::test_support::{insert_copy_row, insert_movie_row, test_pool};
    use crate::repositories::SqliteUserRepository;

    fn request(email: &str, password: &str, confirm: &str) -> CreateUserRequest {
        CreateUserRequest {
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
            is_admin: false,
        }
    }

    fn service() -> UserService {
        UserService::new(Arc::new(SqliteUserRepository::new(test_pool())))
    }

    #[test]
    fn test_create_user_hashes_password() {
        let service = service();
        let user = service
            .create_user(&request("ana@example.com", "hunter2", "hunter2"))
            .unwrap();

        assert!(user.id.is_some());
        assert_ne!(user.password_hash, "hunter2");
        assert!(verify_password("hunter2", &user.password_hash));
    }

    #[test]
    fn test_create_user_validation_writes_nothing() {
        let service = service();

        assert!(matches!(
            service.create_user(&request("ana@example.com", "hunter2", "hunter3")),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            service.create_user(&request("", "hunter2", "hunter2")),
            Err(AppError::Validation(_))
        ));
        assert_eq!(service.count_users().unwrap(), 0);
    }

    #[test]
    fn test_create_user_duplicate_email() {
        let service = service();
        service
            .create_user(&request("ana@example.com", "a", "a"))
            .unwrap();

        match service.create_user(&request("ana@example.com", "b", "b")) {
            Err(AppError::DuplicateEmail(email)) => assert_eq!(email, "ana@example.com"),
            other => panic!("expected DuplicateEmail, got {:?}", other),
        }
        assert_eq!(service.count_users().unwrap(), 1);
    }

    #[test]
    fn test_update_user_keeps_password_when_blank() {
        let service = service();
        let user = service
            .create_user(&request("ana@example.com", "hunter2", "hunter2"))
            .unwrap();
        let id = user.id.unwrap();

        let updated = service
            .update_user(
                id,
                &UpdateUserRequest {
                    email: "ana@example.org".to_string(),
                    is_admin: true,
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.email, "ana@example.org");
        assert!(updated.is_admin);
        assert_eq!(updated.password_hash, user.password_hash);
    }

    #[test]
    fn test_update_user_password_and_conflicts() {
        let service = service();
        let ana = service.create_user(&request("ana@example.com", "a", "a")).unwrap();
        service.create_user(&request("bob@example.com", "b", "b")).unwrap();
        let id = ana.id.unwrap();

        let mismatch = UpdateUserRequest {
            email: "ana@example.com".to_string(),
            new_password: "new".to_string(),
            confirm_password: "other".to_string(),
            is_admin: false,
        };
        assert!(matches!(
            service.update_user(id, &mismatch),
            Err(AppError::Validation(_))
        ));

        let taken = UpdateUserRequest {
            email: "bob@example.com".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            service.update_user(id, &taken),
            Err(AppError::DuplicateEmail(_))
        ));

        let changed = UpdateUserRequest {
            email: "ana@example.com".to_string(),
            new_password: "new".to_string(),
            confirm_password: "new".to_string(),
            is_admin: false,
        };
        let updated = service.update_user(id, &changed).unwrap();
        assert!(verify_password("new", &updated.password_hash));
    }

    #[test]
    fn test_delete_user_removes_copies() {
        let pool = test_pool();
        let service = UserService::new(Arc::new(SqliteUserRepository::new(pool.clone())));
        let user = service.create_user(&request("ana@example.com", "a", "a")).unwrap();
        let user_id = user.id.unwrap();
        let movie_id = insert_movie_row(&pool, "Dune");
        insert_copy_row(&pool, movie_id, user_id, 3);

        let deleted = service.delete_user(user_id).unwrap();
        assert_eq!(UserService::copy_count(&deleted), 1);
        assert!(matches!(service.delete_user(user_id), Err(AppError::NotFound)));

        let conn = pool.get().unwrap();
        let copies: i64 = conn
            .query_row("SELECT COUNT(*) FROM copia", [], |row| row.get(0))
            .unwrap();
        assert_eq!(copies, 0);
    }

    #[test]
    fn test_bootstrap_admin_only_on_empty_table() {
        let service = service();

        let admin = service
            .ensure_bootstrap_admin("root@example.com", "changeme")
            .unwrap()
            .unwrap();
        assert!(admin.is_admin);

        assert!(service
            .ensure_bootstrap_admin("other@example.com", "changeme")
            .unwrap()
            .is_none());
        assert_eq!(service.count_users().unwrap(), 1);
    }

    #[test]
    fn test_search_users() {
        let service = service();
        service.create_user(&request("ana@example.com", "a", "a")).unwrap();
        service.create_user(&request("bob@test.org", "b", "b")).unwrap();

        assert_eq!(service.search_users("").unwrap().len(), 2);
        assert_eq!(service.search_users("EXAMPLE").unwrap().len(), 1);
        assert!(service.search_users("carol").unwrap().is_empty());
    }
}
