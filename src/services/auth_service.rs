// src/services/auth_service.rs
use std::sync::{Arc, LazyLock};

use log::{info, warn};

use crate::domain::User;
use crate::error::AppResult;
use crate::infrastructure::{hash_password, verify_password};
use crate::repositories::UserRepository;

/// Verified against when the email is unknown, so both failure paths hash once
static DUMMY_HASH: LazyLock<String> =
    LazyLock::new(|| hash_password("filmoteca-dummy-credential").unwrap_or_default());

pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
}

impl AuthService {
    pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
        Self { user_repo }
    }

    /// Returns the user only when the email exists and the password verifies.
    /// Unknown email and wrong password give the same `None`.
    pub fn validate_user(&self, email: &str, password: &str) -> AppResult<Option<User>> {
        info!("Validating credentials for {}", email);

        match self.user_repo.find_by_email(email)? {
            Some(user) if verify_password(password, &user.password_hash) => {
                info!("User {} authenticated", email);
                Ok(Some(user))
            }
            Some(_) => {
                warn!("Wrong password for {}", email);
                Ok(None)
            }
            None => {
                let _ = verify_password(password, &DUMMY_HASH);
                warn!("Unknown email {}", email);
                Ok(None)
            }
        }
    }
}
