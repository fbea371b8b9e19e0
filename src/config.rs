// src/config.rs
//
// Runtime configuration
//
// Resolution order, last one wins:
// - compiled-in defaults
// - `.env` file in the working directory (never overrides real variables)
// - process environment

use std::path::PathBuf;

use log::{info, warn};

use crate::error::{AppError, AppResult};

pub const ENV_DB_USER: &str = "DB_USER";
pub const ENV_DB_PASSWORD: &str = "DB_PASSWORD";
pub const ENV_DB_PATH: &str = "FILMOTECA_DB_PATH";
pub const ENV_ADMIN_EMAIL: &str = "FILMOTECA_ADMIN_EMAIL";
pub const ENV_ADMIN_PASSWORD: &str = "FILMOTECA_ADMIN_PASSWORD";

const DEFAULT_DB_USER: &str = "filmoteca";
const DEFAULT_DB_PASSWORD: &str = "";
const DEFAULT_MAX_CONNECTIONS: u32 = 4;

#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,

    /// Admin account created when the user table is empty
    pub bootstrap_admin: Option<AdminBootstrap>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub user: String,
    pub password: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
}

/// Database file in the platform data directory:
/// {APP_DATA}/filmoteca/filmoteca.db
pub fn default_database_path() -> AppResult<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| AppError::Config("Could not determine app data directory".to_string()))?;
    Ok(data_dir.join("filmoteca").join("filmoteca.db"))
}

impl Config {
    /// Load `.env` (if any) and read the process environment
    pub fn load() -> AppResult<Self> {
        match dotenvy::dotenv() {
            Ok(path) => info!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => warn!("Ignoring unreadable .env file: {}", e),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = match lookup(ENV_DB_PATH).filter(|p| !p.is_empty()) {
            Some(p) => PathBuf::from(p),
            None => default_database_path()?,
        };

        let (user, password) = match (lookup(ENV_DB_USER), lookup(ENV_DB_PASSWORD)) {
            (Some(user), Some(password)) => {
                info!("Database credentials loaded from environment");
                (user, password)
            }
            _ => {
                warn!(
                    "{} or {} not set, using default database credentials",
                    ENV_DB_USER, ENV_DB_PASSWORD
                );
                (DEFAULT_DB_USER.to_string(), DEFAULT_DB_PASSWORD.to_string())
            }
        };

        let bootstrap_admin = match (lookup(ENV_ADMIN_EMAIL), lookup(ENV_ADMIN_PASSWORD)) {
            (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
                Some(AdminBootstrap { email, password })
            }
            _ => None,
        };

        Ok(Self {
            database: DatabaseConfig {
                path,
                user,
                password,
                max_connections: DEFAULT_MAX_CONNECTIONS,
            },
            bootstrap_admin,
        })
    }
}
