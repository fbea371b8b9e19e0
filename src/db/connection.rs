// src/db/connection.rs
//
// Database connection management
//
// PRINCIPLES:
// - Explicit connection pooling
// - Foreign keys enabled on every connection
// - Clear error propagation

use log::{info, warn};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection, OptionalExtension};

use crate::config::DatabaseConfig;
use crate::error::{AppError, AppResult};
use crate::infrastructure::{hash_password, verify_password};

/// Type alias for connection pool
pub type ConnectionPool = Pool<SqliteConnectionManager>;

/// Type alias for a pooled connection
pub type PooledConn = PooledConnection<SqliteConnectionManager>;

const META_DB_USER: &str = "db_user";
const META_DB_PASSWORD: &str = "db_password_hash";

/// Create a connection pool over the configured database file
///
/// Pool configuration:
/// - SQLite in WAL mode
/// - Foreign keys enabled
/// - Busy timeout set to avoid immediate errors
pub fn create_connection_pool(config: &DatabaseConfig) -> AppResult<ConnectionPool> {
    if let Some(parent) = config.path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let manager = SqliteConnectionManager::file(&config.path).with_init(|conn| {
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 5000;",
        )
    });

    let pool = Pool::builder()
        .max_size(config.max_connections)
        .build(manager)
        .map_err(|e| AppError::Pool(format!("Failed to create connection pool: {}", e)))?;

    info!("Connection pool opened on {}", config.path.display());
    Ok(pool)
}

/// Create a pool over a private in-memory database
///
/// The pool holds a single connection so every checkout sees the same data.
/// Callers must never hold one connection while asking for another.
pub fn create_memory_pool() -> AppResult<ConnectionPool> {
    let manager = SqliteConnectionManager::memory()
        .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));

    Pool::builder()
        .max_size(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .build(manager)
        .map_err(|e| AppError::Pool(format!("Failed to create in-memory pool: {}", e)))
}

/// Get a connection from the pool
///
/// This is a convenience wrapper that provides better error messages.
pub fn get_connection(pool: &ConnectionPool) -> AppResult<PooledConn> {
    pool.get()
        .map_err(|e| AppError::Pool(format!("Failed to get database connection: {}", e)))
}

/// Create a standalone connection (for testing)
///
/// This creates an in-memory database, useful for unit tests.
pub fn create_test_connection() -> AppResult<Connection> {
    let conn = Connection::open_in_memory().map_err(AppError::Database)?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(AppError::Database)?;
    Ok(conn)
}

/// Gate the store with the configured credentials
///
/// The first open records the user and a hash of the password; later opens
/// must present the same pair. SQLite has no server-side authentication, so
/// this is what ties `DB_USER`/`DB_PASSWORD` to a database file.
pub fn check_store_credentials(conn: &Connection, user: &str, password: &str) -> AppResult<()> {
    let stored_user: Option<String> = conn
        .query_row(
            "SELECT value FROM app_meta WHERE key = ?1",
            params![META_DB_USER],
            |row| row.get(0),
        )
        .optional()?;

    let Some(stored_user) = stored_user else {
        conn.execute(
            "INSERT INTO app_meta (key, value) VALUES (?1, ?2), (?3, ?4)",
            params![META_DB_USER, user, META_DB_PASSWORD, hash_password(password)?],
        )?;
        info!("Database credentials recorded for user {}", user);
        return Ok(());
    };

    let stored_hash: String = conn
        .query_row(
            "SELECT value FROM app_meta WHERE key = ?1",
            params![META_DB_PASSWORD],
            |row| row.get(0),
        )
        .optional()?
        .unwrap_or_default();

    if stored_user != user || !verify_password(password, &stored_hash) {
        warn!("Database credentials rejected for user {}", user);
        return Err(AppError::Config(
            "Database credentials do not match this database".to_string(),
        ));
    }

    Ok(())
}
