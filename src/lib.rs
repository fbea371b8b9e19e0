// src/lib.rs
// Filmoteca - movie catalog and personal copy collection manager
//
// Architecture:
// - Domain-centric: entities and invariants live in `domain`
// - Repositories are plain data mappers over SQLite
// - Services own validation and transactions
// - Application layer: console boundary, DTOs and the session

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod repositories;
pub mod services;
pub mod session;

pub mod application;

// ============================================================================
// PUBLIC API - Domain Entities
// ============================================================================

pub use domain::{
    validate_copy,
    validate_movie,
    validate_user,
    // Copies
    CopyCondition,
    CopyMedium,
    // Movies
    Movie,
    MovieCopy,
    UnitRemoval,
    // Accounts
    User,
};

// ============================================================================
// PUBLIC API - Error Types
// ============================================================================

pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Configuration and Database
// ============================================================================

pub use config::Config;
pub use db::{create_connection_pool, initialize_database, ConnectionPool};

// ============================================================================
// PUBLIC API - Repositories
// ============================================================================

pub use repositories::{
    MovieRepository, Repository, SqliteMovieRepository, SqliteUserRepository, UserRepository,
};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    AuthService, CopyService, CreateUserRequest, MovieForm, MovieService, UpdateUserRequest,
    UserService,
};

// ============================================================================
// PUBLIC API - Application Layer
// ============================================================================

pub use application::{AppState, Console};
pub use session::{Selection, Session};

// Re-export application submodules
pub use application::commands;
pub use application::dto;
