// src/application/state.rs

use std::sync::Arc;

use crate::db::ConnectionPool;
use crate::repositories::{SqliteMovieRepository, SqliteUserRepository};
use crate::services::{AuthService, CopyService, MovieService, UserService};

/// Application state shared by the command handlers.
/// All fields are Arc-wrapped; services are built once at startup.
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub movie_service: Arc<MovieService>,
    pub user_service: Arc<UserService>,
    pub copy_service: Arc<CopyService>,
}

impl AppState {
    /// Wire repositories and services over one pool
    pub fn from_pool(pool: Arc<ConnectionPool>) -> Self {
        let movie_repo = Arc::new(SqliteMovieRepository::new(pool.clone()));
        let user_repo = Arc::new(SqliteUserRepository::new(pool.clone()));

        Self {
            auth_service: Arc::new(AuthService::new(user_repo.clone())),
            movie_service: Arc::new(MovieService::new(movie_repo)),
            user_service: Arc::new(UserService::new(user_repo)),
            copy_service: Arc::new(CopyService::new(pool)),
        }
    }
}
