// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod auth_service;
pub mod copy_service;
pub mod movie_service;
pub mod user_service;


pub use auth_service::AuthService;

pub use copy_service::CopyService;

pub use movie_service::{MovieForm, MovieService};

pub use user_service::{CreateUserRequest, UpdateUserRequest, UserService};
