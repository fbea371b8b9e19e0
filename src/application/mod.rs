// src/application/mod.rs
//
// Application Layer
//
// ARCHITECTURE:
// - Sits above services and repositories
// - Provides the boundary between the console and the services
// - Translates between DTOs and domain entities
// - Owns nothing but the session of the running console

pub mod commands;
pub mod console;
pub mod dto;
pub mod error_handling;
pub mod state;

pub use commands::*;
pub use console::{Command, Console, Flow};
pub use dto::*;
pub use error_handling::{ErrorResponse, ErrorType, ToErrorResponse};
pub use state::AppState;
