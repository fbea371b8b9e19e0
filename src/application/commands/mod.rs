// src/application/commands/mod.rs
//
// Command Handlers
//
// ARCHITECTURE:
// - Commands are thin adapters between the console and the services
// - Commands accept DTOs, return DTOs
// - Commands check who is logged in before touching a service
// - Commands NEVER contain business logic

pub mod copy_commands;
pub mod movie_commands;
pub mod session_commands;
pub mod user_commands;

pub use copy_commands::*;
pub use movie_commands::*;
pub use session_commands::*;
pub use user_commands::*;

use crate::application::error_handling::ErrorResponse;
use crate::domain::User;
use crate::session::Session;

pub type CommandResult<T> = Result<T, ErrorResponse>;

/// The active user, or an error when nobody is logged in
pub(crate) fn require_user(session: &Session) -> CommandResult<&User> {
    session
        .active_user()
        .ok_or_else(|| ErrorResponse::unauthorized("Please log in first"))
}

pub(crate) fn require_admin(session: &Session) -> CommandResult<&User> {
    let user = require_user(session)?;
    if !user.is_admin {
        return Err(ErrorResponse::unauthorized(
            "This command is only available to administrators",
        ));
    }
    Ok(user)
}
