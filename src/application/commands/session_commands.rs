// src/application/commands/session_commands.rs
//
// Login / logout

use log::info;

use super::{require_user, CommandResult};
use crate::application::dto::SessionDto;
use crate::application::error_handling::{ErrorResponse, ToErrorResponse};
use crate::application::state::AppState;
use crate::session::Session;

/// Check the credentials and open the session.
/// The returned view tells the console which command set applies.
pub fn login(
    state: &AppState,
    session: &mut Session,
    email: &str,
    password: &str,
) -> CommandResult<SessionDto> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(ErrorResponse::validation("Please enter email and password"));
    }

    let user = state
        .auth_service
        .validate_user(email, password)
        .to_error_response()?
        .ok_or_else(|| ErrorResponse::unauthorized("Invalid email or password"))?;

    let dto = SessionDto::from(&user);
    session.login(user);
    Ok(dto)
}

/// Returns the email of the user that was logged out
pub fn logout(session: &mut Session) -> CommandResult<String> {
    let email = require_user(session)?.email.clone();
    session.logout();
    info!("User {} logged out", email);
    Ok(email)
}

pub fn whoami(session: &Session) -> CommandResult<SessionDto> {
    require_user(session).map(SessionDto::from)
}
