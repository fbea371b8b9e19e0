// src/application/commands/user_commands.rs
//
// User administration, admin-only

use super::{require_admin, CommandResult};
use crate::application::dto::{UserChangesDto, UserDto};
use crate::application::error_handling::{ErrorResponse, ToErrorResponse};
use crate::application::state::AppState;
use crate::services::{CreateUserRequest, UpdateUserRequest};
use crate::session::{Selection, Session};

pub fn list_users(
    state: &AppState,
    session: &Session,
    filter: Option<&str>,
) -> CommandResult<Vec<UserDto>> {
    require_admin(session)?;

    let users = state
        .user_service
        .search_users(filter.unwrap_or_default())
        .to_error_response()?;

    Ok(users.iter().map(UserDto::from).collect())
}

pub fn create_user(
    state: &AppState,
    session: &Session,
    request: CreateUserRequest,
) -> CommandResult<UserDto> {
    require_admin(session)?;

    let user = state.user_service.create_user(&request).to_error_response()?;
    Ok(UserDto::from(&user))
}

pub fn select_user(state: &AppState, session: &mut Session, id: i64) -> CommandResult<UserDto> {
    require_admin(session)?;

    let user = state
        .user_service
        .get_user(id)
        .to_error_response()?
        .ok_or_else(|| ErrorResponse::not_found("User"))?;

    let dto = UserDto::from(&user);
    session.select(Selection::EditUser(user));
    Ok(dto)
}

/// Apply changes to the selected user. Editing your own account refreshes
/// the session, so dropping your own admin flag takes effect immediately.
pub fn edit_user(
    state: &AppState,
    session: &mut Session,
    changes: UserChangesDto,
) -> CommandResult<UserDto> {
    let active_id = require_admin(session)?.id;

    let selected = session
        .selected_user()
        .cloned()
        .ok_or_else(|| ErrorResponse::validation("Select a user to edit first"))?;
    let id = selected.id.ok_or_else(|| ErrorResponse::not_found("User"))?;

    let request = UpdateUserRequest {
        email: changes.email.unwrap_or(selected.email),
        new_password: changes.password.unwrap_or_default(),
        confirm_password: changes.confirm_password.unwrap_or_default(),
        is_admin: changes.is_admin.unwrap_or(selected.is_admin),
    };

    let user = state
        .user_service
        .update_user(id, &request)
        .to_error_response()?;

    let dto = UserDto::from(&user);
    session.clear_selection();
    if active_id == Some(id) {
        session.refresh_user(user);
    }
    Ok(dto)
}

/// Delete a user together with its copies. The logged-in account cannot
/// delete itself.
pub fn delete_user(state: &AppState, session: &mut Session, id: i64) -> CommandResult<UserDto> {
    if require_admin(session)?.id == Some(id) {
        return Err(ErrorResponse::validation(
            "You cannot delete the account you are logged in with",
        ));
    }

    let user = state.user_service.delete_user(id).to_error_response()?;

    if session.selected_user().is_some_and(|u| u.id == Some(id)) {
        session.clear_selection();
    }
    Ok(UserDto::from(&user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::commands::test_support::{logged_in, state};
    use crate::application::error_handling::ErrorType;

    fn request(email: &str) -> CreateUserRequest {
        CreateUserRequest {
            email: email.to_string(),
            password: "pw".to_string(),
            confirm_password: "pw".to_string(),
            is_admin: false,
        }
    }

    #[test]
    fn test_user_commands_are_admin_only() {
        let state = state();
        let mut user = logged_in(&state, "ana@example.com");

        assert!(list_users(&state, &user, None).is_err());
        assert!(create_user(&state, &user, request("bob@example.com")).is_err());
        let err = select_user(&state, &mut user, 1).unwrap_err();
        assert_eq!(err.error_type, ErrorType::Unauthorized);
    }

    #[test]
    fn test_create_list_and_filter() {
        let state = state();
        let admin = logged_in(&state, "admin@example.com");
        create_user(&state, &admin, request("bob@test.org")).unwrap();

        assert_eq!(list_users(&state, &admin, None).unwrap().len(), 3);
        let found = list_users(&state, &admin, Some("TEST")).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].email, "bob@test.org");
    }

    #[test]
    fn test_edit_own_account_refreshes_session() {
        let state = state();
        let mut admin = logged_in(&state, "admin@example.com");
        let own_id = admin.active_user().unwrap().id.unwrap();

        select_user(&state, &mut admin, own_id).unwrap();
        edit_user(
            &state,
            &mut admin,
            UserChangesDto {
                is_admin: Some(false),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(admin.is_logged_in());
        assert!(!admin.is_admin());
    }

    #[test]
    fn test_cannot_delete_self() {
        let state = state();
        let mut admin = logged_in(&state, "admin@example.com");
        let own_id = admin.active_user().unwrap().id.unwrap();

        let err = delete_user(&state, &mut admin, own_id).unwrap_err();
        assert_eq!(err.error_type, ErrorType::Validation);

        let bob = create_user(&state, &admin, request("bob@example.com")).unwrap();
        let deleted = delete_user(&state, &mut admin, bob.id.unwrap()).unwrap();
        assert_eq!(deleted.email, "bob@example.com");
    }
}
