// src/application/commands/copy_commands.rs
//
// Copy Command Handlers, always scoped to the logged-in user's collection.
// Every successful change swaps the reloaded user into the session.

use super::{require_user, CommandResult};
use crate::application::dto::{CopyChangesDto, CopyDto, CopyInputDto};
use crate::application::error_handling::{ErrorResponse, ToErrorResponse};
use crate::application::state::AppState;
use crate::session::{Selection, Session};

pub fn list_copies(
    state: &AppState,
    session: &Session,
    filter: Option<&str>,
) -> CommandResult<Vec<CopyDto>> {
    let user = require_user(session)?;

    Ok(state
        .copy_service
        .search_copies(user, filter.unwrap_or_default())
        .into_iter()
        .map(CopyDto::from)
        .collect())
}

/// Add a copy of movie `movie_id`; returns the updated collection
pub fn add_copy(
    state: &AppState,
    session: &mut Session,
    movie_id: i64,
    input: CopyInputDto,
) -> CommandResult<Vec<CopyDto>> {
    let user = require_user(session)?.clone();

    let movie = state
        .movie_service
        .get_movie(movie_id)
        .to_error_response()?
        .ok_or_else(|| ErrorResponse::not_found("Movie"))?;
    let copy = input.into_copy(movie).to_error_response()?;

    let user = state
        .copy_service
        .create_new_copy(copy, &user)
        .to_error_response()?;

    let copies = user.copies.iter().map(CopyDto::from).collect();
    session.refresh_user(user);
    Ok(copies)
}

/// Remember one of the user's copies for a following `edit-copy`
pub fn select_copy(session: &mut Session, id: i64) -> CommandResult<CopyDto> {
    let copy = require_user(session)?
        .find_copy(id)
        .cloned()
        .ok_or_else(|| ErrorResponse::not_found("Copy"))?;

    let dto = CopyDto::from(&copy);
    session.select(Selection::EditCopy(copy));
    Ok(dto)
}

pub fn edit_copy(
    state: &AppState,
    session: &mut Session,
    changes: CopyChangesDto,
) -> CommandResult<CopyDto> {
    let user = require_user(session)?.clone();

    let mut copy = session
        .selected_copy()
        .cloned()
        .ok_or_else(|| ErrorResponse::validation("Select a copy to edit first"))?;

    let input = CopyInputDto {
        condition: changes
            .condition
            .unwrap_or_else(|| copy.condition.to_string()),
        medium: changes.medium.unwrap_or_else(|| copy.medium.to_string()),
        quantity: changes
            .quantity
            .unwrap_or_else(|| copy.quantity.to_string()),
    };
    copy.condition = input.parse_condition().to_error_response()?;
    copy.medium = input.parse_medium().to_error_response()?;
    copy.quantity = input.parse_quantity().to_error_response()?;

    let user = state
        .copy_service
        .update_copy(&copy, &user)
        .to_error_response()?;

    let dto = copy
        .id
        .and_then(|id| user.find_copy(id))
        .map(CopyDto::from)
        .unwrap_or_else(|| CopyDto::from(&copy));

    session.refresh_user(user);
    session.clear_selection();
    Ok(dto)
}

/// Remove one unit. Returns the copy as it stands afterwards,
/// `None` once its last unit is gone.
pub fn remove_copy(
    state: &AppState,
    session: &mut Session,
    id: i64,
) -> CommandResult<Option<CopyDto>> {
    let mut user = require_user(session)?.clone();

    let copy = user
        .find_copy(id)
        .cloned()
        .ok_or_else(|| ErrorResponse::not_found("Copy"))?;

    let reloaded = state
        .copy_service
        .delete_copy_from_user(&mut user, &copy)
        .to_error_response()?;

    let remaining = reloaded.find_copy(id).map(CopyDto::from);
    session.refresh_user(reloaded);
    if session.selected_copy().is_some_and(|c| c.id == Some(id)) {
        session.clear_selection();
    }
    Ok(remaining)
}
