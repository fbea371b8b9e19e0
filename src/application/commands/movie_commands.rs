// src/application/commands/movie_commands.rs
//
// Movie Command Handlers. Listing is open to every logged-in user,
// the rest is admin-only.

use super::{require_admin, require_user, CommandResult};
use crate::application::dto::{MovieChangesDto, MovieDto};
use crate::application::error_handling::{ErrorResponse, ToErrorResponse};
use crate::application::state::AppState;
use crate::services::MovieForm;
use crate::session::{Selection, Session};

/// List movies, optionally filtered on title, genre or director
pub fn list_movies(
    state: &AppState,
    session: &Session,
    filter: Option<&str>,
) -> CommandResult<Vec<MovieDto>> {
    require_user(session)?;

    let movies = state
        .movie_service
        .search_movies(filter.unwrap_or_default())
        .to_error_response()?;

    Ok(movies.into_iter().map(MovieDto::from).collect())
}

pub fn create_movie(
    state: &AppState,
    session: &Session,
    form: MovieForm,
) -> CommandResult<MovieDto> {
    require_admin(session)?;

    let movie = state.movie_service.create_movie(&form).to_error_response()?;
    Ok(MovieDto::from(movie))
}

/// Remember a movie for a following `edit-movie`
pub fn select_movie(state: &AppState, session: &mut Session, id: i64) -> CommandResult<MovieDto> {
    require_admin(session)?;

    let movie = state
        .movie_service
        .get_movie(id)
        .to_error_response()?
        .ok_or_else(|| ErrorResponse::not_found("Movie"))?;

    session.select(Selection::EditMovie(movie.clone()));
    Ok(MovieDto::from(movie))
}

/// Apply changes to the selected movie; unspecified fields keep their value
pub fn edit_movie(
    state: &AppState,
    session: &mut Session,
    changes: MovieChangesDto,
) -> CommandResult<MovieDto> {
    require_admin(session)?;

    let selected = session
        .selected_movie()
        .cloned()
        .ok_or_else(|| ErrorResponse::validation("Select a movie to edit first"))?;
    let id = selected.id.ok_or_else(|| ErrorResponse::not_found("Movie"))?;

    let mut form = MovieForm::from(&selected);
    if let Some(title) = changes.title {
        form.title = title;
    }
    if let Some(genre) = changes.genre {
        form.genre = genre;
    }
    if let Some(year) = changes.year {
        form.year = year;
    }
    if let Some(director) = changes.director {
        form.director = director;
    }
    if let Some(description) = changes.description {
        form.description = description;
    }

    let movie = state
        .movie_service
        .update_movie(id, &form)
        .to_error_response()?;

    session.clear_selection();
    // Copies embed their movie, so the collection may show the old details
    if let Some(user_id) = session.active_user().and_then(|u| u.id) {
        if let Some(user) = state.user_service.get_user(user_id).to_error_response()? {
            session.refresh_user(user);
        }
    }
    Ok(MovieDto::from(movie))
}

pub fn delete_movie(state: &AppState, session: &mut Session, id: i64) -> CommandResult<MovieDto> {
    require_admin(session)?;

    let movie = state.movie_service.delete_movie(id).to_error_response()?;

    if session.selected_movie().is_some_and(|m| m.id == Some(id)) {
        session.clear_selection();
    }
    Ok(MovieDto::from(movie))
}
