// src/application/console.rs
//
// Line-oriented front end. Each input line is tokenized, parsed with clap
// and dispatched to the command handlers together with the session.

use std::io::{self, BufRead, Write};

use clap::{CommandFactory, Parser, Subcommand};
use log::{debug, warn};
use serde::Serialize;

use crate::application::commands::{self, CommandResult};
use crate::application::dto::{
    CopyChangesDto, CopyDto, CopyInputDto, MovieChangesDto, MovieDto, SessionDto, UserChangesDto,
    UserDto, View,
};
use crate::application::error_handling::ErrorResponse;
use crate::application::state::AppState;
use crate::error::AppError;
use crate::services::{CreateUserRequest, MovieForm};
use crate::session::Session;

/// One console line
#[derive(Parser, Debug)]
#[command(
    name = "filmoteca",
    no_binary_name = true,
    disable_help_subcommand = true,
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Line {
    #[command(subcommand)]
    command: Command,
}

/// Console commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in with email and password
    Login { email: String, password: String },

    /// Close the session
    Logout,

    /// Show who is logged in
    Whoami,

    /// List your copies, optionally filtered by title, condition or medium
    Copies {
        filter: Option<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Add a copy: MOVIE_ID CONDITION (bueno|gastado|dañado) MEDIUM (dvd|blue-ray) QUANTITY
    AddCopy {
        movie_id: i64,
        condition: String,
        medium: String,
        quantity: String,
    },

    /// Select one of your copies for editing
    SelectCopy { id: i64 },

    /// Edit the selected copy
    EditCopy {
        #[arg(long)]
        condition: Option<String>,
        #[arg(long)]
        medium: Option<String>,
        #[arg(long)]
        quantity: Option<String>,
    },

    /// Remove one unit of a copy; the last unit removes the copy
    RemoveCopy { id: i64 },

    /// List movies, optionally filtered by title, genre or director
    Movies {
        filter: Option<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Add a movie (admin)
    AddMovie {
        title: String,
        genre: String,
        year: String,
        director: String,
        description: String,
    },

    /// Select a movie for editing (admin)
    SelectMovie { id: i64 },

    /// Edit the selected movie (admin)
    EditMovie {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        genre: Option<String>,
        #[arg(long)]
        year: Option<String>,
        #[arg(long)]
        director: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a movie that no copy refers to (admin)
    DeleteMovie { id: i64 },

    /// List users, optionally filtered by email (admin)
    Users {
        filter: Option<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Add a user (admin)
    AddUser {
        email: String,
        password: String,
        confirm_password: String,
        /// Grant administrator rights
        #[arg(long)]
        admin: bool,
    },

    /// Select a user for editing (admin)
    SelectUser { id: i64 },

    /// Edit the selected user (admin)
    EditUser {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        confirm_password: Option<String>,
        #[arg(long)]
        admin: Option<bool>,
    },

    /// Delete a user and all of their copies (admin)
    DeleteUser { id: i64 },

    /// Show this help
    Help,

    /// Leave the program
    #[command(alias = "exit")]
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Console {
    /// `None` when the database could not be opened
    state: Option<AppState>,
    offline_reason: String,
    session: Session,
}

impl Console {
    pub fn new(state: AppState) -> Self {
        Self {
            state: Some(state),
            offline_reason: String::new(),
            session: Session::new(),
        }
    }

    /// Console without a database; only `help` and `quit` work
    pub fn offline(reason: impl Into<String>) -> Self {
        Self {
            state: None,
            offline_reason: reason.into(),
            session: Session::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run one line and return what to print
    pub fn execute(&mut self, line: &str) -> (Flow, String) {
        let tokens = match tokenize(line) {
            Ok(tokens) if tokens.is_empty() => return (Flow::Continue, String::new()),
            Ok(tokens) => tokens,
            Err(message) => return (Flow::Continue, message),
        };

        let command = match Line::try_parse_from(&tokens) {
            Ok(line) => line.command,
            Err(e) => return (Flow::Continue, e.to_string().trim_end().to_string()),
        };
        debug!("Console command: {:?}", tokens.first());

        match command {
            Command::Help => (Flow::Continue, help_text()),
            Command::Quit => (Flow::Quit, "Bye".to_string()),
            command => {
                let Some(state) = self.state.as_ref() else {
                    return (
                        Flow::Continue,
                        format!("Database unavailable: {}", self.offline_reason),
                    );
                };
                match dispatch(state, &mut self.session, command) {
                    Ok(output) => (Flow::Continue, output),
                    Err(e) => {
                        warn!("Command failed: {}", e);
                        (Flow::Continue, format!("Error: {}", e))
                    }
                }
            }
        }
    }

    /// Read commands until `quit` or end of input
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        if self.state.is_none() {
            writeln!(
                output,
                "Database unavailable: {}. Only 'help' and 'quit' work.",
                self.offline_reason
            )?;
        }

        write!(output, "> ")?;
        output.flush()?;

        for line in input.lines() {
            let (flow, text) = self.execute(&line?);
            if !text.is_empty() {
                writeln!(output, "{}", text)?;
            }
            if flow == Flow::Quit {
                return Ok(());
            }
            write!(output, "> ")?;
            output.flush()?;
        }

        writeln!(output)?;
        Ok(())
    }
}

fn dispatch(state: &AppState, session: &mut Session, command: Command) -> CommandResult<String> {
    match command {
        Command::Login { email, password } => {
            commands::login(state, session, &email, &password).map(|dto| welcome(&dto))
        }
        Command::Logout => {
            commands::logout(session).map(|email| format!("{} logged out", email))
        }
        Command::Whoami => commands::whoami(session).map(|dto| {
            let role = if dto.is_admin { "administrator" } else { "user" };
            format!("{} ({})", dto.email, role)
        }),

        Command::Copies { filter, json } => {
            let copies = commands::list_copies(state, session, filter.as_deref())?;
            render(&copies, json, render_copies)
        }
        Command::AddCopy {
            movie_id,
            condition,
            medium,
            quantity,
        } => {
            let input = CopyInputDto {
                condition,
                medium,
                quantity,
            };
            let copies = commands::add_copy(state, session, movie_id, input)?;
            Ok(format!("Copy added.\n{}", render_copies(&copies)))
        }
        Command::SelectCopy { id } => commands::select_copy(session, id)
            .map(|dto| format!("Selected copy:\n{}", render_copies(&[dto]))),
        Command::EditCopy {
            condition,
            medium,
            quantity,
        } => {
            let changes = CopyChangesDto {
                condition,
                medium,
                quantity,
            };
            commands::edit_copy(state, session, changes)
                .map(|dto| format!("Copy updated:\n{}", render_copies(&[dto])))
        }
        Command::RemoveCopy { id } => {
            commands::remove_copy(state, session, id).map(|remaining| match remaining {
                Some(dto) => format!("One unit removed, {} left", dto.quantity),
                None => "Copy removed".to_string(),
            })
        }

        Command::Movies { filter, json } => {
            let movies = commands::list_movies(state, session, filter.as_deref())?;
            render(&movies, json, render_movies)
        }
        Command::AddMovie {
            title,
            genre,
            year,
            director,
            description,
        } => {
            let form = MovieForm {
                title,
                genre,
                year,
                director,
                description,
            };
            commands::create_movie(state, session, form)
                .map(|dto| format!("Movie added:\n{}", render_movies(&[dto])))
        }
        Command::SelectMovie { id } => commands::select_movie(state, session, id)
            .map(|dto| format!("Selected movie:\n{}", render_movies(&[dto]))),
        Command::EditMovie {
            title,
            genre,
            year,
            director,
            description,
        } => {
            let changes = MovieChangesDto {
                title,
                genre,
                year,
                director,
                description,
            };
            commands::edit_movie(state, session, changes)
                .map(|dto| format!("Movie updated:\n{}", render_movies(&[dto])))
        }
        Command::DeleteMovie { id } => commands::delete_movie(state, session, id)
            .map(|dto| format!("Movie '{}' deleted", dto.title)),

        Command::Users { filter, json } => {
            let users = commands::list_users(state, session, filter.as_deref())?;
            render(&users, json, render_users)
        }
        Command::AddUser {
            email,
            password,
            confirm_password,
            admin,
        } => {
            let request = CreateUserRequest {
                email,
                password,
                confirm_password,
                is_admin: admin,
            };
            commands::create_user(state, session, request)
                .map(|dto| format!("User added:\n{}", render_users(&[dto])))
        }
        Command::SelectUser { id } => commands::select_user(state, session, id)
            .map(|dto| format!("Selected user:\n{}", render_users(&[dto]))),
        Command::EditUser {
            email,
            password,
            confirm_password,
            admin,
        } => {
            let changes = UserChangesDto {
                email,
                password,
                confirm_password,
                is_admin: admin,
            };
            commands::edit_user(state, session, changes)
                .map(|dto| format!("User updated:\n{}", render_users(&[dto])))
        }
        Command::DeleteUser { id } => commands::delete_user(state, session, id)
            .map(|dto| format!("User {} deleted with {} copies", dto.email, dto.copies)),

        Command::Help | Command::Quit => Ok(String::new()),
    }
}

fn help_text() -> String {
    Line::command().render_help().to_string().trim_end().to_string()
}

fn welcome(dto: &SessionDto) -> String {
    match dto.view {
        View::Admin => format!(
            "Welcome, administrator {}. Manage the catalog with movies/add-movie/edit-movie/delete-movie \
             and accounts with users/add-user/edit-user/delete-user.",
            dto.email
        ),
        View::Collection => format!(
            "Welcome, {}. Manage your collection with copies/add-copy/edit-copy/remove-copy.",
            dto.email
        ),
    }
}

/// Split a line on whitespace, keeping quoted text together
fn tokenize(line: &str) -> Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;

    for ch in line.chars() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => {
                quote = Some(ch);
                in_token = true;
            }
            None if ch.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(ch);
                in_token = true;
            }
        }
    }

    if quote.is_some() {
        return Err("Unterminated quote".to_string());
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

fn render<T: Serialize>(items: &[T], json: bool, table: fn(&[T]) -> String) -> CommandResult<String> {
    if json {
        serde_json::to_string_pretty(items)
            .map_err(|e| ErrorResponse::from(AppError::Other(e.to_string())))
    } else {
        Ok(table(items))
    }
}

fn id_column(id: Option<i64>) -> String {
    id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string())
}

fn render_movies(movies: &[MovieDto]) -> String {
    if movies.is_empty() {
        return "No movies".to_string();
    }
    movies
        .iter()
        .map(|m| {
            format!(
                "{:>5}  {} ({}) by {} [{}]",
                id_column(m.id),
                m.title,
                m.year,
                m.director,
                m.genre
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_copies(copies: &[CopyDto]) -> String {
    if copies.is_empty() {
        return "No copies".to_string();
    }
    copies
        .iter()
        .map(|c| {
            format!(
                "{:>5}  {} ({})  {}  {}  x{}",
                id_column(c.id),
                c.title,
                c.year,
                c.condition,
                c.medium,
                c.quantity
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_users(users: &[UserDto]) -> String {
    if users.is_empty() {
        return "No users".to_string();
    }
    users
        .iter()
        .map(|u| {
            format!(
                "{:>5}  {}{}  {} copies, {} units",
                id_column(u.id),
                u.email,
                if u.is_admin { " (admin)" } else { "" },
                u.copies,
                u.units
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
