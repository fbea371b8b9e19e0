// src/session/mod.rs
//
// Per-process session: who is logged in and what they picked for editing.
// Owned by the console loop and passed to handlers by reference.

use log::debug;

use crate::domain::{Movie, MovieCopy, User};

/// Entity picked in a listing and waiting for an edit command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    EditMovie(Movie),
    EditUser(User),
    EditCopy(MovieCopy),
}

#[derive(Debug, Default)]
pub struct Session {
    active: Option<User>,
    selection: Option<Selection>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any previous user and drops the previous selection
    pub fn login(&mut self, user: User) {
        debug!("Session opened for {}", user.email);
        self.active = Some(user);
        self.selection = None;
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.active.take() {
            debug!("Session closed for {}", user.email);
        }
        self.selection = None;
    }

    pub fn is_logged_in(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_user(&self) -> Option<&User> {
        self.active.as_ref()
    }

    /// Swap in a reloaded copy of the active user
    pub fn refresh_user(&mut self, user: User) {
        if self.active.is_some() {
            self.active = Some(user);
        }
    }

    pub fn is_admin(&self) -> bool {
        self.active.as_ref().is_some_and(|u| u.is_admin)
    }

    pub fn select(&mut self, selection: Selection) {
        debug!("Selected {:?}", selection);
        self.selection = Some(selection);
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn clear_selection(&mut self) {
        if self.selection.take().is_some() {
            debug!("Selection cleared");
        }
    }

    pub fn selected_movie(&self) -> Option<&Movie> {
        match &self.selection {
            Some(Selection::EditMovie(movie)) => Some(movie),
            _ => None,
        }
    }

    pub fn selected_user(&self) -> Option<&User> {
        match &self.selection {
            Some(Selection::EditUser(user)) => Some(user),
            _ => None,
        }
    }

    pub fn selected_copy(&self) -> Option<&MovieCopy> {
        match &self.selection {
            Some(Selection::EditCopy(copy)) => Some(copy),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CopyCondition, CopyMedium};

    fn user(is_admin: bool) -> User {
        let mut user = User::new("ana@example.com", "$argon2id$x", is_admin);
        user.id = Some(1);
        user
    }

    fn movie() -> Movie {
        Movie::new("Dune", "Sci-Fi", 2021, "Villeneuve", "Arrakis")
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::new();
        assert!(!session.is_logged_in());
        assert!(!session.is_admin());
        assert!(session.active_user().is_none());
        assert!(session.selection().is_none());
    }

    #[test]
    fn test_login_and_admin_flag() {
        let mut session = Session::new();
        session.login(user(false));
        assert!(session.is_logged_in());
        assert!(!session.is_admin());

        session.login(user(true));
        assert!(session.is_admin());
    }

    #[test]
    fn test_logout_clears_user_and_selection() {
        let mut session = Session::new();
        session.login(user(true));
        session.select(Selection::EditMovie(movie()));

        session.logout();

        assert!(!session.is_logged_in());
        assert!(session.selection().is_none());
    }

    #[test]
    fn test_typed_accessors() {
        let mut session = Session::new();
        session.login(user(false));

        session.select(Selection::EditMovie(movie()));
        assert_eq!(session.selected_movie().map(|m| m.title.as_str()), Some("Dune"));
        assert!(session.selected_user().is_none());
        assert!(session.selected_copy().is_none());

        let copy = MovieCopy::new(movie(), CopyCondition::Good, CopyMedium::Dvd, 1);
        session.select(Selection::EditCopy(copy.clone()));
        assert_eq!(session.selected_copy(), Some(&copy));
        assert!(session.selected_movie().is_none());

        assert_eq!(session.selection(), Some(&Selection::EditCopy(copy)));

        session.select(Selection::EditUser(user(true)));
        assert!(session.selected_user().is_some());
        session.clear_selection();
        assert!(session.selected_user().is_none());
    }

    #[test]
    fn test_refresh_only_when_logged_in() {
        let mut session = Session::new();
        session.refresh_user(user(false));
        assert!(!session.is_logged_in());

        session.login(user(false));
        let mut reloaded = user(false);
        reloaded.email = "ana@example.org".to_string();
        session.refresh_user(reloaded);
        assert_eq!(session.active_user().unwrap().email, "ana@example.org");
    }
}
