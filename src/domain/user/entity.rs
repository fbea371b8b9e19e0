use serde::{Deserialize, Serialize};

use crate::domain::copy::MovieCopy;

/// An account. Regular users manage their own copies, admins manage the
/// catalog and the accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Database identity, `None` until the first save
    pub id: Option<i64>,

    /// Unique login, compared case-sensitively
    pub email: String,

    /// Argon2 PHC string, never the clear-text password
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    pub is_admin: bool,

    /// Owned copies, loaded together with the user
    pub copies: Vec<MovieCopy>,
}

impl User {
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>, is_admin: bool) -> Self {
        Self {
            id: None,
            email: email.into(),
            password_hash: password_hash.into(),
            is_admin,
            copies: Vec::new(),
        }
    }

    /// Attach a copy to this user, setting the back-reference
    pub fn add_copy(&mut self, mut copy: MovieCopy) {
        copy.user_id = self.id;
        self.copies.push(copy);
    }

    /// Drop a copy from the in-memory collection by id
    pub fn remove_copy(&mut self, copy_id: i64) -> Option<MovieCopy> {
        let index = self.copies.iter().position(|c| c.id == Some(copy_id))?;
        Some(self.copies.remove(index))
    }

    pub fn find_copy(&self, copy_id: i64) -> Option<&MovieCopy> {
        self.copies.iter().find(|c| c.id == Some(copy_id))
    }

    /// Total units across all copies
    pub fn total_units(&self) -> u32 {
        self.copies.iter().map(|c| c.quantity).sum()
    }

    /// Case-insensitive substring match on the email
    pub fn matches_filter(&self, filter: &str) -> bool {
        filter.is_empty() || self.email.to_lowercase().contains(&filter.to_lowercase())
    }
}
