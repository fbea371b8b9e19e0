use serde::{Deserialize, Serialize};

/// A catalog entry. Physical copies owned by users point at a Movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    /// Database identity, `None` until the first save
    pub id: Option<i64>,

    pub title: String,

    pub genre: String,

    /// Release year (four digits)
    pub year: i32,

    pub director: String,

    /// Free text synopsis, at most 500 characters
    pub description: String,
}

impl Movie {
    /// Create a movie that has not been persisted yet
    pub fn new(
        title: impl Into<String>,
        genre: impl Into<String>,
        year: i32,
        director: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            genre: genre.into(),
            year,
            director: director.into(),
            description: description.into(),
        }
    }

    /// Replace the editable fields, keeping the identity
    pub fn update_details(&mut self, other: Movie) {
        self.title = other.title;
        self.genre = other.genre;
        self.year = other.year;
        self.director = other.director;
        self.description = other.description;
    }

    /// Case-insensitive substring match on title, genre or director.
    /// An empty filter matches everything.
    pub fn matches_filter(&self, filter: &str) -> bool {
        if filter.is_empty() {
            return true;
        }
        let needle = filter.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.genre.to_lowercase().contains(&needle)
            || self.director.to_lowercase().contains(&needle)
    }
}

impl std::fmt::Display for Movie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}, {})", self.title, self.year, self.director)
    }
}
