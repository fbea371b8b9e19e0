// src/services/movie_service.rs
use std::sync::{Arc, LazyLock};

use log::{error, info, warn};
use regex::Regex;

use crate::domain::{validate_movie, Movie};
use crate::error::{AppError, AppResult};
use crate::repositories::MovieRepository;

static YEAR_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}$").unwrap());

/// Raw movie fields as typed by the user; the year is still text
#[derive(Debug, Clone, Default)]
pub struct MovieForm {
    pub title: String,
    pub genre: String,
    pub year: String,
    pub director: String,
    pub description: String,
}

impl MovieForm {
    /// Trim every field, check the year format and build an unsaved movie
    pub fn parse(&self) -> AppResult<Movie> {
        let fields = [
            &self.title,
            &self.genre,
            &self.year,
            &self.director,
            &self.description,
        ];
        if fields.iter().any(|f| f.trim().is_empty()) {
            return Err(AppError::Validation("All fields are required".to_string()));
        }

        let year = self.year.trim();
        if !YEAR_FORMAT.is_match(year) {
            return Err(AppError::Validation(
                "Year must be a 4-digit number".to_string(),
            ));
        }
        let year: i32 = year
            .parse()
            .map_err(|_| AppError::Validation("Year must be a 4-digit number".to_string()))?;

        Ok(Movie::new(
            self.title.trim(),
            self.genre.trim(),
            year,
            self.director.trim(),
            self.description.trim(),
        ))
    }
}

impl From<&Movie> for MovieForm {
    fn from(movie: &Movie) -> Self {
        Self {
            title: movie.title.clone(),
            genre: movie.genre.clone(),
            year: movie.year.to_string(),
            director: movie.director.clone(),
            description: movie.description.clone(),
        }
    }
}

pub struct MovieService {
    movie_repo: Arc<dyn MovieRepository>,
}

impl MovieService {
    pub fn new(movie_repo: Arc<dyn MovieRepository>) -> Self {
        Self { movie_repo }
    }

    fn ensure_unique(&self, movie: &Movie, own_id: Option<i64>) -> AppResult<()> {
        let existing = self
            .movie_repo
            .find_by_attributes(&movie.title, movie.year, &movie.director)?;

        match existing {
            Some(other) if other.id != own_id => {
                warn!(
                    "Duplicate movie '{}' ({}) by {}",
                    movie.title, movie.year, movie.director
                );
                Err(AppError::DuplicateMovie)
            }
            _ => Ok(()),
        }
    }

    pub fn create_movie(&self, form: &MovieForm) -> AppResult<Movie> {
        let movie = form.parse()?;
        validate_movie(&movie)?;
        self.ensure_unique(&movie, None)?;

        let saved = self.movie_repo.save(&movie)?;
        info!("Movie '{}' created with id {:?}", saved.title, saved.id);
        Ok(saved)
    }

    pub fn update_movie(&self, id: i64, form: &MovieForm) -> AppResult<Movie> {
        let mut movie = self.movie_repo.find_by_id(id)?.ok_or(AppError::NotFound)?;

        movie.update_details(form.parse()?);
        validate_movie(&movie)?;
        self.ensure_unique(&movie, movie.id)?;

        let saved = self.movie_repo.save(&movie)?;
        info!("Movie {} updated", id);
        Ok(saved)
    }

    /// Fails with `MovieInUse` while any copy still points at the movie
    pub fn delete_movie(&self, id: i64) -> AppResult<Movie> {
        match self.movie_repo.delete_by_id(id) {
            Ok(Some(movie)) => Ok(movie),
            Ok(None) => Err(AppError::NotFound),
            Err(e) if e.is_foreign_key_violation() => {
                let title = self
                    .movie_repo
                    .find_by_id(id)?
                    .map(|m| m.title)
                    .unwrap_or_else(|| id.to_string());
                warn!("Movie '{}' still has copies, not deleted", title);
                Err(AppError::MovieInUse(title))
            }
            Err(e) => {
                error!("Failed to delete movie {}: {}", id, e);
                Err(e)
            }
        }
    }

    pub fn get_movie(&self, id: i64) -> AppResult<Option<Movie>> {
        self.movie_repo.find_by_id(id)
    }

    pub fn list_movies(&self) -> AppResult<Vec<Movie>> {
        self.movie_repo.find_all()
    }

    /// Case-insensitive match on title, genre or director; empty filter keeps all
    pub fn search_movies(&self, filter: &str) -> AppResult<Vec<Movie>> {
        Ok(self
            .list_movies()?
            .into_iter()
            .filter(|m| m.matches_filter(filter))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::{insert_copy_row, insert_user_row, test_pool};
    use crate::repositories::{Repository, SqliteMovieRepository};

    fn dune() -> MovieForm {
        MovieForm {
            title: "Dune".to_string(),
            genre: "Sci-Fi".to_string(),
            year: "2021".to_string(),
            director: "Villeneuve".to_string(),
            description: "Arrakis".to_string(),
        }
    }

    fn service() -> MovieService {
        MovieService::new(Arc::new(SqliteMovieRepository::new(test_pool())))
    }

    #[test]
    fn test_parse_rejects_bad_year_text() {
        for year in ["21", "20211", "two", "-202", "\u{0662}\u{0660}\u{0662}\u{0661}"] {
            let form = MovieForm {
                year: year.to_string(),
                ..dune()
            };
            assert!(matches!(form.parse(), Err(AppError::Validation(_))), "{year}");
        }
        assert!(!YEAR_FORMAT.is_match("\u{0662}\u{0660}\u{0662}\u{0661}"));
        assert!(YEAR_FORMAT.is_match("2021"));
    }

    #[test]
    fn test_parse_requires_all_fields() {
        let form = MovieForm {
            description: "   ".to_string(),
            ..dune()
        };
        assert!(matches!(form.parse(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_create_and_reject_duplicate() {
        let service = service();
        let movie = service.create_movie(&dune()).unwrap();
        assert!(movie.id.is_some());

        assert!(matches!(
            service.create_movie(&dune()),
            Err(AppError::DuplicateMovie)
        ));
        assert_eq!(service.list_movies().unwrap().len(), 1);
    }

    #[test]
    fn test_create_rejects_year_out_of_range() {
        let form = MovieForm {
            year: "1949".to_string(),
            ..dune()
        };
        assert!(matches!(
            service().create_movie(&form),
            Err(AppError::Domain(_))
        ));
    }

    #[test]
    fn test_update_movie() {
        let service = service();
        let id = service.create_movie(&dune()).unwrap().id.unwrap();

        let form = MovieForm {
            description: "Spice".to_string(),
            ..dune()
        };
        let updated = service.update_movie(id, &form).unwrap();

        assert_eq!(updated.id, Some(id));
        assert_eq!(updated.description, "Spice");
        assert!(matches!(
            service.update_movie(999, &form),
            Err(AppError::NotFound)
        ));
    }

    #[test]
    fn test_update_cannot_collide_with_other_movie() {
        let service = service();
        service.create_movie(&dune()).unwrap();
        let other = MovieForm {
            title: "Arrival".to_string(),
            year: "2016".to_string(),
            ..dune()
        };
        let arrival_id = service.create_movie(&other).unwrap().id.unwrap();

        assert!(matches!(
            service.update_movie(arrival_id, &dune()),
            Err(AppError::DuplicateMovie)
        ));
    }

    #[test]
    fn test_delete_movie_in_use() {
        let pool = test_pool();
        let repo = Arc::new(SqliteMovieRepository::new(pool.clone()));
        let service = MovieService::new(repo.clone());
        let movie = service.create_movie(&dune()).unwrap();
        let user_id = insert_user_row(&pool, "ana@example.com");
        insert_copy_row(&pool, movie.id.unwrap(), user_id, 1);

        match service.delete_movie(movie.id.unwrap()) {
            Err(AppError::MovieInUse(title)) => assert_eq!(title, "Dune"),
            other => panic!("expected MovieInUse, got {:?}", other),
        }
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_delete_movie() {
        let service = service();
        let id = service.create_movie(&dune()).unwrap().id.unwrap();

        assert_eq!(service.delete_movie(id).unwrap().title, "Dune");
        assert!(matches!(service.delete_movie(id), Err(AppError::NotFound)));
    }

    #[test]
    fn test_search_movies() {
        let service = service();
        service.create_movie(&dune()).unwrap();
        service
            .create_movie(&MovieForm {
                title: "Heat".to_string(),
                genre: "Crime".to_string(),
                year: "1995".to_string(),
                director: "Mann".to_string(),
                ..dune()
            })
            .unwrap();

        assert_eq!(service.search_movies("").unwrap().len(), 2);
        assert_eq!(service.search_movies("VILLE").unwrap().len(), 1);
        assert_eq!(service.search_movies("crime").unwrap()[0].title, "Heat");
        assert!(service.search_movies("nolan").unwrap().is_empty());
    }
}
