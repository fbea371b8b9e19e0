// src/repositories/movie_repository.rs
//
// Movie persistence (table `pelicula`)

use std::sync::Arc;

use log::{error, info, warn};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::Repository;
use crate::db::ConnectionPool;
use crate::domain::Movie;
use crate::error::AppResult;

pub trait MovieRepository: Repository<Movie> {
    /// Exact, case-sensitive match on title, year and director.
    /// Used to detect duplicates before insert.
    fn find_by_attributes(&self, title: &str, year: i32, director: &str)
        -> AppResult<Option<Movie>>;
}

pub struct SqliteMovieRepository {
    pool: Arc<ConnectionPool>,
}

pub(crate) const MOVIE_COLUMNS: &str = "id, titulo, genero, anio, director, descripcion";

impl SqliteMovieRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    /// Map the six movie columns starting at `offset`
    pub(crate) fn row_to_movie(row: &Row, offset: usize) -> Result<Movie, rusqlite::Error> {
        Ok(Movie {
            id: Some(row.get(offset)?),
            title: row.get(offset + 1)?,
            genre: row.get(offset + 2)?,
            year: row.get(offset + 3)?,
            director: row.get(offset + 4)?,
            description: row.get(offset + 5)?,
        })
    }

    fn fetch(conn: &Connection, id: i64) -> Result<Option<Movie>, rusqlite::Error> {
        conn.query_row(
            &format!("SELECT {} FROM pelicula WHERE id = ?1", MOVIE_COLUMNS),
            params![id],
            |row| Self::row_to_movie(row, 0),
        )
        .optional()
    }
}

impl Repository<Movie> for SqliteMovieRepository {
    fn save(&self, movie: &Movie) -> AppResult<Movie> {
        let conn = self.pool.get()?;
        let mut saved = movie.clone();

        let result = match movie.id {
            None => conn
                .execute(
                    "INSERT INTO pelicula (titulo, genero, anio, director, descripcion)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        movie.title,
                        movie.genre,
                        movie.year,
                        movie.director,
                        movie.description
                    ],
                )
                .map(|_| saved.id = Some(conn.last_insert_rowid())),
            Some(id) => conn
                .execute(
                    "INSERT INTO pelicula (id, titulo, genero, anio, director, descripcion)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                     ON CONFLICT(id) DO UPDATE SET
                        titulo = excluded.titulo,
                        genero = excluded.genero,
                        anio = excluded.anio,
                        director = excluded.director,
                        descripcion = excluded.descripcion",
                    params![
                        id,
                        movie.title,
                        movie.genre,
                        movie.year,
                        movie.director,
                        movie.description
                    ],
                )
                .map(|_| ()),
        };

        result.inspect_err(|e| error!("Failed to save movie '{}': {}", movie.title, e))?;
        info!("Movie '{}' saved with id {:?}", saved.title, saved.id);
        Ok(saved)
    }

    fn delete(&self, movie: &Movie) -> AppResult<Option<Movie>> {
        match movie.id {
            Some(id) => self.delete_by_id(id),
            None => {
                warn!("Movie '{}' has no id, nothing to delete", movie.title);
                Ok(None)
            }
        }
    }

    fn delete_by_id(&self, id: i64) -> AppResult<Option<Movie>> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;

        let Some(movie) = Self::fetch(&tx, id)? else {
            warn!("Movie {} not found for deletion", id);
            return Ok(None);
        };

        tx.execute("DELETE FROM pelicula WHERE id = ?1", params![id])
            .inspect_err(|e| error!("Failed to delete movie {}: {}", id, e))?;
        tx.commit()?;

        info!("Movie '{}' ({}) deleted", movie.title, id);
        Ok(Some(movie))
    }

    fn find_by_id(&self, id: i64) -> AppResult<Option<Movie>> {
        let conn = self.pool.get()?;
        Ok(Self::fetch(&conn, id)?)
    }

    fn find_all(&self) -> AppResult<Vec<Movie>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM pelicula ORDER BY id",
            MOVIE_COLUMNS
        ))?;

        let movies: Vec<Movie> = stmt
            .query_map([], |row| Self::row_to_movie(row, 0))?
            .collect::<Result<Vec<_>, _>>()?;

        info!("{} movies loaded", movies.len());
        Ok(movies)
    }

    fn count(&self) -> AppResult<i64> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM pelicula", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl MovieRepository for SqliteMovieRepository {
    fn find_by_attributes(
        &self,
        title: &str,
        year: i32,
        director: &str,
    ) -> AppResult<Option<Movie>> {
        let conn = self.pool.get()?;

        let movie = conn
            .query_row(
                &format!(
                    "SELECT {} FROM pelicula
                     WHERE titulo = ?1 AND anio = ?2 AND director = ?3
                     LIMIT 1",
                    MOVIE_COLUMNS
                ),
                params![title, year, director],
                |row| Self::row_to_movie(row, 0),
            )
            .optional()?;

        Ok(movie)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::repositories::test_support::{insert_copy_row, insert_user_row, test_pool};

    fn repo() -> SqliteMovieRepository {
        SqliteMovieRepository::new(test_pool())
    }

    fn dune() -> Movie {
        Movie::new("Dune", "Sci-Fi", 2021, "Villeneuve", "Desert planet epic")
    }

    #[test]
    fn test_save_assigns_id_then_updates() {
        let repo = repo();

        let mut saved = repo.save(&dune()).unwrap();
        let id = saved.id.expect("id assigned on insert");

        saved.genre = "Science Fiction".to_string();
        let updated = repo.save(&saved).unwrap();
        assert_eq!(updated.id, Some(id));

        assert_eq!(repo.count().unwrap(), 1);
        assert_eq!(repo.find_by_id(id).unwrap().unwrap().genre, "Science Fiction");
    }

    #[test]
    fn test_find_all_in_storage_order() {
        let repo = repo();
        repo.save(&dune()).unwrap();
        repo.save(&Movie::new("Alien", "Horror", 1979, "Scott", "In space")).unwrap();

        let titles: Vec<String> = repo.find_all().unwrap().into_iter().map(|m| m.title).collect();
        assert_eq!(titles, vec!["Dune", "Alien"]);
    }

    #[test]
    fn test_find_by_attributes_exact_match_only() {
        let repo = repo();
        repo.save(&dune()).unwrap();

        assert!(repo.find_by_attributes("Dune", 2021, "Villeneuve").unwrap().is_some());
        assert!(repo.find_by_attributes("dune", 2021, "Villeneuve").unwrap().is_none());
        assert!(repo.find_by_attributes("Dune", 1984, "Villeneuve").unwrap().is_none());
        assert!(repo.find_by_attributes("Dune", 2021, "Lynch").unwrap().is_none());
    }

    #[test]
    fn test_delete_returns_removed_movie() {
        let repo = repo();
        let saved = repo.save(&dune()).unwrap();

        let removed = repo.delete(&saved).unwrap().unwrap();
        assert_eq!(removed.title, "Dune");
        assert!(repo.find_by_id(saved.id.unwrap()).unwrap().is_none());
        assert!(repo.delete_by_id(saved.id.unwrap()).unwrap().is_none());
    }

    #[test]
    fn test_delete_unsaved_movie_is_noop() {
        let repo = repo();
        assert!(repo.delete(&dune()).unwrap().is_none());
    }

    #[test]
    fn test_delete_referenced_movie_fails_and_keeps_rows() {
        let pool = test_pool();
        let repo = SqliteMovieRepository::new(pool.clone());
        let movie_id = repo.save(&dune()).unwrap().id.unwrap();
        let user_id = insert_user_row(&pool, "ana@example.com");
        insert_copy_row(&pool, movie_id, user_id, 2);

        let err = repo.delete_by_id(movie_id).unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
        assert!(err.is_foreign_key_violation());

        assert!(repo.find_by_id(movie_id).unwrap().is_some());
        let conn = pool.get().unwrap();
        let copies: i64 = conn
            .query_row("SELECT COUNT(*) FROM copia", [], |row| row.get(0))
            .unwrap();
        assert_eq!(copies, 1);
    }
}
