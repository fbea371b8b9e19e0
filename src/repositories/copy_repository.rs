// src/repositories/copy_repository.rs
//
// Copy persistence (table `copia`)
//
// Copies are only ever written as part of a larger unit of work (attach to a
// user, decrement-or-delete), so these operate on a borrowed connection or
// transaction instead of checking one out of the pool.

use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::movie_repository::SqliteMovieRepository;
use crate::domain::{CopyCondition, CopyMedium, MovieCopy};

const COPY_SELECT: &str = "SELECT c.id, c.id_usuario, c.estado, c.soporte, c.cantidad,
                                  p.id, p.titulo, p.genero, p.anio, p.director, p.descripcion
                           FROM copia c
                           JOIN pelicula p ON p.id = c.id_pelicula";

fn row_to_copy(row: &Row) -> Result<MovieCopy, rusqlite::Error> {
    let condition: String = row.get(2)?;
    let condition: CopyCondition = condition
        .parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;

    let medium: String = row.get(3)?;
    let medium: CopyMedium = medium
        .parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;

    Ok(MovieCopy {
        id: Some(row.get(0)?),
        user_id: Some(row.get(1)?),
        condition,
        medium,
        quantity: row.get(4)?,
        movie: SqliteMovieRepository::row_to_movie(row, 5)?,
    })
}

pub fn fetch_copy(conn: &Connection, id: i64) -> Result<Option<MovieCopy>, rusqlite::Error> {
    conn.query_row(&format!("{} WHERE c.id = ?1", COPY_SELECT), params![id], row_to_copy)
        .optional()
}

pub fn fetch_copies_for_user(
    conn: &Connection,
    user_id: i64,
) -> Result<Vec<MovieCopy>, rusqlite::Error> {
    let mut stmt = conn.prepare(&format!(
        "{} WHERE c.id_usuario = ?1 ORDER BY c.id",
        COPY_SELECT
    ))?;

    let copies = stmt
        .query_map(params![user_id], row_to_copy)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(copies)
}

/// Insert a new copy row and return its generated id.
/// `user_id` is the owner; the movie must already be stored.
pub fn insert_copy(
    conn: &Connection,
    copy: &MovieCopy,
    movie_id: i64,
    user_id: i64,
) -> Result<i64, rusqlite::Error> {
    conn.execute(
        "INSERT INTO copia (id_pelicula, id_usuario, estado, soporte, cantidad)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            movie_id,
            user_id,
            copy.condition.as_str(),
            copy.medium.as_str(),
            copy.quantity
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Write condition, medium and quantity. Returns the number of rows changed.
pub fn update_copy(conn: &Connection, id: i64, copy: &MovieCopy) -> Result<usize, rusqlite::Error> {
    conn.execute(
        "UPDATE copia SET estado = ?1, soporte = ?2, cantidad = ?3 WHERE id = ?4",
        params![copy.condition.as_str(), copy.medium.as_str(), copy.quantity, id],
    )
}

pub fn delete_copy(conn: &Connection, id: i64) -> Result<usize, rusqlite::Error> {
    conn.execute("DELETE FROM copia WHERE id = ?1", params![id])
}
