//! Copying catalog movies into persisted storage.
//!
//! The HTTP endpoint inserts movie by movie, so a failure halfway leaves the
//! earlier inserts in place. The offline utility parses a whole document
//! first and then writes it in a single transaction. Neither checks for
//! existing records: seeding twice stores every movie twice.

use serde_json::Value;
use tracing::{debug, info};

use crate::catalog::{Catalog, CatalogError};
use crate::db::{DbError, Movie, MovieRepo};

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Failed to read {0}: {1}")]
    Read(String, std::io::Error),
    #[error("Failed to parse movies: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Movie {0} is not an object")]
    NotAMovie(usize),
    #[error("{0}")]
    Catalog(#[from] CatalogError),
    #[error("{0}")]
    Database(#[from] DbError),
}

/// Inserts every catalog movie, tagged with its genre, one at a time.
/// Returns the number of records written.
pub async fn seed_catalog<R>(db: &R, catalog: &Catalog) -> Result<usize, DbError>
where
    R: MovieRepo + ?Sized,
{
    let mut count = 0;
    for (genre, movies) in catalog.entries() {
        for attrs in movies {
            db.insert_movie(&Movie::new(genre, attrs.clone())).await?;
            count += 1;
        }
        debug!(genre = %genre, movies = movies.len(), "seeded genre");
    }
    info!("Seeded {} movies", count);
    Ok(count)
}

/// Turns a movies document into records. Two shapes are accepted: a flat
/// array of movie objects, stored as they are (a string `genre` attribute
/// becomes the record's genre), or an object mapping genre to movies as
/// used by the catalog.
pub fn movies_from_document(value: Value) -> Result<Vec<Movie>, SeedError> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(attrs) => Ok(Movie::from_attributes(attrs)),
                _ => Err(SeedError::NotAMovie(i)),
            })
            .collect(),
        other => {
            let catalog = Catalog::from_value(other)?;
            Ok(catalog
                .entries()
                .flat_map(|(genre, movies)| {
                    movies.iter().map(move |attrs| Movie::new(genre, attrs.clone()))
                })
                .collect())
        }
    }
}

pub fn movies_from_file(path: &str) -> Result<Vec<Movie>, SeedError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| SeedError::Read(path.to_string(), e))?;
    let value: Value = serde_json::from_str(&content)?;
    movies_from_document(value)
}

/// Writes all movies in one transaction.
pub async fn seed_batch<R>(db: &R, movies: &[Movie]) -> Result<u64, SeedError>
where
    R: MovieRepo + ?Sized,
{
    let count = db.insert_movies(movies).await?;
    info!("Committed {} movies", count);
    Ok(count)
}
