use serde_json::{Map, Value};
use std::collections::HashMap;

/// Free-form attributes of a catalog movie (title, year, poster, ...).
pub type MovieAttributes = Map<String, Value>;

const BUILTIN_CATALOG: &str = include_str!("movies.json");

/// Static genre -> movies table. Built once at startup and never mutated.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    genres: Vec<(String, Vec<MovieAttributes>)>,
    index: HashMap<String, usize>,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file {0}: {1}")]
    Read(String, std::io::Error),
    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid catalog: {0}")]
    Shape(String),
}

impl Catalog {
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn from_file(path: &str) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::Read(path.to_string(), e))?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, CatalogError> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_value(value)
    }

    /// Accepts a JSON object of `genre -> [movie, ...]`. Genre order is kept
    /// as it appears in the document.
    pub fn from_value(value: Value) -> Result<Self, CatalogError> {
        let Value::Object(root) = value else {
            return Err(CatalogError::Shape(
                "expected an object mapping genre to movies".to_string(),
            ));
        };

        let mut catalog = Catalog::default();
        for (genre, movies) in root {
            let Value::Array(movies) = movies else {
                return Err(CatalogError::Shape(format!(
                    "genre {} must map to an array of movies",
                    genre
                )));
            };

            let mut list = Vec::with_capacity(movies.len());
            for (i, movie) in movies.into_iter().enumerate() {
                match movie {
                    Value::Object(attrs) => list.push(attrs),
                    _ => {
                        return Err(CatalogError::Shape(format!(
                            "movie {} of genre {} is not an object",
                            i, genre
                        )))
                    }
                }
            }

            catalog.index.insert(genre.clone(), catalog.genres.len());
            catalog.genres.push((genre, list));
        }

        Ok(catalog)
    }

    pub fn genres(&self) -> impl Iterator<Item = &str> {
        self.genres.iter().map(|(genre, _)| genre.as_str())
    }

    /// Genres with their movies, in seeding order. Movies are untagged.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &[MovieAttributes])> {
        self.genres
            .iter()
            .map(|(genre, movies)| (genre.as_str(), movies.as_slice()))
    }

    /// Copies of the movies listed under `genre`, each tagged with it.
    /// Unknown genres give an empty list.
    pub fn movies_for_genre(&self, genre: &str) -> Vec<MovieAttributes> {
        match self.index.get(genre) {
            Some(&i) => self.genres[i]
                .1
                .iter()
                .map(|movie| tag_genre(movie, genre))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Total number of movies over all genres.
    pub fn len(&self) -> usize {
        self.genres.iter().map(|(_, movies)| movies.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn tag_genre(movie: &MovieAttributes, genre: &str) -> MovieAttributes {
    let mut tagged = movie.clone();
    tagged.insert("genre".to_string(), Value::String(genre.to_string()));
    tagged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Catalog {
        Catalog::from_value(json!({
            "Action": [{"title": "Heat"}, {"title": "Ronin", "genre": "stale"}],
            "Comedy": [{"title": "Airplane!"}],
            "Empty": []
        }))
        .unwrap()
    }

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();
        assert!(!catalog.is_empty());
        assert!(catalog.genres().any(|g| g == "Action"));
    }

    #[test]
    fn test_movies_for_known_genre_are_tagged() {
        let catalog = sample();
        let movies = catalog.movies_for_genre("Action");
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0]["title"], "Heat");
        assert_eq!(movies[1]["title"], "Ronin");
        assert!(movies.iter().all(|m| m["genre"] == "Action"));
    }

    #[test]
    fn test_every_builtin_genre_returns_its_list() {
        let catalog = Catalog::builtin().unwrap();
        for (genre, movies) in catalog.entries() {
            let served = catalog.movies_for_genre(genre);
            assert_eq!(served.len(), movies.len());
            for (served, source) in served.iter().zip(movies) {
                assert_eq!(served["genre"], genre);
                assert_eq!(served["title"], source["title"]);
            }
        }
    }

    #[test]
    fn test_unknown_genre_is_empty() {
        let catalog = sample();
        assert!(catalog.movies_for_genre("Western").is_empty());
        assert!(catalog.movies_for_genre("action").is_empty());
        assert!(catalog.movies_for_genre("Empty").is_empty());
    }

    #[test]
    fn test_source_is_not_mutated() {
        let catalog = sample();
        let _ = catalog.movies_for_genre("Comedy");
        let (_, movies) = catalog.entries().nth(1).unwrap();
        assert!(movies[0].get("genre").is_none());
    }

    #[test]
    fn test_order_and_len() {
        let catalog = sample();
        let genres: Vec<&str> = catalog.genres().collect();
        assert_eq!(genres, vec!["Action", "Comedy", "Empty"]);
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_bad_shapes() {
        assert!(matches!(
            Catalog::from_value(json!([])),
            Err(CatalogError::Shape(_))
        ));
        assert!(matches!(
            Catalog::from_value(json!({"Action": {"title": "Heat"}})),
            Err(CatalogError::Shape(_))
        ));
        assert!(matches!(
            Catalog::from_value(json!({"Action": ["Heat"]})),
            Err(CatalogError::Shape(_))
        ));
        assert!(matches!(
            Catalog::from_json("{not json"),
            Err(CatalogError::Parse(_))
        ));
    }
}
