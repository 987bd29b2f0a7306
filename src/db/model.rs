use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::MovieAttributes;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub user_id: String,
    pub username: String,
    pub genre: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Profile {
    pub fn new(user_id: &str, username: &str, genre: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            username: username.to_string(),
            genre: genre.to_string(),
            created_at: Some(Utc::now()),
        }
    }
}

/// A persisted movie. Serializes as its attributes plus `id`, and `genre`
/// when the record has one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(flatten)]
    pub attributes: MovieAttributes,
}

impl Movie {
    /// New record with a fresh id. `id` and `genre` keys in the source
    /// attributes are dropped in favour of the record's own.
    pub fn new(genre: &str, mut attributes: MovieAttributes) -> Self {
        attributes.remove("id");
        attributes.remove("genre");
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            genre: Some(genre.to_string()),
            attributes,
        }
    }

    /// New record with a fresh id, stored as given. A string `genre`
    /// attribute becomes the record's genre; without one the record has none.
    pub fn from_attributes(mut attributes: MovieAttributes) -> Self {
        attributes.remove("id");
        let genre = if matches!(attributes.get("genre"), Some(Value::String(_))) {
            match attributes.remove("genre") {
                Some(Value::String(genre)) => Some(genre),
                _ => None,
            }
        } else {
            None
        };
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            genre,
            attributes,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Invalid stored document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Already exists: {0}")]
    AlreadyExists(String),
}

pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_movie_json_shape() {
        let attrs = json!({"title": "Heat", "year": 1995, "genre": "Crime", "id": "x"});
        let movie = Movie::new("Action", attrs.as_object().unwrap().clone());
        assert_ne!(movie.id, "x");

        let value = serde_json::to_value(&movie).unwrap();
        assert_eq!(value["genre"], "Action");
        assert_eq!(value["title"], "Heat");
        assert_eq!(value["year"], 1995);
        assert_eq!(value["id"], movie.id.as_str());
        assert_eq!(value.as_object().unwrap().len(), 4);
    }

    #[test]
    fn test_movie_from_attributes() {
        let attrs = json!({"title": "Heat", "genre": "Action", "id": "x"});
        let movie = Movie::from_attributes(attrs.as_object().unwrap().clone());
        assert_eq!(movie.genre.as_deref(), Some("Action"));
        assert!(movie.attributes.get("genre").is_none());
        assert!(movie.attributes.get("id").is_none());

        let attrs = json!({"title": "Clue"});
        let movie = Movie::from_attributes(attrs.as_object().unwrap().clone());
        assert!(movie.genre.is_none());
        let value = serde_json::to_value(&movie).unwrap();
        assert_eq!(value, json!({"id": movie.id.clone(), "title": "Clue"}));

        let attrs = json!({"title": "Big", "genre": 7});
        let movie = Movie::from_attributes(attrs.as_object().unwrap().clone());
        assert!(movie.genre.is_none());
        let value = serde_json::to_value(&movie).unwrap();
        assert_eq!(value["genre"], 7);
    }

    #[test]
    fn test_movie_ids_are_unique() {
        let a = Movie::new("Drama", MovieAttributes::new());
        let b = Movie::new("Drama", MovieAttributes::new());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_profile_json_shape() {
        let profile = Profile::new("u1", "Ann", "Action");
        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["userId"], "u1");
        assert_eq!(value["username"], "Ann");
        assert_eq!(value["genre"], "Action");
        assert!(value["createdAt"].is_string());
    }
}
