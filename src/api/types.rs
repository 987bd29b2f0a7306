use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::MovieAttributes;
use crate::db::{Movie, Profile};

/// Body of `POST /profiles`. Fields are kept as raw JSON so that the
/// handler decides what counts as missing; scalars are stored as text.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileRequest {
    #[serde(default)]
    pub user_id: Option<Value>,
    #[serde(default)]
    pub username: Option<Value>,
    #[serde(default)]
    pub genre: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub profile: Profile,
}

#[derive(Debug, Serialize)]
pub struct MoviesResponse {
    pub success: bool,
    pub movies: Vec<Movie>,
}

/// Catalog movies served for a profile's genre.
#[derive(Debug, Serialize)]
pub struct GenreMoviesResponse {
    pub success: bool,
    pub movies: Vec<MovieAttributes>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Storage failures carry the underlying error text under `error`.
#[derive(Debug, Serialize)]
pub struct StorageErrorResponse {
    pub success: bool,
    pub error: String,
}

impl StorageErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}
