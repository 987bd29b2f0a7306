use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;
use tracing::{info, warn};

use super::error::ApiError;
use super::types::*;
use crate::db::{DbError, MovieRepo, Profile, ProfileRepo};
use crate::seed::seed_catalog;
use crate::server::AppState;

const MSG_FIELDS_REQUIRED: &str = "All fields are required";
const MSG_PROFILE_EXISTS: &str = "Profile already exists";
const MSG_PROFILE_NOT_FOUND: &str = "Profile not found";

/// POST /seed_movies
pub async fn seed_movies(State(state): State<AppState>) -> Result<Json<MessageResponse>, ApiError> {
    let count = seed_catalog(state.db.as_ref(), &state.catalog).await?;
    info!("Seeded {} catalog movies on request", count);
    Ok(Json(MessageResponse::new("Movies seeded!")))
}

/// GET /movies
pub async fn list_movies(State(state): State<AppState>) -> Result<Json<MoviesResponse>, ApiError> {
    let movies = state.db.list_movies().await?;
    Ok(Json(MoviesResponse {
        success: true,
        movies,
    }))
}

/// POST /profiles
pub async fn create_profile(
    State(state): State<AppState>,
    payload: Result<Json<CreateProfileRequest>, JsonRejection>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let Json(req) = payload.map_err(|e| {
        warn!("Rejected profile body: {}", e.body_text());
        ApiError::Validation(MSG_FIELDS_REQUIRED.to_string())
    })?;

    let (Some(user_id), Some(username), Some(genre)) = (
        required(req.user_id),
        required(req.username),
        required(req.genre),
    ) else {
        return Err(ApiError::Validation(MSG_FIELDS_REQUIRED.to_string()));
    };

    let profile = Profile::new(&user_id, &username, &genre);
    state.db.create_profile(&profile).await.map_err(|e| match e {
        DbError::AlreadyExists(_) => ApiError::Conflict(MSG_PROFILE_EXISTS.to_string()),
        other => other.into(),
    })?;

    info!(user_id = %profile.user_id, genre = %profile.genre, "Created profile");
    Ok(Json(ProfileResponse {
        success: true,
        profile,
    }))
}

/// GET /profiles/:user_id
pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = find_profile(&state, &user_id).await?;
    Ok(Json(ProfileResponse {
        success: true,
        profile,
    }))
}

/// GET /user-movies/:user_id
///
/// Serves the built-in catalog list for the profile's genre. Persisted
/// movies are not consulted.
pub async fn get_user_movies(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<GenreMoviesResponse>, ApiError> {
    let profile = find_profile(&state, &user_id).await?;
    let movies = state.catalog.movies_for_genre(&profile.genre);
    Ok(Json(GenreMoviesResponse {
        success: true,
        movies,
    }))
}

pub async fn fallback_handler() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("Route not found")),
    )
}

async fn find_profile(state: &AppState, user_id: &str) -> Result<Profile, ApiError> {
    state.db.get_profile(user_id).await.map_err(|e| match e {
        DbError::NotFound(_) => ApiError::NotFound(MSG_PROFILE_NOT_FOUND.to_string()),
        other => other.into(),
    })
}

/// A field counts as missing when absent, null, `false`, zero or the empty
/// string. Other scalars are kept as their text form; objects and arrays
/// cannot be stored as a field and count as missing.
fn required(field: Option<Value>) -> Option<String> {
    match field? {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Bool(true) => Some("true".to_string()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}
