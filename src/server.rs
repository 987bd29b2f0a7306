use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::api;
use crate::catalog::Catalog;
use crate::db::Repository;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn Repository>,
    pub catalog: Arc<Catalog>,
}

impl AppState {
    pub fn new(db: Arc<dyn Repository>, catalog: Arc<Catalog>) -> Self {
        Self { db, catalog }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/seed_movies", post(api::seed_movies))
        .route("/movies", get(api::list_movies))
        .route("/profiles", post(api::create_profile))
        .route("/profiles/:user_id", get(api::get_profile))
        .route("/user-movies/:user_id", get(api::get_user_movies))
        .fallback(api::fallback_handler)
        .layer(axum::middleware::from_fn(crate::middleware::log_request))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
