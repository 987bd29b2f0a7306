pub mod api;
pub mod catalog;
pub mod config;
pub mod db;
pub mod middleware;
pub mod seed;
pub mod server;

use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Database error: {0}")]
    Database(#[from] db::DbError),
    #[error("Catalog error: {0}")]
    Catalog(#[from] catalog::CatalogError),
    #[error("Seeding error: {0}")]
    Seed(#[from] seed::SeedError),
    #[error("Server error: {0}")]
    Server(String),
}

pub fn load_catalog(config: &config::Config) -> Result<catalog::Catalog, catalog::CatalogError> {
    match config.catalog.as_deref() {
        Some(path) => {
            info!("Loading catalog from {}", path);
            catalog::Catalog::from_file(path)
        }
        None => catalog::Catalog::builtin(),
    }
}

/// Connects to the database and serves the API. The database must be
/// reachable before the listener is bound; a failed connection ends startup.
pub async fn run(config: config::Config) -> Result<(), ServerError> {
    if config.debug_logs {
        info!("Debug logging enabled");
    }

    let db_url = config.database_url()?.to_string();
    info!("Opening database at {}", db_url);
    let db = Arc::new(db::SqliteRepository::new(&db_url).await?);

    let catalog = Arc::new(load_catalog(&config)?);
    info!(
        "Catalog loaded: {} genres, {} movies",
        catalog.genres().count(),
        catalog.len()
    );

    let address = config.listen.address.as_deref().unwrap_or("[::]");
    let port = &config.listen.port;
    let addr: SocketAddr = format!("{}:{}", address, port)
        .parse()
        .map_err(|e| ServerError::Server(format!("Invalid address: {}", e)))?;

    let tls = match (&config.listen.tlscert, &config.listen.tlskey) {
        (Some(cert), Some(key)) => Some((cert.clone(), key.clone())),
        _ => None,
    };

    let state = server::AppState::new(db, catalog);
    let app = server::build_router(state);

    if let Some((cert_path, key_path)) = tls {
        info!("Loading TLS certificate from {}", cert_path);
        info!("Loading TLS key from {}", key_path);

        let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(&cert_path, &key_path)
            .await
            .map_err(|e| ServerError::Server(format!("Failed to load TLS config: {}", e)))?;

        info!("Serving HTTPS on {}", addr);

        axum_server::bind_rustls(addr, tls_config)
            .serve(app.into_make_service())
            .await
            .map_err(|e| ServerError::Server(format!("Server error: {}", e)))?;
    } else {
        info!("Serving HTTP on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Server(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Server(format!("Server error: {}", e)))?;
    }

    Ok(())
}
