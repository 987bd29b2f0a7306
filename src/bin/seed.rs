use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use moviepicks_rs::config::Config;
use moviepicks_rs::db::{MovieRepo, SqliteRepository};
use moviepicks_rs::seed::{movies_from_file, seed_batch};
use moviepicks_rs::ServerError;

/// Loads a movies file into a database in one transaction.
#[derive(Parser, Debug)]
#[command(name = "moviepicks-seed")]
#[command(about = "Bulk-load movies into a database", long_about = None)]
struct Args {
    #[arg(short, long)]
    config: Option<String>,
    /// Flat array of movies with a genre each, or a genre -> movies object.
    #[arg(short, long, default_value = "movies.json")]
    file: String,
    /// Overrides `seed.database` from the config.
    #[arg(short, long)]
    database: Option<String>,
}

async fn seed(args: &Args) -> Result<u64, ServerError> {
    let config = Config::load(args.config.as_deref())?;
    let db_url = match args.database.as_deref() {
        Some(url) => url.to_string(),
        None => config.seed_database_url()?.to_string(),
    };

    let movies = movies_from_file(&args.file)?;
    info!("Read {} movies from {}", movies.len(), args.file);

    let db = SqliteRepository::new(&db_url).await?;
    let count = seed_batch(&db, &movies).await?;
    info!("Database now holds {} movies", db.count_movies().await?);
    db.close().await;

    Ok(count)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moviepicks_rs=info,moviepicks_seed=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    match seed(&args).await {
        Ok(count) => info!("Uploaded {} movies", count),
        Err(e) => {
            error!("Seeding failed: {}", e);
            std::process::exit(1);
        }
    }
}
