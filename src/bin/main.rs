use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "moviepicks-server")]
#[command(about = "Movie profile and genre recommendation API", long_about = None)]
struct Args {
    /// YAML config file. Without one, settings come from the environment.
    #[arg(short, long)]
    config: Option<String>,
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let default_filter = if args.debug {
        "moviepicks_rs=debug,tower_http=debug"
    } else {
        "moviepicks_rs=info,tower_http=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = match moviepicks_rs::config::Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    config.debug_logs = args.debug;
    if let Some(ref path) = args.config {
        tracing::info!("Using config file: {}", path);
    }

    if let Err(e) = moviepicks_rs::run(config).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
