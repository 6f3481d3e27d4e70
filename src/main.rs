use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use waypoint::config::Config;

mod commands;

#[derive(Parser)]
#[command(
    name = "waypoint",
    version,
    about = "Loading-state coordinator for the travel-content client",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a TOML config file (environment variables are used otherwise)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true)]
    log_format: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the loading monitor and staleness sweeper
    Serve {
        /// Override the bind address
        #[arg(long)]
        bind: Option<String>,
    },

    /// Fetch one resource as a tracked request
    Fetch {
        /// Resource to fetch (destinations, countries, articles)
        resource: String,

        /// Fetch a single document by id
        #[arg(long)]
        id: Option<String>,

        /// Page the request is tracked under
        #[arg(short, long, default_value = "discover")]
        page: String,

        /// Track as a background refresh instead of a blocking load
        #[arg(long, default_value = "false")]
        content_only: bool,
    },

    /// Load a whole screen (home, discover, article)
    Load {
        /// Page to load
        page: String,

        /// Article id, for the article page
        #[arg(long)]
        id: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    if let Some(format) = &cli.log_format {
        config.logging.format = format.clone();
    }
    config.validate()?;

    setup_tracing(&config.logging.format, &config.logging.level, cli.verbose)?;

    tracing::info!("waypoint starting");

    match cli.command {
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind_address = bind
                    .parse()
                    .map_err(|e| anyhow::anyhow!("Invalid bind address '{bind}': {e}"))?;
            }
            tracing::info!(bind = %config.server.bind_address, "Starting serve command");
            commands::serve(config).await?;
        }

        Commands::Fetch {
            resource,
            id,
            page,
            content_only,
        } => {
            tracing::info!(
                resource = %resource,
                id = ?id,
                page = %page,
                content_only = %content_only,
                "Starting fetch command"
            );
            commands::fetch(
                config,
                commands::FetchParams {
                    resource,
                    id,
                    page,
                    content_only,
                },
            )
            .await?;
        }

        Commands::Load { page, id } => {
            tracing::info!(page = %page, id = ?id, "Starting load command");
            commands::load_page(config, page, id).await?;
        }
    }

    tracing::info!("waypoint completed successfully");
    Ok(())
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("waypoint=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("waypoint={level},warn")))
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}
