// Institute site - backend for the institute website
// Entry point: command line, logging and HTTP server

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tokio::{
    net::TcpListener,
    signal::{self, ctrl_c},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use institute_site::{api, app, config::Config, services};

#[derive(Parser)]
#[command(name = "institute-site")]
#[command(about = "Institute website backend")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the JSON API (default)
    Serve {
        /// Port to listen on (overrides PORT)
        #[arg(long)]
        port: Option<u16>,
        /// Data directory (overrides DATA_DIR)
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Import legacy JSON documents and/or seed demo data
    Import {
        /// Directory holding the legacy admissions.json, settings.json, ...
        #[arg(long)]
        from: Option<PathBuf>,
        /// Insert the demo news, alumni and messages
        #[arg(long)]
        demo: bool,
        /// Data directory (overrides DATA_DIR)
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "institute_site=debug,tower_http=info,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    match cli.command.unwrap_or(Commands::Serve {
        port: None,
        data_dir: None,
    }) {
        Commands::Serve { port, data_dir } => {
            let mut config = match data_dir {
                Some(dir) => config.with_data_dir(dir),
                None => config,
            };
            if let Some(port) = port {
                config.port = port;
            }
            serve(config).await
        }
        Commands::Import {
            from,
            demo,
            data_dir,
        } => {
            let config = match data_dir {
                Some(dir) => config.with_data_dir(dir),
                None => config,
            };
            import(config, from, demo).await
        }
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    tracing::info!("Starting institute site backend");

    let port = config.port;
    let state = app::setup(&config).await?;
    let router = api::create_router(state)?;

    let address = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!("Server running on {}", address);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shut down");
    Ok(())
}

async fn import(config: Config, from: Option<PathBuf>, demo: bool) -> anyhow::Result<()> {
    if from.is_none() && !demo {
        bail!("Nothing to import: pass --from <dir> and/or --demo");
    }

    let state = app::setup(&config).await?;

    if let Some(dir) = from {
        let report = services::import_legacy(&state, &dir).await?;
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    if demo {
        let report = services::seed_demo(&state).await?;
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
