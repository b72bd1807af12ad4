mod analysis;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod reclassify;
mod routes;
mod searches;
mod state;
#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::service::FeasibilityService;
use crate::config::Config;
use crate::db::create_pool;
use crate::reclassify::ReclassifyArgs;
use crate::routes::build_router;
use crate::state::AppState;

/// AI feasibility analysis API
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Re-run the classifier over every stored search
    Reclassify(ReclassifyArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db = create_pool(&config.database_url).await?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config, db).await,
        Command::Reclassify(args) => {
            reclassify::run(&db, &args).await?;
            Ok(())
        }
    }
}

async fn serve(config: Config, db: sqlx::PgPool) -> Result<()> {
    info!("Starting FeasAI API v{}", env!("CARGO_PKG_VERSION"));

    if config.cerebras_api_key.is_none() {
        warn!("CEREBRAS_API_KEY is not set; cerebras analyses will fail");
    }
    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY / GOOGLE_API_KEY is not set; gemini analyses will fail");
    }

    let analyzer = FeasibilityService::from_config(&config, reqwest::Client::new());
    info!(
        "Providers ready (cerebras: {}, gemini: {})",
        llm_client::cerebras::MODEL,
        llm_client::gemini::MODEL
    );

    let state = AppState {
        db,
        analyzer: Arc::new(analyzer),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
