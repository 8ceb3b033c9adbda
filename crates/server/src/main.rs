//! # server
//!
//! REST API server for the air quality forecast engine.

use std::env;
use std::error::Error;
use std::net::SocketAddr;

use airquality_facade::{AirQualityEngine, EngineConfig};
use server::{build_router, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type ServerResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

fn load_config() -> ServerResult<EngineConfig> {
    match env::var("AIRQ_CONFIG") {
        Ok(path) => Ok(EngineConfig::from_file(path)?),
        Err(_) => Ok(EngineConfig::default()),
    }
}

async fn run() -> ServerResult<()> {
    let config = load_config()?;
    let data = env::var("AIRQ_DATA").unwrap_or_else(|_| "delhi_aqi.csv".to_string());
    tracing::info!(data = %data, "training models");

    // Fitting is CPU bound
    let context = tokio::task::spawn_blocking(move || {
        AirQualityEngine::new(config).start_from_csv(&data)
    })
    .await??;

    let app = build_router(AppState::new(context));

    // Server configuration from environment
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .map_err(|e| format!("PORT must be a valid number: {}", e))?;
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| format!("Invalid HOST:PORT configuration: {}", e))?;

    tracing::info!("airquality server v{} listening on {}", env!("CARGO_PKG_VERSION"), addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    // Load .env file (optional - won't fail if missing)
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "server=info,tower_http=info".into()),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!("startup failed: {}", e);
        std::process::exit(1);
    }
}
