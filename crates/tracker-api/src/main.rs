use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use tracker_api::{config::ApiConfig, http, jwt_service, seed, AppState, LogFormat};
use tracker_store::MemoryStore;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

#[tokio::main]
async fn main() {
    let config = match ApiConfig::from_env() {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("STARTUP_ERROR {}", err);
            std::process::exit(1);
        }
    };

    init_tracing(config.log_format);

    if config.is_production() {
        if let Err(err) = config.validate_for_production() {
            eprintln!("STARTUP_ERROR {}", err);
            std::process::exit(1);
        }
    } else if config.jwt_secret.is_none() {
        tracing::warn!("TRACKER_JWT_SECRET not set, signing sessions with the development secret");
    }

    let jwt = match jwt_service(&config) {
        Ok(jwt) => jwt,
        Err(err) => {
            eprintln!("STARTUP_ERROR {}", err);
            std::process::exit(1);
        }
    };

    let store = Arc::new(MemoryStore::new());

    if config.seed {
        if let Err(err) = seed::seed_demo(store.as_ref(), &jwt).await {
            eprintln!("STARTUP_ERROR seeding failed: {}", err);
            std::process::exit(1);
        }
    }

    let app = http::router(AppState::new(store, jwt, config.base_url.clone()));

    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(err) => {
            eprintln!("STARTUP_ERROR failed to bind {}: {}", config.bind_addr, err);
            std::process::exit(1);
        }
    };

    tracing::info!(bind_addr = %config.bind_addr, base_url = %config.base_url, "tracker-api listening");

    if let Err(err) = axum::serve(listener, app).await {
        eprintln!("STARTUP_ERROR server failed: {}", err);
        std::process::exit(1);
    }
}
