use std::net::SocketAddr;
use std::path::PathBuf;

use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod auth;
mod domain;
mod error;
mod rest;
mod storage;

use auth::AuthConfig;
use rest::AppState;
use storage::DbConnection;

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging; RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let database_url = env_or("GYM_DATABASE_URL", "sqlite:gymtrack.db");
    let bind_addr = env_or("GYM_BIND_ADDR", "127.0.0.1:3000");
    let jwt_secret = env_or("GYM_JWT_SECRET", "change-me-in-production");
    let guides_dir = PathBuf::from(env_or("GYM_GUIDES_DIR", "./guides"));

    info!("Setting up database");
    let db = DbConnection::new(&database_url).await?;

    let state = AppState::new(db, AuthConfig::new(jwt_secret));

    // CORS setup to allow the SPA client to make requests
    let cors = CorsLayer::new()
        .allow_origin("http://localhost:8080".parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let app = rest::router(state, &guides_dir).layer(cors);

    let addr: SocketAddr = bind_addr.parse()?;
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
