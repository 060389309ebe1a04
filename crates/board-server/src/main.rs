//! Message Board Server
//!
//! Serves the board page and a small JSON API for listing and submitting
//! posts. Posts are kept in SQLite (embedded) or in memory, capped at a
//! fixed number of the most recent entries.

mod handlers;
mod services;
mod settings;
mod storage;

use anyhow::{Context, Result};
use axum::{
    routing::{get, get_service},
    Router,
};
use board_core::RecordStore;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use settings::{ServerConfig, StoreKind};
use services::PostStore;
use storage::{Database, MemoryStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostStore>,
}

#[tokio::main]
async fn main() {
    // Set up panic hook to log crashes
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()));
        let payload = if let Some(s) = info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        eprintln!("[PANIC] at {:?}: {}", location, payload);
        tracing::error!("PANIC at {:?}: {}", location, payload);
    }));

    // Initialize tracing
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("[FATAL] Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!("Starting Board Server v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run_server().await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_server() -> Result<()> {
    let config = ServerConfig::load().context("Failed to load configuration")?;
    info!(
        "Config loaded: bind={}, store={:?}, post_limit={}",
        config.bind_address, config.store, config.post_limit
    );

    let store: Arc<dyn RecordStore> = match config.store {
        StoreKind::Sqlite => Arc::new(
            Database::new(&config.database_path)
                .await
                .context("Failed to initialize database")?,
        ),
        StoreKind::Memory => {
            info!("Using in-memory store, posts will not survive a restart");
            Arc::new(MemoryStore::new())
        }
    };

    let state = AppState {
        posts: Arc::new(PostStore::with_limit(store, config.post_limit)),
    };

    info!("Static files directory: {}", config.static_dir.display());
    let app = build_router(state, &config.static_dir);

    let addr: SocketAddr = config
        .bind_address
        .parse()
        .context("Failed to parse bind address")?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn build_router(state: AppState, static_dir: &Path) -> Router {
    let index_path = static_dir.join("index.html");

    let router = Router::new()
        // Board page, plus the echo endpoint on the same path
        .route(
            "/",
            get_service(ServeFile::new(&index_path)).post(handlers::echo),
        )
        .route("/index.html", get_service(ServeFile::new(&index_path)))
        .route(
            "/favicon.ico",
            get_service(ServeFile::new(static_dir.join("favicon.ico"))),
        )
        .route("/health", get(handlers::health))
        .nest("/api", api_routes())
        .fallback(handlers::not_found);

    with_layers(router).with_state(state)
}

fn with_layers<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(CatchPanicLayer::custom(handlers::internal_error))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

fn api_routes() -> Router<AppState> {
    Router::new().route(
        "/posts",
        get(handlers::posts::list).post(handlers::posts::create),
    )
}
