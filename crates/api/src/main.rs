use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use pitch_api::config::ServerConfig;
use pitch_api::router::build_app_router;
use pitch_api::state::AppState;
use pitch_composer::client::DEFAULT_TIMEOUT;
use pitch_composer::{CompletionConfig, HttpCompletionClient, TextCompletionClient};
use pitch_db::{MemoryStore, PgStore, PitchStore};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let fmt_layer = if json_logs {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "pitch_api=debug,pitch_composer=debug,pitch_db=info,tower_http=debug".into()
            }),
        )
        .with(fmt_layer)
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        public_origin = %config.public_origin,
        "Loaded server configuration"
    );

    // --- Storage ---
    let (store, pool) = match &config.database_url {
        Some(database_url) => {
            let pool = pitch_db::create_pool(database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            pitch_db::health_check(&pool)
                .await
                .expect("Database health check failed");
            tracing::info!("Database health check passed");

            pitch_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            let store = PgStore::connect(pool.clone())
                .await
                .expect("Failed to inspect database schema");
            let store: Arc<dyn PitchStore> = Arc::new(store);
            (store, Some(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using the in-memory store, data is lost on exit");
            let store: Arc<dyn PitchStore> = Arc::new(MemoryStore::new());
            (store, None)
        }
    };

    // --- Text completion ---
    if config.textgen.api_key.is_none() {
        tracing::warn!("TEXTGEN_API_KEY not set; AI generation requests will fail");
    }
    let completion: Arc<dyn TextCompletionClient> = Arc::new(
        HttpCompletionClient::new(CompletionConfig {
            api_url: config.textgen.api_url.clone(),
            api_key: config.textgen.api_key.clone(),
            model: config.textgen.model.clone(),
            timeout: DEFAULT_TIMEOUT,
        })
        .expect("Failed to build HTTP client"),
    );

    // --- App state ---
    let state = AppState::new(store, pool, config.clone(), completion);
    let composer = Arc::clone(&state.composer);

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, flushing open composer sessions");
    composer.close_all().await;

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
