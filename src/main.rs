use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use forest_map::config::Config;
use forest_map::logging::{init_tracing, LogConfig};
use forest_map::middleware::security_headers;
use forest_map::routes::build_router;
use forest_map::state::AppState;
use forest_map::store::Store;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = Config::from_env();

    init_tracing(&LogConfig::from(&config));
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting forest-map");

    let store = Arc::new(Store::open(&config.database_path).expect("Failed to open database"));
    store.run_migrations().expect("Failed to run migrations");

    if let Some(seed_file) = &config.seed_file {
        if let Err(e) = store.seed_if_empty(Path::new(seed_file)) {
            tracing::error!(seed_file, error = %e, "Failed to load seed file");
        }
    }

    let state = AppState::new(store.clone(), &config);

    let app = build_router(state)
        .layer(build_cors_layer(&config))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new());
    let app = security_headers::apply(app);

    let addr = SocketAddr::new(config.host, config.port);
    tracing::info!(%addr, "Listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind TCP listener");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "HTTP server crashed");
    }

    tracing::info!("Shutdown complete");
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS]);

    let Some(origins) = config.cors_origins() else {
        // Wildcard is for local development only.
        return base.allow_origin(Any);
    };

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .map(|origin| {
            origin.parse::<HeaderValue>().unwrap_or_else(|e| {
                panic!(
                    "FATAL: Invalid CORS_ORIGIN entry '{origin}': {e}. \
                     Fix the CORS_ORIGIN environment variable."
                )
            })
        })
        .collect();
    base.allow_origin(AllowOrigin::list(parsed))
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = sigterm.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    tracing::info!("Shutdown signal received");
}
