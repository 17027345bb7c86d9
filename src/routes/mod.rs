pub mod forest_heroes;
pub mod health;
pub mod trees;

use std::path::Path;

use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

use crate::middleware::request_id;
use crate::response::AppError;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .nest("/trees", trees::router())
        .nest("/forest-heroes", forest_heroes::router())
        .fallback(api_not_found);

    // The map page and its assets; unknown paths fall back to the page itself.
    let static_dir = Path::new(&state.config().static_dir).to_path_buf();
    let index = static_dir.join("index.html");
    let frontend = ServeDir::new(&static_dir).fallback(ServeFile::new(&index));

    Router::new()
        .nest("/api", api_routes)
        .nest("/health", health::router())
        .route_service("/map", ServeFile::new(&index))
        .fallback_service(frontend)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .with_state(state)
}

async fn api_not_found() -> AppError {
    AppError::not_found("no such endpoint")
}
