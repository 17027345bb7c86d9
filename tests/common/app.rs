use std::sync::Arc;

use axum::Router;
use tempfile::TempDir;

use forest_map::config::{Config, PaginationConfig};
use forest_map::routes::build_router;
use forest_map::state::AppState;
use forest_map::store::Store;

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub config: Config,
    _temp_dir: TempDir,
}

impl TestApp {
    pub fn store(&self) -> &Store {
        self.state.store()
    }
}

fn test_config(temp_dir: &TempDir, pagination: PaginationConfig) -> Config {
    let static_dir = temp_dir.path().join("frontend");
    std::fs::create_dir_all(&static_dir).expect("create static dir");
    std::fs::write(
        static_dir.join("index.html"),
        "<!doctype html><title>Forest map</title><div id=\"map\"></div>",
    )
    .expect("write index.html");
    std::fs::write(static_dir.join("app.js"), "console.log('map');").expect("write app.js");

    // Built directly rather than through set_var to keep parallel tests independent.
    Config {
        host: std::net::IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
        port: 0,
        log_level: "info".to_string(),
        enable_file_logs: false,
        log_dir: "./logs".to_string(),
        database_path: temp_dir
            .path()
            .join("forest-test.sqlite3")
            .to_string_lossy()
            .to_string(),
        cors_origin: "http://localhost:5173".to_string(),
        static_dir: static_dir.to_string_lossy().to_string(),
        seed_file: None,
        pagination,
    }
}

pub async fn spawn_with_pagination(pagination: PaginationConfig) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("tempdir");
    let config = test_config(&temp_dir, pagination);

    let store = Arc::new(Store::open(&config.database_path).expect("open store"));
    store.run_migrations().expect("run migrations");

    let state = AppState::new(store, &config);
    let app = build_router(state.clone());

    TestApp {
        app,
        state,
        config,
        _temp_dir: temp_dir,
    }
}

pub async fn spawn_test_app() -> TestApp {
    spawn_with_pagination(PaginationConfig::default()).await
}
