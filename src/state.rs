use std::sync::Arc;
use std::time::Instant;

use crate::config::{Config, PaginationConfig};
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    store: Arc<Store>,
    config: Arc<Config>,
    started_at: Instant,
}

impl AppState {
    pub fn new(store: Arc<Store>, config: &Config) -> Self {
        Self {
            store,
            config: Arc::new(config.clone()),
            started_at: Instant::now(),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pagination(&self) -> &PaginationConfig {
        &self.config.pagination
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_exposes_pagination_policy() {
        let mut cfg = Config::from_env();
        cfg.pagination = PaginationConfig {
            default_limit: 10,
            max_limit: 20,
        };
        let store = Arc::new(Store::open_in_memory().unwrap());
        let state = AppState::new(store, &cfg);

        assert_eq!(state.pagination().clamp(Some(99)), 20);
        assert!(state.uptime_secs() < 5);
        state.store().ping().unwrap();
    }
}
