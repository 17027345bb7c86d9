use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use crate::constants::{DEFAULT_PAGE_SIZE, HARD_PAGE_SIZE_CEILING, MAX_PAGE_SIZE};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
    pub database_path: String,
    pub cors_origin: String,
    pub static_dir: String,
    pub seed_file: Option<String>,
    pub pagination: PaginationConfig,
}

/// Page-size policy applied by the query builder to every listing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    pub default_limit: u32,
    pub max_limit: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_PAGE_SIZE,
            max_limit: MAX_PAGE_SIZE,
        }
    }
}

impl PaginationConfig {
    /// Clamp a requested page size into `[1, max_limit]`, substituting the
    /// default when the caller did not ask for one.
    pub fn clamp(&self, requested: Option<i64>) -> u32 {
        let max = self.max_limit.max(1);
        match requested {
            None => self.default_limit.clamp(1, max),
            Some(n) => u32::try_from(n.clamp(1, i64::from(max))).unwrap_or(max),
        }
    }

    fn normalized(self) -> Self {
        let max_limit = self.max_limit.clamp(1, HARD_PAGE_SIZE_CEILING);
        Self {
            default_limit: self.default_limit.clamp(1, max_limit),
            max_limit,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let seed_file = env_or("SEED_FILE", "");
        Self {
            host: env_or_parse("HOST", IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))),
            port: env_or_parse("PORT", 10000_u16),
            log_level: env_or("RUST_LOG", "info"),
            enable_file_logs: env_or_bool("ENABLE_FILE_LOGS", false),
            log_dir: env_or("LOG_DIR", "./logs"),
            database_path: env_or("DATABASE_PATH", "./data/forest.sqlite3"),
            cors_origin: env_or("CORS_ORIGIN", "http://localhost:3000"),
            static_dir: env_or("STATIC_DIR", "./frontend"),
            seed_file: if seed_file.trim().is_empty() {
                None
            } else {
                Some(seed_file)
            },
            pagination: PaginationConfig {
                default_limit: env_or_parse("PAGE_SIZE_DEFAULT", DEFAULT_PAGE_SIZE),
                max_limit: env_or_parse("PAGE_SIZE_MAX", MAX_PAGE_SIZE),
            }
            .normalized(),
        }
    }

    /// Allowed CORS origins. `None` means any origin.
    pub fn cors_origins(&self) -> Option<Vec<String>> {
        if self.cors_origin.trim() == "*" {
            return None;
        }
        Some(
            self.cors_origin
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }
}

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_or_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(
                    key,
                    value = %raw,
                    "Failed to parse env var, using default"
                );
                default
            }
        },
        Err(_) => default,
    }
}

pub fn env_or_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}
