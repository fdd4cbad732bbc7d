use std::path::PathBuf;

const DEFAULT_DATABASE_PATH: &str = "data/blog.db";

/// Process settings read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_path: PathBuf,
    pub json_logs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config { database_path: PathBuf::from(DEFAULT_DATABASE_PATH), json_logs: false }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        Config {
            database_path: get("DATABASE_PATH")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH)),
            json_logs: get("LOG_FORMAT").map(|v| v.eq_ignore_ascii_case("json")).unwrap_or(false),
        }
    }
}
