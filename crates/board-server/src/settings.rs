//! Server configuration
//!
//! Defaults overlaid with `BOARD_*` environment variables, e.g.
//! `BOARD_BIND_ADDRESS=127.0.0.1:3000` or `BOARD_STORE=memory`.

use anyhow::{bail, Context, Result};
use board_core::POST_LIMIT;
use config::{Config, Environment};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Memory,
    Sqlite,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub bind_address: String,
    pub static_dir: PathBuf,
    pub store: StoreKind,
    pub database_path: String,
    pub post_limit: usize,
}

impl ServerConfig {
    pub fn load() -> Result<Self> {
        Self::load_from(Environment::with_prefix("BOARD").try_parsing(true))
    }

    fn load_from(env: Environment) -> Result<Self> {
        let config: ServerConfig = Config::builder()
            .set_default("bind_address", "0.0.0.0:8080")?
            .set_default("static_dir", "./static")?
            .set_default("store", "sqlite")?
            .set_default("database_path", "./data/board.db")?
            .set_default("post_limit", POST_LIMIT as i64)?
            .add_source(env)
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        if config.post_limit == 0 {
            bail!("post_limit must be at least 1");
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::Map;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let source: Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix("BOARD")
            .try_parsing(true)
            .source(Some(source))
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::load_from(env(&[])).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert_eq!(config.static_dir, PathBuf::from("./static"));
        assert_eq!(config.store, StoreKind::Sqlite);
        assert_eq!(config.post_limit, POST_LIMIT);
    }

    #[test]
    fn test_environment_overrides() {
        let config = ServerConfig::load_from(env(&[
            ("BOARD_BIND_ADDRESS", "127.0.0.1:3000"),
            ("BOARD_STORE", "memory"),
            ("BOARD_POST_LIMIT", "10"),
        ]))
        .unwrap();
        assert_eq!(config.bind_address, "127.0.0.1:3000");
        assert_eq!(config.store, StoreKind::Memory);
        assert_eq!(config.post_limit, 10);
    }

    #[test]
    fn test_rejects_zero_limit() {
        assert!(ServerConfig::load_from(env(&[("BOARD_POST_LIMIT", "0")])).is_err());
    }
}
