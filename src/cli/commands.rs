//! CLI command implementations.
//!
//! Boot is explicit and happens here, never at import time: load and
//! validate the config, open the store (journal replay), then hand the
//! opened store to the HTTP server.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::http_server::{HttpServer, HttpServerConfig};
use crate::observability::Logger;
use crate::storage::Store;

use super::args::Command;
use super::errors::{CliError, CliResult};

/// Service configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory (required).
    pub data_dir: String,

    /// Host to bind (optional, default "0.0.0.0").
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind (optional, default 8080).
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins (optional, default empty = permissive).
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Config {
    /// Load configuration from file.
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration.
    fn validate(&self) -> CliResult<()> {
        if self.data_dir.is_empty() {
            return Err(CliError::config_error("data_dir must not be empty"));
        }
        if self.port == 0 {
            return Err(CliError::config_error("port must be > 0"));
        }
        Ok(())
    }

    /// Get data directory as Path.
    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }

    /// The HTTP server slice of the config.
    pub fn http_config(&self) -> HttpServerConfig {
        HttpServerConfig {
            host: self.host.clone(),
            port: self.port,
            cors_origins: self.cors_origins.clone(),
        }
    }
}

/// Dispatch a parsed command.
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Init { config } => init(&config),
        Command::Serve { config } => serve(&config),
    }
}

/// Create the data directory and an empty journal.
pub fn init(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;

    if config.data_path().join("journal.dat").exists() {
        return Err(CliError::already_initialized());
    }

    // Opening the store creates the directory and the journal file.
    Store::open(config.data_path())?;

    Logger::info("INIT_COMPLETE", &[("data_dir", config.data_dir.as_str())]);
    Ok(())
}

/// Boot and serve until terminated.
pub fn serve(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;

    let store = Arc::new(Store::open(config.data_path())?);
    let (countries, cities, languages) = store.row_counts()?;
    let countries = countries.to_string();
    let cities = cities.to_string();
    let languages = languages.to_string();
    Logger::info(
        "BOOT_COMPLETE",
        &[
            ("countries", countries.as_str()),
            ("cities", cities.as_str()),
            ("languages", languages.as_str()),
        ],
    );

    let server = HttpServer::new(store, config.http_config());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::boot_failed(format!("failed to start runtime: {}", e)))?;

    runtime
        .block_on(server.start())
        .map_err(|e| CliError::boot_failed(format!("server failed: {}", e)))
}
