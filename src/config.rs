/*!
 * Configuration types for tfchain clients
 */

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tfchain_connect::{ConnectionManager, RpcTransport, DEFAULT_STORAGE_QUERY_METHOD};

use crate::error::{Result, TfchainError};

/// Environment variable that overrides the configured endpoint
pub const ENDPOINT_ENV: &str = "TFCHAIN_ENDPOINT";

/// Client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// HTTP JSON-RPC endpoint of the chain node
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Upper bound for a single request, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// JSON-RPC method used for storage lookups
    #[serde(default = "default_storage_query_method")]
    pub storage_query_method: String,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Write logs to this file (JSON) instead of stdout
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Force debug logging
    #[serde(default)]
    pub verbose: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            request_timeout_secs: default_request_timeout(),
            storage_query_method: default_storage_query_method(),
            log_level: LogLevel::default(),
            log_file: None,
            verbose: false,
        }
    }
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Only errors
    Error,

    /// Warnings and errors
    Warn,

    /// Info, warnings, and errors
    #[default]
    Info,

    /// Debug and above
    Debug,

    /// All messages including traces
    Trace,
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

// Default value functions for serde
fn default_endpoint() -> String {
    "http://127.0.0.1:9933".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_storage_query_method() -> String {
    DEFAULT_STORAGE_QUERY_METHOD.to_string()
}

impl ClientConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| TfchainError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a TOML file
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| TfchainError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Apply `TFCHAIN_ENDPOINT` if it is set
    pub fn with_env_overrides(self) -> Self {
        self.with_endpoint_override(std::env::var(ENDPOINT_ENV).ok())
    }

    fn with_endpoint_override(mut self, endpoint: Option<String>) -> Self {
        if let Some(endpoint) = endpoint.filter(|e| !e.trim().is_empty()) {
            self.endpoint = endpoint;
        }
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            return Err(TfchainError::Config("endpoint must not be empty".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(TfchainError::Config(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.storage_query_method.trim().is_empty() {
            return Err(TfchainError::Config(
                "storage_query_method must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn build_transport(&self) -> Result<RpcTransport> {
        self.validate()?;
        let transport = RpcTransport::new(self.endpoint.clone(), self.request_timeout())?
            .with_query_method(self.storage_query_method.clone());
        Ok(transport)
    }

    /// Build the shared connection that accessors are constructed with
    ///
    /// Nothing is dialled until the first query.
    pub fn build_manager(&self) -> Result<Arc<ConnectionManager<RpcTransport>>> {
        Ok(Arc::new(ConnectionManager::new(self.build_transport()?)))
    }
}
