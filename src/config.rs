//! Environment-driven configuration for the server binary.
//!
//! All settings come from `READER_*` environment variables. Missing required
//! variables and unparseable values fail fast at startup with an error
//! naming the offending variable.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use crate::session::SessionConfig;
use crate::types::ItemId;

/// Errors that can occur while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    /// An environment variable is set to an unparseable value.
    #[error("invalid value for {name}: {value:?}")]
    InvalidVar {
        /// The variable name.
        name: &'static str,
        /// The rejected value.
        value: String,
    },
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to. `READER_BIND_ADDR`, default
    /// `0.0.0.0:3000`.
    pub bind_addr: SocketAddr,

    /// The function-invocation endpoint all gateway calls are POSTed to.
    /// `READER_GATEWAY_ENDPOINT`, required.
    pub gateway_endpoint: String,

    /// The collection context sessions are created for (e.g., a version id).
    /// `READER_CONTEXT`, default `default`.
    pub context: String,

    /// Collection id selected by default when present.
    /// `READER_PREFERRED_COLLECTION`, default `genesis`; set to the empty
    /// string to disable.
    pub preferred_collection: Option<ItemId>,

    /// Per-fetch deadline in seconds. `READER_FETCH_TIMEOUT_SECS`, unset
    /// means no deadline.
    pub fetch_timeout: Option<Duration>,
}

impl Config {
    /// Reads the configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = match optional("READER_BIND_ADDR") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidVar {
                name: "READER_BIND_ADDR",
                value,
            })?,
            None => SocketAddr::from(([0, 0, 0, 0], 3000)),
        };

        let gateway_endpoint = optional("READER_GATEWAY_ENDPOINT")
            .ok_or(ConfigError::MissingVar("READER_GATEWAY_ENDPOINT"))?;

        let context = optional("READER_CONTEXT").unwrap_or_else(|| "default".to_string());

        let preferred_collection = match optional("READER_PREFERRED_COLLECTION") {
            Some(value) if value.is_empty() => None,
            Some(value) => Some(ItemId::new(value)),
            None => Some(ItemId::new("genesis")),
        };

        let fetch_timeout = match optional("READER_FETCH_TIMEOUT_SECS") {
            Some(value) => {
                let secs: u64 = value.parse().map_err(|_| ConfigError::InvalidVar {
                    name: "READER_FETCH_TIMEOUT_SECS",
                    value,
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Config {
            bind_addr,
            gateway_endpoint,
            context,
            preferred_collection,
            fetch_timeout,
        })
    }

    /// The session configuration derived from this config.
    pub fn session_config(&self) -> SessionConfig {
        let mut session = SessionConfig::new(self.context.clone());
        session.preferred_collection = self.preferred_collection.clone();
        session.fetch_timeout = self.fetch_timeout;
        session
    }
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok()
}
