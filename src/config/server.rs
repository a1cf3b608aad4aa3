//! HTTP server settings loaded from the environment.

use crate::errors::{Error, Result};
use std::net::SocketAddr;

const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8000";

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to
    pub listen_addr: SocketAddr,
}

impl ServerConfig {
    /// Reads `CATALOG_LISTEN_ADDR`, falling back to `127.0.0.1:8000`.
    pub fn from_env() -> Result<Self> {
        let raw = std::env::var("CATALOG_LISTEN_ADDR")
            .unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string());
        Self::parse(&raw)
    }

    /// Parses a listen address such as `0.0.0.0:8080`.
    pub fn parse(raw: &str) -> Result<Self> {
        let listen_addr = raw.trim().parse().map_err(|e| Error::Config {
            message: format!("Invalid listen address '{raw}': {e}"),
        })?;
        Ok(Self { listen_addr })
    }
}
