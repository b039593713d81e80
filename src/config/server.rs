//! Server settings read from the environment.

use std::net::SocketAddr;

use crate::errors::{Error, Result};

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Gets the socket address the HTTP server listens on.
///
/// Reads `BIND_ADDRESS` and falls back to `0.0.0.0:8080` when it is unset.
///
/// # Errors
/// Returns [`Error::Config`] when the variable is set but is not a socket address.
pub fn get_bind_address() -> Result<SocketAddr> {
    let raw = std::env::var("BIND_ADDRESS").unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string());
    parse_bind_address(&raw)
}

fn parse_bind_address(raw: &str) -> Result<SocketAddr> {
    raw.trim().parse().map_err(|e| Error::Config {
        message: format!("Invalid BIND_ADDRESS '{raw}': {e}"),
    })
}
