//! Server configuration.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

/// Configuration for the campus HTTP server.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind (default `"0.0.0.0"`).
    pub host: String,
    /// Port to bind (default `5000`, `0` for auto-assign).
    pub port: u16,
}

impl ServerConfig {
    /// `host:port`, resolved to a socket address.
    pub fn socket_addr(&self) -> std::io::Result<SocketAddr> {
        use std::net::ToSocketAddrs;

        (self.host.as_str(), self.port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::AddrNotAvailable,
                    format!("cannot resolve {}:{}", self.host, self.port),
                )
            })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 5000,
        }
    }
}
