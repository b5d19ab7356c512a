//! `[serve]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [serve]
//! interface = "127.0.0.1"     # Network interface (127.0.0.1 = localhost only)
//! port = 5277                 # HTTP port number
//! prefix = "/vitrine"         # URL prefix the publisher is mounted under
//! ```
//!
//! Use `interface = "0.0.0.0"` to make the server accessible from LAN.

use crate::delegator::DEFAULT_PREFIX;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};

/// Asset server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Network interface to bind.
    pub interface: IpAddr,

    /// HTTP port number. The next free port is tried when taken.
    pub port: u16,

    /// Mount point of the publisher; other paths get a 404 from the server.
    pub prefix: String,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 5277,
            prefix: DEFAULT_PREFIX.to_owned(),
        }
    }
}
