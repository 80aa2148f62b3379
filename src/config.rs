//! Runtime configuration, resolved once at startup.

use crate::error::Result;
use crate::socket::SocketAddress;

/// Everything the relay needs to know before it starts observing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Where messages are delivered.
    pub socket: SocketAddress,
}

impl Config {
    /// Build the configuration from the process environment.
    ///
    /// Fails when no helper socket path can be derived; the relay must not
    /// run without a target.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            socket: SocketAddress::from_env()?,
        })
    }

    pub fn with_socket(socket: SocketAddress) -> Self {
        Self { socket }
    }
}
