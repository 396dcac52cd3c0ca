//! Server configuration.

use std::net::{Ipv4Addr, SocketAddr};

use otterbridge_session::Credential;

/// Default port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default max body size for REST requests (1 MB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the server to.
    pub bind_address: SocketAddr,

    /// Answer cross-origin requests from any origin.
    pub cors: bool,

    /// Enable request logging.
    pub request_logging: bool,

    /// Maximum REST request body size in bytes.
    pub max_body_size: usize,

    /// Account used when a request carries no credentials.
    pub fallback_credential: Option<Credential>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            cors: true,
            request_logging: true,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            fallback_credential: None,
        }
    }
}

impl ServerConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bind address.
    pub fn with_bind_address(mut self, addr: SocketAddr) -> Self {
        self.bind_address = addr;
        self
    }

    /// Enable or disable CORS.
    pub fn with_cors(mut self, enabled: bool) -> Self {
        self.cors = enabled;
        self
    }

    /// Enable or disable request logging.
    pub fn with_request_logging(mut self, enabled: bool) -> Self {
        self.request_logging = enabled;
        self
    }

    /// Set the maximum REST request body size.
    pub fn with_max_body_size(mut self, size: usize) -> Self {
        self.max_body_size = size;
        self
    }

    /// Set the fallback credential.
    pub fn with_fallback_credential(mut self, credential: Option<Credential>) -> Self {
        self.fallback_credential = credential;
        self
    }
}
