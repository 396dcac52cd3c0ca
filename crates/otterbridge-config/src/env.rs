//! Environment variable overrides.
//!
//! Applied after file layers and before CLI flags.

use crate::error::{ConfigError, Result};
use crate::types::{CredentialsConfig, OtterbridgeConfig};

/// Fallback account email.
pub const EMAIL_ENV: &str = "OTTER_EMAIL";

/// Fallback account password.
pub const PASSWORD_ENV: &str = "OTTER_PASSWORD";

/// Listener port.
pub const PORT_ENV: &str = "PORT";

/// Apply overrides from the process environment.
pub fn apply_env(config: &mut OtterbridgeConfig) -> Result<()> {
    apply_env_from(config, |name| std::env::var(name).ok())
}

/// Apply overrides using a custom variable lookup.
///
/// Empty values are treated as unset.
pub fn apply_env_from(
    config: &mut OtterbridgeConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

    let email = get(EMAIL_ENV);
    let password = get(PASSWORD_ENV);
    if email.is_some() || password.is_some() {
        config
            .credentials
            .get_or_insert_with(CredentialsConfig::default)
            .merge(CredentialsConfig { email, password });
    }

    if let Some(port) = get(PORT_ENV) {
        let port = port.trim().parse::<u16>().map_err(|e| ConfigError::InvalidValue {
            field: PORT_ENV.to_string(),
            reason: format!("'{port}' is not a valid port: {e}"),
        })?;
        config.server.get_or_insert_with(Default::default).port = port;
    }

    Ok(())
}
