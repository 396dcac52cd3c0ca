//! CLI command handlers.

pub mod config;
pub mod login;
pub mod serve;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};

use otterbridge_client::{OtterAuthenticator, OtterClient};
use otterbridge_config::{LoadedConfig, OtterbridgeConfig};
use otterbridge_server::{DynAuthenticator, TranscriptCache};
use otterbridge_session::{CacheConfig, SessionCache};

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Explicit config file, replacing discovery.
    pub config_path: Option<PathBuf>,
    /// Verbose output enabled.
    pub verbose: bool,
}

impl Context {
    /// Load file layers, then environment overrides.
    ///
    /// An explicit `--config` file must exist and parse; discovered files
    /// only produce warnings.
    pub fn load_config(&self) -> Result<LoadedConfig> {
        let mut loaded = match self.config_path {
            Some(ref path) => {
                let config = otterbridge_config::load_config_file(path)
                    .with_context(|| format!("loading config from {}", path.display()))?;
                LoadedConfig {
                    config,
                    sources: vec![otterbridge_config::discovery::ConfigSource {
                        path: path.clone(),
                        loaded: true,
                    }],
                    warnings: Vec::new(),
                }
            }
            None => otterbridge_config::load_config(None)?,
        };

        otterbridge_config::apply_env(&mut loaded.config)?;
        loaded.config.validate()?;

        Ok(loaded)
    }
}

/// Build the session cache and its Otter.ai authenticator from config.
pub fn build_cache(config: &OtterbridgeConfig) -> Result<TranscriptCache> {
    let upstream = config.upstream_or_default();
    let client = OtterClient::builder()
        .base_url(upstream.base_url.clone())
        .timeout(upstream.timeout())
        .page_size(upstream.page_size)
        .build()
        .with_context(|| format!("invalid upstream URL {}", upstream.base_url))?;

    let cache = config.cache_or_default();
    let cache_config = CacheConfig::new()
        .with_ttl(cache.ttl())
        .with_max_sessions(cache.max_sessions);

    let authenticator: Arc<DynAuthenticator> = Arc::new(OtterAuthenticator::new(client));
    Ok(SessionCache::new(cache_config, authenticator))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_build_cache_uses_config() {
        let config = OtterbridgeConfig::from_toml(
            r#"
[upstream]
base_url = "http://127.0.0.1:9/api"

[cache]
ttl_secs = 60
max_sessions = 3
"#,
        )
        .unwrap();

        let cache = build_cache(&config).unwrap();
        assert_eq!(cache.config().ttl, Duration::from_secs(60));
        assert_eq!(cache.config().max_sessions, 3);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_build_cache_rejects_bad_url() {
        let config =
            OtterbridgeConfig::from_toml("[upstream]\nbase_url = \"not a url\"\n").unwrap();
        assert!(build_cache(&config).is_err());
    }
}
