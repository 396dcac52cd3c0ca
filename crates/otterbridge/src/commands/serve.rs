//! Serve command - runs the HTTP facade.

use std::net::{IpAddr, SocketAddr};

use anyhow::{Context as _, Result};
use clap::Args;
use tracing::info;

use otterbridge_config::OtterbridgeConfig;
use otterbridge_server::{Server, ServerConfig};
use otterbridge_session::Credential;

use super::{Context, build_cache};

/// Arguments for the serve command.
///
/// CLI arguments override config file and environment values.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Port to listen on (overrides config and PORT)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Address to bind to (overrides config)
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Otter.ai API root (overrides config)
    #[arg(long)]
    pub upstream: Option<String>,
}

/// Run the serve command.
pub async fn run(args: ServeArgs, ctx: &Context) -> Result<()> {
    let loaded = ctx.load_config()?;
    for warning in &loaded.warnings {
        eprintln!("warning: {}", warning);
    }
    for path in loaded.loaded_from() {
        info!(path = %path.display(), "Loaded config");
    }

    let mut config = loaded.config;
    apply_args(&mut config, &args);

    let server_config = server_config(&config)?;
    let cache = build_cache(&config)?;

    info!(
        addr = %server_config.bind_address,
        upstream = %config.upstream_or_default().base_url,
        ttl_secs = cache.config().ttl.as_secs(),
        max_sessions = cache.config().max_sessions,
        fallback = server_config.fallback_credential.is_some(),
        "Configured server"
    );

    Server::new(cache, server_config).run().await?;
    Ok(())
}

/// Overlay CLI flags on the loaded config.
fn apply_args(config: &mut OtterbridgeConfig, args: &ServeArgs) {
    if args.port.is_some() || args.bind.is_some() {
        let server = config.server.get_or_insert_with(Default::default);
        if let Some(port) = args.port {
            server.port = port;
        }
        if let Some(ref bind) = args.bind {
            server.bind = bind.clone();
        }
    }

    if let Some(ref upstream) = args.upstream {
        config
            .upstream
            .get_or_insert_with(Default::default)
            .base_url = upstream.clone();
    }
}

/// Translate the `[server]` and `[credentials]` sections.
fn server_config(config: &OtterbridgeConfig) -> Result<ServerConfig> {
    let server = config.server_or_default();
    let ip: IpAddr = server
        .bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", server.bind))?;

    let fallback = config
        .fallback_credentials()
        .map(|(email, password)| Credential::new(email, password));

    Ok(ServerConfig::new()
        .with_bind_address(SocketAddr::new(ip, server.port))
        .with_cors(server.cors)
        .with_request_logging(server.request_logging)
        .with_fallback_credential(fallback))
}
