//! Config command - inspect the resolved configuration.

use anyhow::Result;
use clap::{Args, Subcommand};

use super::Context;

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the merged configuration (passwords redacted)
    Show,

    /// Print the user config file path
    Path,
}

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => cmd_show(ctx),
        ConfigCommand::Path => cmd_path(),
    }
}

fn cmd_show(ctx: &Context) -> Result<()> {
    let loaded = ctx.load_config()?;

    let sources = loaded.loaded_from();
    if sources.is_empty() {
        println!("# No config files loaded (using defaults)");
    } else {
        for source in &sources {
            println!("# from {}", source.display());
        }
    }
    for warning in &loaded.warnings {
        println!("# warning: {}", warning);
    }

    let mut config = loaded.config;
    config.server = Some(config.server_or_default());
    config.upstream = Some(config.upstream_or_default());
    config.cache = Some(config.cache_or_default());
    if let Some(ref mut credentials) = config.credentials
        && credentials.password.is_some()
    {
        credentials.password = Some("********".to_string());
    }

    print!("{}", config.to_toml()?);
    Ok(())
}

fn cmd_path() -> Result<()> {
    match otterbridge_config::xdg_config_path() {
        Some(path) => println!("{}", path.display()),
        None => println!("(no config directory available on this platform)"),
    }
    Ok(())
}
