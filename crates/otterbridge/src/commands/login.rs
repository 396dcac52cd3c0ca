//! Login command - checks credentials against Otter.ai.

use anyhow::{Result, bail};
use clap::Args;

use otterbridge_session::Credential;

use super::{Context, build_cache};

/// Arguments for the login command.
#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email (defaults to the configured credentials)
    #[arg(long)]
    pub email: Option<String>,

    /// Otter.ai API root (overrides config)
    #[arg(long)]
    pub upstream: Option<String>,
}

/// Run the login command.
///
/// Logs in once through the same cache and authenticator the server uses
/// and prints the upstream user id.
pub async fn run(args: LoginArgs, ctx: &Context) -> Result<()> {
    let mut config = ctx.load_config()?.config;
    if let Some(upstream) = args.upstream {
        config
            .upstream
            .get_or_insert_with(Default::default)
            .base_url = upstream;
    }

    let configured = config
        .fallback_credentials()
        .map(|(email, password)| (email.to_string(), password.to_string()));

    let credential = match (args.email, configured) {
        (Some(email), Some((configured_email, password))) if email == configured_email => {
            Credential::new(email, password)
        }
        (Some(email), _) => {
            let password = rpassword::prompt_password(format!("Password for {email}: "))?;
            Credential::new(email, password)
        }
        (None, Some((email, password))) => Credential::new(email, password),
        (None, None) => bail!(
            "No account given. Pass --email, or set OTTER_EMAIL and OTTER_PASSWORD."
        ),
    };

    let cache = build_cache(&config)?;
    let session = cache.acquire(&credential).await?;

    if ctx.verbose {
        println!("Logged in as {} (user id {})", credential.identifier(), session.user_id());
    } else {
        println!("{}", session.user_id());
    }
    Ok(())
}
