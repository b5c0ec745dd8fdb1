//! Login command implementation.

use anyhow::{Context, Result, bail};
use clap::Args;
use colored::Colorize;

use sublog_core::error::AuthError;
use sublog_core::types::GITHUB_API;
use sublog_core::{AccessToken, ApiUrl, Owner, RecordStore};

use crate::config::Settings;
use crate::output;
use crate::session::storage;
use crate::session::{CliBackend, CliSession};

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Personal access token with repository scope
    #[arg(long, env = "SUBLOG_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Ledger owner (defaults to the token's account)
    #[arg(long)]
    pub owner: Option<String>,

    /// API base URL (https:// for GitHub, file:// for a local ledger)
    #[arg(long, env = "SUBLOG_API", default_value = GITHUB_API)]
    pub api: String,
}

pub async fn run(args: LoginArgs) -> Result<()> {
    let api = ApiUrl::new(&args.api).context("Invalid API URL")?;
    let token = AccessToken::new(args.token.unwrap_or_default());

    if token.is_empty() && !api.is_local() {
        return Err(sublog_core::Error::from(AuthError::MissingToken))
            .context("A token is required. Pass --token or set SUBLOG_TOKEN.");
    }

    eprintln!("{}", "Logging in...".dimmed());

    let backend = CliBackend::connect(&api, &token).context("Failed to set up backend")?;

    let owner = match (args.owner, backend.as_github()) {
        (owner, Some(github)) => {
            let user = github
                .authenticated_user()
                .await
                .context("Token was rejected")?;
            owner.unwrap_or(user.login)
        }
        (Some(owner), None) => owner,
        (None, None) => bail!("--owner is required for a local ledger"),
    };
    let owner = Owner::new(owner).context("Invalid owner")?;

    let settings = Settings::load()?;
    let store = RecordStore::with_layout(backend, settings.layout());
    let repo = store
        .ensure_container(&owner)
        .await
        .context("Failed to prepare the ledger repository")?;

    let session = CliSession { owner, api, token };
    storage::save_session(&session).context("Failed to save session")?;

    output::success("Logged in successfully");
    println!();
    output::field("Owner", session.owner.as_str());
    output::field("API", session.api.as_str());
    output::field("Repository", &repo.full_name);

    Ok(())
}
