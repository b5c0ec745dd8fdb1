//! Whoami command implementation.

use anyhow::Result;
use clap::Args;

use crate::config::Settings;
use crate::output;
use crate::session::storage;

#[derive(Args, Debug)]
pub struct WhoamiArgs {}

pub async fn run(_args: WhoamiArgs) -> Result<()> {
    let session = storage::require_session()?;
    let settings = Settings::load()?;

    output::field("Owner", session.owner.as_str());
    output::field("API", session.api.as_str());
    output::field("Repository", &format!("{}/{}", session.owner, settings.repo));

    Ok(())
}
