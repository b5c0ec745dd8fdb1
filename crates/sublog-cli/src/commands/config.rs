//! Config command implementation.

use anyhow::{Result, bail};
use clap::{Args, Subcommand};

use sublog_core::Currency;

use crate::config::{self as settings, Settings};
use crate::output;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the resolved settings and where each comes from
    Show,

    /// Set the display currency
    SetCurrency {
        /// KRW, USD, JPY, or EUR
        currency: Currency,
    },

    /// Set the ledger repository name
    SetRepo {
        /// Repository name in the owner's account
        name: String,
    },
}

pub async fn run(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let resolved = Settings::load()?;
            output::field(
                "Currency",
                &format!("{} ({})", resolved.currency, resolved.currency_source.as_str()),
            );
            output::field(
                "Repository",
                &format!("{} ({})", resolved.repo, resolved.repo_source.as_str()),
            );
        }
        ConfigCommand::SetCurrency { currency } => {
            let mut persisted = settings::load_persisted()?;
            persisted.currency = Some(currency);
            settings::save_persisted(&persisted)?;
            output::success(&format!("Display currency set to {}", currency));
        }
        ConfigCommand::SetRepo { name } => {
            let name = name.trim().to_string();
            if name.is_empty() || name.contains('/') {
                bail!("Repository name must be a single path segment");
            }
            let mut persisted = settings::load_persisted()?;
            persisted.repo = Some(name.clone());
            settings::save_persisted(&persisted)?;
            output::success(&format!("Ledger repository set to {}", name));
        }
    }
    Ok(())
}
