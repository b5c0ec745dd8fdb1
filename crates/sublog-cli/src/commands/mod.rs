//! Subcommand implementations.

pub mod add;
pub mod calendar;
pub mod cancel;
pub mod config;
pub mod history;
pub mod list;
pub mod login;
pub mod logout;
pub mod pause;
pub mod rates;
pub mod resume;
pub mod summary;
pub mod update;
pub mod whoami;

use anyhow::{Context, Result};
use tracing::warn;

use sublog_core::rates::latest_or_fallback;
use sublog_core::{ExchangeRates, Ledger, RecordStore};
use sublog_github::ExchangeRateClient;

use crate::cli::Commands;
use crate::config::Settings;
use crate::session::CliBackend;
use crate::session::storage;

pub async fn handle(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Login(args) => login::run(args).await,
        Commands::Logout(args) => logout::run(args).await,
        Commands::Whoami(args) => whoami::run(args).await,
        Commands::List(args) => list::run(args).await,
        Commands::Add(args) => add::run(args).await,
        Commands::Update(args) => update::run(args).await,
        Commands::Pause(args) => pause::run(args).await,
        Commands::Resume(args) => resume::run(args).await,
        Commands::Cancel(args) => cancel::run(args).await,
        Commands::History(args) => history::run(args).await,
        Commands::Rates(args) => rates::run(args).await,
        Commands::Summary(args) => summary::run(args).await,
        Commands::Calendar(args) => calendar::run(args).await,
        Commands::Config(args) => config::run(args).await,
    }
}

/// The logged-in owner's ledger, with the resolved settings.
pub(crate) fn open_ledger() -> Result<(Ledger<CliBackend>, Settings)> {
    let session = storage::require_session()?;
    let settings = Settings::load()?;
    let backend = session.backend().context("Failed to set up backend")?;
    let store = RecordStore::with_layout(backend, settings.layout());
    Ok((Ledger::new(store, session.owner), settings))
}

/// Current exchange rates, or the fallback table when offline or unreachable.
pub(crate) async fn exchange_rates(offline: bool) -> ExchangeRates {
    if offline {
        return ExchangeRates::fallback();
    }
    match ExchangeRateClient::new() {
        Ok(client) => latest_or_fallback(&client).await,
        Err(e) => {
            warn!(error = %e, "Could not build rates client, using fallback rates");
            ExchangeRates::fallback()
        }
    }
}
