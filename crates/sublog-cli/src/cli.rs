//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::commands::{
    add, calendar, cancel, config, history, list, login, logout, pause, rates, resume, summary,
    update, whoami,
};

/// Subscription ledger kept in your own GitHub repository.
#[derive(Parser, Debug)]
#[command(name = "sublog")]
#[command(author, version = env!("SUBLOG_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Store a token and owner for later commands
    Login(login::LoginArgs),

    /// Forget the stored session
    Logout(logout::LogoutArgs),

    /// Display the active session
    Whoami(whoami::WhoamiArgs),

    /// List subscriptions
    List(list::ListArgs),

    /// Add a subscription
    Add(add::AddArgs),

    /// Change fields of a subscription
    Update(update::UpdateArgs),

    /// Pause an active subscription
    Pause(pause::PauseArgs),

    /// Resume a paused subscription
    Resume(resume::ResumeArgs),

    /// Cancel a subscription (the record is kept)
    Cancel(cancel::CancelArgs),

    /// Show the ledger's change history
    History(history::HistoryArgs),

    /// Show exchange rates against USD
    Rates(rates::RatesArgs),

    /// Monthly and yearly spending totals
    Summary(summary::SummaryArgs),

    /// Payments per day for a month
    Calendar(calendar::CalendarArgs),

    /// Show or change settings
    Config(config::ConfigArgs),
}
