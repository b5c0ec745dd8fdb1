//! User settings: display currency and ledger repository.
//!
//! Each setting resolves in order: the persisted preference in
//! `settings.json`, then an environment hint, then the built-in default.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use sublog_core::store::DEFAULT_REPO;
use sublog_core::{Currency, StoreLayout};

/// Environment hint for the display currency.
pub const CURRENCY_ENV: &str = "SUBLOG_CURRENCY";

/// Environment hint for the ledger repository name.
pub const REPO_ENV: &str = "SUBLOG_REPO";

/// Settings as stored on disk. Unset fields fall through to the next source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
}

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Persisted,
    Environment,
    Default,
}

impl Source {
    pub fn as_str(self) -> &'static str {
        match self {
            Source::Persisted => "settings file",
            Source::Environment => "environment",
            Source::Default => "default",
        }
    }
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub currency: Currency,
    pub currency_source: Source,
    pub repo: String,
    pub repo_source: Source,
}

impl Settings {
    /// Resolve from a persisted file and an environment lookup.
    pub fn resolve(persisted: &PersistedSettings, env: impl Fn(&str) -> Option<String>) -> Self {
        let env_currency = env(CURRENCY_ENV).and_then(|v| v.parse::<Currency>().ok());
        let (currency, currency_source) = match (persisted.currency, env_currency) {
            (Some(c), _) => (c, Source::Persisted),
            (None, Some(c)) => (c, Source::Environment),
            (None, None) => (Currency::default(), Source::Default),
        };

        let env_repo = env(REPO_ENV).filter(|v| !v.trim().is_empty());
        let (repo, repo_source) = match (&persisted.repo, env_repo) {
            (Some(r), _) => (r.clone(), Source::Persisted),
            (None, Some(r)) => (r, Source::Environment),
            (None, None) => (DEFAULT_REPO.to_string(), Source::Default),
        };

        Self {
            currency,
            currency_source,
            repo,
            repo_source,
        }
    }

    /// Load persisted settings and resolve against the process environment.
    pub fn load() -> Result<Self> {
        let persisted = load_persisted()?;
        Ok(Self::resolve(&persisted, |key| std::env::var(key).ok()))
    }

    /// Store layout for the resolved repository.
    pub fn layout(&self) -> StoreLayout {
        StoreLayout::with_repo(self.repo.clone())
    }
}

fn settings_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "sublog").context("Could not determine config directory")?;
    Ok(dirs.config_dir().join("settings.json"))
}

/// Read the persisted settings, or defaults if none were saved.
pub fn load_persisted() -> Result<PersistedSettings> {
    let path = settings_path()?;
    if !path.exists() {
        return Ok(PersistedSettings::default());
    }
    let json = fs::read_to_string(&path).context("Failed to read settings file")?;
    serde_json::from_str(&json).context("Invalid settings file")
}

/// Write settings through to disk.
pub fn save_persisted(settings: &PersistedSettings) -> Result<()> {
    let path = settings_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(&path, json).context("Failed to write settings file")
}
