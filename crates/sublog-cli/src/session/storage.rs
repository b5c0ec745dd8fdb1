//! Session storage for persisting login state.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use sublog_core::{AccessToken, ApiUrl, Owner};

use super::CliSession;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Stored session data.
#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    owner: String,
    api: String,
    token: String,
}

/// Get the session file path.
fn session_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "sublog").context("Could not determine data directory")?;

    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    Ok(data_dir.join("session.json"))
}

/// Save a session to disk.
pub fn save_session(session: &CliSession) -> Result<()> {
    let stored = StoredSession {
        owner: session.owner.to_string(),
        api: session.api.to_string(),
        token: session.token.as_str().to_string(),
    };

    let path = session_path()?;
    let json = serde_json::to_string_pretty(&stored)?;

    fs::write(&path, &json).context("Failed to write session file")?;

    // Set restrictive permissions (Unix only)
    #[cfg(unix)]
    {
        let mut perms = fs::metadata(&path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(&path, perms)?;
    }

    Ok(())
}

/// Load a session from disk.
pub fn load_session() -> Result<Option<CliSession>> {
    let path = session_path()?;

    if !path.exists() {
        return Ok(None);
    }

    let json = fs::read_to_string(&path).context("Failed to read session file")?;
    let stored: StoredSession = serde_json::from_str(&json).context("Invalid session file")?;

    Ok(Some(CliSession {
        owner: Owner::new(stored.owner).context("Invalid owner in session")?,
        api: ApiUrl::new(&stored.api).context("Invalid API URL in session")?,
        token: AccessToken::new(stored.token),
    }))
}

/// Load the session or fail with a hint to log in.
pub fn require_session() -> Result<CliSession> {
    load_session()
        .context("Failed to load session")?
        .context("No active session. Run 'sublog login' first.")
}

/// Clear the stored session.
pub fn clear_session() -> Result<bool> {
    let path = session_path()?;

    if path.exists() {
        fs::remove_file(&path).context("Failed to remove session file")?;
        return Ok(true);
    }

    Ok(false)
}
