//! Commit messages for ledger changes.

use std::fmt;

use super::Status;

/// The kind of change a write records.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeKind {
    Add,
    Update,
    Pause,
    Resume,
    Cancel,
}

impl ChangeKind {
    /// Select the kind for an update from the before/after status pair.
    pub fn for_update(before: Status, after: Status) -> Self {
        match (before, after) {
            (Status::Active, Status::Paused) => ChangeKind::Pause,
            (Status::Paused, Status::Active) => ChangeKind::Resume,
            _ => ChangeKind::Update,
        }
    }

    /// The commit message for a change to the named subscription.
    pub fn message(self, name: &str) -> String {
        match self {
            ChangeKind::Add => format!("feat: add {} subscription", name),
            ChangeKind::Update => format!("chore: update {} subscription", name),
            ChangeKind::Pause => format!("chore: pause {} subscription", name),
            ChangeKind::Resume => format!("chore: resume {} subscription", name),
            ChangeKind::Cancel => format!("chore: cancel {} subscription", name),
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChangeKind::Add => "add",
            ChangeKind::Update => "update",
            ChangeKind::Pause => "pause",
            ChangeKind::Resume => "resume",
            ChangeKind::Cancel => "cancel",
        })
    }
}
