//! Shared types used across the codebase

use std::fmt;

/// State changes applied to a university record, used for the audit trail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Create,
    Update,
    SoftDelete,
    Restore,  // Undo soft-delete by clearing deleted_at
    ToggleBookmark,
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Transition::Create => "create",
            Transition::Update => "update",
            Transition::SoftDelete => "soft_delete",
            Transition::Restore => "restore",
            Transition::ToggleBookmark => "toggle_bookmark",
        };
        f.write_str(name)
    }
}
