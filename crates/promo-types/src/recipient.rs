//! Department targets — the configured external chats a broadcast can reach.

use serde::{Deserialize, Serialize};

/// A configured department chat.
///
/// `chat_identifier` is either a numeric platform chat id (possibly negative
/// for group chats) or a human-readable handle that needs resolution before
/// sending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentTarget {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub chat_identifier: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl DepartmentTarget {
    /// Eligible targets are active and carry a non-empty chat identifier.
    /// Ineligible ones are excluded before any network call is made.
    pub fn is_eligible(&self) -> bool {
        self.active && !self.chat_identifier.trim().is_empty()
    }
}
