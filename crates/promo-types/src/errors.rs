//! Error taxonomy for the broadcast dispatcher.
//!
//! Each failure mode is a distinct variant so callers can branch on kind
//! (configuration vs per-recipient transport vs terminal migration failure)
//! without matching on message strings.

/// Errors surfaced by the dispatcher components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// Invalid setup (missing credential, empty or unusable recipient set).
    /// Raised before any network call; aborts the whole operation.
    Configuration(String),
    /// A human-readable chat identifier could not be resolved to a chat id.
    Resolution { identifier: String, reason: String },
    /// The platform (or the relay in front of it) rejected the call without a
    /// migration hint. Covers non-2xx transport failures and `ok: false`
    /// envelopes alike.
    Transport { description: String },
    /// The one-shot retry against a migrated chat id also failed. Terminal
    /// for the affected recipient; no further retries.
    MigrationRetry {
        new_chat_id: i64,
        description: String,
    },
    /// Every recipient of a fan-out failed. Pairs of (department name, error).
    Aggregate { failures: Vec<(String, String)> },
}

impl DispatchError {
    /// True for failures that end the attempt for good — retrying with the
    /// same input cannot succeed.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_) | Self::MigrationRetry { .. } | Self::Aggregate { .. }
        )
    }
}

impl std::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration(msg) => write!(f, "{msg}"),
            Self::Resolution { identifier, reason } => {
                write!(
                    f,
                    "Could not resolve chat identifier '{identifier}': {reason}. \
                     Ensure the bot is a member of this chat."
                )
            }
            Self::Transport { description } => write!(f, "Send failed: {description}"),
            Self::MigrationRetry {
                new_chat_id,
                description,
            } => write!(
                f,
                "Retry against migrated chat {new_chat_id} failed: {description}"
            ),
            Self::Aggregate { failures } => {
                let detail = failures
                    .iter()
                    .map(|(name, err)| format!("{name}: {err}"))
                    .collect::<Vec<_>>()
                    .join("; ");
                write!(f, "Broadcast failed for all departments — {detail}")
            }
        }
    }
}

impl std::error::Error for DispatchError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_error_carries_identifier_and_hint() {
        let err = DispatchError::Resolution {
            identifier: "@sales".to_string(),
            reason: "chat not found".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("@sales"));
        assert!(msg.contains("Ensure the bot is a member"));
    }

    #[test]
    fn aggregate_error_names_every_department() {
        let err = DispatchError::Aggregate {
            failures: vec![
                ("Sales".to_string(), "chat not found".to_string()),
                ("Support".to_string(), "bot was kicked".to_string()),
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("Sales: chat not found"));
        assert!(msg.contains("Support: bot was kicked"));
    }

    #[test]
    fn terminal_kinds_are_distinguishable_without_string_matching() {
        assert!(DispatchError::Configuration("no departments".into()).is_terminal());
        assert!(DispatchError::MigrationRetry {
            new_chat_id: -100,
            description: "kicked".into()
        }
        .is_terminal());
        assert!(!DispatchError::Transport {
            description: "flood".into()
        }
        .is_terminal());
        assert!(!DispatchError::Resolution {
            identifier: "@x".into(),
            reason: "not found".into()
        }
        .is_terminal());
    }
}
