//! Per-recipient dispatch outcomes and the aggregated batch result.

use serde::{Deserialize, Serialize};

/// Result of one send attempt to one department. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchOutcome {
    pub department: String,
    pub success: bool,
    /// True when the outcome records a deferred (scheduled) send rather than
    /// an immediate delivery.
    #[serde(default)]
    pub scheduled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DispatchOutcome {
    pub fn sent(department: impl Into<String>) -> Self {
        Self {
            department: department.into(),
            success: true,
            scheduled: false,
            error: None,
        }
    }

    pub fn failed(department: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            department: department.into(),
            success: false,
            scheduled: false,
            error: Some(error.into()),
        }
    }

    /// Outcome for a send that was accepted for deferred delivery.
    pub fn deferred(department: impl Into<String>) -> Self {
        Self {
            department: department.into(),
            success: true,
            scheduled: true,
            error: None,
        }
    }
}

/// Aggregate of the per-department outcomes of one fan-out, in dispatch order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchResult {
    pub outcomes: Vec<DispatchOutcome>,
}

impl BatchResult {
    pub fn push(&mut self, outcome: DispatchOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success).count()
    }

    pub fn fail_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.success).count()
    }

    /// Partial success: some departments received the message, some failed.
    /// Not an error — the caller renders a "sent to X, failed for Y" notice.
    pub fn is_partial(&self) -> bool {
        self.success_count() > 0 && self.fail_count() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_derive_from_outcomes() {
        let mut batch = BatchResult::default();
        batch.push(DispatchOutcome::sent("Sales"));
        batch.push(DispatchOutcome::failed("Support", "chat not found"));
        batch.push(DispatchOutcome::sent("Logistics"));

        assert_eq!(batch.success_count(), 2);
        assert_eq!(batch.fail_count(), 1);
        assert!(batch.is_partial());
    }

    #[test]
    fn all_success_is_not_partial() {
        let mut batch = BatchResult::default();
        batch.push(DispatchOutcome::sent("Sales"));
        assert!(!batch.is_partial());
        assert_eq!(batch.fail_count(), 0);
    }

    #[test]
    fn failed_outcome_carries_the_error() {
        let outcome = DispatchOutcome::failed("Support", "bot was kicked");
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("bot was kicked"));
    }

    #[test]
    fn deferred_outcome_counts_as_success() {
        let mut batch = BatchResult::default();
        batch.push(DispatchOutcome::deferred("Sales"));
        assert_eq!(batch.success_count(), 1);
        assert!(batch.outcomes[0].scheduled);
    }
}
