//! Fan-out coordination: one message, many departments, aggregated outcome.

use promo_types::{BatchResult, DepartmentTarget, DispatchError, DispatchOutcome, PromotionMessage};

use crate::gateway::Gateway;
use crate::resolve::resolve_chat_id;
use crate::sender::send_with_migration_retry;

/// Sends one promotion to every eligible department and aggregates the
/// per-department outcomes.
///
/// Departments are processed strictly in sequence: outcome ordering stays
/// deterministic for the caller's reporting UI and the outbound request rate
/// stays bounded. There is no cancellation and no rollback — departments
/// already notified stay notified regardless of later failures.
#[derive(Debug, Clone)]
pub struct FanOutCoordinator {
    gateway: Gateway,
}

impl FanOutCoordinator {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Broadcast `message` to `departments`.
    ///
    /// Returns `Ok` with the batch result on full or partial success; fails
    /// with [`DispatchError::Configuration`] before any network call when no
    /// usable department remains, and with [`DispatchError::Aggregate`] when
    /// every department failed.
    pub async fn dispatch(
        &self,
        message: &PromotionMessage,
        departments: &[DepartmentTarget],
    ) -> Result<BatchResult, DispatchError> {
        let eligible = validate_departments(departments)?;

        tracing::info!(
            departments = eligible.len(),
            images = message.images.len(),
            "Starting promotion broadcast"
        );

        let mut batch = BatchResult::default();
        for target in eligible {
            match self.send_one(target, message).await {
                Ok(()) => {
                    tracing::debug!(department = %target.name, "Promotion delivered");
                    batch.push(DispatchOutcome::sent(&target.name));
                }
                Err(e) => {
                    // One department's failure never aborts the rest.
                    tracing::warn!(department = %target.name, error = %e, "Promotion delivery failed");
                    batch.push(DispatchOutcome::failed(&target.name, e.to_string()));
                }
            }
        }

        if batch.success_count() == 0 {
            let failures = batch
                .outcomes
                .iter()
                .map(|o| {
                    (
                        o.department.clone(),
                        o.error.clone().unwrap_or_else(|| "unknown error".to_string()),
                    )
                })
                .collect();
            return Err(DispatchError::Aggregate { failures });
        }

        tracing::info!(
            sent = batch.success_count(),
            failed = batch.fail_count(),
            "Promotion broadcast finished"
        );
        Ok(batch)
    }

    async fn send_one(
        &self,
        target: &DepartmentTarget,
        message: &PromotionMessage,
    ) -> Result<(), DispatchError> {
        let chat_id = resolve_chat_id(&self.gateway, &target.chat_identifier).await?;
        send_with_migration_retry(&self.gateway, &chat_id, message).await
    }
}

/// Filter to eligible departments, failing fast when nothing usable remains.
fn validate_departments(
    departments: &[DepartmentTarget],
) -> Result<Vec<&DepartmentTarget>, DispatchError> {
    if departments.is_empty() {
        return Err(DispatchError::Configuration(
            "No departments selected or configured for this broadcast".to_string(),
        ));
    }

    let eligible: Vec<&DepartmentTarget> =
        departments.iter().filter(|d| d.is_eligible()).collect();

    if eligible.is_empty() {
        let detail = departments
            .iter()
            .map(|d| {
                if !d.active {
                    format!("{} (inactive)", d.name)
                } else {
                    format!("{} (missing chat id)", d.name)
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        return Err(DispatchError::Configuration(format!(
            "No departments selected or configured with a usable chat id: {detail}"
        )));
    }

    Ok(eligible)
}
