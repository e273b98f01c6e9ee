//! Deferred sends: persisted records plus best-effort in-process timers.
//!
//! `enqueue` persists a [`ScheduledSend`] and, only when the due time falls
//! inside the 24-hour horizon, arms a tokio timer that performs the send and
//! rewrites the record to its terminal state. Timers live and die with the
//! process: a restart before the due time leaves the record `scheduled`
//! forever, and a due time beyond the horizon never gets a timer at all.
//! Both are accepted limitations of the design.
//!
//! Enqueue and the fire callback both read-modify-write the entire persisted
//! list with no locking or versioning; two firings due at nearly the same
//! moment can race and silently drop one write.

use chrono::{DateTime, Utc};
use promo_types::{DepartmentTarget, PromotionMessage, ScheduleStatus, ScheduledSend};
use uuid::Uuid;

use crate::gateway::Gateway;
use crate::resolve::resolve_chat_id;
use crate::sender::send_with_migration_retry;
use crate::store::ScheduleStore;

/// Maximum look-ahead for arming an in-process timer.
pub const SCHEDULE_HORIZON: std::time::Duration = std::time::Duration::from_secs(24 * 60 * 60);

/// True when a timer should be armed: `due_at` is in the future and no more
/// than the horizon away.
pub fn within_horizon(due_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    match (due_at - now).to_std() {
        Ok(delay) => !delay.is_zero() && delay <= SCHEDULE_HORIZON,
        // Negative duration: due time already passed.
        Err(_) => false,
    }
}

/// Enqueues deferred sends and fires them when due.
#[derive(Clone)]
pub struct Scheduler<S: ScheduleStore> {
    gateway: Gateway,
    store: S,
}

impl<S: ScheduleStore> Scheduler<S> {
    pub fn new(gateway: Gateway, store: S) -> Self {
        Self { gateway, store }
    }

    /// Persist a deferred send and arm its timer when within the horizon.
    /// Returns the id of the created record.
    pub async fn enqueue(
        &self,
        target: DepartmentTarget,
        message: PromotionMessage,
        due_at: DateTime<Utc>,
    ) -> Result<String, S::Error> {
        let send = ScheduledSend {
            id: Uuid::new_v4().to_string(),
            target,
            message,
            due_at,
            status: ScheduleStatus::Scheduled,
            error: None,
        };
        let id = send.id.clone();

        // Whole-list read-modify-write; see the module docs for the race.
        let mut list = self.store.load().await?;
        list.push(send.clone());
        self.store.save(list).await?;

        let now = Utc::now();
        if within_horizon(due_at, now) {
            let delay = (due_at - now).to_std().unwrap_or_default();
            tracing::debug!(
                id = %id,
                department = %send.target.name,
                delay_secs = delay.as_secs(),
                "Deferred send armed"
            );

            let gateway = self.gateway.clone();
            let store = self.store.clone();
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                fire(gateway, store, send).await;
            });
        } else {
            tracing::info!(
                id = %id,
                due_at = %due_at,
                "Deferred send outside the scheduling horizon; record persisted without a timer"
            );
        }

        Ok(id)
    }
}

/// Execute one due send and rewrite its persisted record to `sent`/`failed`.
async fn fire<S: ScheduleStore>(gateway: Gateway, store: S, send: ScheduledSend) {
    tracing::info!(id = %send.id, department = %send.target.name, "Firing deferred send");

    let outcome = match resolve_chat_id(&gateway, &send.target.chat_identifier).await {
        Ok(chat_id) => send_with_migration_retry(&gateway, &chat_id, &send.message).await,
        Err(e) => Err(e),
    };

    let (status, error) = match outcome {
        Ok(()) => (ScheduleStatus::Sent, None),
        Err(e) => {
            tracing::warn!(id = %send.id, error = %e, "Deferred send failed");
            (ScheduleStatus::Failed, Some(e.to_string()))
        }
    };

    let mut list = match store.load().await {
        Ok(list) => list,
        Err(e) => {
            tracing::error!(id = %send.id, error = %e, "Failed to load schedule store after firing");
            return;
        }
    };

    match list.iter_mut().find(|s| s.id == send.id) {
        Some(record) => {
            record.status = status;
            record.error = error;
        }
        None => {
            tracing::warn!(id = %send.id, "Fired send no longer present in the schedule store");
            return;
        }
    }

    if let Err(e) = store.save(list).await {
        tracing::error!(id = %send.id, error = %e, "Failed to persist deferred send status");
    }
}
