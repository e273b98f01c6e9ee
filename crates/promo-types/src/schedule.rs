//! Persisted record of a deferred send.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::message::PromotionMessage;
use crate::recipient::DepartmentTarget;

/// Lifecycle state of a [`ScheduledSend`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    Scheduled,
    Sent,
    Failed,
}

/// A deferred send, created once at enqueue time.
///
/// `status` and `error` are the only fields that change after creation; the
/// firing callback writes them exactly once. Records are never deleted. If
/// the process exits before `due_at`, the record stays `scheduled` forever —
/// the in-process timer is best-effort and is not resumed on restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledSend {
    pub id: String,
    pub target: DepartmentTarget,
    pub message: PromotionMessage,
    pub due_at: DateTime<Utc>,
    pub status: ScheduleStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn scheduled_send_round_trips_json() {
        let send = ScheduledSend {
            id: "f2b9c1d4".to_string(),
            target: DepartmentTarget {
                id: "dep-1".to_string(),
                name: "Sales".to_string(),
                chat_identifier: "@sales".to_string(),
                active: true,
            },
            message: PromotionMessage::text_only("Flash sale at noon"),
            due_at: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
            status: ScheduleStatus::Scheduled,
            error: None,
        };

        let json = serde_json::to_string(&send).unwrap();
        assert!(json.contains(r#""status":"scheduled""#));

        let decoded: ScheduledSend = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.id, "f2b9c1d4");
        assert_eq!(decoded.status, ScheduleStatus::Scheduled);
        assert_eq!(decoded.target.name, "Sales");
    }

    #[test]
    fn failed_status_serializes_snake_case_with_error() {
        let json = serde_json::to_string(&ScheduleStatus::Failed).unwrap();
        assert_eq!(json, r#""failed""#);
    }
}
