//! Shared types for the promotion broadcast dispatcher
//!
//! This crate provides the data model used across the dispatcher and the
//! relay service: the promotion message, department targets, per-recipient
//! outcomes, scheduled sends, the relay wire message, and the error taxonomy.

pub mod errors;
pub mod message;
pub mod outcome;
pub mod recipient;
pub mod relay;
pub mod schedule;

// Re-export commonly used types
pub use errors::DispatchError;
pub use message::{ParseMode, PromotionMessage};
pub use outcome::{BatchResult, DispatchOutcome};
pub use recipient::DepartmentTarget;
pub use relay::RelayRequest;
pub use schedule::{ScheduleStatus, ScheduledSend};
