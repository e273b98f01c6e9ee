//! # promo-dispatch
//!
//! Broadcast dispatcher for shop promotions: renders nothing and persists
//! nothing about the promotion itself — it takes a finished
//! [`PromotionMessage`](promo_types::PromotionMessage) plus a list of
//! department targets and fans the message out over the platform bot API.
//!
//! ```text
//! caller ─→ FanOutCoordinator ─→ per department (sequential):
//!              resolve chat identifier (getChat when not numeric)
//!              select wire operation (text / photo / media group)
//!              Gateway call (direct, or via the credential relay)
//!              one-shot retry when the chat has migrated
//!           ─→ BatchResult (per-department outcomes, partial failure allowed)
//!
//! caller ─→ Scheduler::enqueue ─→ persisted ScheduledSend
//!              in-process timer (within the 24 h horizon only)
//!              fire: resolve + send, rewrite record to sent/failed
//! ```
//!
//! Delivery is best-effort: no rollback across departments, no durable
//! resumption of timers after a restart.

pub mod config;
pub mod fanout;
pub mod gateway;
pub mod resolve;
pub mod scheduler;
pub mod sender;
pub mod store;
pub mod transport;

#[cfg(any(test, feature = "test-support"))]
pub mod mocks;

pub use config::Config;
pub use fanout::FanOutCoordinator;
pub use gateway::{ApiEnvelope, Gateway};
pub use scheduler::Scheduler;
pub use store::{FileStore, ScheduleStore};
