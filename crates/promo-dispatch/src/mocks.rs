//! Mock implementations for unit testing without touching the filesystem.
//!
//! Enabled with the `test-support` feature:
//!
//! ```toml
//! [dev-dependencies]
//! promo-dispatch = { path = "...", features = ["test-support"] }
//! ```

use std::convert::Infallible;
use std::sync::{Arc, Mutex};

use promo_types::ScheduledSend;

use crate::store::ScheduleStore;

/// In-memory schedule store backed by a shared vector.
#[derive(Clone, Default)]
pub struct MemoryStore {
    records: Arc<Mutex<Vec<ScheduledSend>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current records, for assertions.
    pub fn records(&self) -> Vec<ScheduledSend> {
        self.records.lock().unwrap().clone()
    }
}

impl ScheduleStore for MemoryStore {
    type Error = Infallible;

    async fn init(&self) -> Result<(), Infallible> {
        Ok(())
    }

    async fn load(&self) -> Result<Vec<ScheduledSend>, Infallible> {
        Ok(self.records.lock().unwrap().clone())
    }

    async fn save(&self, sends: Vec<ScheduledSend>) -> Result<(), Infallible> {
        *self.records.lock().unwrap() = sends;
        Ok(())
    }

    async fn close(&self) -> Result<(), Infallible> {
        Ok(())
    }
}
