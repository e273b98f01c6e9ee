//! Persisted schedule store.
//!
//! The store is an injected repository with an explicit lifecycle, so tests
//! substitute an in-memory fake (see [`crate::mocks`]) and the scheduler
//! never touches ambient module-level state. The whole scheduled-send list
//! is read and written as one blob — matching the single-document shape of
//! the backing storage.

use std::future::Future;
use std::path::PathBuf;

use promo_types::ScheduledSend;

/// Load/save the full scheduled-send list, with explicit init/close.
pub trait ScheduleStore: Send + Sync + Clone + 'static {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Prepare the backing storage (create the blob when missing).
    fn init(&self) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Read the entire list.
    fn load(&self) -> impl Future<Output = Result<Vec<ScheduledSend>, Self::Error>> + Send;

    /// Replace the entire list.
    fn save(
        &self,
        sends: Vec<ScheduledSend>,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Release the backing storage.
    fn close(&self) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// File-backed store: one pretty-printed JSON array per file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ScheduleStore for FileStore {
    type Error = StoreError;

    async fn init(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        if tokio::fs::try_exists(&self.path).await? {
            return Ok(());
        }
        tokio::fs::write(&self.path, b"[]").await?;
        Ok(())
    }

    async fn load(&self) -> Result<Vec<ScheduledSend>, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            // A missing blob reads as an empty list, same as a fresh init.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, sends: Vec<ScheduledSend>) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(&sends)?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }

    async fn close(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Errors from the file-backed store.
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Serde(serde_json::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "Schedule store I/O error: {e}"),
            Self::Serde(e) => write!(f, "Schedule store serialization error: {e}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Serde(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e)
    }
}
