use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::WritableFileStreamPort;
use crate::HostError;

/// Snapshot returned by a successful validity probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub name: String,
    pub size: u64,
    pub last_modified: Option<DateTime<Utc>>,
}

/// Capability for one concrete on-disk destination.
///
/// Handles are opaque to the save flow: it only probes them and opens
/// writables on them.
#[async_trait]
pub trait FileHandlePort: Send + Sync {
    /// File name the handle points at (no directory part).
    fn name(&self) -> String;

    /// Re-reads the target. Fails when the target no longer exists.
    async fn get_file(&self) -> Result<FileInfo, HostError>;

    /// Opens a fresh writable on the target. Nothing is visible at the
    /// target until the writable is closed.
    async fn create_writable(&self) -> Result<Box<dyn WritableFileStreamPort>, HostError>;
}

/// Shared, type-erased handle as threaded through a save.
pub type FileHandle = Arc<dyn FileHandlePort>;
