//! Filesystem-backed file handle.
//!
//! Writes land in a sibling swap file (`<name>.crswap`) and only replace the
//! target when the writable is closed, so an interrupted save never leaves a
//! half-written target behind.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use fsa_core::ports::{FileHandlePort, FileInfo, WritableFileStreamPort};
use fsa_core::HostError;

const SWAP_SUFFIX: &str = ".crswap";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsFileHandle {
    path: PathBuf,
}

impl FsFileHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl FileHandlePort for FsFileHandle {
    fn name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    async fn get_file(&self) -> Result<FileInfo, HostError> {
        let meta = fs::metadata(&self.path)
            .await
            .map_err(|e| HostError::from_io(e, self.path.display().to_string()))?;
        if !meta.is_file() {
            return Err(HostError::Type(format!(
                "not a regular file: {}",
                self.path.display()
            )));
        }

        Ok(FileInfo {
            name: self.name(),
            size: meta.len(),
            last_modified: meta.modified().ok().map(DateTime::<Utc>::from),
        })
    }

    async fn create_writable(&self) -> Result<Box<dyn WritableFileStreamPort>, HostError> {
        let writable = FsWritableFileStream::create(self.path.clone()).await?;
        Ok(Box::new(writable))
    }
}

/// Writable that commits by renaming its swap file over the target.
pub struct FsWritableFileStream {
    target: PathBuf,
    swap: PathBuf,
    file: Option<fs::File>,
}

impl FsWritableFileStream {
    /// Creates (or truncates) the swap file next to `target`.
    pub async fn create(target: PathBuf) -> Result<Self, HostError> {
        let swap = swap_path(&target);
        let file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&swap)
            .await
            .map_err(|e| HostError::from_io(e, swap.display().to_string()))?;
        debug!(target = %target.display(), swap = %swap.display(), "Opened writable");

        Ok(Self {
            target,
            swap,
            file: Some(file),
        })
    }

    pub fn swap_path(&self) -> &Path {
        &self.swap
    }

    fn file_mut(&mut self) -> Result<&mut fs::File, HostError> {
        self.file
            .as_mut()
            .ok_or_else(|| HostError::invalid_state("writable stream is closed"))
    }
}

#[async_trait]
impl WritableFileStreamPort for FsWritableFileStream {
    async fn write(&mut self, data: Bytes) -> Result<(), HostError> {
        self.file_mut()?.write_all(&data).await?;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), HostError> {
        let file = self
            .file
            .take()
            .ok_or_else(|| HostError::invalid_state("writable stream is closed"))?;

        if let Err(err) = commit(file, &self.swap, &self.target).await {
            if let Err(cleanup) = remove_swap(&self.swap).await {
                warn!(swap = %self.swap.display(), error = %cleanup, "Failed to remove swap file");
            }
            return Err(err);
        }
        debug!(target = %self.target.display(), "Committed writable");
        Ok(())
    }

    async fn abort(&mut self) -> Result<(), HostError> {
        let file = self
            .file
            .take()
            .ok_or_else(|| HostError::invalid_state("writable stream is closed"))?;
        drop(file);
        remove_swap(&self.swap).await
    }
}

impl Drop for FsWritableFileStream {
    fn drop(&mut self) {
        // neither closed nor aborted: discard pending writes
        if let Some(file) = self.file.take() {
            drop(file);
            if let Err(err) = std::fs::remove_file(&self.swap) {
                if err.kind() != std::io::ErrorKind::NotFound {
                    warn!(swap = %self.swap.display(), error = %err, "Failed to remove swap file");
                }
            }
        }
    }
}

fn swap_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(SWAP_SUFFIX);
    target.with_file_name(name)
}

async fn commit(mut file: fs::File, swap: &Path, target: &Path) -> Result<(), HostError> {
    file.flush().await?;
    file.sync_all().await?;
    drop(file);

    fs::rename(swap, target)
        .await
        .map_err(|e| HostError::from_io(e, target.display().to_string()))
}

async fn remove_swap(swap: &Path) -> Result<(), HostError> {
    match fs::remove_file(swap).await {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(HostError::Io(err)),
    }
}
