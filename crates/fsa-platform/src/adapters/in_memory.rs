use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use chrono::{DateTime, Utc};

use fsa_core::ports::{FileHandle, FileHandlePort, FileInfo, SaveFilePickerPort, WritableFileStreamPort};
use fsa_core::{HostError, SaveFilePickerOptions};

#[derive(Debug, Clone)]
struct StoredFile {
    data: Bytes,
    modified: DateTime<Utc>,
}

type Store = Arc<Mutex<HashMap<String, StoredFile>>>;

fn lock(store: &Store) -> std::sync::MutexGuard<'_, HashMap<String, StoredFile>> {
    // a poisoned map is still a consistent map
    store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// In-memory picker implementation.
///
/// 内存版的保存文件选择器。
///
/// Every pick returns a handle keyed by the suggested name. All handles
/// share one store, so saving twice under the same name overwrites.
#[derive(Debug, Default)]
pub struct InMemorySaveFilePicker {
    store: Store,
    shown: AtomicUsize,
    cancel_next: AtomicBool,
    last_options: Mutex<Option<SaveFilePickerOptions>>,
}

impl InMemorySaveFilePicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next pick behave like a dismissed dialog.
    pub fn cancel_next(&self) {
        self.cancel_next.store(true, Ordering::SeqCst);
    }

    /// How many times the picker was shown.
    pub fn shown_count(&self) -> usize {
        self.shown.load(Ordering::SeqCst)
    }

    pub fn last_options(&self) -> Option<SaveFilePickerOptions> {
        self.last_options
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Committed contents saved under `name`.
    pub fn contents(&self, name: &str) -> Option<Bytes> {
        lock(&self.store).get(name).map(|f| f.data.clone())
    }

    /// Handle onto `name` without showing the picker.
    pub fn handle(&self, name: &str) -> InMemoryFileHandle {
        InMemoryFileHandle {
            name: name.to_string(),
            store: self.store.clone(),
        }
    }
}

#[async_trait]
impl SaveFilePickerPort for InMemorySaveFilePicker {
    async fn show_save_file_picker(
        &self,
        options: SaveFilePickerOptions,
    ) -> Result<FileHandle, HostError> {
        self.shown.fetch_add(1, Ordering::SeqCst);
        let name = options.suggested_name.clone();
        *self
            .last_options
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(options);

        if self.cancel_next.swap(false, Ordering::SeqCst) {
            return Err(HostError::Aborted);
        }
        Ok(Arc::new(self.handle(&name)))
    }
}

#[derive(Debug, Clone)]
pub struct InMemoryFileHandle {
    name: String,
    store: Store,
}

impl InMemoryFileHandle {
    pub fn contents(&self) -> Option<Bytes> {
        lock(&self.store).get(&self.name).map(|f| f.data.clone())
    }

    /// Deletes the committed file; later probes fail with `NotFound`.
    pub fn remove(&self) {
        lock(&self.store).remove(&self.name);
    }
}

#[async_trait]
impl FileHandlePort for InMemoryFileHandle {
    fn name(&self) -> String {
        self.name.clone()
    }

    async fn get_file(&self) -> Result<FileInfo, HostError> {
        let store = lock(&self.store);
        let file = store
            .get(&self.name)
            .ok_or_else(|| HostError::not_found(self.name.clone()))?;
        Ok(FileInfo {
            name: self.name.clone(),
            size: file.data.len() as u64,
            last_modified: Some(file.modified),
        })
    }

    async fn create_writable(&self) -> Result<Box<dyn WritableFileStreamPort>, HostError> {
        Ok(Box::new(InMemoryWritable {
            name: self.name.clone(),
            store: self.store.clone(),
            buffer: Some(BytesMut::new()),
        }))
    }
}

struct InMemoryWritable {
    name: String,
    store: Store,
    buffer: Option<BytesMut>,
}

impl InMemoryWritable {
    fn take_buffer(&mut self) -> Result<BytesMut, HostError> {
        self.buffer
            .take()
            .ok_or_else(|| HostError::invalid_state("writable stream is closed"))
    }
}

#[async_trait]
impl WritableFileStreamPort for InMemoryWritable {
    async fn write(&mut self, data: Bytes) -> Result<(), HostError> {
        self.buffer
            .as_mut()
            .ok_or_else(|| HostError::invalid_state("writable stream is closed"))?
            .extend_from_slice(&data);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), HostError> {
        let buffer = self.take_buffer()?;
        lock(&self.store).insert(
            self.name.clone(),
            StoredFile {
                data: buffer.freeze(),
                modified: Utc::now(),
            },
        );
        Ok(())
    }

    async fn abort(&mut self) -> Result<(), HostError> {
        self.take_buffer().map(|_| ())
    }
}
