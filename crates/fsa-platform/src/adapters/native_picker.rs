//! Platform save dialog backed by `rfd`.
//!
//! The dialog is modal and blocking, so it runs on the blocking pool. On
//! macOS `rfd` needs the main thread to be free to pump events.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::{debug, info};

use fsa_core::ports::{FileHandle, SaveFilePickerPort};
use fsa_core::{HostError, SaveFilePickerOptions};

use super::FsFileHandle;
use crate::well_known::resolve_start_in;

const ACCEPT_ALL_DESCRIPTION: &str = "All Files";

/// Native save dialog.
///
/// 系统原生保存对话框。
///
/// Directories chosen under an `id` are remembered for the lifetime of the
/// picker and take precedence over `start_in` on the next call with the
/// same `id`.
#[derive(Debug, Default)]
pub struct NativeSaveFilePicker {
    title: Option<String>,
    remembered_dirs: Mutex<HashMap<String, PathBuf>>,
}

impl NativeSaveFilePicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    fn start_directory(&self, options: &SaveFilePickerOptions) -> Option<PathBuf> {
        let remembered = options.id.as_ref().and_then(|id| {
            self.remembered_dirs
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .get(id)
                .cloned()
        });
        remembered.or_else(|| options.start_in.as_ref().and_then(resolve_start_in))
    }

    fn remember(&self, id: &str, path: &std::path::Path) {
        if let Some(parent) = path.parent() {
            self.remembered_dirs
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .insert(id.to_string(), parent.to_path_buf());
        }
    }
}

/// Dialog filters: one per accept type with extensions (leading dots
/// stripped), then an accept-all filter unless excluded.
pub(crate) fn dialog_filters(options: &SaveFilePickerOptions) -> Vec<(String, Vec<String>)> {
    let mut filters: Vec<(String, Vec<String>)> = options
        .types
        .iter()
        .filter_map(|accept_type| {
            let extensions: Vec<String> = accept_type
                .extensions()
                .into_iter()
                .map(|ext| ext.trim_start_matches('.').to_string())
                .filter(|ext| !ext.is_empty())
                .collect();
            if extensions.is_empty() {
                None
            } else {
                Some((accept_type.description.clone(), extensions))
            }
        })
        .collect();

    if !options.exclude_accept_all_option {
        filters.push((ACCEPT_ALL_DESCRIPTION.to_string(), vec!["*".to_string()]));
    }
    filters
}

#[async_trait]
impl SaveFilePickerPort for NativeSaveFilePicker {
    async fn show_save_file_picker(
        &self,
        options: SaveFilePickerOptions,
    ) -> Result<FileHandle, HostError> {
        let start_dir = self.start_directory(&options);
        let filters = dialog_filters(&options);
        let file_name = options.suggested_name.clone();
        let title = self.title.clone();
        debug!(start_dir = ?start_dir, filters = filters.len(), "Showing save dialog");

        let picked = tokio::task::spawn_blocking(move || {
            let mut dialog = rfd::FileDialog::new().set_file_name(file_name);
            if let Some(title) = title {
                dialog = dialog.set_title(title);
            }
            if let Some(dir) = start_dir {
                dialog = dialog.set_directory(dir);
            }
            for (description, extensions) in &filters {
                dialog = dialog.add_filter(description.clone(), extensions.as_slice());
            }
            dialog.save_file()
        })
        .await
        .map_err(|e| HostError::Other(anyhow::anyhow!("save dialog task failed: {e}")))?;

        let path = picked.ok_or(HostError::Aborted)?;
        if let Some(id) = options.id.as_deref() {
            self.remember(id, &path);
        }

        info!(path = %path.display(), "User picked save destination");
        Ok(Arc::new(FsFileHandle::new(path)))
    }
}
