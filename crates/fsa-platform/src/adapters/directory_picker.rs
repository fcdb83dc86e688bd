use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs;
use tracing::info;

use fsa_core::ports::{FileHandle, SaveFilePickerPort};
use fsa_core::{HostError, SaveFilePickerOptions};

use super::FsFileHandle;

/// Headless picker: every save goes to `<root>/<suggested name>`.
///
/// 无界面选择器：直接保存到固定目录。
///
/// Accept types, `id` and `start_in` are ignored; there is nobody to show
/// them to.
#[derive(Debug, Clone)]
pub struct DirectorySaveFilePicker {
    root: PathBuf,
}

impl DirectorySaveFilePicker {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

fn validate_file_name(name: &str) -> Result<(), HostError> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || name.contains('\0');
    if invalid {
        return Err(HostError::Type(format!("invalid file name: {name:?}")));
    }
    Ok(())
}

#[async_trait]
impl SaveFilePickerPort for DirectorySaveFilePicker {
    async fn show_save_file_picker(
        &self,
        options: SaveFilePickerOptions,
    ) -> Result<FileHandle, HostError> {
        validate_file_name(&options.suggested_name)?;
        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| HostError::from_io(e, self.root.display().to_string()))?;

        let path = self.root.join(&options.suggested_name);
        info!(path = %path.display(), "Resolved save destination without dialog");
        Ok(Arc::new(FsFileHandle::new(path)))
    }
}
