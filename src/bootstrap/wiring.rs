//! # Dependency Injection / 依赖注入模块
//!
//! Turns `[picker]` settings into the `SaveFilePickerPort` the use case is
//! built from. Assembly only: nothing here decides what a save does.
//!
//! 这里只做组装，不做决策。

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use fsa_app::FileSave;
use fsa_core::ports::SaveFilePickerPort;
use fsa_core::settings::{PickerBackend, PickerSettings};
use fsa_platform::{DirectorySaveFilePicker, InMemorySaveFilePicker};

#[cfg(feature = "native-dialog")]
const NATIVE_DIALOG_TITLE: &str = "Save As";

/// Result type for wiring operations
pub type WiringResult<T> = Result<T, WiringError>;

/// Errors during dependency injection
/// 依赖注入错误
#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error("The directory backend needs [picker] directory to be set")]
    MissingDirectory,

    #[error("Native dialog support is not compiled in (enable the `native-dialog` feature)")]
    NativeDialogUnavailable,
}

/// Builds the picker for `settings`. `directory_override` forces the
/// directory backend rooted there.
pub fn build_picker(
    settings: &PickerSettings,
    directory_override: Option<PathBuf>,
) -> WiringResult<Arc<dyn SaveFilePickerPort>> {
    if let Some(root) = directory_override {
        info!(root = %root.display(), "Using directory picker (override)");
        return Ok(Arc::new(DirectorySaveFilePicker::new(root)));
    }

    match settings.backend {
        PickerBackend::Native => native_picker(),
        PickerBackend::Directory => {
            let root = settings
                .directory
                .clone()
                .ok_or(WiringError::MissingDirectory)?;
            info!(root = %root.display(), "Using directory picker");
            Ok(Arc::new(DirectorySaveFilePicker::new(root)))
        }
        PickerBackend::Memory => {
            info!("Using in-memory picker");
            Ok(Arc::new(InMemorySaveFilePicker::new()))
        }
    }
}

#[cfg(feature = "native-dialog")]
fn native_picker() -> WiringResult<Arc<dyn SaveFilePickerPort>> {
    info!("Using native save dialog");
    Ok(Arc::new(
        fsa_platform::NativeSaveFilePicker::new().with_title(NATIVE_DIALOG_TITLE),
    ))
}

#[cfg(not(feature = "native-dialog"))]
fn native_picker() -> WiringResult<Arc<dyn SaveFilePickerPort>> {
    Err(WiringError::NativeDialogUnavailable)
}

/// Wires the save use case.
pub fn wire_file_save(
    settings: &PickerSettings,
    directory_override: Option<PathBuf>,
) -> WiringResult<FileSave> {
    build_picker(settings, directory_override).map(FileSave::from_ports)
}
