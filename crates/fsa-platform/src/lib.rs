//! # fsa-platform
//!
//! Host implementations of the `fsa-core` ports.
//!
//! This crate contains the adapters that actually show dialogs and touch
//! the filesystem.

pub mod adapters;
pub mod app_dirs;
pub mod http;
pub mod well_known;

pub use adapters::{
    DirectorySaveFilePicker, FsFileHandle, FsWritableFileStream, InMemoryFileHandle,
    InMemorySaveFilePicker,
};
#[cfg(feature = "native-dialog")]
pub use adapters::NativeSaveFilePicker;
