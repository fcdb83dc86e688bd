//! # Host Adapters / 宿主适配器
//!
//! - `fs_handle` - Filesystem handle and swap-file writable
//! - `directory_picker` - Headless picker saving into a fixed directory
//! - `in_memory` - Volatile picker and handles
//! - `native_picker` - Platform dialog via `rfd` (feature `native-dialog`)

pub mod directory_picker;
pub mod fs_handle;
pub mod in_memory;
#[cfg(feature = "native-dialog")]
pub mod native_picker;

pub use directory_picker::DirectorySaveFilePicker;
pub use fs_handle::{FsFileHandle, FsWritableFileStream};
pub use in_memory::{InMemoryFileHandle, InMemorySaveFilePicker};
#[cfg(feature = "native-dialog")]
pub use native_picker::NativeSaveFilePicker;
