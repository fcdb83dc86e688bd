//! Business logic use cases
//!
//! FileSaveRequest
//!       ↓
//! FileSave ── probe existing handle ──→ FileHandlePort::get_file
//!       │  └─ or show picker ─────────→ SaveFilePickerPort
//!       ↓
//! create_writable → pipe / write + close

pub mod file_save;

pub use file_save::FileSave;
