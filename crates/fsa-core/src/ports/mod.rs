//! Port interfaces for the application layer
//!
//! Ports define the contract between the save use case and the host that
//! actually shows dialogs and touches disk. This follows Hexagonal
//! Architecture principles: the use case only sees these traits, and each
//! host (native desktop, headless directory, in-memory) provides adapters.
//!
//! ## Host operations
//!
//! | operation        | port method                                |
//! |------------------|--------------------------------------------|
//! | pick destination | [`SaveFilePickerPort::show_save_file_picker`] |
//! | probe validity   | [`FileHandlePort::get_file`]               |
//! | open writable    | [`FileHandlePort::create_writable`]        |
//! | pipe             | [`WritableFileStreamPort::pipe_from`]      |
//! | write / close    | [`WritableFileStreamPort::write`] / [`WritableFileStreamPort::close`] |

mod file_handle;
mod save_file_picker;
mod writable_file_stream;

#[cfg(any(test, feature = "testing"))]
pub mod tests;

pub use file_handle::{FileHandle, FileHandlePort, FileInfo};
pub use save_file_picker::SaveFilePickerPort;
pub use writable_file_stream::WritableFileStreamPort;
