//! # fsa-core
//!
//! Core domain models and ports for file-save.
//!
//! This crate describes *what* a save looks like (sources, accept types, picker
//! options) and the host capabilities a save needs, without depending on any
//! concrete dialog or filesystem implementation.

pub mod error;
pub mod mime;
pub mod picker;
pub mod ports;
pub mod settings;
pub mod source;

// Re-export commonly used types at the crate root
pub use error::HostError;
pub use mime::MimeType;
pub use picker::{
    build_accept_types, FilePickerAcceptType, FileSaveOptions, SaveFilePickerOptions, StartIn,
    WellKnownDirectory,
};
pub use ports::{FileHandle, FileHandlePort, FileInfo, SaveFilePickerPort, WritableFileStreamPort};
pub use source::{Blob, BufferSource, ByteStream, DataSource, Headers, ResponseSource, WritePath, WriteSource};
