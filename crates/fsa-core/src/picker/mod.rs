//! Picker parameters: caller-facing save options, the accept-type
//! descriptors derived from them, and the exact option set handed to the
//! host picker.

mod accept;
mod options;

pub use accept::{build_accept_types, FilePickerAcceptType};
pub use options::{FileSaveOptions, SaveFilePickerOptions, StartIn, WellKnownDirectory};
