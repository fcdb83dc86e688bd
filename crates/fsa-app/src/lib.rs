//! # fsa-app
//!
//! Application layer for file-save: the save use case wired against the
//! host ports from `fsa-core`.

pub mod usecases;

pub use usecases::file_save::{file_save, FileSave, FileSaveRequest, PickerShownCallback};
