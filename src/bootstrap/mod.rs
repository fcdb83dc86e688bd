//! Application bootstrap: settings, tracing and wiring.

pub mod config;
pub mod tracing;
pub mod wiring;

pub use config::{load_settings, FileSettingsLoader};
pub use wiring::{build_picker, wire_file_save, WiringError};
