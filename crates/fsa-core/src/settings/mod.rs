pub mod defaults;
pub mod model;

pub use model::{LoggingSettings, PickerBackend, PickerSettings, Settings};
