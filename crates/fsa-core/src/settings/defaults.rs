use super::model::*;

impl Default for PickerSettings {
    fn default() -> Self {
        Self {
            backend: PickerBackend::Native,
            directory: None,
        }
    }
}
