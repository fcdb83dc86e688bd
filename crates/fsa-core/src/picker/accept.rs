use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::FileSaveOptions;
use crate::MimeType;

/// Accept descriptor for one picker type entry: media type → extensions.
///
/// Insertion order is kept so the host lists types the way they were given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePickerAcceptType {
    pub description: String,
    pub accept: IndexMap<MimeType, Vec<String>>,
}

impl FilePickerAcceptType {
    /// Unique extensions across all media types, in first-seen order.
    pub fn extensions(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for ext in self.accept.values().flatten() {
            if !seen.contains(&ext.as_str()) {
                seen.push(ext.as_str());
            }
        }
        seen
    }
}

/// Builds one accept descriptor per save option.
///
/// - explicit media types: each maps to the option's extensions; the inferred
///   type is added to the first option only
/// - otherwise the inferred type maps to the extensions
/// - otherwise `*/*` maps to the extensions
///
/// The caller's options are not modified.
pub fn build_accept_types(
    options: &[FileSaveOptions],
    inferred: Option<&MimeType>,
) -> Vec<FilePickerAcceptType> {
    options
        .iter()
        .enumerate()
        .map(|(index, option)| {
            let mut accept = IndexMap::new();
            match (&option.mime_types, inferred) {
                (Some(mime_types), _) => {
                    for mime in mime_types {
                        accept.insert(mime.clone(), option.extensions.clone());
                    }
                    if let (0, Some(mime)) = (index, inferred) {
                        accept.insert(mime.clone(), option.extensions.clone());
                    }
                }
                (None, Some(mime)) => {
                    accept.insert(mime.clone(), option.extensions.clone());
                }
                (None, None) => {
                    accept.insert(MimeType::wildcard(), option.extensions.clone());
                }
            }
            FilePickerAcceptType {
                description: option.description.clone(),
                accept,
            }
        })
        .collect()
}
