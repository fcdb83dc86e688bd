use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::FilePickerAcceptType;
use crate::MimeType;

pub const DEFAULT_DESCRIPTION: &str = "Files";
pub const DEFAULT_FILE_NAME: &str = "Untitled";

/// One entry of the type list passed to a save.
///
/// Every entry contributes an accept-type descriptor. Only the first entry's
/// `file_name`, `id`, `start_in` and `exclude_accept_all_option` reach the
/// picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSaveOptions {
    pub description: String,
    /// Extension patterns such as `.txt`.
    pub extensions: Vec<String>,
    /// Explicit media types; when set they take over from the inferred type.
    pub mime_types: Option<Vec<MimeType>>,
    pub file_name: String,
    /// Lets the host remember a directory per purpose.
    pub id: Option<String>,
    pub start_in: Option<StartIn>,
    pub exclude_accept_all_option: bool,
}

impl Default for FileSaveOptions {
    fn default() -> Self {
        Self {
            description: DEFAULT_DESCRIPTION.to_string(),
            extensions: Vec::new(),
            mime_types: None,
            file_name: DEFAULT_FILE_NAME.to_string(),
            id: None,
            start_in: None,
            exclude_accept_all_option: false,
        }
    }
}

impl FileSaveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_mime_types<I, S>(mut self, mime_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mime_types = Some(
            mime_types
                .into_iter()
                .map(|m| MimeType(m.into()))
                .collect(),
        );
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_start_in(mut self, start_in: StartIn) -> Self {
        self.start_in = Some(start_in);
        self
    }

    pub fn exclude_accept_all(mut self, exclude: bool) -> Self {
        self.exclude_accept_all_option = exclude;
        self
    }
}

/// Where the picker should open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartIn {
    WellKnown(WellKnownDirectory),
    Directory(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WellKnownDirectory {
    Desktop,
    Documents,
    Downloads,
    Music,
    Pictures,
    Videos,
}

impl FromStr for WellKnownDirectory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "desktop" => Ok(Self::Desktop),
            "documents" => Ok(Self::Documents),
            "downloads" => Ok(Self::Downloads),
            "music" => Ok(Self::Music),
            "pictures" => Ok(Self::Pictures),
            "videos" => Ok(Self::Videos),
            other => Err(anyhow::anyhow!("unknown well-known directory: {other}")),
        }
    }
}

/// Exact parameter set of a host picker call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveFilePickerOptions {
    pub suggested_name: String,
    pub id: Option<String>,
    pub start_in: Option<StartIn>,
    pub types: Vec<FilePickerAcceptType>,
    pub exclude_accept_all_option: bool,
}

impl SaveFilePickerOptions {
    /// Picker options from the first save option plus the accept types built
    /// for the whole list.
    pub fn from_first(first: &FileSaveOptions, types: Vec<FilePickerAcceptType>) -> Self {
        Self {
            suggested_name: first.file_name.clone(),
            id: first.id.clone(),
            start_in: first.start_in.clone(),
            types,
            exclude_accept_all_option: first.exclude_accept_all_option,
        }
    }
}
