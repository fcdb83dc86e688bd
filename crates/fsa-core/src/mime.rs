use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Media type string as handed to the picker, e.g. `text/plain`.
///
/// The value is kept verbatim: a `content-type` header carrying parameters
/// (`text/plain; charset=utf-8`) stays as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct MimeType(pub String);

impl MimeType {
    /// Media type used when nothing more specific is known.
    pub const WILDCARD: &'static str = "*/*";

    pub fn wildcard() -> Self {
        Self(Self::WILDCARD.into())
    }

    /// Returns `None` for an empty type, which is how an untyped blob reports
    /// itself. Any other value, whitespace included, is kept verbatim.
    pub fn non_empty(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.0 == Self::WILDCARD
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MimeType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MimeType::non_empty(s).ok_or_else(|| anyhow::anyhow!("empty media type"))
    }
}

impl From<&str> for MimeType {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
