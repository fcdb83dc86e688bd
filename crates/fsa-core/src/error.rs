use thiserror::Error;

/// Rejection raised by the host capability (picker, handle or writable).
///
/// 宿主环境返回的错误，原样传递给调用方。
///
/// The variants follow the rejection classes a file-system host reports.
/// Nothing in the save flow translates or retries these; they reach the
/// caller exactly as the adapter produced them.
#[derive(Debug, Error)]
pub enum HostError {
    /// The user dismissed the picker.
    #[error("the user aborted a request")]
    Aborted,

    #[error("permission denied: {0}")]
    NotAllowed(String),

    /// The handle's target no longer exists (or is not a file).
    #[error("not found: {0}")]
    NotFound(String),

    /// Operation issued against a closed or aborted writable.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Malformed argument, e.g. a suggested name with path separators.
    #[error("type error: {0}")]
    Type(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HostError {
    pub fn is_aborted(&self) -> bool {
        matches!(self, HostError::Aborted)
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Maps an I/O failure onto the closest host rejection class.
    pub fn from_io(err: std::io::Error, context: impl Into<String>) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(context.into()),
            std::io::ErrorKind::PermissionDenied => Self::NotAllowed(context.into()),
            _ => Self::Io(err),
        }
    }
}
