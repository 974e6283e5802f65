#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to read data file {path}: {source}", path = path.display())]
    FileRead {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to deserialize YAML: {0}")]
    YamlDeserialization(serde_yaml::Error),
    #[error("unknown feature flag: {0}")]
    UnknownFeature(String),
    #[error("unknown health flag: {0}")]
    UnknownFlag(String),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Failure of the live capture module's state accessor.
///
/// The flag resolver absorbs these and falls back to the legacy globals, so they never reach
/// callers of [`crate::FlagResolver::snapshot`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaptureError {
    #[error("capture state lock is poisoned")]
    Poisoned,
    #[error("capture state unavailable: {0}")]
    Unavailable(String),
}
