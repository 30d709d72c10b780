use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures of the attribute storage a cooldown store is bound to.
///
/// Cooldown names and durations never produce errors; bad durations are
/// normalized to zero instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to access attribute file {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid attribute document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("attribute file {path:?} does not contain a JSON object")]
    NotAnObject { path: PathBuf },

    #[error("attribute {attribute:?} is not a mapping of cooldown names")]
    NotAMapping { attribute: String },

    #[error("attribute {attribute:?} is missing from storage")]
    MissingAttribute { attribute: String },
}
