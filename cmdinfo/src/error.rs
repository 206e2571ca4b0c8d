use std::io;
use std::path::PathBuf;

/// Errors raised while reflecting, loading manifests or persisting caches.
///
/// Stale caches, missing docblocks and unknown tags are not errors; they
/// degrade to a rebuild or to raw annotations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown class: {0}")]
    UnknownClass(String),

    #[error("unknown method: {class}::{method}")]
    UnknownMethod { class: String, method: String },

    #[error("invalid manifest {}: {source}", .path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
