use std::path::PathBuf;

use thiserror::Error;

/// Failures that indicate a broken corpus or policy store rather than a miss.
#[derive(Debug, Error)]
pub enum HelpdeskError {
    #[error("failed reading {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("malformed {corpus} corpus: {message}")]
    MalformedCorpus {
        corpus: &'static str,
        message: String,
    },
    #[error("policy store failed for topic `{topic}`")]
    PolicyStore {
        topic: String,
        #[source]
        source: std::io::Error,
    },
}

pub type HelpdeskResult<T> = Result<T, HelpdeskError>;
