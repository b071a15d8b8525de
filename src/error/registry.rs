use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Wrong registration key.")]
    WrongKey,
    #[error("Failed to serialize worker record: {source}")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to persist worker record {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to create workers directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
