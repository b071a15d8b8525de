use thiserror::Error;

use super::{ConfigError, EngineError, RegistryError, ServerError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("CLI error: {source}")]
    Clap {
        #[from]
        source: clap::Error,
    },
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
    #[error("HTTP client error: {source}")]
    Reqwest {
        #[from]
        source: reqwest::Error,
    },
    #[error("Join error: {source}")]
    Join {
        #[from]
        source: tokio::task::JoinError,
    },
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
    #[error("Server error: {0}")]
    Server(#[from] ServerError),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn config<E>(error: E) -> Self
    where
        E: Into<ConfigError>,
    {
        error.into().into()
    }

    pub fn engine<E>(error: E) -> Self
    where
        E: Into<EngineError>,
    {
        error.into().into()
    }

    pub fn registry<E>(error: E) -> Self
    where
        E: Into<RegistryError>,
    {
        error.into().into()
    }

    pub fn server<E>(error: E) -> Self
    where
        E: Into<ServerError>,
    {
        error.into().into()
    }
}
