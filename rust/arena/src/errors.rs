use std::path::PathBuf;

use evohold_ai::StrategyError;
use evohold_engine::errors::GameError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArenaError {
    #[error("Invalid benchmark configuration: {0}")]
    InvalidConfig(String),
    #[error("Invalid solution id: {0:?}")]
    InvalidId(String),
    #[error("Solution not found: {0}")]
    NotFound(String),
    #[error("Hand engine error: {0}")]
    Game(#[from] GameError),
    #[error("Invalid strategy payload: {0}")]
    Strategy(#[from] StrategyError),
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed solution file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Evaluation of {id} panicked: {message}")]
    Panicked { id: String, message: String },
    #[error("Failed to build worker pool: {0}")]
    Pool(String),
}

impl ArenaError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
