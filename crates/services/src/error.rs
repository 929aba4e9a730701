//! Shared error types for the services crate.

use std::path::PathBuf;

use thiserror::Error;

use storage::repository::StorageError;

/// Errors emitted by `StatisticsService` writes.
///
/// These never reach the player: the service logs them and keeps the
/// previously stored values.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StatisticsError {
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Reasons a question source could not provide data.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("no movies available")]
    Empty,
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid movie list: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("question source unavailable: {0}")]
    Unavailable(String),
}

/// Transitions rejected by `QuizSession`.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("delivery does not match an outstanding request")]
    StaleDelivery,
    #[error("no question is waiting for an answer")]
    NotAwaitingAnswer,
    #[error("no answer is being scored")]
    NotScoring,
}

/// Errors emitted by `QuizHandle`.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum EngineError {
    #[error("quiz engine has stopped")]
    Closed,
}
