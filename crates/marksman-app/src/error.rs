use std::path::PathBuf;

use thiserror::Error;

use marksman_sim::SimError;

/// Host-side failures. All of them happen at startup or shutdown.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Sim(#[from] SimError),
    #[error("failed to spawn game loop thread: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("game loop is already running")]
    AlreadyRunning,
    #[error("game loop is not running")]
    NotRunning,
    #[error("game loop thread panicked")]
    LoopPanicked,
}
