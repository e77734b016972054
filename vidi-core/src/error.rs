use thiserror::Error;
use vidi_model::ModelError;

/// Failures reported by a [`MediaEngine`](crate::engine::MediaEngine).
///
/// The display string is the human readable reason carried by
/// `PlaybackState::Failed`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The locator could not be opened (invalid, unreachable, unsupported).
    #[error("{0}")]
    Creation(String),

    /// The engine reported a failure after the handle was created.
    #[error("{0}")]
    Runtime(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlayerError {
    #[error("playback controller has been disposed")]
    Disposed,

    #[error("media engine error: {0}")]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, PlayerError>;
