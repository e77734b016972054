#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a single playback session.
///
/// `Failed` is terminal until the host reinitializes the controller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "state", content = "reason", rename_all = "snake_case")
)]
pub enum PlaybackState {
    #[default]
    Idle,
    Loading,
    Playing,
    Paused,
    Failed(String),
}

impl PlaybackState {
    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackState::Playing)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, PlaybackState::Failed(_))
    }

    /// Human readable failure reason, if any.
    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            PlaybackState::Failed(reason) => Some(reason.as_str()),
            _ => None,
        }
    }

    /// States in which the transport (play/pause/seek) is meaningful.
    pub fn is_ready(&self) -> bool {
        matches!(self, PlaybackState::Playing | PlaybackState::Paused)
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackState::Idle => write!(f, "idle"),
            PlaybackState::Loading => write!(f, "loading"),
            PlaybackState::Playing => write!(f, "playing"),
            PlaybackState::Paused => write!(f, "paused"),
            PlaybackState::Failed(reason) => write!(f, "failed ({reason})"),
        }
    }
}

/// Playback rates offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PlaybackSpeed {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl PlaybackSpeed {
    pub const ALL: [Self; 3] = [Self::Slow, Self::Normal, Self::Fast];

    /// Rate multiplier handed to the media engine.
    pub fn rate(self) -> f32 {
        match self {
            Self::Slow => 0.5,
            Self::Normal => 1.0,
            Self::Fast => 2.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Slow => "0.5x",
            Self::Normal => "1x",
            Self::Fast => "2x",
        }
    }

    /// Maps an exact rate back onto the fixed speed set.
    pub fn from_rate(rate: f32) -> Option<Self> {
        Self::ALL.into_iter().find(|speed| speed.rate() == rate)
    }
}

impl fmt::Display for PlaybackSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
