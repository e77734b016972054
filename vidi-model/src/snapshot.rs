use crate::playback::{PlaybackSpeed, PlaybackState};
use crate::time::{format_time, progress_fraction};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Immutable view of the player session, published after every mutation.
///
/// `position` is the displayed position: while a seek is in flight it holds
/// the pending seek target (or the last confirmed position), never a raw
/// engine tick.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SessionSnapshot {
    pub state: PlaybackState,
    pub position: f64,
    /// Zero while unknown.
    pub duration: f64,
    pub is_muted: bool,
    pub speed: PlaybackSpeed,
    pub is_fullscreen: bool,
    pub is_seeking: bool,
}

impl SessionSnapshot {
    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    pub fn failure_reason(&self) -> Option<&str> {
        self.state.failure_reason()
    }

    pub fn has_duration(&self) -> bool {
        self.duration > 0.0
    }

    pub fn progress(&self) -> f64 {
        progress_fraction(self.position, self.duration)
    }

    pub fn formatted_position(&self) -> String {
        format_time(self.position)
    }

    pub fn formatted_duration(&self) -> String {
        format_time(self.duration)
    }
}

/// Opacity signal for the on-screen controls overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ControlsVisibility {
    /// `1.0` fully opaque, `0.0` hidden.
    pub opacity: f32,
    /// Fade duration the presentation layer should animate with, if any.
    pub transition: Option<Duration>,
    /// Controls only accept hits while mostly visible.
    pub interactive: bool,
}

impl ControlsVisibility {
    /// Opacity at or below which the controls count as "mostly hidden".
    pub const MOSTLY_HIDDEN: f32 = 0.5;

    pub fn visible() -> Self {
        Self {
            opacity: 1.0,
            transition: None,
            interactive: true,
        }
    }

    pub fn hidden(transition: Duration) -> Self {
        Self {
            opacity: 0.0,
            transition: Some(transition),
            interactive: false,
        }
    }

    pub fn is_mostly_hidden(&self) -> bool {
        self.opacity <= Self::MOSTLY_HIDDEN
    }
}

impl Default for ControlsVisibility {
    fn default() -> Self {
        Self::visible()
    }
}

/// Orientation lock requested from the host device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OrientationLock {
    #[default]
    Portrait,
    Landscape,
}
