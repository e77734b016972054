use tracing::{debug, info};
use vidi_model::{PlaybackSpeed, PlaybackState, SessionSnapshot, VideoItem};

use crate::engine::EngineHandle;

/// Outcome of a seek confirmation delivered back to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekSettlement {
    /// Latest request landed; position updated.
    Applied,
    /// Latest request was interrupted; position left at the last confirmed value.
    Interrupted,
    /// A newer request superseded this one.
    Stale,
}

/// Mutable state aggregate for one playback instance.
///
/// Owned exclusively by the controller's actor task; everyone else sees
/// [`SessionSnapshot`]s.
#[derive(Debug, Default)]
pub struct PlayerSession {
    state: PlaybackState,
    position: f64,
    duration: f64,
    is_muted: bool,
    speed: PlaybackSpeed,
    is_fullscreen: bool,
    is_seeking: bool,
    pending_seek_target: Option<f64>,
    // Monotonic; a confirmation is applied only if it carries the latest value.
    seek_seq: u64,
    item: Option<VideoItem>,
    pub(crate) engine_handle: Option<EngineHandle>,
}

impl PlayerSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    /// Position the presentation layer should show.
    pub fn displayed_position(&self) -> f64 {
        if self.is_seeking {
            self.pending_seek_target.unwrap_or(self.position)
        } else {
            self.position
        }
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn has_duration(&self) -> bool {
        self.duration > 0.0
    }

    pub fn is_muted(&self) -> bool {
        self.is_muted
    }

    pub fn speed(&self) -> PlaybackSpeed {
        self.speed
    }

    pub fn is_fullscreen(&self) -> bool {
        self.is_fullscreen
    }

    pub fn is_seeking(&self) -> bool {
        self.is_seeking
    }

    pub fn pending_seek_target(&self) -> Option<f64> {
        self.pending_seek_target
    }

    pub fn item(&self) -> Option<&VideoItem> {
        self.item.as_ref()
    }

    pub fn has_engine(&self) -> bool {
        self.engine_handle.is_some()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state.clone(),
            position: self.displayed_position(),
            duration: self.duration,
            is_muted: self.is_muted,
            speed: self.speed,
            is_fullscreen: self.is_fullscreen,
            is_seeking: self.is_seeking,
        }
    }

    /// Moves to `next`, returning whether the state actually changed.
    pub(crate) fn transition(&mut self, next: PlaybackState) -> bool {
        if self.state == next {
            return false;
        }
        info!(
            target: "player::controller",
            from = %self.state,
            to = %next,
            "playback state transition"
        );
        self.state = next;
        true
    }

    /// Starts a fresh session for `item`. Mute, speed and fullscreen are user
    /// preferences and survive reinitialization.
    pub(crate) fn reset_for(&mut self, item: VideoItem) {
        self.position = 0.0;
        self.duration = 0.0;
        self.abandon_seek();
        self.item = Some(item);
        self.state = PlaybackState::Idle;
    }

    pub(crate) fn set_position(&mut self, position: f64) {
        self.position = if self.has_duration() {
            position.clamp(0.0, self.duration)
        } else {
            position.max(0.0)
        };
    }

    pub(crate) fn set_duration(&mut self, duration: f64) {
        self.duration = duration;
        if self.position > duration {
            self.position = duration;
        }
    }

    pub(crate) fn toggle_muted(&mut self) -> bool {
        self.is_muted = !self.is_muted;
        self.is_muted
    }

    pub(crate) fn set_speed(&mut self, speed: PlaybackSpeed) {
        self.speed = speed;
    }

    pub(crate) fn toggle_fullscreen(&mut self) -> bool {
        self.is_fullscreen = !self.is_fullscreen;
        self.is_fullscreen
    }

    pub(crate) fn mark_seeking(&mut self) {
        self.is_seeking = true;
    }

    /// Clamps a requested seek target into the playable range.
    pub fn clamp_seek_target(&self, target: f64) -> f64 {
        let target = if target.is_finite() { target } else { 0.0 };
        if self.has_duration() {
            target.clamp(0.0, self.duration)
        } else {
            target.max(0.0)
        }
    }

    /// Registers a new seek request and returns its sequence number.
    /// Any earlier request still in flight becomes stale.
    pub(crate) fn begin_seek(&mut self, target: f64) -> u64 {
        self.seek_seq += 1;
        self.is_seeking = true;
        self.pending_seek_target = Some(target);
        self.seek_seq
    }

    pub(crate) fn settle_seek(
        &mut self,
        seq: u64,
        target: f64,
        finished: bool,
    ) -> SeekSettlement {
        if seq != self.seek_seq || self.pending_seek_target.is_none() {
            debug!(
                target: "player::controller",
                seq,
                latest = self.seek_seq,
                target,
                "dropping stale seek confirmation"
            );
            return SeekSettlement::Stale;
        }

        self.is_seeking = false;
        self.pending_seek_target = None;
        if finished {
            self.set_position(target);
            SeekSettlement::Applied
        } else {
            debug!(
                target: "player::controller",
                seq,
                target,
                "seek interrupted before landing"
            );
            SeekSettlement::Interrupted
        }
    }

    /// Forgets any in-flight seek; late confirmations for it are ignored.
    pub(crate) fn abandon_seek(&mut self) {
        self.seek_seq += 1;
        self.is_seeking = false;
        self.pending_seek_target = None;
    }
}
