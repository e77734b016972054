//! Clock-driven position tracking.
//!
//! Turns engine ticks into session position updates, suspended while a seek
//! is in flight, and resolves the session duration once metadata arrives.

use std::time::Duration;

use tracing::{debug, trace};
use vidi_model::PlaybackState;

use crate::engine::HandleOptions;
use crate::session::PlayerSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Applied,
    /// A seek is in flight; the tick would race with the pending target.
    DroppedWhileSeeking,
    /// No live session, or the reported value is not a usable position.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationOutcome {
    /// Duration stored and the session left `Loading`.
    Ready,
    /// Value stored without a state change.
    Updated,
    /// Value was non-finite and discarded; the session still left `Loading`.
    ReadyWithoutDuration,
    Discarded,
}

impl DurationOutcome {
    pub fn leaves_loading(self) -> bool {
        matches!(self, Self::Ready | Self::ReadyWithoutDuration)
    }
}

#[derive(Debug)]
pub struct TimeSync {
    tick_interval: Duration,
    dropped_ticks: u64,
}

impl TimeSync {
    pub fn new(tick_interval: Duration) -> Self {
        Self {
            tick_interval,
            dropped_ticks: 0,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Options for a new engine handle, so ticks arrive at this cadence.
    pub fn handle_options(&self) -> HandleOptions {
        HandleOptions {
            tick_interval: self.tick_interval,
        }
    }

    /// Ticks dropped because a seek was in flight, since creation.
    pub fn dropped_ticks(&self) -> u64 {
        self.dropped_ticks
    }

    pub fn apply_tick(
        &mut self,
        session: &mut PlayerSession,
        position: f64,
    ) -> TickOutcome {
        if !session.has_engine()
            || session.state().is_failed()
            || !position.is_finite()
        {
            return TickOutcome::Ignored;
        }
        if session.is_seeking() {
            self.dropped_ticks += 1;
            trace!(
                target: "player::time_sync",
                position,
                "dropping tick during seek"
            );
            return TickOutcome::DroppedWhileSeeking;
        }
        session.set_position(position);
        TickOutcome::Applied
    }

    /// Stores `duration` when finite and reports whether the session should
    /// advance from `Loading` to `Paused`.
    pub fn apply_duration(
        &mut self,
        session: &mut PlayerSession,
        duration: f64,
    ) -> DurationOutcome {
        let loading = *session.state() == PlaybackState::Loading;
        let usable = duration.is_finite() && duration >= 0.0;

        if usable {
            session.set_duration(duration);
            debug!(target: "player::time_sync", duration, "duration resolved");
        } else {
            debug!(
                target: "player::time_sync",
                duration,
                "ignoring non-numeric duration"
            );
        }

        match (loading, usable) {
            (true, true) => DurationOutcome::Ready,
            (true, false) => DurationOutcome::ReadyWithoutDuration,
            (false, true) => DurationOutcome::Updated,
            (false, false) => DurationOutcome::Discarded,
        }
    }
}

impl Default for TimeSync {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}
