//! Auto-hide policy for the on-screen controls overlay.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::debug;
use vidi_model::{ControlsVisibility, PlaybackState};

use crate::controller::command::Internal;
use crate::timer::{TimerKind, TimerSlot};

/// Keeps at most one pending "hide controls" action and the current opacity.
///
/// Hiding only happens while playback is running; every interaction brings
/// the controls back and restarts the countdown.
#[derive(Debug)]
pub struct ControlsVisibilityScheduler {
    visibility: ControlsVisibility,
    hide_delay: Duration,
    fade: Duration,
    timer: TimerSlot,
}

impl ControlsVisibilityScheduler {
    pub(crate) fn new(
        hide_delay: Duration,
        fade: Duration,
        owner: mpsc::UnboundedSender<Internal>,
    ) -> Self {
        Self {
            visibility: ControlsVisibility::visible(),
            hide_delay,
            fade,
            timer: TimerSlot::new(TimerKind::HideControls, owner),
        }
    }

    pub fn visibility(&self) -> ControlsVisibility {
        self.visibility
    }

    pub fn has_pending_hide(&self) -> bool {
        self.timer.is_pending()
    }

    pub fn hide_delay(&self) -> Duration {
        self.hide_delay
    }

    /// Brings the controls back and, while playing, restarts the countdown.
    pub fn show(&mut self, is_playing: bool) {
        self.reveal();
        if is_playing {
            self.schedule_hide();
        }
    }

    /// Cancels any pending hide and makes the controls fully opaque without
    /// starting a new countdown.
    pub fn reveal(&mut self) {
        self.timer.cancel();
        self.visibility = ControlsVisibility::visible();
    }

    /// Restarts the countdown. Whether the controls actually hide is decided
    /// when it expires.
    pub fn schedule_hide(&mut self) {
        let generation = self.timer.arm(self.hide_delay);
        debug!(
            target: "player::controls",
            generation,
            delay = ?self.hide_delay,
            "auto-hide scheduled"
        );
    }

    pub fn cancel(&mut self) {
        self.timer.cancel();
    }

    /// Applies an expired countdown. Returns whether the controls were hidden.
    pub fn on_hide_fired(&mut self, generation: u64, is_playing: bool) -> bool {
        if !self.timer.accept(generation) {
            return false;
        }
        if !is_playing {
            debug!(
                target: "player::controls",
                generation,
                "auto-hide expired while not playing"
            );
            return false;
        }
        debug!(target: "player::controls", generation, "hiding controls");
        self.visibility = ControlsVisibility::hidden(self.fade);
        true
    }

    /// Reacts to playback state transitions.
    pub fn on_state_changed(&mut self, state: &PlaybackState) {
        match state {
            PlaybackState::Paused | PlaybackState::Failed(_) => self.show(false),
            // Already fading or hidden: don't restart the fade.
            PlaybackState::Playing if !self.visibility.is_mostly_hidden() => {
                self.schedule_hide()
            }
            _ => {}
        }
    }
}
