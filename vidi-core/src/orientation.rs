//! Fullscreen ↔ device orientation coupling.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info};
use vidi_model::OrientationLock;

use crate::controller::command::Internal;
use crate::controls::ControlsVisibilityScheduler;
use crate::timer::{TimerKind, TimerSlot};

/// Host hook for device orientation locks.
pub trait OrientationPort: Send + Sync {
    fn request_lock(&self, lock: OrientationLock);
}

/// Port for hosts without a rotatable display.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopOrientation;

impl OrientationPort for NoopOrientation {
    fn request_lock(&self, _lock: OrientationLock) {}
}

/// Requests orientation locks on fullscreen changes and holds the controls
/// visible until the rotation has settled.
pub struct OrientationCoordinator {
    port: Arc<dyn OrientationPort>,
    settle: TimerSlot,
    settle_delay: Duration,
    last_lock: Option<OrientationLock>,
}

impl OrientationCoordinator {
    pub(crate) fn new(
        port: Arc<dyn OrientationPort>,
        settle_delay: Duration,
        owner: mpsc::UnboundedSender<Internal>,
    ) -> Self {
        Self {
            port,
            settle: TimerSlot::new(TimerKind::FullscreenSettle, owner),
            settle_delay,
            last_lock: None,
        }
    }

    pub fn last_lock(&self) -> Option<OrientationLock> {
        self.last_lock
    }

    pub fn is_settling(&self) -> bool {
        self.settle.is_pending()
    }

    fn lock(&mut self, lock: OrientationLock) {
        info!(target: "player::orientation", ?lock, "requesting orientation lock");
        self.port.request_lock(lock);
        self.last_lock = Some(lock);
    }

    pub fn on_fullscreen_changed(
        &mut self,
        fullscreen: bool,
        controls: &mut ControlsVisibilityScheduler,
        is_playing: bool,
    ) {
        if fullscreen {
            self.lock(OrientationLock::Landscape);
            controls.reveal();
            self.settle.arm(self.settle_delay);
        } else {
            self.settle.cancel();
            self.lock(OrientationLock::Portrait);
            controls.show(is_playing);
        }
    }

    /// Rotation settled: hand the controls back to the auto-hide countdown.
    pub fn on_settle_fired(
        &mut self,
        generation: u64,
        controls: &mut ControlsVisibilityScheduler,
    ) {
        if self.settle.accept(generation) {
            debug!(
                target: "player::orientation",
                generation,
                "rotation settled"
            );
            controls.schedule_hide();
        }
    }

    /// The player view is leaving scope: portrait regardless of fullscreen.
    pub fn release(&mut self) {
        self.settle.cancel();
        self.lock(OrientationLock::Portrait);
    }
}

impl std::fmt::Debug for OrientationCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrientationCoordinator")
            .field("settle", &self.settle)
            .field("settle_delay", &self.settle_delay)
            .field("last_lock", &self.last_lock)
            .finish_non_exhaustive()
    }
}
