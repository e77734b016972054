use std::fmt;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

use crate::controller::command::Internal;

/// Which deferred action a [`TimerSlot`] drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    HideControls,
    FullscreenSettle,
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerKind::HideControls => write!(f, "hide-controls"),
            TimerKind::FullscreenSettle => write!(f, "fullscreen-settle"),
        }
    }
}

/// A single restartable delayed action.
///
/// At most one sleeper task is live per slot. Arming or cancelling bumps the
/// generation, so a firing that was already queued before the cancel is
/// recognised as superseded when it reaches the owner.
pub struct TimerSlot {
    kind: TimerKind,
    generation: u64,
    task: Option<JoinHandle<()>>,
    owner: mpsc::UnboundedSender<Internal>,
}

impl TimerSlot {
    pub(crate) fn new(
        kind: TimerKind,
        owner: mpsc::UnboundedSender<Internal>,
    ) -> Self {
        Self {
            kind,
            generation: 0,
            task: None,
            owner,
        }
    }

    pub fn kind(&self) -> TimerKind {
        self.kind
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_pending(&self) -> bool {
        self.task.is_some()
    }

    /// Cancels any outstanding action and starts a new `delay`.
    pub fn arm(&mut self, delay: Duration) -> u64 {
        self.cancel();
        let generation = self.generation;
        let kind = self.kind;
        let owner = self.owner.clone();
        trace!(target: "player::timer", %kind, generation, ?delay, "arming timer");
        self.task = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Owner gone means the session was disposed.
            let _ = owner.send(Internal::TimerFired { kind, generation });
        }));
        generation
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.generation += 1;
    }

    /// Consumes a firing. Returns `true` only for the live, non-superseded
    /// action.
    pub fn accept(&mut self, generation: u64) -> bool {
        if self.task.is_none() || generation != self.generation {
            trace!(
                target: "player::timer",
                kind = %self.kind,
                generation,
                current = self.generation,
                "ignoring superseded timer"
            );
            return false;
        }
        self.task = None;
        true
    }
}

impl fmt::Debug for TimerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerSlot")
            .field("kind", &self.kind)
            .field("generation", &self.generation)
            .field("pending", &self.task.is_some())
            .finish()
    }
}

impl Drop for TimerSlot {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
