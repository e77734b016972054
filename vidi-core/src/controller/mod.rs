//! The playback controller: a cloneable handle in front of a single actor
//! task that owns the session.
//!
//! Every call on [`PlaybackController`] is a message to the actor, so the
//! session, the auto-hide countdown and the orientation settle window are
//! only ever touched from one place. State is observed through
//! [`PlaybackController::subscribe_snapshot`] (latest value) or
//! [`PlaybackController::subscribe`] (every change).

mod actor;
pub(crate) mod command;

use std::fmt;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tracing::debug;
use vidi_model::{ControlsVisibility, PlaybackSpeed, SessionSnapshot, VideoItem};

use crate::bus::{NotificationBus, PlayerNotification};
use crate::config::PlayerConfig;
use crate::engine::MediaEngine;
use crate::error::{PlayerError, Result};
use crate::orientation::{NoopOrientation, OrientationPort};

use actor::PlayerActor;
use command::Command;

/// Handle to a running playback session.
///
/// Cheap to clone. The session is disposed once [`dispose`](Self::dispose)
/// is called or the last handle is dropped; after that every command returns
/// [`PlayerError::Disposed`].
#[derive(Debug, Clone)]
pub struct PlaybackController {
    commands: mpsc::UnboundedSender<Command>,
    session: watch::Receiver<SessionSnapshot>,
    controls: watch::Receiver<ControlsVisibility>,
    notifications: broadcast::Sender<PlayerNotification>,
}

impl PlaybackController {
    pub fn builder(config: PlayerConfig) -> PlaybackControllerBuilder {
        PlaybackControllerBuilder::new(config)
    }

    fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| PlayerError::Disposed)
    }

    /// Tears down any current engine handle and starts loading `item`.
    pub fn initialize(&self, item: VideoItem) -> Result<()> {
        self.send(Command::Initialize(item))
    }

    /// Parses `locator` and initializes with it.
    pub fn initialize_url(
        &self,
        title: impl Into<String>,
        locator: &str,
    ) -> Result<()> {
        let item = VideoItem::from_url(title, locator)?;
        self.initialize(item)
    }

    /// Reloads the current item, e.g. to recover from `Failed`.
    pub fn reinitialize(&self) -> Result<()> {
        self.send(Command::Reinitialize)
    }

    pub fn play(&self) -> Result<()> {
        self.send(Command::Play)
    }

    pub fn pause(&self) -> Result<()> {
        self.send(Command::Pause)
    }

    pub fn toggle_play_pause(&self) -> Result<()> {
        self.send(Command::TogglePlayPause)
    }

    /// Pauses and rewinds to the start.
    pub fn stop(&self) -> Result<()> {
        self.send(Command::Stop)
    }

    pub fn toggle_mute(&self) -> Result<()> {
        self.send(Command::ToggleMute)
    }

    pub fn set_speed(&self, speed: PlaybackSpeed) -> Result<()> {
        self.send(Command::SetSpeed(speed))
    }

    /// The user grabbed the scrubber: position ticks are suspended until the
    /// matching [`seek_end`](Self::seek_end) settles.
    pub fn seek_start(&self) -> Result<()> {
        self.send(Command::SeekStart)
    }

    /// Requests a seek to `target` seconds, clamped into the playable range.
    pub fn seek_end(&self, target: f64) -> Result<()> {
        self.send(Command::SeekEnd(target))
    }

    pub fn toggle_fullscreen(&self) -> Result<()> {
        self.send(Command::ToggleFullscreen)
    }

    /// Any tap, drag or button press on the player surface.
    pub fn interact(&self) -> Result<()> {
        self.send(Command::Interact)
    }

    pub fn view_appeared(&self) -> Result<()> {
        self.send(Command::ViewAppeared)
    }

    pub fn view_disappeared(&self) -> Result<()> {
        self.send(Command::ViewDisappeared)
    }

    /// Round trip to the actor; reflects every command sent before it.
    pub async fn snapshot(&self) -> Result<SessionSnapshot> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Snapshot(reply))?;
        response.await.map_err(|_| PlayerError::Disposed)
    }

    /// Latest published snapshot, without waiting for queued commands.
    pub fn current(&self) -> SessionSnapshot {
        self.session.borrow().clone()
    }

    pub fn controls(&self) -> ControlsVisibility {
        *self.controls.borrow()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlayerNotification> {
        self.notifications.subscribe()
    }

    pub fn subscribe_snapshot(&self) -> watch::Receiver<SessionSnapshot> {
        self.session.clone()
    }

    pub fn subscribe_controls(&self) -> watch::Receiver<ControlsVisibility> {
        self.controls.clone()
    }

    pub fn is_disposed(&self) -> bool {
        self.commands.is_closed()
    }

    /// Releases the engine handle and stops the actor. Calling it again, or
    /// from another clone, is a no-op.
    ///
    /// Once this returns, [`is_disposed`](Self::is_disposed) is `true` and
    /// every other command fails with [`PlayerError::Disposed`]. The last
    /// published snapshot is left as it was: it may still read `Playing` or
    /// `Paused`, but no engine handle backs it any more and nothing will
    /// update it.
    pub async fn dispose(&self) -> Result<()> {
        let (ack, done) = oneshot::channel();
        if self.commands.send(Command::Dispose(ack)).is_err() {
            debug!(
                target: "player::controller",
                "dispose on already disposed controller"
            );
            return Ok(());
        }
        // A dropped ack means another dispose got there first.
        let _ = done.await;
        Ok(())
    }
}

/// Wires the collaborators of a [`PlaybackController`] before spawning it.
pub struct PlaybackControllerBuilder {
    config: PlayerConfig,
    engine: Option<Arc<dyn MediaEngine>>,
    orientation: Arc<dyn OrientationPort>,
    item: Option<VideoItem>,
}

impl PlaybackControllerBuilder {
    pub fn new(config: PlayerConfig) -> Self {
        Self {
            config,
            engine: None,
            orientation: Arc::new(NoopOrientation),
            item: None,
        }
    }

    pub fn engine(mut self, engine: Arc<dyn MediaEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    pub fn orientation(mut self, port: Arc<dyn OrientationPort>) -> Self {
        self.orientation = port;
        self
    }

    /// Item loaded by the first `view_appeared`.
    pub fn item(mut self, item: VideoItem) -> Self {
        self.item = Some(item);
        self
    }

    /// Spawns the actor on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn spawn(self) -> PlaybackController {
        let (commands, inbox) = mpsc::unbounded_channel();
        let bus = NotificationBus::new(
            self.config.notification_capacity,
            SessionSnapshot::default(),
            ControlsVisibility::visible(),
        );
        let controller = PlaybackController {
            commands,
            session: bus.subscribe_session(),
            controls: bus.subscribe_controls(),
            notifications: bus.sender(),
        };

        let actor = PlayerActor::new(
            self.config,
            self.engine,
            self.orientation,
            self.item,
            bus,
            inbox,
        );
        tokio::spawn(actor.run());
        controller
    }
}

impl fmt::Debug for PlaybackControllerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackControllerBuilder")
            .field("config", &self.config)
            .field("has_engine", &self.engine.is_some())
            .field("item", &self.item)
            .finish_non_exhaustive()
    }
}
