use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};
use vidi_model::{PlaybackSpeed, PlaybackState, VideoItem};

use super::command::{Command, Internal};
use crate::bus::NotificationBus;
use crate::config::PlayerConfig;
use crate::controls::ControlsVisibilityScheduler;
use crate::engine::{
    EngineEvent, EngineHandle, EngineSession, EngineStatus, MediaEngine,
    SeekCompletion,
};
use crate::error::EngineError;
use crate::orientation::{OrientationCoordinator, OrientationPort};
use crate::session::PlayerSession;
use crate::time_sync::TimeSync;
use crate::timer::TimerKind;

const NO_ENGINE_REASON: &str = "no media engine configured";

enum Flow {
    Continue,
    Stop,
}

/// Task that exclusively owns one playback session.
///
/// Commands, engine events and its own timer/seek completions are handled
/// strictly one at a time, and the bus is refreshed after each of them.
pub(crate) struct PlayerActor {
    config: PlayerConfig,
    engine: Option<Arc<dyn MediaEngine>>,
    initial_item: Option<VideoItem>,
    session: PlayerSession,
    time_sync: TimeSync,
    controls: ControlsVisibilityScheduler,
    orientation: OrientationCoordinator,
    bus: NotificationBus,
    commands: mpsc::UnboundedReceiver<Command>,
    internal_tx: mpsc::UnboundedSender<Internal>,
    internal_rx: mpsc::UnboundedReceiver<Internal>,
    engine_events: Option<mpsc::UnboundedReceiver<EngineEvent>>,
    seek_waiters: Vec<JoinHandle<()>>,
}

impl PlayerActor {
    pub(crate) fn new(
        config: PlayerConfig,
        engine: Option<Arc<dyn MediaEngine>>,
        orientation: Arc<dyn OrientationPort>,
        initial_item: Option<VideoItem>,
        bus: NotificationBus,
        commands: mpsc::UnboundedReceiver<Command>,
    ) -> Self {
        let (internal_tx, internal_rx) = mpsc::unbounded_channel();
        let controls = ControlsVisibilityScheduler::new(
            config.hide_delay(),
            config.fade_duration(),
            internal_tx.clone(),
        );
        let orientation = OrientationCoordinator::new(
            orientation,
            config.fullscreen_settle(),
            internal_tx.clone(),
        );
        let time_sync = TimeSync::new(config.tick_interval());

        Self {
            config,
            engine,
            initial_item,
            session: PlayerSession::new(),
            time_sync,
            controls,
            orientation,
            bus,
            commands,
            internal_tx,
            internal_rx,
            engine_events: None,
            seek_waiters: Vec::new(),
        }
    }

    pub(crate) async fn run(mut self) {
        debug!(target: "player::controller", "playback actor started");
        loop {
            tokio::select! {
                biased;

                Some(internal) = self.internal_rx.recv() => {
                    self.handle_internal(internal)
                }
                event = next_engine_event(&mut self.engine_events) => match event {
                    Some(event) => self.handle_engine_event(event),
                    None => {
                        debug!(
                            target: "player::engine",
                            "engine event stream closed"
                        );
                        self.engine_events = None;
                    }
                },
                command = self.commands.recv() => match command {
                    Some(command) => {
                        if let Flow::Stop = self.handle_command(command) {
                            break;
                        }
                    }
                    None => {
                        // Every controller handle is gone.
                        self.dispose();
                        self.publish();
                        break;
                    }
                },
            }
            self.publish();
        }
        debug!(target: "player::controller", "playback actor stopped");
    }

    fn publish(&self) {
        self.bus.publish_session(self.session.snapshot());
        self.bus.publish_controls(self.controls.visibility());
    }

    fn is_playing(&self) -> bool {
        self.session.state().is_playing()
    }

    fn set_state(&mut self, next: PlaybackState) {
        if self.session.transition(next) {
            self.controls.on_state_changed(self.session.state());
        }
    }

    fn fail(&mut self, reason: String) {
        self.session.abandon_seek();
        self.set_state(PlaybackState::Failed(reason));
    }

    /// Runs `f` against the live engine handle. Returns `false` when there is
    /// no engine or no handle.
    fn with_engine(&self, f: impl FnOnce(&dyn MediaEngine, &EngineHandle)) -> bool {
        match (&self.engine, &self.session.engine_handle) {
            (Some(engine), Some(handle)) => {
                f(engine.as_ref(), handle);
                true
            }
            _ => false,
        }
    }

    fn handle_command(&mut self, command: Command) -> Flow {
        let interaction = command.is_interaction();
        trace!(
            target: "player::controller",
            command = command.name(),
            "command received"
        );

        match command {
            Command::Initialize(item) => self.initialize(item),
            Command::Reinitialize => self.reinitialize(),
            Command::Play => self.play(),
            Command::Pause => self.pause(),
            Command::TogglePlayPause => {
                if self.is_playing() {
                    self.pause();
                } else {
                    self.play();
                }
            }
            Command::Stop => self.stop(),
            Command::ToggleMute => self.toggle_mute(),
            Command::SetSpeed(speed) => self.set_speed(speed),
            Command::SeekStart => self.seek_start(),
            Command::SeekEnd(target) => self.seek_end(target),
            Command::ToggleFullscreen => self.toggle_fullscreen(),
            Command::Interact => {}
            Command::ViewAppeared => self.view_appeared(),
            Command::ViewDisappeared => self.view_disappeared(),
            Command::Snapshot(reply) => {
                let _ = reply.send(self.session.snapshot());
            }
            Command::Dispose(ack) => {
                self.dispose();
                self.publish();
                // `is_disposed` must already hold when the caller wakes.
                self.commands.close();
                let _ = ack.send(());
                return Flow::Stop;
            }
        }

        if interaction {
            self.controls.show(self.is_playing());
        }
        Flow::Continue
    }

    fn initialize(&mut self, item: VideoItem) {
        self.release_engine();
        info!(
            target: "player::controller",
            item_id = %item.id,
            title = %item.title,
            locator = %item.locator,
            "initializing playback session"
        );

        let locator = item.locator.clone();
        self.session.reset_for(item);
        self.set_state(PlaybackState::Loading);

        let Some(engine) = self.engine.clone() else {
            warn!(
                target: "player::controller",
                "cannot initialize without a media engine"
            );
            self.fail(NO_ENGINE_REASON.to_string());
            return;
        };

        let allowed = self.config.allowed_schemes.as_slice();
        if let Err(err) = locator.ensure_scheme(allowed) {
            warn!(
                target: "player::controller",
                error = %err,
                "rejecting locator"
            );
            self.fail(err.to_string());
            return;
        }

        match engine.create_handle(&locator, self.time_sync.handle_options()) {
            Ok(EngineSession { handle, events }) => {
                debug!(
                    target: "player::engine",
                    handle = handle.id(),
                    "engine handle created"
                );
                if self.session.is_muted() {
                    engine.set_muted(&handle, true);
                }
                self.session.engine_handle = Some(handle);
                self.engine_events = Some(events);
            }
            Err(err) => {
                warn!(
                    target: "player::engine",
                    error = %err,
                    "engine failed to create handle"
                );
                self.fail(err.to_string());
            }
        }
    }

    fn reinitialize(&mut self) {
        let item = self
            .session
            .item()
            .cloned()
            .or_else(|| self.initial_item.clone());
        match item {
            Some(item) => self.initialize(item),
            None => debug!(target: "player::controller", "nothing to reinitialize"),
        }
    }

    fn play(&mut self) {
        if *self.session.state() != PlaybackState::Paused {
            debug!(
                target: "player::controller",
                state = %self.session.state(),
                "ignoring play"
            );
            return;
        }
        let rate = self.session.speed().rate();
        let started = self.with_engine(|engine, handle| {
            engine.play(handle);
            engine.set_rate(handle, rate);
        });
        if started {
            self.set_state(PlaybackState::Playing);
        }
    }

    fn pause(&mut self) {
        if !self.is_playing() {
            debug!(
                target: "player::controller",
                state = %self.session.state(),
                "ignoring pause"
            );
            return;
        }
        self.with_engine(|engine, handle| engine.pause(handle));
        self.set_state(PlaybackState::Paused);
    }

    fn stop(&mut self) {
        self.pause();
        if self.session.state().is_ready() {
            self.issue_seek(0.0);
        }
    }

    fn toggle_mute(&mut self) {
        if self.session.state().is_failed() {
            debug!(
                target: "player::controller",
                "ignoring mute toggle on failed session"
            );
            return;
        }
        let muted = self.session.toggle_muted();
        self.with_engine(|engine, handle| engine.set_muted(handle, muted));
    }

    fn set_speed(&mut self, speed: PlaybackSpeed) {
        self.session.set_speed(speed);
        if self.is_playing() {
            let rate = speed.rate();
            self.with_engine(|engine, handle| engine.set_rate(handle, rate));
        }
    }

    fn seek_start(&mut self) {
        if !self.session.has_engine() {
            debug!(
                target: "player::controller",
                "ignoring seek start without engine handle"
            );
            return;
        }
        self.session.mark_seeking();
    }

    fn seek_end(&mut self, target: f64) {
        if !self.session.has_engine() {
            debug!(
                target: "player::controller",
                target,
                "ignoring seek without engine handle"
            );
            return;
        }
        self.issue_seek(target);
    }

    fn issue_seek(&mut self, requested: f64) {
        let target = self.session.clamp_seek_target(requested);
        let seq = self.session.begin_seek(target);
        debug!(
            target: "player::controller",
            seq,
            target,
            requested,
            "seek requested"
        );

        let (completion, mut confirmation) = SeekCompletion::channel();
        self.with_engine(|engine, handle| engine.seek(handle, target, completion));

        match confirmation.try_recv() {
            Ok(finished) => self.settle_seek(seq, target, finished),
            Err(oneshot::error::TryRecvError::Closed) => {
                self.settle_seek(seq, target, false)
            }
            Err(oneshot::error::TryRecvError::Empty) => {
                let internal = self.internal_tx.clone();
                self.seek_waiters.retain(|waiter| !waiter.is_finished());
                self.seek_waiters.push(tokio::spawn(async move {
                    let finished = confirmation.await.unwrap_or(false);
                    let _ = internal.send(Internal::SeekSettled {
                        seq,
                        target,
                        finished,
                    });
                }));
            }
        }
    }

    fn settle_seek(&mut self, seq: u64, target: f64, finished: bool) {
        let outcome = self.session.settle_seek(seq, target, finished);
        trace!(
            target: "player::controller",
            seq,
            target,
            finished,
            ?outcome,
            "seek settled"
        );
    }

    fn toggle_fullscreen(&mut self) {
        let fullscreen = self.session.toggle_fullscreen();
        let is_playing = self.is_playing();
        self.orientation
            .on_fullscreen_changed(fullscreen, &mut self.controls, is_playing);
    }

    fn view_appeared(&mut self) {
        if *self.session.state() == PlaybackState::Idle {
            match self.initial_item.clone() {
                Some(item) => self.initialize(item),
                None => debug!(
                    target: "player::controller",
                    "view appeared without an item"
                ),
            }
        }
        self.controls.schedule_hide();
    }

    fn view_disappeared(&mut self) {
        self.pause();
        self.orientation.release();
    }

    fn handle_engine_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::PositionTick(position) => {
                self.time_sync.apply_tick(&mut self.session, position);
            }
            EngineEvent::DurationResolved(duration) => {
                let outcome =
                    self.time_sync.apply_duration(&mut self.session, duration);
                if outcome.leaves_loading() {
                    self.set_state(PlaybackState::Paused);
                }
            }
            EngineEvent::EndOfMedia => self.end_of_media(),
            EngineEvent::StatusChanged(EngineStatus::Ready) => {
                debug!(target: "player::engine", "engine reports ready");
            }
            EngineEvent::StatusChanged(EngineStatus::Failed(reason))
                if self.session.state().is_failed() =>
            {
                debug!(
                    target: "player::engine",
                    %reason,
                    "ignoring failure on failed session"
                );
            }
            EngineEvent::StatusChanged(EngineStatus::Failed(reason)) => {
                let err = EngineError::Runtime(reason);
                warn!(
                    target: "player::engine",
                    error = %err,
                    "engine reported failure"
                );
                self.fail(err.to_string());
            }
        }
    }

    fn end_of_media(&mut self) {
        if !self.is_playing() {
            debug!(
                target: "player::controller",
                state = %self.session.state(),
                "ignoring end of media"
            );
            return;
        }
        info!(target: "player::controller", "reached end of media");
        self.with_engine(|engine, handle| engine.pause(handle));
        self.set_state(PlaybackState::Paused);
        self.issue_seek(0.0);
    }

    fn handle_internal(&mut self, internal: Internal) {
        match internal {
            Internal::TimerFired {
                kind: TimerKind::HideControls,
                generation,
            } => {
                let is_playing = self.is_playing();
                self.controls.on_hide_fired(generation, is_playing);
            }
            Internal::TimerFired {
                kind: TimerKind::FullscreenSettle,
                generation,
            } => self.orientation.on_settle_fired(generation, &mut self.controls),
            Internal::SeekSettled {
                seq,
                target,
                finished,
            } => self.settle_seek(seq, target, finished),
        }
    }

    /// Drops the current engine handle, its event stream and any seek waiters.
    fn release_engine(&mut self) {
        self.engine_events = None;
        for waiter in self.seek_waiters.drain(..) {
            waiter.abort();
        }
        if let Some(handle) = self.session.engine_handle.take() {
            debug!(
                target: "player::engine",
                handle = handle.id(),
                "releasing engine handle"
            );
            if let Some(engine) = &self.engine {
                engine.release_handle(handle);
            }
        }
    }

    fn dispose(&mut self) {
        info!(target: "player::controller", "disposing playback session");
        self.controls.cancel();
        self.orientation.release();
        self.release_engine();
        self.session.abandon_seek();
    }
}

async fn next_engine_event(
    events: &mut Option<mpsc::UnboundedReceiver<EngineEvent>>,
) -> Option<EngineEvent> {
    match events {
        Some(events) => events.recv().await,
        None => std::future::pending().await,
    }
}
