//! Boundary to the external decode/render engine.
//!
//! The core never inspects engine internals: it creates one handle per
//! session, drives it through the imperative calls below and consumes the
//! typed [`EngineEvent`] stream returned alongside the handle. Any engine
//! satisfying [`MediaEngine`] is interchangeable.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use vidi_model::MediaLocator;

use crate::error::EngineError;

/// Opaque playback handle, exclusively owned by one player session.
///
/// Not `Clone`: [`MediaEngine::release_handle`] consumes it, so a handle can
/// only ever be released once.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct EngineHandle(u64);

impl EngineHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Options forwarded to the engine when a handle is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandleOptions {
    /// Cadence of [`EngineEvent::PositionTick`].
    pub tick_interval: Duration,
}

impl Default for HandleOptions {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(100),
        }
    }
}

/// Readiness reported by the engine for the current item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineStatus {
    Ready,
    Failed(String),
}

/// Events pushed by the engine for one handle.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Periodic elapsed-time report, in seconds.
    PositionTick(f64),
    EndOfMedia,
    StatusChanged(EngineStatus),
    /// Asset metadata resolved; the value may be non-finite for live or
    /// unknown-length streams.
    DurationResolved(f64),
}

/// A freshly created handle together with its event stream.
#[derive(Debug)]
pub struct EngineSession {
    pub handle: EngineHandle,
    pub events: mpsc::UnboundedReceiver<EngineEvent>,
}

impl EngineSession {
    pub fn new(
        handle: EngineHandle,
        events: mpsc::UnboundedReceiver<EngineEvent>,
    ) -> Self {
        Self { handle, events }
    }
}

/// One-shot confirmation for a seek request.
///
/// Engines call [`SeekCompletion::complete`] once the seek lands (or is
/// interrupted). Dropping it without completing counts as "not finished".
#[derive(Debug)]
pub struct SeekCompletion(oneshot::Sender<bool>);

impl SeekCompletion {
    pub fn channel() -> (Self, oneshot::Receiver<bool>) {
        let (tx, rx) = oneshot::channel();
        (Self(tx), rx)
    }

    pub fn complete(self, finished: bool) {
        // The requester may already be gone; nothing to do then.
        let _ = self.0.send(finished);
    }
}

/// Imperative controls and handle lifecycle of a playback engine.
pub trait MediaEngine: Send + Sync {
    /// Creates a playback handle for `locator`. Metadata (duration) resolves
    /// later and is reported through the returned event stream.
    fn create_handle(
        &self,
        locator: &MediaLocator,
        options: HandleOptions,
    ) -> Result<EngineSession, EngineError>;

    fn play(&self, handle: &EngineHandle);

    fn pause(&self, handle: &EngineHandle);

    fn seek(&self, handle: &EngineHandle, target: f64, completion: SeekCompletion);

    fn set_rate(&self, handle: &EngineHandle, rate: f32);

    fn set_muted(&self, handle: &EngineHandle, muted: bool);

    fn release_handle(&self, handle: EngineHandle);
}
