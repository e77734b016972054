use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use vidi_core::vidi_model::MediaLocator;
use vidi_core::{
    EngineError, EngineEvent, EngineHandle, EngineSession, HandleOptions, MediaEngine,
    SeekCompletion,
};

/// Imperative call observed by [`FakeEngine`].
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Create(String),
    Play(u64),
    Pause(u64),
    Seek(u64, f64),
    SetRate(u64, f32),
    SetMuted(u64, bool),
    Release(u64),
}

#[derive(Debug, Default)]
struct FakeState {
    calls: Vec<EngineCall>,
    next_handle: u64,
    live_handle: Option<u64>,
    events: Option<mpsc::UnboundedSender<EngineEvent>>,
    pending_seeks: Vec<(f64, SeekCompletion)>,
    rate: f32,
    muted: bool,
    released: Vec<u64>,
}

/// Scriptable stand-in for a decode/render engine.
///
/// Seeks complete synchronously unless the engine was built with
/// [`FakeEngine::with_manual_seeks`], in which case the test decides when
/// (and in which order) they land.
#[derive(Debug)]
pub struct FakeEngine {
    state: Mutex<FakeState>,
    creation_failure: Option<String>,
    manual_seeks: bool,
}

impl FakeEngine {
    fn build(creation_failure: Option<String>, manual_seeks: bool) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(FakeState::default()),
            creation_failure,
            manual_seeks,
        })
    }

    pub fn new() -> Arc<Self> {
        Self::build(None, false)
    }

    pub fn with_manual_seeks() -> Arc<Self> {
        Self::build(None, true)
    }

    /// Every `create_handle` fails with `reason`.
    pub fn failing(reason: &str) -> Arc<Self> {
        Self::build(Some(reason.to_string()), false)
    }

    /// Pushes an event on the live handle's stream. Returns `false` when no
    /// handle is live.
    pub fn emit(&self, event: EngineEvent) -> bool {
        match &self.state.lock().events {
            Some(events) => events.send(event).is_ok(),
            None => false,
        }
    }

    pub fn resolve_duration(&self, duration: f64) -> bool {
        self.emit(EngineEvent::DurationResolved(duration))
    }

    pub fn tick(&self, position: f64) -> bool {
        self.emit(EngineEvent::PositionTick(position))
    }

    /// Completes the oldest pending seek towards `target`.
    pub fn complete_seek(&self, target: f64, finished: bool) -> bool {
        let mut state = self.state.lock();
        let Some(index) = state
            .pending_seeks
            .iter()
            .position(|(pending, _)| *pending == target)
        else {
            return false;
        };
        let (_, completion) = state.pending_seeks.remove(index);
        drop(state);
        completion.complete(finished);
        true
    }

    pub fn pending_seeks(&self) -> Vec<f64> {
        self.state
            .lock()
            .pending_seeks
            .iter()
            .map(|(target, _)| *target)
            .collect()
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.state.lock().calls.clone()
    }

    pub fn seeks(&self) -> Vec<f64> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                EngineCall::Seek(_, target) => Some(target),
                _ => None,
            })
            .collect()
    }

    pub fn create_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, EngineCall::Create(_)))
            .count()
    }

    pub fn rate(&self) -> f32 {
        self.state.lock().rate
    }

    pub fn is_muted(&self) -> bool {
        self.state.lock().muted
    }

    pub fn live_handle(&self) -> Option<u64> {
        self.state.lock().live_handle
    }

    pub fn released(&self) -> Vec<u64> {
        self.state.lock().released.clone()
    }
}

impl MediaEngine for FakeEngine {
    fn create_handle(
        &self,
        locator: &MediaLocator,
        _options: HandleOptions,
    ) -> Result<EngineSession, EngineError> {
        let mut state = self.state.lock();
        state.calls.push(EngineCall::Create(locator.to_string()));
        if let Some(reason) = &self.creation_failure {
            return Err(EngineError::Creation(reason.clone()));
        }

        state.next_handle += 1;
        let id = state.next_handle;
        let (tx, rx) = mpsc::unbounded_channel();
        state.events = Some(tx);
        state.live_handle = Some(id);
        state.rate = 0.0;
        Ok(EngineSession::new(EngineHandle::new(id), rx))
    }

    fn play(&self, handle: &EngineHandle) {
        let mut state = self.state.lock();
        state.calls.push(EngineCall::Play(handle.id()));
        if state.rate == 0.0 {
            state.rate = 1.0;
        }
    }

    fn pause(&self, handle: &EngineHandle) {
        let mut state = self.state.lock();
        state.calls.push(EngineCall::Pause(handle.id()));
        state.rate = 0.0;
    }

    fn seek(&self, handle: &EngineHandle, target: f64, completion: SeekCompletion) {
        let mut state = self.state.lock();
        state.calls.push(EngineCall::Seek(handle.id(), target));
        if self.manual_seeks {
            state.pending_seeks.push((target, completion));
        } else {
            drop(state);
            completion.complete(true);
        }
    }

    fn set_rate(&self, handle: &EngineHandle, rate: f32) {
        let mut state = self.state.lock();
        state.calls.push(EngineCall::SetRate(handle.id(), rate));
        state.rate = rate;
    }

    fn set_muted(&self, handle: &EngineHandle, muted: bool) {
        let mut state = self.state.lock();
        state.calls.push(EngineCall::SetMuted(handle.id(), muted));
        state.muted = muted;
    }

    fn release_handle(&self, handle: EngineHandle) {
        let mut state = self.state.lock();
        state.calls.push(EngineCall::Release(handle.id()));
        state.released.push(handle.id());
        if state.live_handle == Some(handle.id()) {
            state.live_handle = None;
            state.events = None;
        }
        state.pending_seeks.clear();
    }
}
