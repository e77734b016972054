use tokio::sync::oneshot;
use vidi_model::{PlaybackSpeed, SessionSnapshot, VideoItem};

use crate::timer::TimerKind;

/// Requests sent from a [`PlaybackController`](super::PlaybackController)
/// handle to its actor.
#[derive(Debug)]
pub(crate) enum Command {
    Initialize(VideoItem),
    Reinitialize,
    Play,
    Pause,
    TogglePlayPause,
    Stop,
    ToggleMute,
    SetSpeed(PlaybackSpeed),
    SeekStart,
    SeekEnd(f64),
    ToggleFullscreen,
    Interact,
    ViewAppeared,
    ViewDisappeared,
    Snapshot(oneshot::Sender<SessionSnapshot>),
    Dispose(oneshot::Sender<()>),
}

impl Command {
    /// Commands that count as a user interaction with the controls.
    pub(crate) fn is_interaction(&self) -> bool {
        matches!(
            self,
            Command::Play
                | Command::Pause
                | Command::TogglePlayPause
                | Command::Stop
                | Command::ToggleMute
                | Command::SetSpeed(_)
                | Command::SeekStart
                | Command::SeekEnd(_)
                | Command::Interact
        )
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            Command::Initialize(_) => "initialize",
            Command::Reinitialize => "reinitialize",
            Command::Play => "play",
            Command::Pause => "pause",
            Command::TogglePlayPause => "toggle_play_pause",
            Command::Stop => "stop",
            Command::ToggleMute => "toggle_mute",
            Command::SetSpeed(_) => "set_speed",
            Command::SeekStart => "seek_start",
            Command::SeekEnd(_) => "seek_end",
            Command::ToggleFullscreen => "toggle_fullscreen",
            Command::Interact => "interact",
            Command::ViewAppeared => "view_appeared",
            Command::ViewDisappeared => "view_disappeared",
            Command::Snapshot(_) => "snapshot",
            Command::Dispose(_) => "dispose",
        }
    }
}

/// Completions posted back to the actor by its own timers and seek waiters.
#[derive(Debug)]
pub(crate) enum Internal {
    TimerFired { kind: TimerKind, generation: u64 },
    SeekSettled { seq: u64, target: f64, finished: bool },
}
