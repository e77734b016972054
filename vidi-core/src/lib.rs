//! # Vidi Core
//!
//! Playback controller for a single video: the session state machine, seek
//! coordination, controls auto-hide and the fullscreen/orientation policy.
//! Decoding and rendering are delegated to a host supplied [`MediaEngine`].
//!
//! ## Overview
//!
//! - **Controller**: [`PlaybackController`] is a handle to an actor task that
//!   owns the [`PlayerSession`] and applies commands one at a time
//! - **Time sync**: engine position ticks feed the session, suspended while a
//!   seek is in flight; only the latest seek confirmation is applied
//! - **Controls**: the overlay fades out after a period without interaction
//!   while playing, and is forced visible while paused or failed
//! - **Orientation**: fullscreen requests a landscape lock and holds the
//!   controls visible until the rotation has settled
//!
//! ## Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use vidi_core::{MediaEngine, PlaybackController, PlayerConfig};
//! use vidi_core::vidi_model::VideoItem;
//!
//! async fn open(engine: Arc<dyn MediaEngine>) -> Result<(), Box<dyn std::error::Error>> {
//!     let item = VideoItem::from_url("Big Buck Bunny", "https://example.com/bbb.mp4")?;
//!     let controller = PlaybackController::builder(PlayerConfig::default())
//!         .engine(engine)
//!         .item(item)
//!         .spawn();
//!
//!     controller.view_appeared()?;
//!     let mut snapshots = controller.subscribe_snapshot();
//!     while !snapshots.borrow_and_update().state.is_ready() {
//!         snapshots.changed().await?;
//!     }
//!     controller.play()?;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]

/// Notification fan-out to observers
pub mod bus;

/// Player configuration and loading helpers
pub mod config;

/// Actor-backed playback controller
pub mod controller;

/// Auto-hide policy for the controls overlay
pub mod controls;

/// Contract for the external decode/render engine
pub mod engine;

/// Error types
pub mod error;

/// Fullscreen and device orientation coupling
pub mod orientation;

/// Mutable per-session playback state
pub mod session;

pub mod time_sync;

/// Restartable delayed actions
pub mod timer;

pub use bus::{NotificationBus, PlayerNotification};
pub use config::{PlayerConfig, PlayerConfigSource};
pub use controller::{PlaybackController, PlaybackControllerBuilder};
pub use controls::ControlsVisibilityScheduler;
pub use engine::{
    EngineEvent, EngineHandle, EngineSession, EngineStatus, HandleOptions, MediaEngine,
    SeekCompletion,
};
pub use error::{EngineError, PlayerError, Result};
pub use orientation::{NoopOrientation, OrientationCoordinator, OrientationPort};
pub use session::{PlayerSession, SeekSettlement};
pub use time_sync::{DurationOutcome, TickOutcome, TimeSync};
pub use timer::{TimerKind, TimerSlot};

pub use vidi_model;
