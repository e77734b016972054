//! Core data model definitions shared across vidi crates.
//!
//! Everything in here is plain data: the playback state machine's states,
//! the snapshot the controller publishes after each mutation, and the media
//! item/locator types handed to the controller by its host.
#![allow(missing_docs)]

pub mod error;
pub mod media;
pub mod playback;
pub mod snapshot;
pub mod time;

// Intentionally curated re-exports for downstream consumers.
pub use error::{ModelError, Result as ModelResult};
pub use media::{MediaLocator, VideoItem};
pub use playback::{PlaybackSpeed, PlaybackState};
pub use snapshot::{ControlsVisibility, OrientationLock, SessionSnapshot};
pub use time::{format_time, progress_fraction};
