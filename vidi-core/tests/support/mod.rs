//! Shared harness for controller integration tests.
#![allow(dead_code, unused_imports)]

pub mod engine;
pub mod orientation;

use std::sync::Arc;
use std::time::Duration;

use vidi_core::{PlaybackController, PlayerConfig};
use vidi_core::vidi_model::{SessionSnapshot, VideoItem};

pub use engine::{EngineCall, FakeEngine};
pub use orientation::RecordingOrientation;

/// Duration reported by the fake engine for the sample asset, in seconds.
pub const SAMPLE_DURATION: f64 = 130.0;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn sample_item() -> VideoItem {
    VideoItem::from_url("Big Buck Bunny", "https://example.com/bbb.mp4").expect("valid url")
}

/// Lets spawned tasks drain their queues. Under a paused clock this only
/// advances virtual time by a millisecond.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

pub struct Harness {
    pub controller: PlaybackController,
    pub engine: Arc<FakeEngine>,
    pub orientation: Arc<RecordingOrientation>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_engine(FakeEngine::new())
    }

    pub fn with_engine(engine: Arc<FakeEngine>) -> Self {
        Self::with_config(engine, PlayerConfig::default())
    }

    pub fn with_config(engine: Arc<FakeEngine>, config: PlayerConfig) -> Self {
        init_tracing();
        let orientation = Arc::new(RecordingOrientation::default());
        let controller = PlaybackController::builder(config)
            .engine(engine.clone())
            .orientation(orientation.clone())
            .item(sample_item())
            .spawn();
        Self {
            controller,
            engine,
            orientation,
        }
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.controller.snapshot().await.expect("controller alive")
    }

    /// Appears, resolves the sample duration and waits for `Paused`.
    pub async fn ready_paused(&self) -> SessionSnapshot {
        self.controller.view_appeared().expect("controller alive");
        settle().await;
        self.engine.resolve_duration(SAMPLE_DURATION);
        settle().await;
        self.snapshot().await
    }

    pub async fn ready_playing(&self) -> SessionSnapshot {
        self.ready_paused().await;
        self.controller.play().expect("controller alive");
        self.snapshot().await
    }
}
