mod support;

use std::time::Duration;

use support::{FakeEngine, Harness};
use vidi_core::vidi_model::{ControlsVisibility, PlaybackState};
use vidi_core::{PlayerConfig, PlayerNotification};

async fn controls_now(h: &Harness) -> ControlsVisibility {
    h.snapshot().await;
    h.controller.controls()
}

#[tokio::test(start_paused = true)]
async fn controls_fade_after_idle_playback() {
    let h = Harness::new();
    h.ready_playing().await;
    assert_eq!(controls_now(&h).await, ControlsVisibility::visible());

    tokio::time::sleep(Duration::from_millis(2_900)).await;
    assert_eq!(controls_now(&h).await.opacity, 1.0);

    tokio::time::sleep(Duration::from_millis(200)).await;
    let controls = controls_now(&h).await;
    assert_eq!(controls.opacity, 0.0);
    assert_eq!(controls.transition, Some(Duration::from_millis(300)));
    assert!(!controls.interactive);
}

#[tokio::test(start_paused = true)]
async fn interaction_restarts_the_countdown() {
    let h = Harness::new();
    h.ready_playing().await;

    tokio::time::sleep(Duration::from_secs(1)).await;
    h.controller.interact().unwrap();
    h.snapshot().await;

    // The original deadline passes without hiding.
    tokio::time::sleep(Duration::from_millis(2_500)).await;
    assert_eq!(controls_now(&h).await.opacity, 1.0);

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(controls_now(&h).await.opacity, 0.0);
}

#[tokio::test(start_paused = true)]
async fn controls_never_hide_while_paused() {
    let h = Harness::new();
    h.ready_paused().await;
    h.controller.interact().unwrap();
    h.controller.view_appeared().unwrap();

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(controls_now(&h).await, ControlsVisibility::visible());
}

#[tokio::test(start_paused = true)]
async fn pausing_brings_hidden_controls_back() {
    let h = Harness::new();
    h.ready_playing().await;
    tokio::time::sleep(Duration::from_millis(3_100)).await;
    assert!(controls_now(&h).await.is_mostly_hidden());

    h.controller.pause().unwrap();
    assert_eq!(controls_now(&h).await, ControlsVisibility::visible());
    assert_eq!(h.controller.current().state, PlaybackState::Paused);
}

#[tokio::test(start_paused = true)]
async fn failure_forces_controls_visible() {
    let h = Harness::new();
    h.ready_playing().await;
    tokio::time::sleep(Duration::from_millis(3_100)).await;

    h.engine.emit(vidi_core::EngineEvent::StatusChanged(
        vidi_core::EngineStatus::Failed("Error loading video".into()),
    ));
    support::settle().await;
    assert_eq!(controls_now(&h).await, ControlsVisibility::visible());
}

#[tokio::test(start_paused = true)]
async fn hide_delay_is_configurable() {
    let config = PlayerConfig {
        hide_delay_ms: 1_000,
        fade_duration_ms: 150,
        ..PlayerConfig::default()
    };
    let h = Harness::with_config(FakeEngine::new(), config);
    h.ready_playing().await;

    tokio::time::sleep(Duration::from_millis(1_100)).await;
    let controls = controls_now(&h).await;
    assert_eq!(controls.opacity, 0.0);
    assert_eq!(controls.transition, Some(Duration::from_millis(150)));
}

#[tokio::test(start_paused = true)]
async fn observers_receive_each_change_once() {
    let h = Harness::new();
    let mut notifications = h.controller.subscribe();
    h.ready_playing().await;
    tokio::time::sleep(Duration::from_millis(3_100)).await;
    h.snapshot().await;

    let mut states = Vec::new();
    let mut hidden = 0;
    while let Ok(notification) = notifications.try_recv() {
        match notification {
            PlayerNotification::Session(snapshot) => {
                if states.last() != Some(&snapshot.state) {
                    states.push(snapshot.state);
                }
            }
            PlayerNotification::Controls(controls) if controls.opacity == 0.0 => hidden += 1,
            PlayerNotification::Controls(_) => {}
        }
    }

    assert_eq!(
        states,
        vec![
            PlaybackState::Loading,
            PlaybackState::Paused,
            PlaybackState::Playing
        ]
    );
    assert_eq!(hidden, 1);
}

#[tokio::test(start_paused = true)]
async fn snapshot_watch_tracks_latest_state() {
    let h = Harness::new();
    let mut snapshots = h.controller.subscribe_snapshot();
    h.controller.view_appeared().unwrap();

    snapshots.changed().await.unwrap();
    assert_eq!(snapshots.borrow_and_update().state, PlaybackState::Loading);

    h.engine.resolve_duration(42.0);
    snapshots.changed().await.unwrap();
    let latest = snapshots.borrow_and_update().clone();
    assert_eq!(latest.state, PlaybackState::Paused);
    assert_eq!(latest.duration, 42.0);
}
