use tokio::sync::{broadcast, watch};
use vidi_model::{ControlsVisibility, SessionSnapshot};

/// Outbound notification fanned out to every subscriber of a controller.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerNotification {
    Session(SessionSnapshot),
    Controls(ControlsVisibility),
}

/// In-process fan-out of controller notifications.
///
/// Late joiners read the latest values from the `watch` side; observers that
/// need every change subscribe to the broadcast side. Unchanged values are
/// never republished.
#[derive(Debug)]
pub struct NotificationBus {
    sender: broadcast::Sender<PlayerNotification>,
    session: watch::Sender<SessionSnapshot>,
    controls: watch::Sender<ControlsVisibility>,
}

impl NotificationBus {
    pub fn new(
        capacity: usize,
        session: SessionSnapshot,
        controls: ControlsVisibility,
    ) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        let (session, _) = watch::channel(session);
        let (controls, _) = watch::channel(controls);
        Self {
            sender,
            session,
            controls,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlayerNotification> {
        self.sender.subscribe()
    }

    pub fn subscribe_session(&self) -> watch::Receiver<SessionSnapshot> {
        self.session.subscribe()
    }

    pub fn subscribe_controls(&self) -> watch::Receiver<ControlsVisibility> {
        self.controls.subscribe()
    }

    pub(crate) fn sender(&self) -> broadcast::Sender<PlayerNotification> {
        self.sender.clone()
    }

    /// Returns whether `snapshot` differed from the last published one.
    pub fn publish_session(&self, snapshot: SessionSnapshot) -> bool {
        let changed = self.session.send_if_modified(|current| {
            if *current == snapshot {
                return false;
            }
            *current = snapshot.clone();
            true
        });
        if changed {
            // No receivers is fine; the watch side still holds the value.
            let _ = self.sender.send(PlayerNotification::Session(snapshot));
        }
        changed
    }

    pub fn publish_controls(&self, visibility: ControlsVisibility) -> bool {
        let changed = self.controls.send_if_modified(|current| {
            if *current == visibility {
                return false;
            }
            *current = visibility;
            true
        });
        if changed {
            let _ = self.sender.send(PlayerNotification::Controls(visibility));
        }
        changed
    }
}
