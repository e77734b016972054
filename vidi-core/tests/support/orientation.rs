use parking_lot::Mutex;
use vidi_core::OrientationPort;
use vidi_core::vidi_model::OrientationLock;

/// Orientation port that remembers every lock it was asked for.
#[derive(Debug, Default)]
pub struct RecordingOrientation {
    locks: Mutex<Vec<OrientationLock>>,
}

impl RecordingOrientation {
    pub fn locks(&self) -> Vec<OrientationLock> {
        self.locks.lock().clone()
    }

    pub fn last(&self) -> Option<OrientationLock> {
        self.locks.lock().last().copied()
    }
}

impl OrientationPort for RecordingOrientation {
    fn request_lock(&self, lock: OrientationLock) {
        self.locks.lock().push(lock);
    }
}
