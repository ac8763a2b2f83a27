/// Throttle that records requested delays instead of sleeping.
use std::cell::RefCell;
use std::time::Duration;

use super::Throttle;

#[derive(Default)]
pub struct RecordingThrottle {
    waits: RefCell<Vec<Duration>>,
}

impl RecordingThrottle {
    pub fn waits(&self) -> Vec<Duration> {
        self.waits.borrow().clone()
    }
}

impl Throttle for RecordingThrottle {
    fn wait(&self, delay: Duration) {
        self.waits.borrow_mut().push(delay);
    }
}
