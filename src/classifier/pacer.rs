//! Rate control toward the shared inference service.

use std::time::Duration;

/// Called once after every inference call, whatever its outcome.
pub trait Pacer: Send + Sync {
    fn after_call(&self);
}

/// Sleeps for a fixed delay after each call.
///
/// With one call in flight at a time this caps the request rate at
/// `1 / (call duration + delay)`.
#[derive(Debug, Clone)]
pub struct FixedDelayPacer {
    delay: Duration,
}

impl FixedDelayPacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for FixedDelayPacer {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl Pacer for FixedDelayPacer {
    fn after_call(&self) {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
    }
}
