//! Coordination between a driver loop and its controller.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative stop flag shared between a tester and whoever drives it.
///
/// Checked only between whole passes; a pass in progress always finishes.
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    stopped: Arc<AtomicBool>,
}

impl StopSignal {
    /// Creates a signal that has not been raised.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the signal for every clone.
    pub fn request_stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    /// Returns true once any clone has requested a stop.
    pub fn should_stop(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}
