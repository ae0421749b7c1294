//! Global step counter controlling the training horizon and the
//! logging/testing cadence.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crate::config::CounterConfig;

/// Step counter read by the scheduler and advanced by the rollout engine.
pub trait StepCounter {
    /// Advances the counter by one and returns the new global step.
    fn next(&self) -> u64;

    fn cur_step(&self) -> u64;

    fn should_log(&self) -> bool;

    /// Returns true once every test interval; firing consumes the interval.
    fn should_test(&self) -> bool;

    fn should_stop(&self) -> bool;
}

impl<C: StepCounter + ?Sized> StepCounter for &C {
    fn next(&self) -> u64 {
        (**self).next()
    }

    fn cur_step(&self) -> u64 {
        (**self).cur_step()
    }

    fn should_log(&self) -> bool {
        (**self).should_log()
    }

    fn should_test(&self) -> bool {
        (**self).should_test()
    }

    fn should_stop(&self) -> bool {
        (**self).should_stop()
    }
}

impl<C: StepCounter + ?Sized> StepCounter for Arc<C> {
    fn next(&self) -> u64 {
        (**self).next()
    }

    fn cur_step(&self) -> u64 {
        (**self).cur_step()
    }

    fn should_log(&self) -> bool {
        (**self).should_log()
    }

    fn should_test(&self) -> bool {
        (**self).should_test()
    }

    fn should_stop(&self) -> bool {
        (**self).should_stop()
    }
}

/// Monotonic step counter with interval-based test and log cadence.
///
/// Safe to share between a training loop and an online tester through an
/// `Arc`; only [`StepCounter::next`] writes the step.
#[derive(Debug)]
pub struct GlobalCounter {
    cur_step: AtomicU64,
    cur_test_step: AtomicU64,
    stop: AtomicBool,
    total_step: u64,
    test_interval: u64,
    log_interval: u64,
}

impl GlobalCounter {
    pub fn new(config: &CounterConfig) -> Self {
        Self {
            cur_step: AtomicU64::new(0),
            cur_test_step: AtomicU64::new(0),
            stop: AtomicBool::new(false),
            total_step: config.total_step,
            test_interval: config.test_interval,
            log_interval: config.log_interval,
        }
    }

    /// Forces [`StepCounter::should_stop`] to return true.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    pub fn total_step(&self) -> u64 {
        self.total_step
    }
}

impl StepCounter for GlobalCounter {
    fn next(&self) -> u64 {
        self.cur_step.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn cur_step(&self) -> u64 {
        self.cur_step.load(Ordering::SeqCst)
    }

    fn should_log(&self) -> bool {
        self.log_interval > 0 && self.cur_step() % self.log_interval == 0
    }

    fn should_test(&self) -> bool {
        let cur = self.cur_step();
        let last = self.cur_test_step.load(Ordering::SeqCst);
        if cur.saturating_sub(last) < self.test_interval {
            return false;
        }
        // Only one caller may consume a given interval.
        self.cur_test_step
            .compare_exchange(last, cur, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    fn should_stop(&self) -> bool {
        self.cur_step() >= self.total_step || self.stop.load(Ordering::SeqCst)
    }
}
