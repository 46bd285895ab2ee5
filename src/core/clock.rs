//! Millisecond time source for feeding the engine.
//!
//! The selector never reads time on its own; every call takes a timestamp.
//! The host reads this clock once per event or frame and passes the value in.

use std::time::Instant;

/// Monotonic milliseconds since construction.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    pub fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}
