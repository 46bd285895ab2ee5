//! Frame-loop ownership and the wheel debounce timer.
//!
//! The host owns the real frame pacing (a tokio interval in this app); these
//! types only decide *whether* a selector wants frames and how much time has
//! passed between them.  Both take timestamps as arguments and never read a
//! clock themselves.

/// Identifies one run of a [`FrameLoop`].  Bumped on every `start`, so a
/// caller holding an old id can tell that its loop was replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoopId(u64);

#[derive(Debug, Clone, Copy, PartialEq)]
enum LoopState {
    Stopped,
    Running {
        id: LoopId,
        /// `None` until the first tick of this run.
        last_tick_ms: Option<f64>,
    },
}

/// At most one repaint loop per selector.
///
/// `start` always replaces whatever was running; there is no way to hold
/// two runs at once.
#[derive(Debug, Clone)]
pub struct FrameLoop {
    state: LoopState,
    generation: u64,
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Stopped,
            generation: 0,
        }
    }

    /// Start a fresh run, cancelling any previous one.
    pub fn start(&mut self) -> LoopId {
        if let LoopState::Running { id, .. } = self.state {
            tracing::trace!(replaced = id.0, "frame loop restart");
        }
        self.generation = self.generation.wrapping_add(1);
        let id = LoopId(self.generation);
        self.state = LoopState::Running {
            id,
            last_tick_ms: None,
        };
        id
    }

    /// Keep the current run if there is one, otherwise start a new one.
    /// Unlike [`start`](Self::start) this preserves the tick baseline, so
    /// rapid re-triggers don't zero out the elapsed time of every frame.
    pub fn resume(&mut self) -> LoopId {
        match self.state {
            LoopState::Running { id, .. } => id,
            LoopState::Stopped => self.start(),
        }
    }

    /// Stop the current run.  Safe to call when already stopped.
    pub fn stop(&mut self) {
        if let LoopState::Running { id, .. } = self.state {
            tracing::trace!(id = id.0, "frame loop stop");
        }
        self.state = LoopState::Stopped;
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, LoopState::Running { .. })
    }

    /// Id of the current run, if any.
    pub fn current(&self) -> Option<LoopId> {
        match self.state {
            LoopState::Running { id, .. } => Some(id),
            LoopState::Stopped => None,
        }
    }

    /// Record a frame at `now_ms` and return the elapsed time since the
    /// previous one.  The first frame of a run reports zero.  A clock that
    /// steps backwards also reports zero.  Returns `None` when stopped.
    pub fn tick(&mut self, now_ms: f64) -> Option<f64> {
        let LoopState::Running { id, last_tick_ms } = self.state else {
            return None;
        };
        if !now_ms.is_finite() {
            return Some(0.0);
        }
        let dt = match last_tick_ms {
            Some(last) => (now_ms - last).max(0.0),
            None => 0.0,
        };
        self.state = LoopState::Running {
            id,
            last_tick_ms: Some(now_ms),
        };
        Some(dt)
    }
}

/// Single-shot deadline that re-arms on every new impulse.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct QuietTimer {
    deadline_ms: Option<f64>,
}

impl QuietTimer {
    /// (Re)arm to fire `window_ms` after `now_ms`.
    pub fn arm(&mut self, now_ms: f64, window_ms: f64) {
        self.deadline_ms = Some(now_ms + window_ms);
    }

    pub fn cancel(&mut self) {
        self.deadline_ms = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline_ms.is_some()
    }

    pub fn deadline(&self) -> Option<f64> {
        self.deadline_ms
    }

    /// Consume the deadline if it has passed.  Fires at most once per arm.
    pub fn take_if_due(&mut self, now_ms: f64) -> bool {
        match self.deadline_ms {
            Some(deadline) if now_ms >= deadline => {
                self.deadline_ms = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_is_zero() {
        let mut frames = FrameLoop::new();
        frames.start();
        assert_eq!(frames.tick(5000.0), Some(0.0));
        assert_eq!(frames.tick(5016.0), Some(16.0));
        assert_eq!(frames.tick(5040.0), Some(24.0));
    }

    #[test]
    fn stopped_loop_does_not_tick() {
        let mut frames = FrameLoop::new();
        assert_eq!(frames.tick(10.0), None);
        frames.start();
        frames.stop();
        frames.stop();
        assert!(!frames.is_running());
        assert_eq!(frames.tick(20.0), None);
    }

    #[test]
    fn restart_replaces_previous_run() {
        let mut frames = FrameLoop::new();
        let first = frames.start();
        frames.tick(100.0);
        let second = frames.start();
        assert_ne!(first, second);
        assert_eq!(frames.current(), Some(second));
        // Restart resets the baseline, so no jump from the old run's timestamps.
        assert_eq!(frames.tick(900.0), Some(0.0));
    }

    #[test]
    fn resume_keeps_the_running_baseline() {
        let mut frames = FrameLoop::new();
        let id = frames.resume();
        frames.tick(100.0);
        assert_eq!(frames.resume(), id);
        assert_eq!(frames.tick(116.0), Some(16.0));
    }

    #[test]
    fn backwards_clock_reports_zero() {
        let mut frames = FrameLoop::new();
        frames.start();
        frames.tick(100.0);
        assert_eq!(frames.tick(90.0), Some(0.0));
        assert_eq!(frames.tick(f64::NAN), Some(0.0));
    }

    #[test]
    fn quiet_timer_rearms_and_fires_once() {
        let mut timer = QuietTimer::default();
        timer.arm(0.0, 80.0);
        assert!(!timer.take_if_due(50.0));
        timer.arm(50.0, 80.0);
        assert!(!timer.take_if_due(100.0));
        assert!(timer.take_if_due(130.0));
        assert!(!timer.take_if_due(200.0));
        assert!(!timer.is_armed());
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut timer = QuietTimer::default();
        timer.arm(0.0, 80.0);
        timer.cancel();
        assert!(!timer.take_if_due(1_000.0));
        assert_eq!(timer.deadline(), None);
    }
}
