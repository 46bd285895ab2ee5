//! One wheel: motion state, its frame loop, input handling and commit
//! notifications, behind a small imperative API.
//!
//! The host forwards raw input (`drag_*`, `wheel_impulse`), calls
//! [`Selector::frame`] once per repaint while [`Selector::needs_frame`] is
//! true, and reads `active_float` for drawing.  Subscribers always hear about
//! the discrete index once motion settles, and about every change in between
//! if they ask for live updates.

use std::fmt;

use thiserror::Error;

use super::input::{self, DragTracker};
use super::mapper;
use super::motion::{Mode, MotionState, PhysicsTuning, StepOutcome};
use super::scheduler::{FrameLoop, QuietTimer};

/// Rejected selector configuration.  Nothing is constructed on error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("a wheel needs at least one value")]
    EmptyWheel,
    #[error("step size must be positive and finite, got {0}")]
    InvalidStepSize(f64),
    #[error("snap duration must be a non-negative number of milliseconds, got {0}")]
    InvalidSnapDuration(f64),
    #[error("physics tuning contains a negative or non-finite value")]
    InvalidTuning,
}

/// Construction parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorConfig {
    pub value_count: usize,
    pub step_size: f64,
    /// Starting index; wrapped into range.
    pub initial_index: i64,
    pub snap_ms: f64,
    pub tuning: PhysicsTuning,
}

impl SelectorConfig {
    pub fn new(value_count: usize, step_size: f64) -> Self {
        Self {
            value_count,
            step_size,
            initial_index: 0,
            snap_ms: 180.0,
            tuning: PhysicsTuning::default(),
        }
    }

    pub fn initial_index(mut self, index: i64) -> Self {
        self.initial_index = index;
        self
    }

    pub fn snap_ms(mut self, ms: f64) -> Self {
        self.snap_ms = ms;
        self
    }

    pub fn tuning(mut self, tuning: PhysicsTuning) -> Self {
        self.tuning = tuning;
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.value_count == 0 {
            return Err(ConfigError::EmptyWheel);
        }
        if !(self.step_size.is_finite() && self.step_size > 0.0) {
            return Err(ConfigError::InvalidStepSize(self.step_size));
        }
        validate_snap_ms(self.snap_ms)?;
        if !self.tuning.is_valid() {
            return Err(ConfigError::InvalidTuning);
        }
        Ok(())
    }
}

fn validate_snap_ms(ms: f64) -> Result<(), ConfigError> {
    if ms.is_finite() && ms >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidSnapDuration(ms))
    }
}

/// Which index changes a subscriber wants to hear about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notify {
    /// Only the settled index once motion stops.
    Settled,
    /// Every index change during motion, plus the settled one.
    Live,
}

/// A delivered index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Commit {
    pub index: usize,
    /// `true` when the wheel is at rest on this index.
    pub settled: bool,
}

/// Handle for [`Selector::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscriber {
    id: SubscriptionId,
    notify: Notify,
    callback: Box<dyn FnMut(Commit)>,
}

/// What a call to [`Selector::frame`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// No loop is running; nothing happened.
    Stopped,
    /// Still in motion (or being dragged); keep sending frames.
    Animating,
    /// Came to rest on this index.  The loop has stopped.
    Settled(usize),
}

/// A wheel of `value_count` values on an endless, wrapping axis.
pub struct Selector {
    value_count: usize,
    step_size: f64,
    snap_ms: f64,
    tuning: PhysicsTuning,
    motion: MotionState,
    frames: FrameLoop,
    wheel_quiet: QuietTimer,
    drag: Option<DragTracker>,
    subscribers: Vec<Subscriber>,
    next_subscription: u64,
    haptic: Option<Box<dyn FnMut()>>,
    /// Last index handed to subscribers, for change detection.
    last_reported: usize,
    /// Most recent timestamp seen, substituted for non-finite ones.
    last_seen_ms: f64,
    destroyed: bool,
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selector")
            .field("value_count", &self.value_count)
            .field("step_size", &self.step_size)
            .field("motion", &self.motion)
            .field("frames", &self.frames)
            .field("wheel_quiet", &self.wheel_quiet)
            .field("subscribers", &self.subscribers.len())
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}

impl Selector {
    /// A wheel at rest on `initial_index` with default tuning.
    pub fn new(value_count: usize, step_size: f64, initial_index: i64, snap_ms: f64) -> Result<Self, ConfigError> {
        Self::with_config(
            SelectorConfig::new(value_count, step_size)
                .initial_index(initial_index)
                .snap_ms(snap_ms),
        )
    }

    pub fn with_config(config: SelectorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let start = mapper::wrap_index(config.initial_index, config.value_count);
        Ok(Self {
            value_count: config.value_count,
            step_size: config.step_size,
            snap_ms: config.snap_ms,
            tuning: config.tuning,
            motion: MotionState::at_index(start as i64, config.step_size),
            frames: FrameLoop::new(),
            wheel_quiet: QuietTimer::default(),
            drag: None,
            subscribers: Vec::new(),
            next_subscription: 0,
            haptic: None,
            last_reported: start,
            last_seen_ms: 0.0,
            destroyed: false,
        })
    }

    // ── queries ──────────────────────────────────────────────────

    pub fn position(&self) -> f64 {
        self.motion.position
    }

    pub fn velocity(&self) -> f64 {
        self.motion.velocity
    }

    pub fn mode(&self) -> Mode {
        self.motion.mode
    }

    /// Fractional index under the selection center.
    pub fn active_float(&self) -> f64 {
        mapper::active_float(self.motion.position, self.step_size)
    }

    /// Nearest index, wrapped into `[0, value_count)`.
    pub fn active_index(&self) -> usize {
        mapper::active_index(self.motion.position, self.step_size, self.value_count)
    }

    pub fn value_count(&self) -> usize {
        self.value_count
    }

    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    pub fn snap_ms(&self) -> f64 {
        self.snap_ms
    }

    /// `true` while the host should keep calling [`frame`](Self::frame).
    pub fn needs_frame(&self) -> bool {
        !self.destroyed && self.frames.is_running()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    // ── configuration ────────────────────────────────────────────

    /// Change the snap duration.  A snap already in flight picks up the new
    /// duration on its next frame.
    pub fn set_snap_ms(&mut self, ms: f64) -> Result<(), ConfigError> {
        validate_snap_ms(ms)?;
        self.snap_ms = ms;
        Ok(())
    }

    // ── subscriptions ────────────────────────────────────────────

    pub fn on_index_committed<F>(&mut self, notify: Notify, callback: F) -> SubscriptionId
    where
        F: FnMut(Commit) + 'static,
    {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        if self.alive("on_index_committed") {
            self.subscribers.push(Subscriber {
                id,
                notify,
                callback: Box::new(callback),
            });
        }
        id
    }

    /// Returns `false` if the id was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    /// Side effect run synchronously by [`set_index`](Self::set_index).
    pub fn on_haptic<F>(&mut self, callback: F)
    where
        F: FnMut() + 'static,
    {
        if self.alive("on_haptic") {
            self.haptic = Some(Box::new(callback));
        }
    }

    // ── pointer drag ─────────────────────────────────────────────

    /// Grab the wheel.  Interrupts any inertia or snap in flight.
    pub fn drag_start(&mut self, coord: f64, time_ms: f64) {
        if !self.alive("drag_start") {
            return;
        }
        let time_ms = self.observe(time_ms);
        let Some(tracker) = DragTracker::start(coord, time_ms) else {
            tracing::debug!(coord, "drag_start with unusable coordinate ignored");
            return;
        };

        self.wheel_quiet.cancel();
        self.motion.velocity = 0.0;
        self.motion.mode = Mode::Dragging;
        self.drag = Some(tracker);
        // Frames keep coming during the drag so the host repaints.
        self.frames.start();
        tracing::debug!(position = self.motion.position, "drag start");
    }

    /// Pointer moved to `coord`.  The delta is applied to the position
    /// directly; the stepper stays out of it while dragging.
    pub fn drag_move(&mut self, coord: f64, time_ms: f64) {
        if !self.alive("drag_move") || self.motion.mode != Mode::Dragging {
            return;
        }
        let time_ms = self.observe(time_ms);
        let Some(tracker) = self.drag.as_mut() else {
            return;
        };
        if let Some(step) = tracker.advance(coord, time_ms, &self.tuning) {
            self.motion.position += step.delta;
            self.motion.velocity = step.velocity;
            self.report_live();
        }
    }

    /// Let go.  A slow release snaps at once; a flick coasts first.
    pub fn drag_end(&mut self, time_ms: f64) {
        if !self.alive("drag_end") || self.motion.mode != Mode::Dragging {
            return;
        }
        let time_ms = self.observe(time_ms);
        let velocity = self
            .drag
            .take()
            .map(|tracker| tracker.release_velocity(self.motion.velocity, time_ms, &self.tuning))
            .unwrap_or(0.0);

        self.motion.velocity = velocity;
        self.motion.mode = Mode::Idle;
        if velocity.abs() < self.tuning.release_speed {
            self.motion.begin_snap(self.step_size);
        } else {
            self.motion.mode = Mode::Inertial;
        }
        self.frames.resume();
        tracing::debug!(velocity, mode = ?self.motion.mode, "drag end");
    }

    // ── wheel / scroll ───────────────────────────────────────────

    /// A discrete scroll step of `delta` position units.  Ignored while
    /// dragging.
    pub fn wheel_impulse(&mut self, delta: f64, time_ms: f64) {
        if !self.alive("wheel_impulse") || self.motion.mode == Mode::Dragging {
            return;
        }
        let time_ms = self.observe(time_ms);
        if !delta.is_finite() {
            tracing::debug!(delta, "wheel impulse with unusable delta ignored");
            return;
        }

        self.motion.position += delta;
        self.motion.velocity = input::wheel_velocity(delta, &self.tuning);
        self.motion.mode = Mode::Inertial;
        self.frames.resume();
        self.wheel_quiet.arm(time_ms, self.tuning.wheel_quiet_ms);
        self.report_live();
    }

    // ── direct commit ────────────────────────────────────────────

    /// Jump to `index` (wrapped) with no animation.  Cancels everything in
    /// flight and commits synchronously.
    pub fn set_index(&mut self, index: i64) {
        if !self.alive("set_index") {
            return;
        }
        self.halt();
        let wrapped = mapper::wrap_index(index, self.value_count);
        self.motion = MotionState::at_index(wrapped as i64, self.step_size);
        tracing::debug!(index, wrapped, "set_index");

        if let Some(haptic) = self.haptic.as_mut() {
            haptic();
        }
        self.last_reported = wrapped;
        self.notify(Commit {
            index: wrapped,
            settled: true,
        });
    }

    // ── frame loop ───────────────────────────────────────────────

    /// Advance one frame at `now_ms`.  Call once per repaint while
    /// [`needs_frame`](Self::needs_frame) holds.
    pub fn frame(&mut self, now_ms: f64) -> FrameOutcome {
        if self.destroyed {
            return FrameOutcome::Stopped;
        }
        let now_ms = self.observe(now_ms);
        let Some(dt_ms) = self.frames.tick(now_ms) else {
            return FrameOutcome::Stopped;
        };

        let outcome = self
            .motion
            .step(dt_ms, self.step_size, self.snap_ms, &self.tuning);
        match outcome {
            StepOutcome::Settled => return self.settle(),
            StepOutcome::Unchanged if self.motion.mode == Mode::Idle => {
                self.frames.stop();
                return FrameOutcome::Stopped;
            }
            _ => {}
        }

        if self.wheel_quiet.take_if_due(now_ms) && self.motion.mode == Mode::Inertial {
            tracing::debug!(position = self.motion.position, "wheel quiet, forcing snap");
            self.motion.begin_snap(self.step_size);
        }

        self.report_live();
        FrameOutcome::Animating
    }

    // ── teardown ─────────────────────────────────────────────────

    /// Release the frame loop, timers and subscribers.  Idempotent.  Every
    /// later call on this selector is a no-op.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.halt();
        self.motion.velocity = 0.0;
        self.subscribers.clear();
        self.haptic = None;
        self.destroyed = true;
        tracing::debug!(position = self.motion.position, "selector destroyed");
    }

    // ── internals ────────────────────────────────────────────────

    fn alive(&self, op: &'static str) -> bool {
        if self.destroyed {
            tracing::debug!(op, "ignored on destroyed selector");
        }
        !self.destroyed
    }

    /// Remember a usable timestamp, or substitute the last one.
    fn observe(&mut self, time_ms: f64) -> f64 {
        if time_ms.is_finite() {
            self.last_seen_ms = time_ms;
        }
        self.last_seen_ms
    }

    fn halt(&mut self) {
        self.frames.stop();
        self.wheel_quiet.cancel();
        self.drag = None;
    }

    fn settle(&mut self) -> FrameOutcome {
        self.frames.stop();
        self.wheel_quiet.cancel();
        let index = self.active_index();
        tracing::debug!(index, position = self.motion.position, "settled");
        self.last_reported = index;
        self.notify(Commit {
            index,
            settled: true,
        });
        FrameOutcome::Settled(index)
    }

    fn report_live(&mut self) {
        let index = self.active_index();
        if index == self.last_reported {
            return;
        }
        self.last_reported = index;
        self.notify(Commit {
            index,
            settled: false,
        });
    }

    fn notify(&mut self, commit: Commit) {
        for sub in &mut self.subscribers {
            if commit.settled || sub.notify == Notify::Live {
                (sub.callback)(commit);
            }
        }
    }
}

impl Drop for Selector {
    fn drop(&mut self) {
        self.destroy();
    }
}
