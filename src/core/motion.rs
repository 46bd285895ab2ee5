//! Motion state and the physics stepper.
//!
//! A wheel is a single scalar `position` plus a `velocity`.  While the user
//! drags, the input path owns the position and the stepper does nothing.
//! After release (or a wheel impulse) the stepper takes over: exponential
//! friction bleeds off velocity, and once the wheel is slow enough an eased
//! snap carries it onto the nearest grid line.

use super::easing::SNAP_EASE;
use super::mapper;

/// What is currently driving the position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mode {
    /// At rest on a grid line.  Nothing is scheduled.
    Idle,
    /// The pointer owns the position; the stepper is a no-op.
    Dragging,
    /// Free deceleration under friction.
    Inertial,
    /// Eased transition onto a grid line.
    Snapping(SnapPlan),
}

/// An in-flight snap.  Only exists inside [`Mode::Snapping`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapPlan {
    pub origin: f64,
    pub target: f64,
    /// Time spent snapping so far.
    pub elapsed_ms: f64,
}

/// Every tunable constant of the stepper and input paths.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsTuning {
    /// Upper bound on the dt fed to inertia, so a hitch can't fling the wheel.
    pub max_frame_dt_ms: f64,
    /// Friction at rest speed (1/s).
    pub friction_base: f64,
    /// Extra friction added at `reference_speed` and above.
    pub friction_speed_gain: f64,
    /// Speed at which friction saturates (units/s).
    pub reference_speed: f64,
    /// Inertia below this speed hands over to a snap (units/s).
    pub settle_speed: f64,
    /// A drag released slower than this snaps straight away (units/s).
    pub release_speed: f64,
    /// Floor for the elapsed time between two drag samples.
    pub min_sample_dt_ms: f64,
    /// Drag velocity spike clamp (units/s).
    pub max_drag_speed: f64,
    /// Holding still longer than this before release zeroes the fling.
    pub drag_hold_ms: f64,
    /// Wheel delta → velocity multiplier (1/s).
    pub wheel_gain: f64,
    /// Clamp for wheel-derived velocity (units/s).
    pub max_wheel_speed: f64,
    /// Quiet window after the last wheel impulse before a forced snap.
    pub wheel_quiet_ms: f64,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            max_frame_dt_ms: 50.0,
            friction_base: 10.0,
            friction_speed_gain: 14.0,
            reference_speed: 2200.0,
            settle_speed: 18.0,
            release_speed: 120.0,
            min_sample_dt_ms: 1.0,
            max_drag_speed: 8000.0,
            drag_hold_ms: 100.0,
            wheel_gain: 14.0,
            max_wheel_speed: 3200.0,
            wheel_quiet_ms: 80.0,
        }
    }
}

impl PhysicsTuning {
    /// Friction coefficient for the current speed, heavier when fast.
    pub fn friction(&self, speed: f64) -> f64 {
        let norm = (speed.abs() / self.reference_speed).clamp(0.0, 1.0);
        self.friction_base + self.friction_speed_gain * norm
    }

    /// `true` when every value is finite and the ones that must be positive are.
    pub fn is_valid(&self) -> bool {
        let all = [
            self.max_frame_dt_ms,
            self.friction_base,
            self.friction_speed_gain,
            self.reference_speed,
            self.settle_speed,
            self.release_speed,
            self.min_sample_dt_ms,
            self.max_drag_speed,
            self.drag_hold_ms,
            self.wheel_gain,
            self.max_wheel_speed,
            self.wheel_quiet_ms,
        ];
        all.iter().all(|v| v.is_finite() && *v >= 0.0)
            && self.friction_base > 0.0
            && self.reference_speed > 0.0
            && self.min_sample_dt_ms > 0.0
            && self.max_frame_dt_ms > 0.0
    }
}

/// Result of one stepper invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Nothing to do while idle or dragging.
    Unchanged,
    /// Position moved and motion continues.
    Moving,
    /// Inertia slowed enough and a snap has begun.
    SnapStarted,
    /// The snap finished this step.  Position is exactly on the grid.
    Settled,
}

/// The physical memory of one wheel.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionState {
    pub position: f64,
    /// Units per second.  Meaningless while dragging.
    pub velocity: f64,
    pub mode: Mode,
}

impl MotionState {
    /// At rest on grid index `index`.
    pub fn at_index(index: i64, step_size: f64) -> Self {
        Self {
            position: index as f64 * step_size,
            velocity: 0.0,
            mode: Mode::Idle,
        }
    }

    /// Begin an eased snap from here to the nearest grid line.
    pub fn begin_snap(&mut self, step_size: f64) {
        let target = mapper::snap_target(self.position, step_size);
        tracing::trace!(origin = self.position, target, "snap begin");
        self.velocity = 0.0;
        self.mode = Mode::Snapping(SnapPlan {
            origin: self.position,
            target,
            elapsed_ms: 0.0,
        });
    }

    /// Advance by `dt_ms` of wall-clock time.
    ///
    /// Inertia integrates with `dt` clamped to `max_frame_dt_ms`; the snap
    /// uses the raw elapsed time so its duration stays true under hitches.
    pub fn step(
        &mut self,
        dt_ms: f64,
        step_size: f64,
        snap_ms: f64,
        tuning: &PhysicsTuning,
    ) -> StepOutcome {
        let dt_ms = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };

        match self.mode {
            Mode::Idle | Mode::Dragging => StepOutcome::Unchanged,
            Mode::Inertial => self.step_inertia(dt_ms, step_size, tuning),
            Mode::Snapping(plan) => self.step_snap(plan, dt_ms, snap_ms),
        }
    }

    fn step_inertia(&mut self, dt_ms: f64, step_size: f64, tuning: &PhysicsTuning) -> StepOutcome {
        if self.velocity.abs() < tuning.settle_speed {
            self.begin_snap(step_size);
            return StepOutcome::SnapStarted;
        }

        let dt = dt_ms.min(tuning.max_frame_dt_ms) / 1000.0;
        let decay = (-tuning.friction(self.velocity) * dt).exp();
        self.velocity *= decay;
        self.position += self.velocity * dt;

        if self.velocity.abs() < tuning.settle_speed {
            self.begin_snap(step_size);
            return StepOutcome::SnapStarted;
        }
        StepOutcome::Moving
    }

    fn step_snap(&mut self, mut plan: SnapPlan, dt_ms: f64, snap_ms: f64) -> StepOutcome {
        plan.elapsed_ms += dt_ms;
        let progress = if snap_ms > 0.0 {
            (plan.elapsed_ms / snap_ms).clamp(0.0, 1.0)
        } else {
            1.0
        };

        if progress >= 1.0 {
            // Land exactly; no accumulated float drift survives a settle.
            self.position = plan.target;
            self.velocity = 0.0;
            self.mode = Mode::Idle;
            return StepOutcome::Settled;
        }

        let eased = SNAP_EASE.solve(progress);
        self.position = plan.origin + (plan.target - plan.origin) * eased;
        self.mode = Mode::Snapping(plan);
        StepOutcome::Moving
    }
}
