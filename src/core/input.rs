//! Pointer and wheel sample conditioning.
//!
//! Raw input arrives with whatever timing the host gives it.  Everything in
//! here turns samples into position deltas and velocities that are safe to
//! feed the stepper: no NaNs, no divide-by-near-zero spikes.

use super::motion::PhysicsTuning;

/// One accepted drag sample.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Sample {
    coord: f64,
    time_ms: f64,
}

/// Derived motion from one drag move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragDelta {
    /// Distance to add to the position.
    pub delta: f64,
    /// Instantaneous velocity (units/s), already clamped.
    pub velocity: f64,
}

/// Tracks the previous pointer sample of an active drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragTracker {
    last: Sample,
}

impl DragTracker {
    /// Begin tracking at the press location.  Returns `None` for a
    /// non-finite coordinate; a bad timestamp is replaced by zero.
    pub fn start(coord: f64, time_ms: f64) -> Option<Self> {
        if !coord.is_finite() {
            return None;
        }
        let time_ms = if time_ms.is_finite() { time_ms } else { 0.0 };
        Some(Self {
            last: Sample { coord, time_ms },
        })
    }

    /// Feed a move sample.  Returns `None` when the coordinate or the
    /// distance travelled is unusable, in which case the previous sample
    /// stays current.
    pub fn advance(&mut self, coord: f64, time_ms: f64, tuning: &PhysicsTuning) -> Option<DragDelta> {
        if !coord.is_finite() {
            return None;
        }
        // A missing or backwards timestamp still counts as the minimum step.
        let time_ms = if time_ms.is_finite() {
            time_ms.max(self.last.time_ms)
        } else {
            self.last.time_ms
        };
        let delta = coord - self.last.coord;
        if !delta.is_finite() {
            return None;
        }
        // The floor only guards the divisor; the stored clock follows the host.
        let dt_ms = (time_ms - self.last.time_ms).max(tuning.min_sample_dt_ms);
        let velocity = (delta / (dt_ms / 1000.0))
            .clamp(-tuning.max_drag_speed, tuning.max_drag_speed);

        self.last = Sample { coord, time_ms };
        Some(DragDelta { delta, velocity })
    }

    /// Velocity to carry into release at `time_ms`.  A pointer that sat still
    /// for longer than `drag_hold_ms` releases with no fling.
    pub fn release_velocity(&self, velocity: f64, time_ms: f64, tuning: &PhysicsTuning) -> f64 {
        if !velocity.is_finite() {
            return 0.0;
        }
        if time_ms.is_finite() && time_ms - self.last.time_ms > tuning.drag_hold_ms {
            return 0.0;
        }
        velocity
    }
}

/// Velocity imparted by one wheel/scroll impulse.
pub fn wheel_velocity(delta: f64, tuning: &PhysicsTuning) -> f64 {
    (delta * tuning.wheel_gain).clamp(-tuning.max_wheel_speed, tuning.max_wheel_speed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn velocity_from_move() {
        let tuning = PhysicsTuning::default();
        let mut drag = DragTracker::start(100.0, 0.0).unwrap();
        let d = drag.advance(110.0, 20.0, &tuning).unwrap();
        assert_eq!(d.delta, 10.0);
        assert!((d.velocity - 500.0).abs() < 1e-9);

        let d = drag.advance(100.0, 30.0, &tuning).unwrap();
        assert_eq!(d.delta, -10.0);
        assert!((d.velocity + 1000.0).abs() < 1e-9);
    }

    #[test]
    fn zero_elapsed_is_floored_and_clamped() {
        let tuning = PhysicsTuning::default();
        let mut drag = DragTracker::start(0.0, 50.0).unwrap();
        // Same timestamp: dt floors to 1ms → 40 000 units/s → clamped.
        let d = drag.advance(40.0, 50.0, &tuning).unwrap();
        assert_eq!(d.delta, 40.0);
        assert_eq!(d.velocity, tuning.max_drag_speed);

        // Backwards timestamp behaves the same way.
        let d = drag.advance(0.0, 10.0, &tuning).unwrap();
        assert_eq!(d.velocity, -tuning.max_drag_speed);
    }

    #[test]
    fn non_finite_samples_are_dropped() {
        let tuning = PhysicsTuning::default();
        assert!(DragTracker::start(f64::NAN, 0.0).is_none());

        let mut drag = DragTracker::start(5.0, f64::INFINITY).unwrap();
        assert!(drag.advance(f64::INFINITY, 10.0, &tuning).is_none());
        let d = drag.advance(15.0, f64::NAN, &tuning).unwrap();
        assert_eq!(d.delta, 10.0);
        assert!(d.velocity.is_finite());
    }

    #[test]
    fn holding_still_cancels_fling() {
        let tuning = PhysicsTuning::default();
        let mut drag = DragTracker::start(0.0, 0.0).unwrap();
        let d = drag.advance(30.0, 10.0, &tuning).unwrap();
        assert_eq!(drag.release_velocity(d.velocity, 20.0, &tuning), d.velocity);
        assert_eq!(drag.release_velocity(d.velocity, 500.0, &tuning), 0.0);
        assert_eq!(drag.release_velocity(f64::NAN, 20.0, &tuning), 0.0);
    }

    #[test]
    fn same_timestamp_burst_keeps_the_host_clock() {
        let tuning = PhysicsTuning::default();
        let mut drag = DragTracker::start(0.0, 0.0).unwrap();
        for i in 1..=20 {
            drag.advance(i as f64, 0.0, &tuning).unwrap();
        }
        // The next real sample divides by the true 10ms gap.
        let d = drag.advance(30.0, 10.0, &tuning).unwrap();
        assert!((d.velocity - 1000.0).abs() < 1e-9);
        // Hold is measured from the sample at 10ms, not from a drifted clock.
        assert_eq!(drag.release_velocity(d.velocity, 105.0, &tuning), d.velocity);
        assert_eq!(drag.release_velocity(d.velocity, 115.0, &tuning), 0.0);
    }

    #[test]
    fn overflowing_delta_is_dropped() {
        let tuning = PhysicsTuning::default();
        let mut drag = DragTracker::start(-1e308, 0.0).unwrap();
        assert!(drag.advance(1e308, 10.0, &tuning).is_none());
        // The rejected sample did not become current.
        let d = drag.advance(-1e308, 20.0, &tuning).unwrap();
        assert_eq!(d.delta, 0.0);
    }

    #[test]
    fn wheel_velocity_is_clamped() {
        let tuning = PhysicsTuning::default();
        assert_eq!(wheel_velocity(10.0, &tuning), 140.0);
        assert_eq!(wheel_velocity(560.0, &tuning), 3200.0);
        assert_eq!(wheel_velocity(-10_000.0, &tuning), -3200.0);
    }
}
