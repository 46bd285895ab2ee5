//! Cubic-bezier easing, the same curve family as CSS `cubic-bezier()`.
//!
//! The curve runs from (0,0) to (1,1) and is parametric in a hidden `t`.
//! To map a time fraction `x` to a progress fraction `y` we first solve
//! `x(t) = x` for `t`, then evaluate `y(t)`.  Newton–Raphson does the solve
//! and bisection takes over when the tangent goes flat.

/// Newton iterations before giving up and bisecting.
const NEWTON_ITERATIONS: usize = 6;
/// Fixed bisection depth: 12 halvings resolve `t` to ~2.4e-4.
const BISECTION_ITERATIONS: usize = 12;
const EPSILON: f64 = 1e-6;

/// Fast start, long gentle tail.  Used for every snap animation.
pub const SNAP_EASE: CubicBezier = CubicBezier::new(0.22, 1.0, 0.36, 1.0);

/// A cubic bezier easing curve defined by its two interior control points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl CubicBezier {
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Progress at time fraction `x`.  Always returns a value in `[0, 1]`.
    pub fn solve(&self, x: f64) -> f64 {
        if !x.is_finite() {
            return 0.0;
        }
        let x = x.clamp(0.0, 1.0);
        // Endpoints are exact by construction; skip the numerics.
        if x == 0.0 || x == 1.0 {
            return x;
        }
        let t = self.solve_t_for_x(x);
        Polynomial::new(self.y1, self.y2).sample(t).clamp(0.0, 1.0)
    }

    fn solve_t_for_x(&self, x: f64) -> f64 {
        let px = Polynomial::new(self.x1, self.x2);

        let mut t = x;
        for _ in 0..NEWTON_ITERATIONS {
            let error = px.sample(t) - x;
            if error.abs() < EPSILON {
                return t;
            }
            let slope = px.slope(t);
            if slope.abs() < EPSILON {
                break;
            }
            t = (t - error / slope).clamp(0.0, 1.0);
        }

        let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
        for _ in 0..BISECTION_ITERATIONS {
            let mid = (lo + hi) / 2.0;
            if px.sample(mid) < x {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        (lo + hi) / 2.0
    }
}

/// One axis of the curve in power-basis form: `((a·t + b)·t + c)·t`.
#[derive(Debug, Clone, Copy)]
struct Polynomial {
    a: f64,
    b: f64,
    c: f64,
}

impl Polynomial {
    fn new(p1: f64, p2: f64) -> Self {
        let c = 3.0 * p1;
        let b = 3.0 * (p2 - p1) - c;
        let a = 1.0 - c - b;
        Self { a, b, c }
    }

    fn sample(&self, t: f64) -> f64 {
        ((self.a * t + self.b) * t + self.c) * t
    }

    fn slope(&self, t: f64) -> f64 {
        (3.0 * self.a * t + 2.0 * self.b) * t + self.c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_exact() {
        assert_eq!(SNAP_EASE.solve(0.0), 0.0);
        assert_eq!(SNAP_EASE.solve(1.0), 1.0);
    }

    #[test]
    fn out_of_range_input_is_clamped() {
        assert_eq!(SNAP_EASE.solve(-3.0), 0.0);
        assert_eq!(SNAP_EASE.solve(7.5), 1.0);
        assert_eq!(SNAP_EASE.solve(f64::NAN), 0.0);
    }

    #[test]
    fn snap_curve_is_monotonic() {
        let mut prev = 0.0;
        for i in 0..=1000 {
            let y = SNAP_EASE.solve(i as f64 / 1000.0);
            assert!(y + 1e-9 >= prev, "dropped at {i}: {prev} -> {y}");
            assert!((0.0..=1.0).contains(&y));
            prev = y;
        }
    }

    #[test]
    fn snap_curve_front_loads_progress() {
        // Fast start: most of the distance is covered early.
        assert!(SNAP_EASE.solve(0.25) > 0.6);
        assert!(SNAP_EASE.solve(0.5) > 0.85);
    }

    #[test]
    fn linear_control_points_give_identity() {
        let linear = CubicBezier::new(1.0 / 3.0, 1.0 / 3.0, 2.0 / 3.0, 2.0 / 3.0);
        for i in 1..10 {
            let x = i as f64 / 10.0;
            assert!((linear.solve(x) - x).abs() < 1e-4);
        }
    }

    #[test]
    fn flat_tangent_falls_back_to_bisection() {
        // x1 = x2 = 0 gives dx/dt = 0 at t = 0; Newton can stall near the origin.
        let steep = CubicBezier::new(0.0, 0.0, 0.0, 1.0);
        let y = steep.solve(1e-4);
        assert!((0.0..=1.0).contains(&y));

        // Same curve, the solve must still be deterministic.
        assert_eq!(steep.solve(0.3), steep.solve(0.3));
    }

    #[test]
    fn pathological_points_stay_in_range() {
        let wild = CubicBezier::new(1.0, -2.0, 0.0, 3.0);
        for i in 0..=20 {
            let y = wild.solve(i as f64 / 20.0);
            assert!((0.0..=1.0).contains(&y), "{y}");
        }
    }
}
