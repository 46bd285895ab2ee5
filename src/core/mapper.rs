//! Position → value mapping for a wrapping wheel.
//!
//! The stored position is never wrapped; wrapping happens only here, when a
//! grid index is exposed to the outside.  Every caller that needs to turn an
//! unbounded index into a slot of the backing list goes through
//! [`wrap_index`], so the sign handling for negative positions lives in one
//! place.

/// Wrap any (possibly negative) index into `[0, n)`.
///
/// `n` must be non-zero; a selector with no values cannot be constructed.
pub fn wrap_index(index: i64, n: usize) -> usize {
    debug_assert!(n > 0, "wrap_index on an empty wheel");
    index.rem_euclid(n as i64) as usize
}

/// Nearest grid index for a fractional one.
///
/// Ties round half away from zero (`2.5 → 3`, `-2.5 → -3`).  This is the
/// only rounding rule used for snapping, whatever started the snap.
pub fn nearest_step(value: f64) -> i64 {
    value.round() as i64
}

/// Fractional index currently under the selection center.
pub fn active_float(position: f64, step_size: f64) -> f64 {
    position / step_size
}

/// Committed discrete index for a position, wrapped into `[0, n)`.
pub fn active_index(position: f64, step_size: f64, n: usize) -> usize {
    wrap_index(nearest_step(active_float(position, step_size)), n)
}

/// Grid-aligned position closest to `position`, on the unwrapped axis.
pub fn snap_target(position: f64, step_size: f64) -> f64 {
    nearest_step(active_float(position, step_size)) as f64 * step_size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_handles_negative_indices() {
        assert_eq!(wrap_index(-1, 60), 59);
        assert_eq!(wrap_index(-60, 60), 0);
        assert_eq!(wrap_index(-61, 60), 59);
        assert_eq!(wrap_index(65, 60), 5);
        assert_eq!(wrap_index(0, 1), 0);
    }

    #[test]
    fn active_index_is_always_in_range() {
        let n = 12;
        let mut p = -5000.0;
        while p < 5000.0 {
            let idx = active_index(p, 56.0, n);
            assert!(idx < n, "position {p} mapped to {idx}");
            p += 13.7;
        }
    }

    #[test]
    fn ties_round_away_from_zero() {
        assert_eq!(nearest_step(2.5), 3);
        assert_eq!(nearest_step(-2.5), -3);
        assert_eq!(nearest_step(2.49), 2);
    }

    #[test]
    fn snap_target_stays_on_unwrapped_axis() {
        // 61.6 steps on a 60-value wheel: target is step 62, not step 2.
        assert_eq!(snap_target(61.6 * 56.0, 56.0), 62.0 * 56.0);
        assert_eq!(snap_target(-30.0, 56.0), -56.0);
        assert_eq!(snap_target(140.0, 56.0), 168.0);
    }
}
