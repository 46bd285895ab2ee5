//! Settings menu model (data only).
//!
//! Keeping these definitions outside the input handler lets both the handler
//! and UI renderers consume the same source of truth without cross-importing.

use super::state::AppState;

/// Snap durations offered by the menu, in milliseconds.
const SNAP_CHOICES: &[u64] = &[0, 120, 180, 250, 400];

/// Scroll notch sizes offered for a wheel of `step_px` units per value.
/// Anything under half a step would snap straight back.
fn wheel_step_choices(step_px: f64) -> [f64; 3] {
    [step_px / 2.0, step_px, step_px * 2.0]
}

/// A single item in the settings menu.
pub enum SettingsItem {
    /// Boolean toggle; reads/writes via accessors on `AppState`.
    Toggle {
        label: &'static str,
        get: fn(&AppState) -> bool,
        set: fn(&mut AppState, bool),
    },
    /// Cycles through a finite set of values.
    Cycle {
        label: &'static str,
        value: fn(&AppState) -> String,
        cycle: fn(&mut AppState),
    },
}

impl SettingsItem {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Toggle { label, .. } | Self::Cycle { label, .. } => label,
        }
    }

    /// Current value as shown next to the label.
    pub fn value(&self, state: &AppState) -> String {
        match self {
            Self::Toggle { get, .. } => if get(state) { "ON" } else { "OFF" }.to_string(),
            Self::Cycle { value, .. } => value(state),
        }
    }

    /// Toggle or advance the item.
    pub fn activate(&self, state: &mut AppState) {
        match self {
            Self::Toggle { get, set, .. } => {
                let current = get(state);
                set(state, !current);
            }
            Self::Cycle { cycle, .. } => cycle(state),
        }
    }
}

/// Index of the choice after `current`, or the first one if `current` is not
/// in the list.
fn next_choice<T: PartialEq>(choices: &[T], current: &T) -> usize {
    choices
        .iter()
        .position(|c| c == current)
        .map_or(0, |i| (i + 1) % choices.len())
}

/// All items shown in the settings popup, in display order.
pub static SETTINGS_ITEMS: &[SettingsItem] = &[
    SettingsItem::Cycle {
        label: "Snap Duration",
        value: |s| format!("{}ms", s.config.snap_ms),
        cycle: |s| {
            let next = SNAP_CHOICES[next_choice(SNAP_CHOICES, &s.config.snap_ms)];
            s.config.snap_ms = next;
            s.apply_snap_ms();
            s.persist_config();
            s.status_message = Some(format!("Snap duration: {next}ms"));
        },
    },
    SettingsItem::Cycle {
        label: "Wheel Step",
        value: |s| format!("{}", s.config.wheel_delta_px),
        cycle: |s| {
            let choices = wheel_step_choices(s.config.step_px);
            let next = choices[next_choice(&choices, &s.config.wheel_delta_px)];
            s.config.wheel_delta_px = next;
            s.persist_config();
            s.status_message = Some(format!("Wheel step: {next}"));
        },
    },
    SettingsItem::Toggle {
        label: "Live Preview",
        get: |s| s.config.live_preview,
        set: |s, v| {
            s.config.live_preview = v;
            s.persist_config();
        },
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::core::selector::{FrameOutcome, Selector};

    #[test]
    fn cycling_wraps_and_recovers_from_unknown_values() {
        assert_eq!(next_choice(SNAP_CHOICES, &180), 3);
        assert_eq!(next_choice(SNAP_CHOICES, &400), 0);
        assert_eq!(next_choice(SNAP_CHOICES, &999), 0);
        assert_eq!(next_choice(&wheel_step_choices(56.0), &28.0), 1);
        assert_eq!(next_choice(&wheel_step_choices(56.0), &14.0), 0);
    }

    #[test]
    fn every_wheel_step_choice_moves_at_least_one_value() {
        let step_px = AppConfig::default().step_px;
        for delta in wheel_step_choices(step_px) {
            let mut selector = Selector::new(60, step_px, 0, 180.0).unwrap();
            selector.wheel_impulse(delta, 0.0);
            let mut now = 0.0;
            let index = loop {
                if let FrameOutcome::Settled(index) = selector.frame(now) {
                    break index;
                }
                assert!(now < 5_000.0, "wheel never settled for step {delta}");
                now += 16.0;
            };
            assert!(index >= 1, "step {delta} settled on {index}");
        }
    }
}
