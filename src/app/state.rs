//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use chrono::NaiveTime;
use ratatui::layout::Rect;
use tokio::sync::mpsc::UnboundedSender;

use crate::config::AppConfig;
use crate::core::clock::MonotonicClock;
use crate::core::motion::PhysicsTuning;
use crate::core::selector::{ConfigError, Notify, Selector, SelectorConfig};

use super::event::WheelSignal;
use super::wheels::{self, Side, Wheel, WheelKind};

/// How long a haptic pulse stays visible.
const PULSE_MS: f64 = 140.0;

/// Which view / overlay is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Picker,
    SettingsMenu,
}

/// Top-level application state.
pub struct AppState {
    /// Start hour/minute/period, then end hour/minute/period.
    pub wheels: Vec<Wheel>,
    /// Wheel that keyboard input goes to.
    pub focused: usize,
    /// Wheel holding the current mouse drag, if any.
    pub dragging: Option<usize>,
    pub config: AppConfig,
    pub clock: MonotonicClock,
    pub active_view: ActiveView,
    pub settings_selected: usize,
    pub should_quit: bool,
    /// Set when the user confirmed rather than quit.
    pub confirmed: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Last drawn terminal area, for mouse hit-testing.
    pub terminal_area: Rect,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        start: NaiveTime,
        end: NaiveTime,
        signals: UnboundedSender<WheelSignal>,
    ) -> Result<Self, ConfigError> {
        let mut wheels = Vec::with_capacity(6);
        for (side, time) in [(Side::Start, start), (Side::End, end)] {
            let indices = wheels::indices_for(time);
            for (kind, index) in WheelKind::ALL.into_iter().zip(indices) {
                let slot = wheels.len();
                let selector = build_selector(&config, kind, index, slot, &signals)?;
                wheels.push(Wheel::new(side, kind, selector));
            }
        }

        Ok(Self {
            wheels,
            focused: 0,
            dragging: None,
            config,
            clock: MonotonicClock::new(),
            active_view: ActiveView::default(),
            settings_selected: 0,
            should_quit: false,
            confirmed: false,
            status_message: None,
            terminal_area: Rect::default(),
        })
    }

    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    pub fn focused_wheel(&mut self) -> Option<&mut Wheel> {
        self.wheels.get_mut(self.focused)
    }

    /// `true` while any wheel is moving or a pulse is still showing.
    pub fn needs_frame(&self) -> bool {
        self.wheels
            .iter()
            .any(|w| w.selector.needs_frame() || w.is_pulsing())
    }

    /// Drive every animating wheel one frame forward.
    pub fn advance_frames(&mut self, now_ms: f64) {
        for wheel in &mut self.wheels {
            if wheel.selector.needs_frame() {
                wheel.selector.frame(now_ms);
            }
            if wheel.pulse_until_ms.is_some_and(|until| now_ms >= until) {
                wheel.pulse_until_ms = None;
            }
        }
    }

    pub fn apply_signal(&mut self, signal: WheelSignal, now_ms: f64) {
        match signal {
            WheelSignal::Committed { wheel, commit } => {
                let Some(w) = self.wheels.get_mut(wheel) else {
                    return;
                };
                w.live = commit.index;
                if commit.settled {
                    w.committed = commit.index;
                }
            }
            WheelSignal::Haptic { wheel } => {
                if let Some(w) = self.wheels.get_mut(wheel) {
                    w.pulse_until_ms = Some(now_ms + PULSE_MS);
                }
            }
        }
    }

    /// The time one side shows: settled values, or live ones when live
    /// preview is on.
    pub fn selected_time(&self, side: Side) -> Option<NaiveTime> {
        let mut indices = [0; 3];
        let group = self.wheels.iter().filter(|w| w.side == side);
        for (slot, wheel) in indices.iter_mut().zip(group) {
            *slot = if self.config.live_preview {
                wheel.live
            } else {
                wheel.committed
            };
        }
        wheels::time_from_indices(indices)
    }

    /// Jump every wheel of `side` to `time`.  Commits arrive through the
    /// signal channel like any other.
    pub fn set_side(&mut self, side: Side, time: NaiveTime) {
        let indices = wheels::indices_for(time);
        let group = self.wheels.iter_mut().filter(|w| w.side == side);
        for (wheel, index) in group.zip(indices) {
            wheel.selector.set_index(index as i64);
        }
    }

    /// Push the current snap duration into every selector.
    pub fn apply_snap_ms(&mut self) {
        let ms = self.config.snap_ms as f64;
        for wheel in &mut self.wheels {
            if let Err(err) = wheel.selector.set_snap_ms(ms) {
                tracing::warn!(%err, "rejected snap duration");
            }
        }
    }

    /// Write the config to disk, surfacing failures in the status bar.
    pub fn persist_config(&mut self) {
        if let Err(err) = self.config.save() {
            tracing::warn!(%err, "could not save config");
            self.status_message = Some(format!("Could not save config: {err}"));
        }
    }
}

fn build_selector(
    config: &AppConfig,
    kind: WheelKind,
    index: usize,
    slot: usize,
    signals: &UnboundedSender<WheelSignal>,
) -> Result<Selector, ConfigError> {
    let tuning = PhysicsTuning {
        wheel_quiet_ms: config.wheel_quiet_ms as f64,
        ..PhysicsTuning::default()
    };
    let mut selector = Selector::with_config(
        SelectorConfig::new(kind.value_count(), config.step_px)
            .initial_index(index as i64)
            .snap_ms(config.snap_ms as f64)
            .tuning(tuning),
    )?;

    let commits = signals.clone();
    selector.on_index_committed(Notify::Live, move |commit| {
        // The receiver only goes away on shutdown.
        let _ = commits.send(WheelSignal::Committed { wheel: slot, commit });
    });
    let pulses = signals.clone();
    selector.on_haptic(move || {
        let _ = pulses.send(WheelSignal::Haptic { wheel: slot });
    });
    Ok(selector)
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;
    use crate::core::selector::Commit;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn wheels_start_on_the_requested_times() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let state = AppState::new(AppConfig::default(), hm(9, 15), hm(17, 45), tx).unwrap();
        assert_eq!(state.wheels.len(), 6);
        assert_eq!(state.selected_time(Side::Start), Some(hm(9, 15)));
        assert_eq!(state.selected_time(Side::End), Some(hm(17, 45)));
        assert!(!state.needs_frame());
    }

    #[test]
    fn set_side_reports_through_the_channel() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut state = AppState::new(AppConfig::default(), hm(9, 0), hm(17, 0), tx).unwrap();

        state.set_side(Side::End, hm(22, 30));
        let mut haptics = 0;
        while let Ok(signal) = rx.try_recv() {
            if matches!(signal, WheelSignal::Haptic { .. }) {
                haptics += 1;
            }
            state.apply_signal(signal, 0.0);
        }

        assert_eq!(haptics, 3);
        assert_eq!(state.selected_time(Side::End), Some(hm(22, 30)));
        assert_eq!(state.selected_time(Side::Start), Some(hm(9, 0)));
        assert!(state.needs_frame());

        state.advance_frames(1_000.0);
        assert!(!state.needs_frame());
    }

    #[test]
    fn live_preview_reads_unsettled_indices() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut state = AppState::new(AppConfig::default(), hm(9, 0), hm(17, 0), tx).unwrap();
        state.apply_signal(
            WheelSignal::Committed {
                wheel: 1,
                commit: Commit { index: 20, settled: false },
            },
            0.0,
        );
        assert_eq!(state.selected_time(Side::Start), Some(hm(9, 0)));
        state.config.live_preview = true;
        assert_eq!(state.selected_time(Side::Start), Some(hm(9, 20)));
    }
}
