//! Input handling: maps key/mouse events to selector calls and state
//! mutations.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::config::Action;
use crate::ui::layout::AppLayout;

use super::settings::SETTINGS_ITEMS;
use super::state::{ActiveView, AppState};

/// Process a key event, dispatching based on the active view.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    // Ctrl+c always quits, regardless of view.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }
    // Release events only arrive on some terminals; repeats keep spinning.
    if key.kind == KeyEventKind::Release {
        return;
    }

    match state.active_view {
        ActiveView::Picker => handle_picker_key(state, key),
        ActiveView::SettingsMenu => handle_settings_key(state, key),
    }
}

// ── Picker (configurable bindings) ──────────────────────────────

fn handle_picker_key(state: &mut AppState, key: KeyEvent) {
    let Some(action) = state.config.match_key(key) else {
        return;
    };
    state.status_message = None;
    let now = state.now_ms();

    match action {
        Action::Quit => state.should_quit = true,
        Action::Confirm => {
            state.confirmed = true;
            state.should_quit = true;
        }
        Action::OpenSettings => {
            state.active_view = ActiveView::SettingsMenu;
            state.settings_selected = 0;
        }
        Action::StepUp => nudge_focused(state, -1.0, now),
        Action::StepDown => nudge_focused(state, 1.0, now),
        Action::PrevWheel => {
            let n = state.wheels.len();
            state.focused = (state.focused + n - 1) % n;
        }
        Action::NextWheel => {
            state.focused = (state.focused + 1) % state.wheels.len();
        }
        Action::ResetWheel => {
            if let Some(wheel) = state.focused_wheel() {
                let initial = wheel.initial as i64;
                wheel.selector.set_index(initial);
            }
        }
        Action::SetNow => {
            let Some(side) = state.wheels.get(state.focused).map(|w| w.side) else {
                return;
            };
            let local = chrono::Local::now().time();
            state.set_side(side, local);
            state.status_message = Some(format!("{} set to now", side.label()));
        }
    }
}

/// Scroll the focused wheel by one step in `direction` (±1).
fn nudge_focused(state: &mut AppState, direction: f64, now: f64) {
    let delta = direction * state.config.wheel_delta_px;
    if let Some(wheel) = state.focused_wheel() {
        wheel.selector.wheel_impulse(delta, now);
    }
}

// ── Settings menu (hardcoded navigation) ────────────────────────

fn handle_settings_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            state.active_view = ActiveView::Picker;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.settings_selected = state.settings_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if state.settings_selected + 1 < SETTINGS_ITEMS.len() {
                state.settings_selected += 1;
            }
        }
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => {
            if let Some(item) = SETTINGS_ITEMS.get(state.settings_selected) {
                item.activate(state);
            }
        }
        _ => {}
    }
}

// ── Mouse ───────────────────────────────────────────────────────

/// Process a mouse event.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    if state.active_view != ActiveView::Picker {
        return;
    }

    let layout = AppLayout::from_area(state.terminal_area);
    let now = state.now_ms();
    // Rows grow downward; negate so the content follows the pointer.
    let coord = -f64::from(mouse.row) * state.config.px_per_row;

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let Some(index) = layout.wheel_at(mouse.column, mouse.row) else {
                return;
            };
            state.focused = index;
            state.dragging = Some(index);
            state.wheels[index].selector.drag_start(coord, now);
        }
        // The wheel that took the press keeps the gesture, wherever the
        // pointer wanders.
        MouseEventKind::Drag(MouseButton::Left) => {
            if let Some(wheel) = state.dragging.and_then(|i| state.wheels.get_mut(i)) {
                wheel.selector.drag_move(coord, now);
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if let Some(wheel) = state.dragging.take().and_then(|i| state.wheels.get_mut(i)) {
                wheel.selector.drag_end(now);
            }
        }
        MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
            let target = layout.wheel_at(mouse.column, mouse.row).unwrap_or(state.focused);
            let delta = if mouse.kind == MouseEventKind::ScrollUp {
                -state.config.wheel_delta_px
            } else {
                state.config.wheel_delta_px
            };
            if let Some(wheel) = state.wheels.get_mut(target) {
                wheel.selector.wheel_impulse(delta, now);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;
    use ratatui::layout::Rect;
    use tokio::sync::mpsc;

    use super::*;
    use crate::config::AppConfig;
    use crate::core::motion::Mode;

    fn state() -> AppState {
        let (tx, _rx) = mpsc::unbounded_channel();
        let start = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let end = NaiveTime::from_hms_opt(17, 0, 0).unwrap();
        let mut state = AppState::new(AppConfig::default(), start, end, tx).unwrap();
        state.terminal_area = Rect::new(0, 0, 80, 24);
        state
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn focus_wraps_both_ways() {
        let mut state = state();
        handle_key(&mut state, press(KeyCode::Left));
        assert_eq!(state.focused, 5);
        handle_key(&mut state, press(KeyCode::Tab));
        assert_eq!(state.focused, 0);
    }

    #[test]
    fn step_keys_spin_the_focused_wheel() {
        let mut state = state();
        state.focused = 1;
        handle_key(&mut state, press(KeyCode::Down));
        let wheel = &state.wheels[1].selector;
        assert_eq!(wheel.mode(), Mode::Inertial);
        assert_eq!(wheel.position(), 28.0);
        assert_eq!(state.wheels[0].selector.mode(), Mode::Idle);
    }

    #[test]
    fn key_release_is_ignored() {
        let mut state = state();
        let mut release = press(KeyCode::Down);
        release.kind = KeyEventKind::Release;
        handle_key(&mut state, release);
        assert_eq!(state.wheels[0].selector.mode(), Mode::Idle);
    }

    #[test]
    fn confirm_and_quit() {
        let mut state = state();
        handle_key(&mut state, press(KeyCode::Enter));
        assert!(state.confirmed && state.should_quit);

        let mut state = self::state();
        handle_key(&mut state, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!state.confirmed && state.should_quit);
    }

    #[test]
    fn drag_is_captured_by_the_pressed_wheel() {
        let mut state = state();
        let area = AppLayout::from_area(state.terminal_area).wheel_areas[3];
        let (col, row) = (area.x, area.y + area.height / 2);

        handle_mouse(&mut state, mouse(MouseEventKind::Down(MouseButton::Left), col, row));
        assert_eq!(state.focused, 3);
        assert_eq!(state.wheels[3].selector.mode(), Mode::Dragging);

        // Pointer leaves the column; the gesture stays with wheel 3.
        handle_mouse(&mut state, mouse(MouseEventKind::Drag(MouseButton::Left), 0, row + 2));
        assert_eq!(state.wheels[3].selector.position(), 5.0 * 56.0 - 56.0);

        handle_mouse(&mut state, mouse(MouseEventKind::Up(MouseButton::Left), 0, row + 2));
        assert_eq!(state.dragging, None);
        assert_ne!(state.wheels[3].selector.mode(), Mode::Dragging);
    }

    #[test]
    fn settings_menu_navigation_is_bounded() {
        let mut state = state();
        handle_key(&mut state, press(KeyCode::Char('?')));
        assert_eq!(state.active_view, ActiveView::SettingsMenu);
        for _ in 0..10 {
            handle_key(&mut state, press(KeyCode::Down));
        }
        assert_eq!(state.settings_selected, SETTINGS_ITEMS.len() - 1);
        handle_key(&mut state, press(KeyCode::Esc));
        assert_eq!(state.active_view, ActiveView::Picker);
    }
}
