//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

/// Central theme: change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    // ── wheels ─────────────────────────────────────────────────

    /// Style for a value drawn at `opacity`.  Terminals have no alpha, so
    /// opacity becomes a grey ramp; slots close to full scale are bold.
    pub fn slot_style(opacity: f64, scale: f64) -> Style {
        let level = (48.0 + opacity.clamp(0.0, 1.0) * 207.0).round() as u8;
        let style = Style::default().fg(Color::Rgb(level, level, level));
        if scale >= 0.98 {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }

    /// Band behind the selection row.
    pub fn selection_band(focused: bool) -> Style {
        if focused {
            Style::default().bg(Color::DarkGray)
        } else {
            Style::default().bg(Color::Rgb(32, 32, 32))
        }
    }

    /// Center value while a haptic pulse is showing.
    pub fn pulse_style() -> Style {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }

    pub fn colon_style() -> Style {
        Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::BOLD)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn border_style(focused: bool) -> Style {
        if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        }
    }

    pub fn title_style() -> Style {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }

    pub fn summary_style() -> Style {
        Style::default().fg(Color::White)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }
}
