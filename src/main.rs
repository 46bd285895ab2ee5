//! A terminal time-range picker built on physics-driven selector wheels.
//!
//! Drag or scroll the wheels (or use the keyboard), then press Enter to print
//! the chosen range to stdout.

mod app;
mod config;
mod ui;

use std::io::{self, stderr, Stderr};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{NaiveTime, Timelike};
use clap::Parser;
use cog_picker::core;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::app::{
    event::{spawn_event_reader, AppEvent, WheelSignal},
    handler,
    state::{ActiveView, AppState},
    wheels::{self, Side},
};
use crate::ui::{layout::AppLayout, popup, theme::Theme, wheel_widget::WheelWidget};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Pick a time range on spinning wheels")]
struct Cli {
    /// Start of the range, `HH:MM` or `HH:MM AM/PM`.
    #[arg(long, value_parser = wheels::parse_time)]
    start: Option<NaiveTime>,

    /// End of the range, `HH:MM` or `HH:MM AM/PM`.
    #[arg(long, value_parser = wheels::parse_time)]
    end: Option<NaiveTime>,

    /// Start from the current local time.
    #[arg(long, conflicts_with = "start")]
    now: bool,

    /// Snap animation length in milliseconds (overrides the config file).
    #[arg(long)]
    snap_ms: Option<u64>,

    /// Update the range while the wheels spin.
    #[arg(long)]
    live: bool,
}

impl Cli {
    /// Resolve the initial range from flags, defaulting to 09:00 to 17:00.
    fn range(&self) -> (NaiveTime, NaiveTime) {
        let start = if self.now {
            let local = chrono::Local::now().time();
            NaiveTime::from_hms_opt(local.hour(), local.minute(), 0).unwrap_or(local)
        } else {
            self.start.unwrap_or(NaiveTime::MIN + chrono::Duration::hours(9))
        };
        let end = self.end.unwrap_or(NaiveTime::MIN + chrono::Duration::hours(17));
        (start, end)
    }
}

type Term = Terminal<CrosstermBackend<Stderr>>;

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Silent unless RUST_LOG is set.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // never pollute stdout
        .init();

    let cli = Cli::parse();

    let mut user_config = config::AppConfig::load();
    if let Some(ms) = cli.snap_ms {
        user_config.snap_ms = ms.min(2000);
    }
    user_config.live_preview |= cli.live;
    let frame_period = Duration::from_millis(user_config.frame_ms);

    let (start, end) = cli.range();
    let (signal_tx, mut signal_rx) = mpsc::unbounded_channel::<WheelSignal>();
    let mut state =
        AppState::new(user_config, start, end, signal_tx).context("invalid wheel configuration")?;

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    execute!(stderr(), EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stderr()))?;

    let outcome = run(&mut terminal, &mut state, &mut signal_rx, frame_period).await;

    // ── teardown (also on error) ──────────────────────────────
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    outcome?;

    if state.confirmed {
        println!("{}", range_summary(&state));
    }
    Ok(())
}

/// Event loop: draw, then wait for input, a wheel signal, or the next frame.
async fn run(
    terminal: &mut Term,
    state: &mut AppState,
    signals: &mut mpsc::UnboundedReceiver<WheelSignal>,
    frame_period: Duration,
) -> Result<()> {
    let mut events = spawn_event_reader(Duration::from_millis(100));
    let mut frames = tokio::time::interval(frame_period);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        terminal.draw(|frame| draw(frame, state))?;

        // Only wake for frames while something is moving.
        let animating = state.needs_frame();

        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                match event {
                    AppEvent::Key(k) => handler::handle_key(state, k),
                    AppEvent::Mouse(m) => handler::handle_mouse(state, m),
                    AppEvent::Resize(_, _) => {}
                }
            }

            Some(signal) = signals.recv() => {
                // Drain everything queued before redrawing.
                let now = state.now_ms();
                state.apply_signal(signal, now);
                while let Ok(signal) = signals.try_recv() {
                    state.apply_signal(signal, now);
                }
            }

            _ = frames.tick(), if animating => {
                let now = state.now_ms();
                state.advance_frames(now);
            }
        }

        if state.should_quit {
            return Ok(());
        }
    }
}

fn draw(frame: &mut Frame, state: &mut AppState) {
    state.terminal_area = frame.area();
    let state: &AppState = state;
    let layout = AppLayout::from_area(frame.area());
    let focused_side = state.wheels.get(state.focused).map(|w| w.side);

    for (side, area) in Side::ALL.into_iter().zip(layout.group_areas) {
        let block = Block::default()
            .title(format!(" {} ", side.label()))
            .title_style(Theme::title_style())
            .borders(Borders::ALL)
            .border_style(Theme::border_style(focused_side == Some(side)));
        frame.render_widget(block, area);
    }

    for colon in layout.colon_areas {
        let middle = colon.y + colon.height / 2;
        if colon.height > 0 {
            frame
                .buffer_mut()
                .set_string(colon.x, middle, ":", Theme::colon_style());
        }
    }

    for (i, (wheel, area)) in state.wheels.iter().zip(layout.wheel_areas).enumerate() {
        let widget = WheelWidget::new(wheel, &state.config.style, state.config.px_per_row)
            .focused(i == state.focused && state.active_view == ActiveView::Picker);
        frame.render_widget(widget, area);
    }

    let summary = Line::from(vec![
        Span::raw(" "),
        Span::styled(range_summary(state), Theme::summary_style()),
    ]);
    frame.render_widget(Paragraph::new(summary), layout.summary_area);

    let hint = state.config.status_bar_hint();
    let status_text = match state.active_view {
        ActiveView::Picker => state.status_message.as_deref().unwrap_or(&hint),
        ActiveView::SettingsMenu => "",
    };
    let status = Paragraph::new(status_text).style(Theme::status_bar_style());
    frame.render_widget(status, layout.status_area);

    if state.active_view == ActiveView::SettingsMenu {
        frame.render_widget(
            popup::SettingsPopup {
                state,
                selected: state.settings_selected,
            },
            frame.area(),
        );
    }
}

/// `start → end` from the currently selected values.
fn range_summary(state: &AppState) -> String {
    match (state.selected_time(Side::Start), state.selected_time(Side::End)) {
        (Some(start), Some(end)) => {
            format!("{} → {}", wheels::format_time(start), wheels::format_time(end))
        }
        _ => "invalid time".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_times_and_defaults() {
        let cli = Cli::try_parse_from(["cog-picker", "--start", "08:15PM", "--live"]).unwrap();
        let (start, end) = cli.range();
        assert_eq!(start, NaiveTime::from_hms_opt(20, 15, 0).unwrap());
        assert_eq!(end, NaiveTime::from_hms_opt(17, 0, 0).unwrap());
        assert!(cli.live);

        assert!(Cli::try_parse_from(["cog-picker", "--end", "lunch"]).is_err());
        assert!(Cli::try_parse_from(["cog-picker", "--now", "--start", "09:00"]).is_err());
    }

    #[test]
    fn summary_reads_settled_wheels() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let start = NaiveTime::from_hms_opt(22, 0, 0).unwrap();
        let end = NaiveTime::from_hms_opt(6, 30, 0).unwrap();
        let state = AppState::new(config::AppConfig::default(), start, end, tx).unwrap();
        assert_eq!(range_summary(&state), "10:00 PM → 06:30 AM");
    }
}
