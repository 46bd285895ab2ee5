//! Layout helpers: split the terminal area into regions.
//!
//! The handler recomputes the same layout from the last drawn area to
//! hit-test mouse events, so everything here is a pure function of the area.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::Block;

/// Width of one wheel column.
const WHEEL_WIDTH: u16 = 6;

/// Primary screen layout: two wheel groups, a summary line and a status bar.
pub struct AppLayout {
    /// Bordered box around each group (start, end).
    pub group_areas: [Rect; 2],
    /// Hour, minute, period for start, then the same for end.
    pub wheel_areas: [Rect; 6],
    /// Column holding the `:` between hour and minute, per group.
    pub colon_areas: [Rect; 2],
    pub summary_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(5),    // wheels (take all remaining space)
                Constraint::Length(1), // chosen range
                Constraint::Length(1), // status bar
            ])
            .split(area);

        let groups = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[0]);

        let mut wheel_areas = [Rect::default(); 6];
        let mut colon_areas = [Rect::default(); 2];
        for g in 0..2 {
            let inner = Block::bordered().inner(groups[g]);
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Fill(1),
                    Constraint::Length(WHEEL_WIDTH), // hour
                    Constraint::Length(1),           // ':'
                    Constraint::Length(WHEEL_WIDTH), // minute
                    Constraint::Length(1),
                    Constraint::Length(WHEEL_WIDTH), // AM / PM
                    Constraint::Fill(1),
                ])
                .split(inner);
            wheel_areas[g * 3] = cols[1];
            colon_areas[g] = cols[2];
            wheel_areas[g * 3 + 1] = cols[3];
            wheel_areas[g * 3 + 2] = cols[5];
        }

        Self {
            group_areas: [groups[0], groups[1]],
            wheel_areas,
            colon_areas,
            summary_area: rows[1],
            status_area: rows[2],
        }
    }

    /// Index of the wheel under a terminal cell.
    pub fn wheel_at(&self, col: u16, row: u16) -> Option<usize> {
        self.wheel_areas
            .iter()
            .position(|area| point_in_rect(*area, col, row))
    }
}

fn point_in_rect(area: Rect, col: u16, row: u16) -> bool {
    col >= area.x
        && col < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wheels_are_hit_tested_in_order() {
        let layout = AppLayout::from_area(Rect::new(0, 0, 80, 20));
        for (i, area) in layout.wheel_areas.iter().enumerate() {
            assert_eq!(area.width, WHEEL_WIDTH);
            assert_eq!(layout.wheel_at(area.x, area.y + area.height / 2), Some(i));
        }
        assert!(layout.wheel_areas[2].x < layout.wheel_areas[3].x);
        assert_eq!(layout.wheel_at(0, 0), None);
        assert_eq!(layout.status_area.y, 19);
    }
}
