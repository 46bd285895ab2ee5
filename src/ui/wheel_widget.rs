//! Custom Ratatui widget that draws one wheel: the values around the
//! selection row, faded and placed by the depth style.

use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use crate::app::wheels::Wheel;
use crate::core::mapper;
use crate::core::style::{self, StyleTuning};

use super::theme::Theme;

pub struct WheelWidget<'a> {
    wheel: &'a Wheel,
    tuning: &'a StyleTuning,
    /// Position units per terminal row.
    px_per_row: f64,
    focused: bool,
}

impl<'a> WheelWidget<'a> {
    pub fn new(wheel: &'a Wheel, tuning: &'a StyleTuning, px_per_row: f64) -> Self {
        Self {
            wheel,
            tuning,
            px_per_row,
            focused: false,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Widget for WheelWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 || self.px_per_row <= 0.0 {
            return;
        }

        let selector = &self.wheel.selector;
        let center_row = i32::from(area.y) + i32::from(area.height / 2);
        let top = i32::from(area.y);
        let bottom = top + i32::from(area.height);

        buf.set_style(
            Rect::new(area.x, center_row as u16, area.width, 1),
            Theme::selection_band(self.focused),
        );

        let active = selector.active_float();
        let nearest = mapper::nearest_step(active);
        let slots = style::visible_slots(active, selector.value_count(), selector.step_size(), self.tuning);
        for slot in slots {
            let y = center_row + (slot.style.offset / self.px_per_row).round() as i32;
            if y < top || y >= bottom {
                continue;
            }

            let label = self.wheel.kind.label(slot.value_index);
            let style = if slot.raw_index == nearest && self.wheel.is_pulsing() {
                Theme::pulse_style()
            } else {
                Theme::slot_style(slot.style.opacity, slot.style.scale)
            };
            let width = label.chars().count() as u16;
            let x = area.x + area.width.saturating_sub(width) / 2;
            buf.set_stringn(x, y as u16, &label, usize::from(area.width), style);
        }
    }
}
