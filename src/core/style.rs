//! Depth styling for the values around the selection center.
//!
//! Pure functions of `(slot, active_float)`.  The renderer asks for a
//! bounded window of slots around the rounded active index and draws each
//! one with the returned opacity, scale and offset.  Lookup into the value
//! list goes through [`mapper::wrap_index`], so a finite list reads as an
//! endless ring.

use super::mapper;

/// Product-tunable styling constants.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleTuning {
    /// Opacity lost per step of distance from center.
    pub fade_rate: f64,
    pub min_opacity: f64,
    pub max_opacity: f64,
    /// Scale lost per step of distance from center.
    pub shrink_rate: f64,
    pub min_scale: f64,
    /// Slots drawn on each side of the center.
    pub radius: u32,
}

impl Default for StyleTuning {
    fn default() -> Self {
        Self {
            fade_rate: 0.22,
            min_opacity: 0.12,
            max_opacity: 1.0,
            shrink_rate: 0.05,
            min_scale: 0.85,
            radius: 6,
        }
    }
}

/// How to draw one slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotStyle {
    pub opacity: f64,
    pub scale: f64,
    /// Displacement from the selection center along the wheel axis, in
    /// position units.
    pub offset: f64,
}

/// Style for the slot at unwrapped index `raw_index`.
///
/// The offset law `(raw_index − active_float) × step_size` holds regardless
/// of tuning; only opacity and scale are shaped by it.
pub fn style_for_slot(raw_index: i64, active_float: f64, step_size: f64, tuning: &StyleTuning) -> SlotStyle {
    let signed = raw_index as f64 - active_float;
    let distance = signed.abs();

    // `max().min()` rather than `clamp` so an inverted range from a hand-edited
    // config can't panic.
    let opacity = (1.0 - distance * tuning.fade_rate)
        .max(tuning.min_opacity)
        .min(tuning.max_opacity);
    let scale = (1.0 - distance * tuning.shrink_rate).max(tuning.min_scale).min(1.0);

    SlotStyle {
        opacity,
        scale,
        offset: signed * step_size,
    }
}

/// A slot in the visible window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleSlot {
    /// Unwrapped index.  Stable while the wheel moves, so usable as a key.
    pub raw_index: i64,
    /// Position in the backing value list.
    pub value_index: usize,
    pub style: SlotStyle,
}

/// The `2·radius + 1` slots around the rounded active index, in ascending
/// raw-index order.
pub fn visible_slots(
    active_float: f64,
    value_count: usize,
    step_size: f64,
    tuning: &StyleTuning,
) -> impl Iterator<Item = VisibleSlot> + '_ {
    let base = mapper::nearest_step(active_float);
    let radius = i64::from(tuning.radius);
    (base - radius..=base + radius).map(move |raw_index| VisibleSlot {
        raw_index,
        value_index: mapper::wrap_index(raw_index, value_count),
        style: style_for_slot(raw_index, active_float, step_size, tuning),
    })
}
