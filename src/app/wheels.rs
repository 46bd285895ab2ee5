//! The six time wheels: what each one shows and how their indices map to a
//! time of day.

use anyhow::{bail, Result};
use chrono::{NaiveTime, Timelike};

use crate::core::selector::Selector;

/// Which end of the range a wheel belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Start,
    End,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Start, Side::End];

    pub fn label(self) -> &'static str {
        match self {
            Side::Start => "Start",
            Side::End => "End",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelKind {
    Hour,
    Minute,
    Period,
}

impl WheelKind {
    /// Order of the wheels inside one group, left to right.
    pub const ALL: [WheelKind; 3] = [WheelKind::Hour, WheelKind::Minute, WheelKind::Period];

    pub fn value_count(self) -> usize {
        match self {
            WheelKind::Hour => 12,
            WheelKind::Minute => 60,
            WheelKind::Period => 2,
        }
    }

    /// Text for value `index`.  Hour index 0 reads as `12`.
    pub fn label(self, index: usize) -> String {
        match self {
            WheelKind::Hour if index == 0 => "12".into(),
            WheelKind::Hour | WheelKind::Minute => format!("{index:02}"),
            WheelKind::Period if index == 0 => "AM".into(),
            WheelKind::Period => "PM".into(),
        }
    }
}

/// One wheel on screen plus what it last reported.
pub struct Wheel {
    pub side: Side,
    pub kind: WheelKind,
    pub selector: Selector,
    /// Index the wheel was created on; `reset` returns here.
    pub initial: usize,
    /// Last settled index.
    pub committed: usize,
    /// Last index seen, settled or not.
    pub live: usize,
    /// A haptic pulse is showing until this time.
    pub pulse_until_ms: Option<f64>,
}

impl Wheel {
    pub fn new(side: Side, kind: WheelKind, selector: Selector) -> Self {
        let index = selector.active_index();
        Self {
            side,
            kind,
            selector,
            initial: index,
            committed: index,
            live: index,
            pulse_until_ms: None,
        }
    }

    pub fn is_pulsing(&self) -> bool {
        self.pulse_until_ms.is_some()
    }
}

/// Wheel indices `[hour, minute, period]` showing `time`.
pub fn indices_for(time: NaiveTime) -> [usize; 3] {
    let hour = time.hour() as usize;
    [hour % 12, time.minute() as usize, hour / 12]
}

/// The time shown by `[hour, minute, period]` indices.
pub fn time_from_indices([hour, minute, period]: [usize; 3]) -> Option<NaiveTime> {
    let hour = u32::try_from(period * 12 + hour).ok()?;
    let minute = u32::try_from(minute).ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Accepts `HH:MM` (24-hour) or `HH:MM AM`/`HH:MMpm` (12-hour).
pub fn parse_time(input: &str) -> Result<NaiveTime> {
    let cleaned: String = input.split_whitespace().collect::<String>().to_uppercase();
    for format in ["%H:%M", "%I:%M%p"] {
        if let Ok(time) = NaiveTime::parse_from_str(&cleaned, format) {
            return Ok(time);
        }
    }
    bail!("unrecognised time {input:?} (expected HH:MM or HH:MM AM/PM)")
}

pub fn format_time(time: NaiveTime) -> String {
    time.format("%I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn parses_both_clock_styles() {
        assert_eq!(parse_time("21:05").unwrap(), hm(21, 5));
        assert_eq!(parse_time("09:30PM").unwrap(), hm(21, 30));
        assert_eq!(parse_time("09:30 am").unwrap(), hm(9, 30));
        assert_eq!(parse_time("12:00AM").unwrap(), hm(0, 0));
        assert_eq!(parse_time(" 12:15 pm ").unwrap(), hm(12, 15));
        assert!(parse_time("25:00").is_err());
        assert!(parse_time("noon").is_err());
    }

    #[test]
    fn indices_follow_the_twelve_hour_dial() {
        assert_eq!(indices_for(hm(0, 0)), [0, 0, 0]);
        assert_eq!(indices_for(hm(12, 30)), [0, 30, 1]);
        assert_eq!(indices_for(hm(23, 59)), [11, 59, 1]);
        assert_eq!(time_from_indices([5, 7, 1]), Some(hm(17, 7)));
        assert_eq!(time_from_indices([5, 60, 1]), None);
    }

    #[test]
    fn labels() {
        assert_eq!(WheelKind::Hour.label(0), "12");
        assert_eq!(WheelKind::Hour.label(3), "03");
        assert_eq!(WheelKind::Minute.label(59), "59");
        assert_eq!(WheelKind::Period.label(1), "PM");
        assert_eq!(format_time(hm(17, 5)), "05:05 PM");
    }
}
