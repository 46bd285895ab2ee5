//! Core engine – easing, physics, scheduling, input conditioning and styling.
//!
//! Nothing in this module depends on any TUI or rendering crate, and nothing
//! reads a clock on its own: every time-dependent call takes a timestamp in
//! milliseconds.

pub mod clock;
pub mod easing;
pub mod input;
pub mod mapper;
pub mod motion;
pub mod scheduler;
pub mod selector;
pub mod style;
