//! Physics-driven selector wheels.
//!
//! [`core::selector::Selector`] is the entry point: a wrapping list of values
//! on a continuous axis, moved by drag and wheel input, coasting under
//! friction and easing onto the nearest value.  The `cog-picker` binary is a
//! terminal time-range picker built on it.

pub mod core;
