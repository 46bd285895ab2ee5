//! UI / rendering layer: everything that touches Ratatui widgets.
//!
//! This layer reads the selectors' `active_float` and the depth style and
//! turns them into cells on the terminal.  It never mutates a selector.

pub mod layout;
pub mod popup;
pub mod theme;
pub mod wheel_widget;
