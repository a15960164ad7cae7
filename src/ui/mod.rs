//! UI / rendering layer: everything that touches Ratatui widgets.
//!
//! This layer reads the page layout and the styles the sticky manager
//! applied and turns them into cells on the terminal.  It never writes
//! engine state.

pub mod layout;
pub mod page_widget;
pub mod popup;
pub mod smooth_scroll;
pub mod spinner;
pub mod theme;
