//! Ratatui widgets for the scanview TUI.

pub mod confirm;
pub mod filter_bar;
pub mod help;
pub mod results_table;
pub mod status_bar;
