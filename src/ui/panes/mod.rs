//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`grid`]: The program grid with cursor, symbols and visit heat
//! - [`tape`]: Tape cells around the pointer
//! - [`details`]: Step, event, verdict and visited-cell list
//! - [`status`]: Status bar with keybindings and playback state
//!
//! Each pane module exports a primary `render_*` function. Panes read the
//! recorded snapshot and never touch the interpreter.

pub mod details;
pub mod grid;
pub mod status;
pub mod tape;

use crate::ui::theme::DEFAULT_THEME;
use ratatui::style::{Modifier, Style};

pub use details::{render_details_pane, DetailsRenderData};
pub use grid::render_grid_pane;
pub use status::render_status_bar;
pub use tape::render_tape_pane;

/// Border style shared by all framed panes
fn border_style(is_focused: bool) -> Style {
    if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    }
}
