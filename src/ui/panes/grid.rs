//! Grid pane rendering
//!
//! Draws the program with a one-cell margin so the cursor stays visible
//! before it enters the grid and after it leaves. The cursor is shown as an
//! arrow pointing in its facing direction. Cells the cursor has stood on
//! are shaded by how often it has been there.

use crate::grid::position::Position;
use crate::grid::{Grid, Symbol};
use crate::snapshot::Snapshot;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use rustc_hash::FxHashMap;

/// Visits at which a cell counts as hot
const HOT_VISITS: u32 = 4;

pub fn render_grid_pane(
    frame: &mut Frame,
    area: Rect,
    grid: &Grid,
    snapshot: Option<&Snapshot>,
    visit_counts: &FxHashMap<usize, u32>,
    is_focused: bool,
) {
    let block = Block::default()
        .title(format!(" Grid {0}×{0} ", grid.size()))
        .borders(Borders::ALL)
        .border_style(super::border_style(is_focused));

    let size = grid.size() as i32;
    let lines: Vec<Line> = (-1..=size)
        .map(|y| {
            let spans: Vec<Span> = (-1..=size)
                .map(|x| cell_span(grid, Position::new(x, y, grid.size()), snapshot, visit_counts))
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn cell_span<'a>(
    grid: &Grid,
    position: Position,
    snapshot: Option<&Snapshot>,
    visit_counts: &FxHashMap<usize, u32>,
) -> Span<'a> {
    if let Some(snapshot) = snapshot.filter(|s| s.position == position) {
        return Span::styled(
            format!(" {} ", snapshot.direction.arrow()),
            Style::default()
                .fg(DEFAULT_THEME.cursor)
                .bg(DEFAULT_THEME.current_line_bg)
                .add_modifier(Modifier::BOLD),
        );
    }

    let Some(address) = position.address() else {
        return Span::styled(" · ", Style::default().fg(DEFAULT_THEME.border_normal));
    };

    let (glyph, mut style) = match grid.at(address) {
        Symbol::Blank => ('.', Style::default().fg(DEFAULT_THEME.comment)),
        Symbol::Branch => ('+', Style::default().fg(DEFAULT_THEME.branch)),
        Symbol::Operator => ('*', Style::default().fg(DEFAULT_THEME.operator)),
    };
    match visit_counts.get(&address).copied().unwrap_or(0) {
        0 => {}
        n if n >= HOT_VISITS => style = style.bg(DEFAULT_THEME.hot_bg),
        _ => style = style.bg(DEFAULT_THEME.visited_bg),
    }
    Span::styled(format!(" {} ", glyph), style)
}
