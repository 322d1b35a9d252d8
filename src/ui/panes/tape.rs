//! Tape pane rendering

use crate::snapshot::Snapshot;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};

/// Render the tape window of `snapshot`, one cell per row
pub fn render_tape_pane(frame: &mut Frame, area: Rect, snapshot: Option<&Snapshot>, is_focused: bool) {
    let block = Block::default()
        .title(" Tape ")
        .borders(Borders::ALL)
        .border_style(super::border_style(is_focused));

    let Some(snapshot) = snapshot else {
        let paragraph = Paragraph::new("(no snapshot)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    };

    let start = snapshot.window_start();
    let lines: Vec<Line> = snapshot
        .tape_window
        .iter()
        .enumerate()
        .map(|(offset, &value)| {
            let address = start + offset as isize;
            let is_pointer = address == snapshot.pointer;
            let marker = if is_pointer { "▶ " } else { "  " };
            let row_style = if is_pointer {
                Style::default()
                    .bg(DEFAULT_THEME.current_line_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let value_color = if value == 0 {
                DEFAULT_THEME.comment
            } else {
                DEFAULT_THEME.number
            };
            Line::from(vec![
                Span::styled(marker, row_style.fg(DEFAULT_THEME.cursor)),
                Span::styled(format!("{:>6} ", address), row_style.fg(DEFAULT_THEME.comment)),
                Span::styled("│ ", row_style.fg(DEFAULT_THEME.border_normal)),
                Span::styled(format!("{:>11}", value), row_style.fg(value_color)),
            ])
        })
        .collect();

    let paragraph = Paragraph::new(lines).block(block.padding(Padding::new(1, 0, 0, 0)));
    frame.render_widget(paragraph, area);
}
