//! Run details pane: current transition, verdict and visited cells

use crate::interpreter::engine::{Outcome, StepEvent};
use crate::snapshot::Snapshot;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};

/// Everything the details pane shows
pub struct DetailsRenderData<'a> {
    pub snapshot: Option<&'a Snapshot>,
    pub outcome: Option<Outcome>,
    pub visited: &'a [usize],
    pub truncated: bool,
    pub memory_usage: usize,
    pub memory_limit: usize,
}

pub fn render_details_pane(
    frame: &mut Frame,
    area: Rect,
    data: &DetailsRenderData<'_>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = Block::default()
        .title(" Run ")
        .borders(Borders::ALL)
        .border_style(super::border_style(is_focused))
        .padding(Padding::new(1, 0, 0, 0));

    let label = Style::default().fg(DEFAULT_THEME.comment);
    let value = Style::default().fg(DEFAULT_THEME.fg);
    let mut lines = Vec::new();

    if let Some(snapshot) = data.snapshot {
        let step = snapshot
            .step
            .map_or_else(|| "initial".to_string(), |s| s.to_string());
        lines.push(Line::from(vec![
            Span::styled("step      ", label),
            Span::styled(step, value),
        ]));
        lines.push(Line::from(vec![
            Span::styled("event     ", label),
            Span::styled(event_text(snapshot.event), value),
        ]));
        lines.push(Line::from(vec![
            Span::styled("cursor    ", label),
            Span::styled(
                format!("{} facing {}", snapshot.position, snapshot.direction),
                value,
            ),
        ]));
        lines.push(Line::from(vec![
            Span::styled("pointer   ", label),
            Span::styled(snapshot.pointer.to_string(), value),
        ]));
        lines.push(Line::from(vec![
            Span::styled("visited   ", label),
            Span::styled(snapshot.visited_count.to_string(), value),
        ]));
    }

    let (verdict, verdict_color) = match data.outcome {
        Some(Outcome::Finite(steps)) => (format!("finite ({} steps)", steps), DEFAULT_THEME.success),
        Some(Outcome::Infinite) => ("infinite".to_string(), DEFAULT_THEME.secondary),
        Some(Outcome::Error(reason)) => (format!("error: {}", reason), DEFAULT_THEME.error),
        None => ("pending".to_string(), DEFAULT_THEME.comment),
    };
    lines.push(Line::from(vec![
        Span::styled("verdict   ", label),
        Span::styled(
            verdict,
            Style::default()
                .fg(verdict_color)
                .add_modifier(Modifier::BOLD),
        ),
    ]));

    if data.truncated {
        lines.push(Line::from(Span::styled(
            format!(
                "trace truncated at {} of {} bytes",
                data.memory_usage, data.memory_limit
            ),
            Style::default().fg(DEFAULT_THEME.error),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("read order", label)));
    let order: Vec<String> = data.visited.iter().map(|a| a.to_string()).collect();
    for chunk in order.chunks(8) {
        lines.push(Line::from(Span::styled(chunk.join(" "), value)));
    }

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    if lines.len() > visible_height {
        *scroll_offset = (*scroll_offset).min(lines.len() - visible_height);
    } else {
        *scroll_offset = 0;
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((*scroll_offset as u16, 0));
    frame.render_widget(paragraph, area);
}

fn event_text(event: Option<StepEvent>) -> String {
    match event {
        None => "-".to_string(),
        Some(StepEvent::Moved) => "moved".to_string(),
        Some(StepEvent::Exited) => "exited the grid".to_string(),
        Some(StepEvent::Overflow(err)) => format!("overflow: {}", err),
        Some(StepEvent::Spin) => "spinning in place".to_string(),
    }
}
