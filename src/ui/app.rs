//! Trace viewer state and event loop

use crate::snapshot::{Snapshot, SnapshotManager, VisitTally};
use crate::ui::panes;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Grid,
    Tape,
    Details,
}

impl FocusedPane {
    /// Move focus to the next pane (grid -> tape -> details)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Grid => FocusedPane::Tape,
            FocusedPane::Tape => FocusedPane::Details,
            FocusedPane::Details => FocusedPane::Grid,
        }
    }

    /// Move focus to the previous pane
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Grid => FocusedPane::Details,
            FocusedPane::Tape => FocusedPane::Grid,
            FocusedPane::Details => FocusedPane::Tape,
        }
    }
}

/// The main application state
pub struct App {
    /// Recorded run being replayed
    pub trace: SnapshotManager,

    /// Index of the snapshot on screen
    pub history_position: usize,

    /// Cell visit counts up to `history_position`
    visits: VisitTally,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Scroll offset of the details pane
    pub details_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Whether auto-play mode is active
    pub is_playing: bool,

    /// Time between steps in play mode
    pub play_interval: Duration,

    /// Last time a step was taken in play mode
    pub last_play_time: Instant,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl App {
    /// Create a viewer positioned at the first snapshot of `trace`
    pub fn new(trace: SnapshotManager, play_interval: Duration) -> Self {
        let status_message = if trace.is_truncated() {
            String::from("Ready! (trace truncated by memory limit)")
        } else {
            String::from("Ready!")
        };
        App {
            trace,
            history_position: 0,
            visits: VisitTally::default(),
            focused_pane: FocusedPane::Grid,
            details_scroll: 0,
            should_quit: false,
            status_message,
            is_playing: false,
            play_interval,
            last_play_time: Instant::now(),
            last_space_press: Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or(Instant::now()),
        }
    }

    /// Snapshot at the current history position
    pub fn current(&self) -> Option<&Snapshot> {
        self.trace.get(self.history_position)
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.is_playing && self.last_play_time.elapsed() >= self.play_interval {
                if self.step_forward() {
                    self.status_message = "Playing...".to_string();
                } else {
                    self.is_playing = false;
                    self.status_message = "Playback complete".to_string();
                }
                self.last_play_time = Instant::now();
            }

            // Use poll with timeout to allow auto-play to work
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(main_chunks[0]);

        // Right column: Tape (top) | Details (bottom)
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(columns[1]);

        let snapshot = self.trace.get(self.history_position);
        let visit_counts = self.visits.seek(&self.trace, self.history_position);

        panes::render_grid_pane(
            frame,
            columns[0],
            self.trace.grid(),
            snapshot,
            visit_counts,
            self.focused_pane == FocusedPane::Grid,
        );

        panes::render_tape_pane(
            frame,
            right_rows[0],
            snapshot,
            self.focused_pane == FocusedPane::Tape,
        );

        panes::render_details_pane(
            frame,
            right_rows[1],
            &panes::DetailsRenderData {
                snapshot,
                outcome: self.trace.outcome(),
                visited: self.trace.visited(),
                truncated: self.trace.is_truncated(),
                memory_usage: self.trace.memory_usage(),
                memory_limit: self.trace.memory_limit(),
            },
            self.focused_pane == FocusedPane::Details,
            &mut self.details_scroll,
        );

        panes::render_status_bar(
            frame,
            main_chunks[1],
            &self.status_message,
            self.history_position,
            self.trace.len(),
            self.is_playing,
        );
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            // Number keys step forward N times directly
            KeyCode::Char(c @ '1'..='9') => {
                self.is_playing = false;
                let n = c.to_digit(10).unwrap_or(1) as usize;
                let stepped = (0..n).take_while(|_| self.step_forward()).count();
                self.status_message = format!("Stepped forward {} step(s)", stepped);
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Left => {
                self.is_playing = false;
                self.status_message = if self.step_backward() {
                    "Stepped backward".to_string()
                } else {
                    "Cannot step backward: at start of trace".to_string()
                };
            }
            KeyCode::Right => {
                self.is_playing = false;
                self.status_message = if self.step_forward() {
                    "Stepped forward".to_string()
                } else {
                    "Cannot step forward: at end of trace".to_string()
                };
            }
            KeyCode::Up => {
                if self.focused_pane == FocusedPane::Details {
                    self.details_scroll = self.details_scroll.saturating_sub(1);
                }
            }
            KeyCode::Down => {
                if self.focused_pane == FocusedPane::Details {
                    self.details_scroll = self.details_scroll.saturating_add(1);
                }
            }
            KeyCode::Char(' ') => {
                // Toggle auto-play mode (with 200ms debounce to prevent key repeat spam)
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.is_playing = !self.is_playing;
                    if self.is_playing {
                        self.last_play_time = Instant::now()
                            .checked_sub(self.play_interval)
                            .unwrap_or(Instant::now());
                        self.status_message = "Playing...".to_string();
                    } else {
                        self.status_message = "Paused".to_string();
                    }
                }
            }
            KeyCode::Enter => {
                self.is_playing = false;
                self.jump_to_end();
                self.status_message = "Jumped to end".to_string();
            }
            KeyCode::Backspace => {
                self.is_playing = false;
                self.jump_to_start();
                self.status_message = "Jumped to start".to_string();
            }
            _ => {}
        }
    }

    /// Advance one snapshot; false at the end of the trace
    pub fn step_forward(&mut self) -> bool {
        if self.history_position + 1 < self.trace.len() {
            self.history_position += 1;
            true
        } else {
            false
        }
    }

    /// Go back one snapshot; false at the start of the trace
    pub fn step_backward(&mut self) -> bool {
        if self.history_position > 0 {
            self.history_position -= 1;
            true
        } else {
            false
        }
    }

    pub fn jump_to_end(&mut self) {
        self.history_position = self.trace.len().saturating_sub(1);
    }

    pub fn jump_to_start(&mut self) {
        self.history_position = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::parse::parse_grid;
    use crate::interpreter::engine::{Interpreter, RunConfig};
    use crossterm::event::KeyModifiers;

    fn recorded(text: &str) -> SnapshotManager {
        let grid = parse_grid(text).unwrap();
        let mut interpreter = Interpreter::new(grid.size(), RunConfig::default());
        interpreter.reset(&grid);
        let mut trace = SnapshotManager::new(1 << 20);
        interpreter.execute_recorded(100, &mut trace);
        trace
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_navigation_stays_in_bounds() {
        // Initial state plus four transitions
        let mut app = App::new(recorded("   \n   \n   "), Duration::from_millis(10));
        assert_eq!(app.trace.len(), 5);

        assert!(!app.step_backward());
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.history_position, 3);
        press(&mut app, KeyCode::Char('9'));
        assert_eq!(app.history_position, 4);
        assert!(!app.step_forward());

        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.history_position, 0);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.current().and_then(|s| s.step), Some(3));
    }

    #[test]
    fn test_focus_cycles() {
        let mut app = App::new(recorded(" "), Duration::from_millis(10));
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused_pane, FocusedPane::Tape);
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focused_pane, FocusedPane::Details);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
