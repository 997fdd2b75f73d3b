use std::io::{Stderr, stderr};
use std::time::{Duration, Instant};

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use tracing::debug;

use super::frame::{
    AGENT, EPISODE_BOUNDARY, RenderSnapshot, RgbFrame, draw_frame, target_color,
    visited_cell_color,
};
use crate::game::{GridPosition, RenderMode, Rgb};
use crate::rl::error::EnvError;

/// Counters shown above the grid
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HudStats {
    pub episode: usize,
    pub steps: u32,
    pub last_reward: f32,
    pub return_so_far: f32,
}

/// Renders grid-world snapshots as pixel buffers or to the terminal
///
/// In `Human` mode the renderer owns the terminal from the first frame until
/// `close`, and throttles itself to `render_fps`.
pub struct Renderer {
    mode: Option<RenderMode>,
    grid_size: usize,
    window_size: u32,
    render_fps: u32,
    terminal: Option<Terminal<CrosstermBackend<Stderr>>>,
    last_frame: Option<Instant>,
}

impl Renderer {
    pub fn new(mode: Option<RenderMode>, grid_size: usize, window_size: u32, render_fps: u32) -> Self {
        Self {
            mode,
            grid_size,
            window_size,
            render_fps,
            terminal: None,
            last_frame: None,
        }
    }

    /// Whether a terminal window is currently held
    pub fn is_open(&self) -> bool {
        self.terminal.is_some()
    }

    /// Explicit render request: returns a frame in `RgbArray` mode
    pub fn render(&mut self, snapshot: &RenderSnapshot<'_>) -> Result<Option<RgbFrame>, EnvError> {
        match self.mode {
            Some(RenderMode::RgbArray) => Ok(Some(self.render_frame(snapshot))),
            _ => Ok(None),
        }
    }

    /// Called after every reset/step; draws only in `Human` mode
    pub fn render_for_humans_if_needed(
        &mut self,
        snapshot: &RenderSnapshot<'_>,
    ) -> Result<(), EnvError> {
        if self.mode == Some(RenderMode::Human) {
            self.display(snapshot)?;
        }
        Ok(())
    }

    pub fn render_frame(&self, snapshot: &RenderSnapshot<'_>) -> RgbFrame {
        draw_frame(snapshot, self.grid_size, self.window_size)
    }

    fn display(&mut self, snapshot: &RenderSnapshot<'_>) -> Result<(), EnvError> {
        if self.terminal.is_none() {
            self.terminal = Some(open_terminal()?);
            debug!("opened terminal display");
        }

        let grid_size = self.grid_size;
        if let Some(terminal) = self.terminal.as_mut() {
            terminal
                .draw(|frame| {
                    let area = frame.area();
                    frame.render_widget(render_grid(snapshot, grid_size), area);
                })
                .map_err(display_error)?;
        }

        self.hold_frame_rate();
        Ok(())
    }

    /// Sleep so consecutive frames are at least `1 / render_fps` apart
    fn hold_frame_rate(&mut self) {
        let frame_time = Duration::from_secs_f64(1.0 / f64::from(self.render_fps.max(1)));
        if let Some(last) = self.last_frame {
            let elapsed = last.elapsed();
            if elapsed < frame_time {
                std::thread::sleep(frame_time - elapsed);
            }
        }
        self.last_frame = Some(Instant::now());
    }

    /// Give the terminal back. Does nothing when no window is open.
    pub fn close(&mut self) -> Result<(), EnvError> {
        if let Some(mut terminal) = self.terminal.take() {
            disable_raw_mode().map_err(display_error)?;
            execute!(terminal.backend_mut(), LeaveAlternateScreen).map_err(display_error)?;
            terminal.show_cursor().map_err(display_error)?;
            debug!("closed terminal display");
        }
        self.last_frame = None;
        Ok(())
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

fn open_terminal() -> Result<Terminal<CrosstermBackend<Stderr>>, EnvError> {
    enable_raw_mode().map_err(display_error)?;
    let mut stderr = stderr();
    execute!(stderr, EnterAlternateScreen).map_err(display_error)?;
    let backend = CrosstermBackend::new(stderr);
    let mut terminal = Terminal::new(backend).map_err(display_error)?;
    terminal.hide_cursor().map_err(display_error)?;
    terminal.clear().map_err(display_error)?;
    Ok(terminal)
}

fn display_error(err: std::io::Error) -> EnvError {
    EnvError::Display(err.to_string())
}

fn rgb(color: Rgb) -> Color {
    Color::Rgb(color.0, color.1, color.2)
}

/// Style of one grid cell in the terminal view
fn cell_span(snapshot: &RenderSnapshot<'_>, pos: GridPosition) -> Span<'static> {
    if snapshot.is_new_episode {
        return Span::styled("  ", Style::default().bg(rgb(EPISODE_BOUNDARY)));
    }

    let target = snapshot.targets.iter().find(|target| target.is_hit(pos));
    let background = match target {
        Some(target) => rgb(target_color(target, snapshot.agent)),
        None => match snapshot.visits.get(pos) {
            0 => Color::White,
            n => rgb(visited_cell_color(n)),
        },
    };

    if pos == snapshot.agent {
        Span::styled(
            "● ",
            Style::default()
                .fg(rgb(AGENT))
                .bg(background)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled("  ", Style::default().bg(background))
    }
}

/// Build the grid widget for a snapshot
pub fn render_grid(snapshot: &RenderSnapshot<'_>, grid_size: usize) -> Paragraph<'static> {
    let mut lines = Vec::with_capacity(grid_size);

    for y in 0..grid_size {
        let spans: Vec<Span<'static>> = (0..grid_size)
            .map(|x| cell_span(snapshot, GridPosition::new(x as i32, y as i32)))
            .collect();
        lines.push(Line::from(spans));
    }

    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::White))
                .title(" Find Target "),
        )
        .alignment(Alignment::Center)
}

/// Full-screen layout used by the interactive mode: stats, grid, controls
pub fn render_view(
    frame: &mut Frame,
    snapshot: &RenderSnapshot<'_>,
    grid_size: usize,
    stats: &HudStats,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Grid
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    frame.render_widget(render_stats(stats), chunks[0]);
    frame.render_widget(render_grid(snapshot, grid_size), chunks[1]);
    frame.render_widget(render_controls(), chunks[2]);
}

fn render_stats(stats: &HudStats) -> Paragraph<'static> {
    let label = Style::default().fg(Color::Yellow);
    let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
    let text = vec![Line::from(vec![
        Span::styled("Episode: ", label),
        Span::styled(stats.episode.to_string(), value),
        Span::raw("    "),
        Span::styled("Steps: ", label),
        Span::styled(stats.steps.to_string(), value),
        Span::raw("    "),
        Span::styled("Reward: ", label),
        Span::styled(format!("{:+}", stats.last_reward), value),
        Span::raw("    "),
        Span::styled("Return: ", label),
        Span::styled(format!("{}", stats.return_so_far), value),
    ])];

    Paragraph::new(text).alignment(Alignment::Center)
}

fn render_controls() -> Paragraph<'static> {
    let text = vec![Line::from(vec![
        Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
        Span::raw(" or "),
        Span::styled("WASD", Style::default().fg(Color::Cyan)),
        Span::raw(" to move | "),
        Span::styled("R", Style::default().fg(Color::Green)),
        Span::raw(" to restart | "),
        Span::styled("Q", Style::default().fg(Color::Red)),
        Span::raw(" to quit"),
    ])];

    Paragraph::new(text).alignment(Alignment::Center)
}
