//! Pixel-buffer rasterizer for grid-world snapshots
//!
//! Frames are square, row-major RGB (`height x width x 3`). Drawing is
//! clipped to the canvas.

use crate::game::{GridPosition, Rgb, Target, VisitCounts};

pub const BACKGROUND: Rgb = (255, 255, 255);
pub const EPISODE_BOUNDARY: Rgb = (0, 0, 0);
pub const GRID_LINE: Rgb = (0, 0, 0);
pub const AGENT: Rgb = (0, 0, 255);
/// A target the agent is standing on
pub const TARGET_REACHED: Rgb = (0, 255, 0);

const GRID_LINE_WIDTH: i64 = 3;

/// Read-only view of the world handed to the renderer for a single call
#[derive(Debug, Clone, Copy)]
pub struct RenderSnapshot<'a> {
    pub agent: GridPosition,
    pub is_new_episode: bool,
    pub targets: &'a [Target],
    pub visits: &'a VisitCounts,
}

/// Yellow on the first visit, darkening towards (225, 25, 0)
pub fn visited_cell_color(times_visited: u32) -> Rgb {
    let extra = i64::from(times_visited.saturating_sub(1));
    let red = (255 - 2 * extra).max(225);
    let green = (255 - 45 * extra).max(25);
    (red as u8, green as u8, 0)
}

pub fn target_color(target: &Target, agent: GridPosition) -> Rgb {
    if target.is_hit(agent) {
        TARGET_REACHED
    } else {
        target.color
    }
}

/// An RGB image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbFrame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl RgbFrame {
    pub fn new(width: u32, height: u32, color: Rgb) -> Self {
        let mut frame = Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 3],
        };
        frame.fill(color);
        frame
    }

    pub fn fill(&mut self, (r, g, b): Rgb) {
        for px in self.data.chunks_exact_mut(3) {
            px.copy_from_slice(&[r, g, b]);
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        Some((self.data[idx], self.data[idx + 1], self.data[idx + 2]))
    }

    fn put(&mut self, x: i64, y: i64, (r, g, b): Rgb) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        self.data[idx..idx + 3].copy_from_slice(&[r, g, b]);
    }

    /// Fill the half-open rectangle `[x0, x1) x [y0, y1)`
    pub fn fill_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb) {
        let x0 = x0.max(0);
        let y0 = y0.max(0);
        let x1 = x1.min(i64::from(self.width));
        let y1 = y1.min(i64::from(self.height));
        for y in y0..y1 {
            for x in x0..x1 {
                self.put(x, y, color);
            }
        }
    }

    pub fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Rgb) {
        let x0 = (cx - radius).floor() as i64;
        let x1 = (cx + radius).ceil() as i64;
        let y0 = (cy - radius).floor() as i64;
        let y1 = (cy + radius).ceil() as i64;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f64 + 0.5 - cx;
                let dy = y as f64 + 0.5 - cy;
                if dx * dx + dy * dy <= radius * radius {
                    self.put(x, y, color);
                }
            }
        }
    }
}

/// Rasterize a snapshot onto a `window_size` square frame
pub fn draw_frame(snapshot: &RenderSnapshot<'_>, grid_size: usize, window_size: u32) -> RgbFrame {
    if snapshot.is_new_episode {
        return RgbFrame::new(window_size, window_size, EPISODE_BOUNDARY);
    }

    let mut frame = RgbFrame::new(window_size, window_size, BACKGROUND);
    let cell = f64::from(window_size) / grid_size.max(1) as f64;

    for (pos, times_visited) in snapshot.visits.iter() {
        fill_cell(&mut frame, pos, cell, visited_cell_color(times_visited));
    }

    for target in snapshot.targets {
        fill_cell(
            &mut frame,
            target.position,
            cell,
            target_color(target, snapshot.agent),
        );
    }

    frame.fill_circle(
        (f64::from(snapshot.agent.x) + 0.5) * cell,
        (f64::from(snapshot.agent.y) + 0.5) * cell,
        cell / 3.0,
        AGENT,
    );

    draw_grid_lines(&mut frame, grid_size, cell);
    frame
}

fn fill_cell(frame: &mut RgbFrame, pos: GridPosition, cell: f64, color: Rgb) {
    let x0 = (f64::from(pos.x) * cell).round() as i64;
    let y0 = (f64::from(pos.y) * cell).round() as i64;
    let x1 = (f64::from(pos.x + 1) * cell).round() as i64;
    let y1 = (f64::from(pos.y + 1) * cell).round() as i64;
    frame.fill_rect(x0, y0, x1, y1, color);
}

fn draw_grid_lines(frame: &mut RgbFrame, grid_size: usize, cell: f64) {
    let extent = i64::from(frame.width.max(frame.height));
    let half = GRID_LINE_WIDTH / 2;
    for i in 0..=grid_size {
        let offset = (i as f64 * cell).round() as i64;
        frame.fill_rect(0, offset - half, extent, offset - half + GRID_LINE_WIDTH, GRID_LINE);
        frame.fill_rect(offset - half, 0, offset - half + GRID_LINE_WIDTH, extent, GRID_LINE);
    }
}
