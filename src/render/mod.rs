pub mod frame;
pub mod renderer;

pub use frame::{RenderSnapshot, RgbFrame, draw_frame};
pub use renderer::{HudStats, Renderer, render_grid, render_view};
