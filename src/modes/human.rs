use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::interval;

use crate::game::{Action, GridWorldConfig};
use crate::input::{InputHandler, KeyAction};
use crate::render::{HudStats, render_view};
use crate::rl::{Env, FindTargetEnv};

/// Keyboard play: every key press is one environment step
///
/// The mode owns the terminal itself, so the environment is created without
/// a render mode and drawn through `render_view`.
pub struct HumanMode {
    env: FindTargetEnv,
    hud: HudStats,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GridWorldConfig) -> Result<Self> {
        let mut env = FindTargetEnv::new(config.with_render_mode(None))
            .context("Failed to create environment")?;
        env.reset(None, None)
            .context("Failed to reset environment")?;

        Ok(Self {
            env,
            hud: HudStats {
                episode: 1,
                ..HudStats::default()
            },
            input_handler: InputHandler::new(),
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let result = self.run_loop(&mut terminal).await;

        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Redraw at 30 FPS
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event)?;
                    }
                }

                _ = render_timer.tick() => {
                    let grid_size = self.env.config().size;
                    let snapshot = self.env.snapshot();
                    let hud = self.hud;
                    terminal.draw(|frame| {
                        render_view(frame, &snapshot, grid_size, &hud);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Move(action) => self.apply_move(action)?,
                KeyAction::Restart => self.new_episode()?,
                KeyAction::Quit => self.should_quit = true,
                KeyAction::None => {}
            }
        }

        Ok(())
    }

    fn apply_move(&mut self, action: Action) -> Result<()> {
        let step = self.env.step(action).context("Failed to step environment")?;

        self.hud.steps = step.info.steps;
        self.hud.last_reward = step.reward;
        self.hud.return_so_far += step.reward;

        if step.terminated || step.truncated {
            self.new_episode()?;
        }

        Ok(())
    }

    /// Reset the environment; the first frame of the new episode is black
    fn new_episode(&mut self) -> Result<()> {
        self.env
            .reset(None, None)
            .context("Failed to reset environment")?;
        self.hud.episode += 1;
        self.hud.steps = 0;
        self.hud.return_so_far = 0.0;
        Ok(())
    }

    fn cleanup_terminal(&mut self, terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GridPosition, TargetSpec};

    fn scenario_config() -> GridWorldConfig {
        let mut config = GridWorldConfig::fixed(5);
        config.targets = vec![TargetSpec::stationary(10, Some(GridPosition::new(2, 3)))];
        config
    }

    #[test]
    fn test_mode_initialization() {
        let mode = HumanMode::new(GridWorldConfig::default()).unwrap();
        assert_eq!(mode.hud.episode, 1);
        assert_eq!(mode.hud.steps, 0);
        assert!(mode.env.state().is_new_episode);
        assert_eq!(mode.env.config().render_mode, None);
    }

    #[test]
    fn test_moves_update_hud() {
        let mut mode = HumanMode::new(scenario_config()).unwrap();
        mode.apply_move(Action::Right).unwrap();
        mode.apply_move(Action::Up).unwrap();

        assert_eq!(mode.hud.steps, 2);
        assert_eq!(mode.hud.last_reward, -1.0);
        assert_eq!(mode.hud.return_so_far, -2.0);
        assert_eq!(mode.env.state().agent, GridPosition::new(1, 0));
    }

    #[test]
    fn test_reaching_target_starts_new_episode() {
        let mut mode = HumanMode::new(scenario_config()).unwrap();
        for action in [
            Action::Right,
            Action::Right,
            Action::Down,
            Action::Down,
            Action::Down,
        ] {
            mode.apply_move(action).unwrap();
        }

        assert_eq!(mode.hud.episode, 2);
        assert_eq!(mode.hud.last_reward, 10.0);
        assert_eq!(mode.hud.return_so_far, 0.0);
        assert_eq!(mode.env.state().agent, GridPosition::new(0, 0));
        assert!(mode.env.state().is_new_episode);
    }

    #[test]
    fn test_restart_and_quit_keys() {
        use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

        let mut mode = HumanMode::new(scenario_config()).unwrap();
        mode.apply_move(Action::Right).unwrap();

        let r = Event::Key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE));
        mode.handle_event(r).unwrap();
        assert_eq!(mode.hud.episode, 2);
        assert_eq!(mode.env.state().agent, GridPosition::new(0, 0));

        let q = Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE));
        mode.handle_event(q).unwrap();
        assert!(mode.should_quit);
    }
}
