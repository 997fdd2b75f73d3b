use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use find_target::game::{GridWorldConfig, RenderMode, Variant};
use find_target::modes::{HumanMode, RandomPolicy, RolloutConfig, RolloutMode};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "find_target")]
#[command(version, about = "Grid world where an agent has to find a target")]
struct Cli {
    /// Run mode
    #[arg(long, default_value = "human")]
    mode: Mode,

    /// Preset layout, ignored when --config is given
    #[arg(long, default_value = "fixed")]
    variant: VariantArg,

    /// Load the environment configuration from a JSON file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Cells per side of the grid
    #[arg(long)]
    size: Option<usize>,

    /// Render mode for rollouts: human or rgb_array
    #[arg(long)]
    render: Option<String>,

    /// Episodes to run in rollout mode
    #[arg(long, default_value = "100")]
    episodes: usize,

    /// Step cap per rollout episode
    #[arg(long, default_value = "100")]
    max_steps: u32,

    /// Log a summary every N episodes
    #[arg(long, default_value = "10")]
    log_frequency: usize,

    /// Seed for reproducible rollouts
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Play with the keyboard
    Human,
    /// Run a random policy headlessly and print a JSON summary
    Rollout,
}

#[derive(Clone, Copy, ValueEnum)]
enum VariantArg {
    Fixed,
    Randomized,
}

impl From<VariantArg> for Variant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Fixed => Variant::Fixed,
            VariantArg::Randomized => Variant::Randomized,
        }
    }
}

fn build_config(cli: &Cli) -> Result<GridWorldConfig> {
    let mut config = match &cli.config {
        Some(path) => GridWorldConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => GridWorldConfig::for_variant(cli.variant.into(), cli.size.unwrap_or(5)),
    };

    if let Some(size) = cli.size {
        config.size = size;
    }
    if let Some(name) = &cli.render {
        let mode: RenderMode = name.parse()?;
        config.render_mode = Some(mode);
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Log to stderr unless something else is drawing on the terminal
fn init_logging(terminal_in_use: bool) {
    if terminal_in_use {
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = build_config(&cli)?;

    let terminal_in_use =
        matches!(cli.mode, Mode::Human) || config.render_mode == Some(RenderMode::Human);
    init_logging(terminal_in_use);

    match cli.mode {
        Mode::Human => {
            let mut human_mode = HumanMode::new(config)?;
            human_mode.run().await?;
        }
        Mode::Rollout => {
            let rollout_config = RolloutConfig {
                episodes: cli.episodes,
                max_steps: cli.max_steps,
                log_frequency: cli.log_frequency,
                seed: cli.seed,
                ..RolloutConfig::default()
            };
            let mut rollout = RolloutMode::new(config, RandomPolicy, rollout_config)?;
            let summary = rollout.run()?;
            println!(
                "{}",
                serde_json::to_string_pretty(&summary).context("Failed to encode summary")?
            );
        }
    }

    Ok(())
}
