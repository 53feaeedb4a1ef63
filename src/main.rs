#![recursion_limit = "256"]

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use snake_dqn::ai::SnakeAgent;
use snake_dqn::config::AppConfig;
use snake_dqn::game::{RenderContext, SnakeGame};
use snake_dqn::logging;
use snake_dqn::training::{play_greedy_game, ScoreHistory};

/// Watch a trained Snake agent play.
#[derive(Parser)]
#[command(name = "snake_dqn", about = "Play Snake with a trained DQN agent")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Override model directory
    #[arg(long)]
    model_dir: Option<PathBuf>,

    /// Use the newest model instead of the best one
    #[arg(long)]
    latest: bool,

    /// Number of games to play
    #[arg(long, default_value_t = 1)]
    games: usize,

    /// Print the board after every step
    #[arg(long)]
    render: bool,

    /// Delay between rendered frames in milliseconds
    #[arg(long, default_value_t = 50)]
    delay_ms: u64,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut app_config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    if let Some(dir) = cli.model_dir {
        app_config.agent.model_dir = dir;
    }
    app_config.validate().context("invalid configuration")?;

    let mut agent = SnakeAgent::new(app_config.agent.clone());
    let loaded = if cli.latest {
        agent.load_latest_model()
    } else {
        agent.load_best_model()
    };
    if loaded {
        info!(
            best_score = agent.get_loaded_best_score(),
            mean_score = agent.get_loaded_mean_score(),
            "playing with saved model"
        );
    } else {
        warn!("no saved model found, playing with untrained weights");
    }

    let mut game = match cli.seed {
        Some(seed) => SnakeGame::with_seed(app_config.game.clone(), seed),
        None => SnakeGame::new(app_config.game.clone()),
    };
    let mut render = RenderContext::new();
    let delay = Duration::from_millis(cli.delay_ms);
    let mut history = ScoreHistory::new();

    for game_idx in 1..=cli.games {
        let outcome = play_greedy_game(&agent, &mut game, |g| {
            if cli.render {
                print!("\x1b[2J\x1b[H{}", render.render(g));
                thread::sleep(delay);
            }
        });
        let mean = history.record_game(outcome.score);
        println!(
            "Game {game_idx}: score {} in {} steps ({:?}) | mean {mean:.2}",
            outcome.score, outcome.steps, outcome.status
        );
    }

    let stats = history.statistics();
    println!(
        "Played {} games | max {} | min {} | mean {:.2}",
        stats.total_games, stats.max, stats.min, stats.mean
    );

    Ok(())
}
