#![recursion_limit = "256"]

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use snake_dqn::ai::SnakeAgent;
use snake_dqn::config::AppConfig;
use snake_dqn::game::SnakeGame;
use snake_dqn::logging;
use snake_dqn::training::Trainer;

/// Train a Snake agent with Double-DQN.
#[derive(Parser)]
#[command(name = "train", about = "Train a Snake DQN agent")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Override number of games (0 trains until Ctrl-C)
    #[arg(long)]
    games: Option<usize>,

    /// Override learning rate
    #[arg(long)]
    lr: Option<f64>,

    /// Override model directory
    #[arg(long)]
    model_dir: Option<PathBuf>,

    /// Start from fresh weights instead of a saved model
    #[arg(long)]
    fresh: bool,

    /// Resume from the newest model instead of the best one
    #[arg(long, conflicts_with = "fresh")]
    latest: bool,

    /// Seed for exploration, replay sampling, and food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", AppConfig::default_toml().context("serializing default config")?);
        return Ok(());
    }

    logging::init(cli.verbose);

    let mut app_config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(games) = cli.games {
        app_config.training.num_games = games;
    }
    if let Some(lr) = cli.lr {
        app_config.agent.learning_rate = lr;
    }
    if let Some(dir) = cli.model_dir {
        app_config.agent.model_dir = dir;
    }
    app_config.validate().context("invalid configuration")?;

    let (mut agent, mut game) = match cli.seed {
        Some(seed) => (
            SnakeAgent::with_seed(app_config.agent.clone(), seed),
            SnakeGame::with_seed(app_config.game.clone(), seed),
        ),
        None => (
            SnakeAgent::new(app_config.agent.clone()),
            SnakeGame::new(app_config.game.clone()),
        ),
    };

    if cli.fresh {
        info!("starting from fresh weights");
    } else {
        let loaded = if cli.latest {
            agent.load_latest_model()
        } else {
            agent.load_best_model()
        };
        if !loaded {
            warn!(
                dir = %app_config.agent.model_dir.display(),
                "no saved model found, starting fresh training"
            );
        }
    }

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = Arc::clone(&stop);
        ctrlc::set_handler(move || {
            if !stop.swap(true, Ordering::SeqCst) {
                eprintln!("\nSIGINT received, finishing the current step...");
            }
        })
        .context("installing Ctrl-C handler")?;
    }

    let trainer = Trainer::new(app_config.training.clone());
    let summary = trainer
        .train(&mut agent, &mut game, &stop)
        .context("training failed")?;

    let stats = summary.statistics;
    println!("-------------------------------------------");
    println!(
        "Games: {} | Record: {} | Best mean: {:.2} | Last 10 mean: {:.2}",
        summary.games_played, summary.record, summary.best_mean_score, stats.last_10_mean
    );
    if let Some(version) = agent.version() {
        println!(
            "Model version: v{version:03} in {}",
            app_config.agent.model_dir.display()
        );
    }

    Ok(())
}
