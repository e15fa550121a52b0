//! Train command - run the Q-learning loop against the flappy environment

use std::{fs::File, path::PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    adapters::MsgPackRepository,
    cli::output::{format_number, print_section},
    game::{Discretizer, EpisodeStats, FlappyEnvironment, FlappyGame, GameConfig, RewardSchedule},
    q_learning::{Hyperparameters, ProgressObserver, Trainer, TrainingReport},
};

#[derive(Parser, Debug)]
#[command(about = "Train the Q-learning agent", allow_negative_numbers = true)]
pub struct TrainArgs {
    /// Session file holding the Q-table, step counter and hyperparameters
    #[arg(long, short = 's', default_value = "flappy-session.msgpack")]
    pub session: PathBuf,

    /// Learning rate α, in (0, 1]
    #[arg(long, default_value_t = 0.95)]
    pub alpha: f64,

    /// Discount factor γ, in [0, 1)
    #[arg(long, default_value_t = 0.4)]
    pub gamma: f64,

    /// Exploration probability ε, in [0, 1]
    #[arg(long, default_value_t = 0.5)]
    pub epsilon: f64,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Stop after this many steps (default: run until Ctrl-C)
    #[arg(long)]
    pub max_steps: Option<u64>,

    /// Game frames advanced per chosen action
    #[arg(long, default_value_t = 10)]
    pub frame_skip: u32,

    /// Height of the playing field in pixels
    #[arg(long, default_value_t = 480)]
    pub field_height: i64,

    /// Reward schedule (passed=300,collided=-300,step=0)
    #[arg(long)]
    pub reward: Option<String>,

    /// Discretization bucket divisors (dist=10,offset=10,vel=5)
    #[arg(long)]
    pub buckets: Option<String>,

    /// Show progress
    #[arg(long, default_value_t = true)]
    pub progress: bool,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct SummaryMetadata {
    alpha: f64,
    gamma: f64,
    epsilon: f64,
    frame_skip: u32,
    field_height: i64,
    seed: Option<u64>,
    session: PathBuf,
}

#[derive(Debug, Serialize)]
struct TrainingSummaryFile {
    training: TrainingReport,
    episodes: EpisodeStats,
    metadata: SummaryMetadata,
}

/// Parse a reward schedule from string (e.g., "passed=300,collided=-300,step=0")
pub(crate) fn parse_reward_schedule(s: &str) -> Result<RewardSchedule> {
    let mut schedule = RewardSchedule::default();

    for part in s.split(',') {
        let trimmed = part.trim();
        if trimmed.is_empty() {
            continue;
        }
        let (key, value_str) = trimmed
            .split_once('=')
            .ok_or_else(|| anyhow!("Invalid reward entry '{trimmed}'. Expected key=value"))?;
        let value: f64 = value_str
            .trim()
            .parse()
            .map_err(|_| anyhow!("Invalid numeric reward '{value_str}' in '{trimmed}'"))?;
        match key.trim().to_ascii_lowercase().as_str() {
            "passed" => schedule.passed = value,
            "collided" => schedule.collided = value,
            "step" => schedule.step = value,
            other => {
                return Err(anyhow!(
                    "Unknown reward key '{other}'. Expected passed, collided, or step"
                ));
            }
        }
    }

    Ok(schedule)
}

/// Parse bucket divisors from string (e.g., "dist=10,offset=10,vel=5")
pub(crate) fn parse_buckets(s: &str) -> Result<Discretizer> {
    let mut dist = 10i64;
    let mut offset = 10i64;
    let mut vel = 5i64;

    for part in s.split(',') {
        let trimmed = part.trim();
        if trimmed.is_empty() {
            continue;
        }
        let (key, value_str) = trimmed
            .split_once('=')
            .ok_or_else(|| anyhow!("Invalid bucket entry '{trimmed}'. Expected key=value"))?;
        let value: i64 = value_str
            .trim()
            .parse()
            .map_err(|_| anyhow!("Invalid bucket divisor '{value_str}' in '{trimmed}'"))?;
        match key.trim().to_ascii_lowercase().as_str() {
            "dist" => dist = value,
            "offset" => offset = value,
            "vel" => vel = value,
            other => {
                return Err(anyhow!(
                    "Unknown bucket key '{other}'. Expected dist, offset, or vel"
                ));
            }
        }
    }

    Ok(Discretizer::new(dist, offset, vel)?)
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let hyper = Hyperparameters::new(args.alpha, args.gamma, args.epsilon)?;

    let rewards = match args.reward {
        Some(ref spec) => parse_reward_schedule(spec)?,
        None => RewardSchedule::default(),
    };
    let discretizer = match args.buckets {
        Some(ref spec) => parse_buckets(spec)?,
        None => Discretizer::default(),
    };

    let config = GameConfig {
        field_height: args.field_height,
        ..GameConfig::default()
    };
    let game = match args.seed {
        Some(seed) => FlappyGame::with_seed(config, seed.wrapping_add(1)),
        None => FlappyGame::new(config),
    };
    let env = FlappyEnvironment::new(game, discretizer)
        .with_rewards(rewards)
        .with_frame_skip(args.frame_skip);

    let repo = MsgPackRepository::new();
    let resuming = args.session.is_file();

    let mut trainer = Trainer::bootstrap(env, hyper, &repo, &args.session)?;
    if let Some(seed) = args.seed {
        trainer = trainer.with_seed(seed);
    }
    if let Some(limit) = args.max_steps {
        trainer = trainer.with_max_steps(limit);
    }
    if args.progress {
        trainer = trainer.with_observer(Box::new(ProgressObserver::new()));
    }

    if resuming {
        println!(
            "Resuming session from {} ({} steps so far)",
            args.session.display(),
            format_number(trainer.step_count())
        );
    } else {
        println!(
            "Initialized Q-table over {} state-action pairs",
            format_number(trainer.table().len() as u64)
        );
    }
    println!(
        "Training started, using α={} γ={} ε={}. Press Ctrl-C to stop and save.",
        hyper.alpha, hyper.gamma, hyper.epsilon
    );

    // Ctrl-C flips the cancellation token; the loop finishes its current
    // iteration, then persists and exits.
    let token = trainer.cancel_token();
    ctrlc::set_handler(move || token.cancel()).context("failed to install Ctrl-C handler")?;

    let report = trainer.train(&repo, &args.session)?;
    let stats = *trainer.environment().stats();

    print_section("Training Complete");
    println!("Steps this run: {}", format_number(report.steps_run));
    println!("Total steps:    {}", format_number(report.total_steps));
    println!("Total reward:   {:+.0}", report.total_reward);
    println!("Episodes:       {}", format_number(stats.episodes));
    println!("Best score:     {}", stats.best_score);
    println!("Mean score:     {:.2}", stats.mean_score());
    println!("\n✓ Session saved to: {}", args.session.display());

    if let Some(ref summary_path) = args.summary {
        if let Some(parent) = summary_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let summary = TrainingSummaryFile {
            training: report,
            episodes: stats,
            metadata: SummaryMetadata {
                alpha: hyper.alpha,
                gamma: hyper.gamma,
                epsilon: hyper.epsilon,
                frame_skip: args.frame_skip,
                field_height: args.field_height,
                seed: args.seed,
                session: args.session.clone(),
            },
        };

        let file = File::create(summary_path)
            .with_context(|| format!("failed to create summary file {}", summary_path.display()))?;
        to_writer_pretty(file, &summary)?;
        println!("Summary written to {}", summary_path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reward_schedule_parses_partial_overrides() {
        let schedule = parse_reward_schedule("passed=500,step=-1").unwrap();
        assert_eq!(schedule.passed, 500.0);
        assert_eq!(schedule.collided, -300.0);
        assert_eq!(schedule.step, -1.0);
    }

    #[test]
    fn reward_schedule_rejects_unknown_keys() {
        assert!(parse_reward_schedule("bonus=5").is_err());
        assert!(parse_reward_schedule("passed").is_err());
        assert!(parse_reward_schedule("passed=abc").is_err());
    }

    #[test]
    fn buckets_parse_and_validate() {
        let discretizer = parse_buckets("dist=20,vel=10").unwrap();
        assert_eq!(discretizer, Discretizer::new(20, 10, 10).unwrap());

        assert!(parse_buckets("dist=0").is_err());
        assert!(parse_buckets("width=3").is_err());
    }
}
