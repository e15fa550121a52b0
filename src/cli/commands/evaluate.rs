//! Evaluate command - let the trained agent play greedily
//!
//! Evaluation forces epsilon to 0 and performs no Q-table updates, so the
//! learned policy is exercised without being contaminated. Nothing is
//! persisted.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;

use crate::{
    adapters::MsgPackRepository,
    cli::commands::train::{parse_buckets, parse_reward_schedule},
    cli::output::{format_number, print_section},
    game::{Discretizer, FlappyEnvironment, FlappyGame, GameConfig, RewardSchedule},
    ports::SessionRepository,
    q_learning::Trainer,
};

#[derive(Parser, Debug)]
#[command(about = "Evaluate a trained agent", allow_negative_numbers = true)]
pub struct EvaluateArgs {
    /// Path to the trained session file
    pub session: PathBuf,

    /// Random seed for reproducible pipe layouts
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
}

pub fn execute(args: EvaluateArgs) -> Result<()> {
    if !args.session.is_file() {
        return Err(anyhow!(
            "no session found at '{}' - run `flappy train` first",
            args.session.display()
        ));
    }

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
        .with_frame_skip(args.frame_skip)
        .with_announcements(true);

    println!("Loading session from: {}", args.session.display());
    let repo = MsgPackRepository::new();
    let session = repo.load(&args.session)?;

    print_section("Loaded Session Info");
    println!("Steps trained: {}", format_number(session.step_count()));
    println!(
        "Q-values:      {}",
        format_number(session.table_len() as u64)
    );
    let stored = session.hyperparameters();
    println!(
        "Trained with:  α={} γ={} ε={}",
        stored.alpha, stored.gamma, stored.epsilon
    );

    let mut trainer = Trainer::from_session(env, session, stored)?;
    if let Some(seed) = args.seed {
        trainer = trainer.with_seed(seed);
    }
    if let Some(limit) = args.max_steps {
        trainer = trainer.with_max_steps(limit);
    }

    println!("\nEvaluation started (greedy play). Press Ctrl-C to stop.");

    let token = trainer.cancel_token();
    ctrlc::set_handler(move || token.cancel()).context("failed to install Ctrl-C handler")?;

    let report = trainer.evaluate()?;
    let stats = trainer.environment().stats();

    print_section("Evaluation Complete");
    println!("Steps played: {}", format_number(report.steps_run));
    println!("Total reward: {:+.0}", report.total_reward);
    println!("Episodes:     {}", format_number(stats.episodes));
    println!("Best score:   {}", stats.best_score);
    println!("Mean score:   {:.2}", stats.mean_score());

    Ok(())
}
