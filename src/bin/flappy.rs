//! Flappy CLI - Q-learning trainer for a Flappy Bird clone
//!
//! This CLI provides:
//! - Training with resumable sessions (`flappy train`)
//! - Greedy evaluation of a trained agent (`flappy evaluate`)

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "flappy")]
#[command(version, about = "Flappy Bird Q-learning trainer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the agent (resumes from the session file when present)
    Train(flappy::cli::commands::train::TrainArgs),

    /// Let a trained agent play greedily (no learning, nothing saved)
    Evaluate(flappy::cli::commands::evaluate::EvaluateArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => flappy::cli::commands::train::execute(args),
        Commands::Evaluate(args) => flappy::cli::commands::evaluate::execute(args),
    }
}
