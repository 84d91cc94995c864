#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use rl::{run_episode, NeedleEnv, RandomPolicy};

/// Run random-baseline episodes on a needle-master level.
#[derive(Parser)]
struct Args {
    /// Level description file.
    #[arg(long)]
    level: PathBuf,
    /// Number of episodes to run.
    #[arg(long, default_value_t = 10)]
    episodes: u32,
    /// Per-episode step budget.
    #[arg(long, default_value_t = 200)]
    max_steps: usize,
    /// Action dimensionality: 1 (heading delta) or 2 (linear + angular).
    #[arg(long, default_value_t = 1)]
    action_dim: usize,
    /// Seed for the random policy.
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let level = sim::Level::from_file(&args.level)?;
    tracing::info!(
        width = level.width,
        height = level.height,
        gates = level.gates.len(),
        surfaces = level.surfaces.len(),
        "level loaded"
    );

    let mut env = NeedleEnv::new(level, args.action_dim)?;
    let mut policy = RandomPolicy::new(args.action_dim, args.seed);

    let mut best_reward = f32::NEG_INFINITY;
    for episode in 1..=args.episodes {
        let stats = run_episode(&mut env, &mut policy, args.max_steps);
        best_reward = best_reward.max(stats.total_reward);
        let inner = env.inner();
        let passed = inner
            .gates
            .iter()
            .filter(|g| g.status() == sim::GateStatus::Passed)
            .count();
        tracing::info!(
            episode,
            steps = stats.steps,
            reward = stats.total_reward,
            damage = inner.damage,
            gates_passed = passed,
            "episode finished"
        );
    }
    tracing::info!(best_reward, "run complete");

    Ok(())
}
