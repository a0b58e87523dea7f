use std::path::{Path, PathBuf};
use std::time::Duration;
use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use crate::models::{Roster, Skill};
use crate::optimizer::evaluator::{evaluate, TeamSplit};
use crate::optimizer::{Solver, SolverConfig, DEFAULT_DESIRED_DIFFERENCE, DEFAULT_MAX_RETRIES};

mod error;
mod models;
mod optimizer;
mod render;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Splits ten players into two balanced teams of five
  Balance {
    /// JSON-lines file with one player per line
    players: PathBuf,
    #[arg(long, env = "TEAM_BALANCE_DESIRED_DIFFERENCE", default_value_t = DEFAULT_DESIRED_DIFFERENCE)]
    desired_difference: Skill,
    #[arg(long, env = "TEAM_BALANCE_MAX_RETRIES", default_value_t = DEFAULT_MAX_RETRIES)]
    max_retries: usize,
    #[arg(long, env = "TEAM_BALANCE_SEED")]
    seed: Option<u64>,
    #[arg(long, env = "TEAM_BALANCE_TIME_LIMIT_SECS")]
    time_limit_secs: Option<u64>,
    /// Print the result as JSON
    #[arg(long)]
    json: bool,
    /// Show a progress bar over attempts
    #[arg(long)]
    progress: bool,
  },
  /// Scores a hand-picked split
  Evaluate {
    players: PathBuf,
    /// Indices (0-9) of the five players on the first team
    #[arg(long, value_delimiter = ',', required = true)]
    team_a: Vec<usize>,
    #[arg(long, env = "TEAM_BALANCE_DESIRED_DIFFERENCE", default_value_t = DEFAULT_DESIRED_DIFFERENCE)]
    desired_difference: Skill,
  },
}

fn init_logging() {
  let filter = EnvFilter::builder()
    .with_default_directive(LevelFilter::WARN.into())
    .from_env_lossy();

  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .try_init();
}

fn load_roster(path: &Path) -> anyhow::Result<Roster> {
  Roster::load(path).with_context(|| format!("loading players from {}", path.display()))
}

fn progress_bar(max_retries: usize) -> anyhow::Result<ProgressBar> {
  let bar = ProgressBar::new(max_retries as u64);
  bar.set_style(ProgressStyle::with_template("{spinner} attempt {pos}/{len} [{elapsed_precise}] {wide_bar}")?);
  Ok(bar)
}

fn main() -> Result<(), anyhow::Error> {
  dotenvy::dotenv().ok();
  init_logging();
  let cli: Cli = Cli::parse();

  match cli.command {
    Commands::Balance { players, desired_difference, max_retries, seed, time_limit_secs, json, progress } => {
      let roster = load_roster(&players)?;
      let config = SolverConfig {
        desired_difference,
        max_retries,
        time_limit: time_limit_secs.map(Duration::from_secs),
        seed,
      };

      let mut solver = Solver::new(config)?;
      if progress {
        solver = solver.with_progress(progress_bar(max_retries)?);
      }

      let outcome = solver.solve(&roster);
      if json {
        println!("{}", render::outcome_json(&outcome)?);
      } else {
        print!("{}", render::outcome_text(&outcome));
      }
    }
    Commands::Evaluate { players, team_a, desired_difference } => {
      let roster = load_roster(&players)?;
      let split = TeamSplit::from_team_a(&team_a)?;
      print!("{}", render::evaluation_text(&roster, &evaluate(&roster, &split), desired_difference));
    }
  }

  Ok(())
}
