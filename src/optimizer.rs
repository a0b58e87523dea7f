use std::time::{Duration, Instant};
use indicatif::ProgressBar;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info, warn};
use crate::error::ConfigError;
use crate::models::{Role, Roster, Skill, ROSTER_SIZE};
use self::evaluator::{evaluate, Evaluation, Lineup, TeamSplit};

pub mod evaluator;
pub mod search;

pub const DEFAULT_DESIRED_DIFFERENCE: Skill = 500.0;
pub const DEFAULT_MAX_RETRIES: usize = 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
  /// Largest accepted gap between the two teams' total skill.
  pub desired_difference: Skill,
  pub max_retries: usize,
  /// Wall-clock ceiling, checked before each attempt.
  pub time_limit: Option<Duration>,
  /// Fixes the random stream; `None` seeds from the OS.
  pub seed: Option<u64>,
}

impl Default for SolverConfig {
  fn default() -> Self {
    SolverConfig {
      desired_difference: DEFAULT_DESIRED_DIFFERENCE,
      max_retries: DEFAULT_MAX_RETRIES,
      time_limit: None,
      seed: None,
    }
  }
}

impl SolverConfig {
  pub fn validate(&self) -> Result<(), ConfigError> {
    if !self.desired_difference.is_finite() || self.desired_difference < 0.0 {
      return Err(ConfigError::InvalidDifference(self.desired_difference));
    }
    Ok(())
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterRow {
  pub position: Role,
  pub name: String,
  pub skill: Skill,
}

/// One team's roles, in role order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Team {
  pub rows: Vec<RosterRow>,
}

impl Team {
  pub fn from_lineup(roster: &Roster, lineup: &Lineup) -> Self {
    let rows = lineup.iter()
      .map(|(role, id)| {
        let player = roster.player(id);
        RosterRow {
          position: role.clone(),
          name: player.name.clone(),
          skill: player.skill,
        }
      })
      .collect();

    Team { rows }
  }

  pub fn total_skill(&self) -> Skill {
    self.rows.iter().map(|row| row.skill).sum()
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Balanced {
  /// 1-based attempt that produced the split.
  pub attempt: usize,
  pub teams: [Team; 2],
  pub difference: Skill,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
  Balanced(Balanced),
  Failed { attempts: usize },
}

/// Restarts a swap search from random splits until one satisfies both the
/// skill threshold and role coverage, or the attempt budget runs out.
pub struct Solver {
  config: SolverConfig,
  progress: ProgressBar,
}

impl Solver {
  pub fn new(config: SolverConfig) -> Result<Self, ConfigError> {
    config.validate()?;
    Ok(Solver { config, progress: ProgressBar::hidden() })
  }

  pub fn with_progress(mut self, progress: ProgressBar) -> Self {
    self.progress = progress;
    self
  }

  pub fn solve(&self, roster: &Roster) -> Outcome {
    let mut rng = match self.config.seed {
      Some(seed) => StdRng::seed_from_u64(seed),
      None => StdRng::from_entropy(),
    };
    self.solve_with_rng(roster, &mut rng)
  }

  pub fn solve_with_rng<R: Rng>(&self, roster: &Roster, rng: &mut R) -> Outcome {
    let threshold = self.config.desired_difference;
    let started = Instant::now();

    info!(max_retries = self.config.max_retries, desired_difference = threshold, "balancing roster");
    self.progress.set_length(self.config.max_retries as u64);

    for attempt in 1..=self.config.max_retries {
      if let Some(limit) = self.config.time_limit {
        if started.elapsed() >= limit {
          warn!(attempts = attempt - 1, ?limit, "time limit reached");
          return self.failed(attempt - 1);
        }
      }

      let ranking: [f64; ROSTER_SIZE] = std::array::from_fn(|_| rng.gen());
      let descent = search::descend(roster, TeamSplit::from_ranking(&ranking));
      self.progress.inc(1);

      // The search only minimizes; acceptance is decided from scratch here.
      let evaluation = evaluate(roster, &descent.evaluation.split);
      if let Some(teams) = accept(roster, &evaluation, threshold) {
        info!(attempt, difference = evaluation.difference, elapsed = ?started.elapsed(), "found balanced teams");
        self.progress.finish_and_clear();
        return Outcome::Balanced(Balanced {
          attempt,
          teams,
          difference: evaluation.difference,
        });
      }

      debug!(
        attempt,
        difference = evaluation.difference,
        position_violation = evaluation.position_violation(),
        steps = descent.steps,
        "attempt rejected"
      );
    }

    self.failed(self.config.max_retries)
  }

  fn failed(&self, attempts: usize) -> Outcome {
    self.progress.finish_and_clear();
    info!(attempts, "no split met the constraints");
    Outcome::Failed { attempts }
  }
}

fn accept(roster: &Roster, evaluation: &Evaluation, threshold: Skill) -> Option<[Team; 2]> {
  if !evaluation.is_feasible(threshold) {
    return None;
  }
  let [Some(first), Some(second)] = &evaluation.lineups else {
    return None;
  };

  Some([Team::from_lineup(roster, first), Team::from_lineup(roster, second)])
}
