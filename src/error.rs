use std::path::PathBuf;
use thiserror::Error;
use crate::models::ROSTER_SIZE;
use crate::optimizer::evaluator::TEAM_SIZE;

/// Problems with the player file.
#[derive(Debug, Error)]
pub enum RosterError {
  #[error("failed to read {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("line {line}: {source}")]
  Parse {
    line: usize,
    #[source]
    source: serde_json::Error,
  },

  #[error("expected {} players, found {found}", ROSTER_SIZE)]
  WrongPlayerCount { found: usize },

  #[error("player {name:?} is not qualified for any position")]
  NoPositions { name: String },
}

/// An explicit team split that isn't a valid 5-of-10 selection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SplitError {
  #[error("team A needs exactly {} players, got {found}", TEAM_SIZE)]
  WrongSize { found: usize },

  #[error("player index {0} is out of range (0..{})", ROSTER_SIZE)]
  OutOfRange(usize),

  #[error("player index {0} listed more than once")]
  Duplicate(usize),
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
  #[error("desired difference must be a finite, non-negative number, got {0}")]
  InvalidDifference(f64),
}
