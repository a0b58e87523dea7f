use std::path::Path;
use serde::{Serialize, Deserialize};
use crate::error::RosterError;

pub type Skill = f64;
pub type Role = String;

pub const ROSTER_SIZE: usize = 10;

/// Index of a player in the roster, 0..10.
#[derive(Clone, Copy, Hash, Ord, PartialOrd, Eq, PartialEq, Debug, Serialize)]
pub struct PlayerId(pub usize);

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Player {
  pub name: String,
  pub skill: Skill,
  /// Roles this player can fill, most specialized first.
  pub positions: Vec<Role>,
}

/// The ten players of a run. Read-only once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Roster {
  players: Vec<Player>,
}

impl Roster {
  pub fn new(players: Vec<Player>) -> Result<Self, RosterError> {
    if players.len() != ROSTER_SIZE {
      return Err(RosterError::WrongPlayerCount { found: players.len() });
    }

    if let Some(player) = players.iter().find(|p| p.positions.is_empty()) {
      return Err(RosterError::NoPositions { name: player.name.clone() });
    }

    Ok(Roster { players })
  }

  /// Parses one JSON object per line; blank lines are skipped.
  pub fn from_json_lines(input: &str) -> Result<Self, RosterError> {
    let players = input.lines()
      .enumerate()
      .filter(|(_, line)| !line.trim().is_empty())
      .map(|(idx, line)| {
        serde_json::from_str::<Player>(line)
          .map_err(|source| RosterError::Parse { line: idx + 1, source })
      })
      .collect::<Result<Vec<_>, _>>()?;

    Self::new(players)
  }

  pub fn load(path: impl AsRef<Path>) -> Result<Self, RosterError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
      .map_err(|source| RosterError::Io { path: path.to_path_buf(), source })?;

    Self::from_json_lines(&contents)
  }

  pub fn player(&self, id: PlayerId) -> &Player {
    &self.players[id.0]
  }

  pub fn skill(&self, id: PlayerId) -> Skill {
    self.players[id.0].skill
  }
}
