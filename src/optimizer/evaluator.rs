//! Scoring of a single 5-vs-5 split: skill balance and role coverage.
//!
//! Everything here is a pure function of the roster and the split, so the
//! same split always evaluates to the same result.

use std::collections::BTreeMap;
use serde::Serialize;
use crate::error::SplitError;
use crate::models::{PlayerId, Role, Roster, Skill, ROSTER_SIZE};

pub const TEAM_SIZE: usize = 5;

const ALL_PLAYERS: u16 = (1 << ROSTER_SIZE) - 1;

/// Team A membership as a bitmask over player indices; Team B is the rest.
///
/// Only constructors that select exactly five players exist, so both teams
/// always have five members.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Debug)]
pub struct TeamSplit(u16);

impl TeamSplit {
  /// The five lowest values go to Team A. Equal values are ordered by
  /// player index so a given vector always yields the same split.
  pub fn from_ranking(values: &[f64; ROSTER_SIZE]) -> Self {
    let mut order: [usize; ROSTER_SIZE] = std::array::from_fn(|idx| idx);
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]).then(a.cmp(&b)));

    TeamSplit(order[..TEAM_SIZE].iter().fold(0, |mask, &idx| mask | 1 << idx))
  }

  pub fn from_team_a(indices: &[usize]) -> Result<Self, SplitError> {
    if indices.len() != TEAM_SIZE {
      return Err(SplitError::WrongSize { found: indices.len() });
    }

    let mut mask = 0u16;
    for &idx in indices {
      if idx >= ROSTER_SIZE {
        return Err(SplitError::OutOfRange(idx));
      }
      if mask & (1 << idx) != 0 {
        return Err(SplitError::Duplicate(idx));
      }
      mask |= 1 << idx;
    }

    Ok(TeamSplit(mask))
  }

  pub fn on_team_a(&self, id: PlayerId) -> bool {
    self.0 & (1 << id.0) != 0
  }

  pub fn team_a(&self) -> [PlayerId; TEAM_SIZE] {
    members(self.0)
  }

  pub fn team_b(&self) -> [PlayerId; TEAM_SIZE] {
    members(!self.0 & ALL_PLAYERS)
  }

  pub fn teams(&self) -> [[PlayerId; TEAM_SIZE]; 2] {
    [self.team_a(), self.team_b()]
  }

  /// Exchanges `a` (on Team A) with `b` (on Team B).
  pub fn swap(&self, a: PlayerId, b: PlayerId) -> Self {
    debug_assert!(self.on_team_a(a) && !self.on_team_a(b));
    TeamSplit(self.0 ^ (1 << a.0) ^ (1 << b.0))
  }
}

fn members(mask: u16) -> [PlayerId; TEAM_SIZE] {
  let mut team = [PlayerId(0); TEAM_SIZE];
  let ids = (0..ROSTER_SIZE).filter(|&idx| mask & (1 << idx) != 0);
  for (slot, idx) in team.iter_mut().zip(ids) {
    *slot = PlayerId(idx);
  }
  team
}

fn team_skill(roster: &Roster, team: &[PlayerId]) -> Skill {
  team.iter().map(|&id| roster.skill(id)).sum()
}

pub fn skill_difference(roster: &Roster, split: &TeamSplit) -> Skill {
  (team_skill(roster, &split.team_a()) - team_skill(roster, &split.team_b())).abs()
}

/// Non-negative when the split is within `threshold`.
pub fn skill_balance_slack(roster: &Roster, split: &TeamSplit, threshold: Skill) -> Skill {
  threshold - skill_difference(roster, split)
}

/// Always zero: a `TeamSplit` cannot describe uneven teams.
pub fn team_size_residual(split: &TeamSplit) -> i32 {
  let [a, b] = split.teams();
  a.len() as i32 - b.len() as i32
}

/// Role to player mapping for one team. Iterates in role order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Lineup {
  slots: BTreeMap<Role, PlayerId>,
}

impl Lineup {
  pub fn role_of(&self, id: PlayerId) -> Option<&Role> {
    self.slots.iter().find(|(_, p)| **p == id).map(|(role, _)| role)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&Role, PlayerId)> {
    self.slots.iter().map(|(role, &id)| (role, id))
  }
}

/// Greedy role assignment for one team.
///
/// Players with the fewest qualified positions pick first (ties by index),
/// each walking their list from the back and taking the first role nobody
/// on the team holds yet. Returns `None` if some player finds all of their
/// roles taken, since the team then can't field five distinct roles.
pub fn assign_positions(roster: &Roster, team: &[PlayerId; TEAM_SIZE]) -> Option<Lineup> {
  let mut order = *team;
  order.sort_by_key(|&id| (roster.player(id).positions.len(), id));

  let mut slots: BTreeMap<Role, PlayerId> = BTreeMap::new();
  for id in order {
    let role = roster.player(id).positions.iter()
      .rev()
      .find(|role| !slots.contains_key(*role))?;
    slots.insert(role.clone(), id);
  }

  Some(Lineup { slots })
}

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
  pub split: TeamSplit,
  pub difference: Skill,
  pub lineups: [Option<Lineup>; 2],
}

impl Evaluation {
  pub fn uncovered_teams(&self) -> u8 {
    self.lineups.iter().filter(|lineup| lineup.is_none()).count() as u8
  }

  /// 0 when both teams cover five distinct roles, 1 otherwise.
  pub fn position_violation(&self) -> u8 {
    u8::from(self.uncovered_teams() > 0)
  }

  pub fn is_feasible(&self, threshold: Skill) -> bool {
    self.difference <= threshold && self.position_violation() == 0
  }
}

pub fn evaluate(roster: &Roster, split: &TeamSplit) -> Evaluation {
  let [team_a, team_b] = split.teams();

  Evaluation {
    split: *split,
    difference: skill_difference(roster, split),
    lineups: [assign_positions(roster, &team_a), assign_positions(roster, &team_b)],
  }
}

#[cfg(test)]
pub(crate) mod tests {
  use super::*;
  use crate::models::Player;

  const ALL_ROLES: [&str; 5] = ["A", "B", "C", "D", "E"];
  const SKILLS: [Skill; ROSTER_SIZE] = [1000.0, 950.0, 900.0, 850.0, 800.0, 750.0, 700.0, 650.0, 600.0, 550.0];

  pub(crate) fn roster_with(positions: [&[&str]; ROSTER_SIZE]) -> Roster {
    let players = SKILLS.iter().zip(positions)
      .enumerate()
      .map(|(idx, (&skill, roles))| Player {
        name: format!("P{idx}"),
        skill,
        positions: roles.iter().map(|r| r.to_string()).collect(),
      })
      .collect();
    Roster::new(players).unwrap()
  }

  pub(crate) fn versatile_roster() -> Roster {
    let all: &[&str] = &ALL_ROLES;
    roster_with([all; ROSTER_SIZE])
  }

  fn ids(team: [PlayerId; TEAM_SIZE]) -> Vec<usize> {
    team.iter().map(|id| id.0).collect()
  }

  #[test]
  fn ranking_picks_lowest_values() {
    let split = TeamSplit::from_ranking(&[0.9, 0.1, 0.8, 0.2, 0.7, 0.3, 0.6, 0.4, 0.5, 0.0]);
    assert_eq!(ids(split.team_a()), vec![1, 3, 5, 7, 9]);
    assert_eq!(ids(split.team_b()), vec![0, 2, 4, 6, 8]);
  }

  #[test]
  fn ranking_ties_go_to_lower_index() {
    let split = TeamSplit::from_ranking(&[0.0; ROSTER_SIZE]);
    assert_eq!(ids(split.team_a()), vec![0, 1, 2, 3, 4]);
  }

  #[test]
  fn split_is_a_partition() {
    let split = TeamSplit::from_team_a(&[9, 2, 4, 0, 7]).unwrap();
    let mut all: Vec<usize> = ids(split.team_a());
    all.extend(ids(split.team_b()));
    all.sort();

    assert_eq!(all, (0..ROSTER_SIZE).collect::<Vec<_>>());
    assert!(split.team_a().iter().all(|id| !split.team_b().contains(id)));
    assert_eq!(team_size_residual(&split), 0);
  }

  #[test]
  fn explicit_split_is_validated() {
    assert_eq!(TeamSplit::from_team_a(&[0, 1, 2, 3]), Err(SplitError::WrongSize { found: 4 }));
    assert_eq!(TeamSplit::from_team_a(&[0, 1, 2, 3, 10]), Err(SplitError::OutOfRange(10)));
    assert_eq!(TeamSplit::from_team_a(&[0, 1, 2, 3, 3]), Err(SplitError::Duplicate(3)));
  }

  #[test]
  fn swap_moves_players_across() {
    let split = TeamSplit::from_team_a(&[0, 1, 2, 3, 4]).unwrap();
    let swapped = split.swap(PlayerId(0), PlayerId(9));
    assert_eq!(ids(swapped.team_a()), vec![1, 2, 3, 4, 9]);
    assert_eq!(ids(swapped.team_b()), vec![0, 5, 6, 7, 8]);
  }

  #[test]
  fn skill_difference_of_known_split() {
    let roster = versatile_roster();
    // 1000 + 900 + 700 + 600 + 550 = 3750 vs 950 + 850 + 800 + 750 + 650 = 4000
    let split = TeamSplit::from_team_a(&[0, 2, 6, 8, 9]).unwrap();

    assert_eq!(skill_difference(&roster, &split), 250.0);
    assert_eq!(skill_difference(&roster, &split), skill_difference(&roster, &split));
    assert_eq!(skill_balance_slack(&roster, &split, 500.0), 250.0);
    assert_eq!(skill_balance_slack(&roster, &split, 200.0), -50.0);
  }

  #[test]
  fn fewest_positions_pick_first() {
    let positions: [&[&str]; ROSTER_SIZE] = [
      &["A", "B"], &["B"], &["C", "D"], &["D", "E"], &ALL_ROLES,
      &ALL_ROLES, &ALL_ROLES, &ALL_ROLES, &ALL_ROLES, &ALL_ROLES,
    ];
    let roster = roster_with(positions);
    let team = [PlayerId(0), PlayerId(1), PlayerId(2), PlayerId(3), PlayerId(4)];
    let lineup = assign_positions(&roster, &team).unwrap();

    // P1 takes B, then P0/P2/P3 walk backwards: A, D, E; P4 is left with C.
    assert_eq!(lineup.role_of(PlayerId(1)).map(String::as_str), Some("B"));
    assert_eq!(lineup.role_of(PlayerId(0)).map(String::as_str), Some("A"));
    assert_eq!(lineup.role_of(PlayerId(2)).map(String::as_str), Some("D"));
    assert_eq!(lineup.role_of(PlayerId(3)).map(String::as_str), Some("E"));
    assert_eq!(lineup.role_of(PlayerId(4)).map(String::as_str), Some("C"));
    assert_eq!(lineup.iter().count(), TEAM_SIZE);

    let roles: Vec<&str> = lineup.iter().map(|(role, _)| role.as_str()).collect();
    assert_eq!(roles, ALL_ROLES);
  }

  #[test]
  fn assignment_is_repeatable() {
    let roster = versatile_roster();
    let team = [PlayerId(3), PlayerId(5), PlayerId(6), PlayerId(8), PlayerId(9)];
    let first = assign_positions(&roster, &team);
    assert!(first.is_some());
    assert_eq!(first, assign_positions(&roster, &team));
  }

  #[test]
  fn exhausted_player_makes_team_incomplete() {
    let positions: [&[&str]; ROSTER_SIZE] = [
      &["A"], &["A"], &["B"], &["C"], &["D"],
      &ALL_ROLES, &ALL_ROLES, &ALL_ROLES, &ALL_ROLES, &ALL_ROLES,
    ];
    let roster = roster_with(positions);
    let split = TeamSplit::from_team_a(&[0, 1, 2, 3, 4]).unwrap();
    let eval = evaluate(&roster, &split);

    assert_eq!(eval.lineups[0], None);
    assert!(eval.lineups[1].is_some());
    assert_eq!(eval.uncovered_teams(), 1);
    assert_eq!(eval.position_violation(), 1);
    assert!(!eval.is_feasible(f64::INFINITY));
  }

  #[test]
  fn feasible_when_balanced_and_covered() {
    let roster = versatile_roster();
    let split = TeamSplit::from_team_a(&[0, 2, 6, 8, 9]).unwrap();
    let eval = evaluate(&roster, &split);

    assert_eq!(eval.position_violation(), 0);
    assert!(eval.is_feasible(500.0));
    assert!(eval.is_feasible(250.0));
    assert!(!eval.is_feasible(249.0));
  }
}
