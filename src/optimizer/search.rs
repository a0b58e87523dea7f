//! Local search run inside a single solver attempt.
//!
//! Neighbours of a split are the 25 splits reachable by exchanging one Team A
//! player with one Team B player. The search always takes the best strictly
//! improving neighbour and stops at a local optimum.

use std::cmp::Ordering;
use crate::models::{Roster, Skill};
use super::evaluator::{evaluate, Evaluation, TeamSplit};

/// Role coverage first, then skill difference.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Score {
  uncovered_teams: u8,
  difference: Skill,
}

impl Score {
  fn of(evaluation: &Evaluation) -> Self {
    Score {
      uncovered_teams: evaluation.uncovered_teams(),
      difference: evaluation.difference,
    }
  }

  fn compare(&self, other: &Score) -> Ordering {
    self.uncovered_teams.cmp(&other.uncovered_teams)
      .then(self.difference.total_cmp(&other.difference))
  }
}

#[derive(Debug, Clone)]
pub struct Descent {
  pub evaluation: Evaluation,
  pub steps: usize,
}

pub fn descend(roster: &Roster, start: TeamSplit) -> Descent {
  let mut current = evaluate(roster, &start);
  let mut steps = 0;

  loop {
    let best = neighbours(current.split)
      .map(|split| evaluate(roster, &split))
      .min_by(|a, b| Score::of(a).compare(&Score::of(b)));

    match best {
      Some(next) if Score::of(&next).compare(&Score::of(&current)) == Ordering::Less => {
        current = next;
        steps += 1;
      }
      _ => return Descent { evaluation: current, steps },
    }
  }
}

fn neighbours(split: TeamSplit) -> impl Iterator<Item = TeamSplit> {
  let [team_a, team_b] = split.teams();
  team_a.into_iter()
    .flat_map(move |a| team_b.into_iter().map(move |b| split.swap(a, b)))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::{PlayerId, ROSTER_SIZE};
  use crate::optimizer::evaluator::tests::{roster_with, versatile_roster};

  #[test]
  fn every_swap_is_a_neighbour() {
    let split = TeamSplit::from_team_a(&[0, 1, 2, 3, 4]).unwrap();
    let all: Vec<TeamSplit> = neighbours(split).collect();

    assert_eq!(all.len(), 25);
    assert!(all.iter().all(|n| *n != split));
  }

  #[test]
  fn balances_skill_from_worst_split() {
    let roster = versatile_roster();
    let start = TeamSplit::from_team_a(&[0, 1, 2, 3, 4]).unwrap();
    let descent = descend(&roster, start);

    // 7750 total, so the best reachable difference is 50.
    assert_eq!(descent.evaluation.difference, 50.0);
    assert_eq!(descent.evaluation.uncovered_teams(), 0);
    assert!(descent.steps > 0);
  }

  #[test]
  fn local_optimum_is_a_fixed_point() {
    let roster = versatile_roster();
    let start = TeamSplit::from_team_a(&[1, 3, 5, 7, 9]).unwrap();
    let first = descend(&roster, start);
    let again = descend(&roster, first.evaluation.split);

    assert_eq!(again.steps, 0);
    assert_eq!(again.evaluation, first.evaluation);
  }

  #[test]
  fn repairs_role_coverage() {
    let four: &[&str] = &["A", "B", "C", "D"];
    let positions: [&[&str]; ROSTER_SIZE] = [
      &["E"], &["E"], four, four, four, four, four, four, four, four,
    ];
    let roster = roster_with(positions);
    let start = TeamSplit::from_team_a(&[0, 1, 2, 3, 4]).unwrap();
    assert_eq!(evaluate(&roster, &start).uncovered_teams(), 2);

    let descent = descend(&roster, start);
    assert_eq!(descent.evaluation.uncovered_teams(), 0);
    let split = descent.evaluation.split;
    assert_ne!(split.on_team_a(PlayerId(0)), split.on_team_a(PlayerId(1)));
  }

  #[test]
  fn never_covers_missing_role() {
    let four: &[&str] = &["A", "B", "C", "D"];
    let roster = roster_with([four; ROSTER_SIZE]);
    let start = TeamSplit::from_team_a(&[0, 2, 4, 6, 8]).unwrap();

    assert_eq!(descend(&roster, start).evaluation.uncovered_teams(), 2);
  }
}
