use std::fmt::Write;
use crate::models::{Roster, Skill};
use crate::optimizer::evaluator::{skill_balance_slack, team_size_residual, Evaluation};
use crate::optimizer::{Outcome, Team};

const HEADERS: [&str; 3] = ["position", "name", "skill"];

pub fn outcome_text(outcome: &Outcome) -> String {
  match outcome {
    Outcome::Balanced(balanced) => {
      let mut out = format!("Success on attempt {}:\n", balanced.attempt);
      for (idx, team) in balanced.teams.iter().enumerate() {
        let _ = writeln!(out, "Team {}:", idx + 1);
        out.push_str(&team_table(team));
      }
      let _ = writeln!(out, "Skill Difference: {}", balanced.difference);
      out
    }
    Outcome::Failed { attempts } => {
      format!("Failed to meet the constraints after {} attempts.\n", attempts)
    }
  }
}

pub fn outcome_json(outcome: &Outcome) -> serde_json::Result<String> {
  serde_json::to_string_pretty(outcome)
}

/// Report for a hand-picked split.
pub fn evaluation_text(roster: &Roster, evaluation: &Evaluation, threshold: Skill) -> String {
  let mut out = String::new();
  for (idx, lineup) in evaluation.lineups.iter().enumerate() {
    let _ = writeln!(out, "Team {}:", idx + 1);
    match lineup {
      Some(lineup) => out.push_str(&team_table(&Team::from_lineup(roster, lineup))),
      None => out.push_str(" incomplete: cannot fill 5 distinct positions\n"),
    }
  }

  let _ = writeln!(out, "Skill Difference: {}", evaluation.difference);
  let _ = writeln!(out, "Balance slack: {}", skill_balance_slack(roster, &evaluation.split, threshold));
  let _ = writeln!(out, "Team size residual: {}", team_size_residual(&evaluation.split));
  let _ = writeln!(out, "Position violation: {}", evaluation.position_violation());
  let verdict = if evaluation.is_feasible(threshold) { "yes" } else { "no" };
  let _ = writeln!(out, "Feasible: {} (desired difference {})", verdict, threshold);
  out
}

/// Right-aligned columns with a header row, one leading space per line.
fn team_table(team: &Team) -> String {
  let cells: Vec<[String; 3]> = team.rows.iter()
    .map(|row| [row.position.clone(), row.name.clone(), row.skill.to_string()])
    .collect();

  let mut widths = HEADERS.map(str::len);
  for row in &cells {
    for (width, cell) in widths.iter_mut().zip(row) {
      *width = (*width).max(cell.chars().count());
    }
  }

  let mut out = String::new();
  let mut line = |values: [&str; 3]| {
    let _ = writeln!(
      out,
      " {:>w0$} {:>w1$} {:>w2$}",
      values[0], values[1], values[2],
      w0 = widths[0], w1 = widths[1], w2 = widths[2]
    );
  };

  line(HEADERS);
  for row in &cells {
    line([row[0].as_str(), row[1].as_str(), row[2].as_str()]);
  }
  out
}
