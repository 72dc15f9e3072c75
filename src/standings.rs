use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::model::{Match, TeamStanding};

/// What to do with a played match whose team is not on the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownTeamPolicy {
    /// Skip the match entirely.
    #[default]
    Ignore,
    /// Add a standing for the unseen team, after the roster, in first-seen order.
    AutoRegister,
}

pub fn calculate_standings(teams: &[String], matches: &[Match]) -> Vec<TeamStanding> {
    calculate_standings_with(teams, matches, UnknownTeamPolicy::Ignore)
}

pub fn calculate_standings_with(
    teams: &[String],
    matches: &[Match],
    policy: UnknownTeamPolicy,
) -> Vec<TeamStanding> {
    let mut table: Vec<TeamStanding> = Vec::with_capacity(teams.len());
    let mut index: HashMap<String, usize> = HashMap::new();
    for name in teams {
        if index.contains_key(name) {
            continue;
        }
        index.insert(name.clone(), table.len());
        table.push(TeamStanding::new(name));
    }

    for m in matches {
        if !m.is_played() {
            continue;
        }
        let Some((home_goals, away_goals)) = m.score() else {
            continue;
        };

        if policy == UnknownTeamPolicy::AutoRegister {
            for name in [&m.home_team, &m.away_team] {
                if !index.contains_key(name) {
                    index.insert(name.clone(), table.len());
                    table.push(TeamStanding::new(name));
                }
            }
        }

        let (Some(&h), Some(&a)) = (index.get(&m.home_team), index.get(&m.away_team)) else {
            tracing::debug!(
                match_id = %m.id,
                home = %m.home_team,
                away = %m.away_team,
                "match references a team outside the roster; skipped"
            );
            continue;
        };
        if h == a {
            continue;
        }

        record(&mut table[h], home_goals, away_goals);
        record(&mut table[a], away_goals, home_goals);
    }

    // `sort_by` is stable: full ties keep roster order.
    table.sort_by(compare_standings);
    table
}

fn record(row: &mut TeamStanding, scored: u32, conceded: u32) {
    row.played += 1;
    row.goals_for = row.goals_for.saturating_add(scored);
    row.goals_against = row.goals_against.saturating_add(conceded);
    let diff = i64::from(row.goals_for) - i64::from(row.goals_against);
    row.goal_diff = diff.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
    match scored.cmp(&conceded) {
        Ordering::Greater => {
            row.wins += 1;
            row.points += 3;
        }
        Ordering::Less => row.losses += 1,
        Ordering::Equal => {
            row.draws += 1;
            row.points += 1;
        }
    }
}

/// Points, then goal difference, then goals scored; all descending.
pub fn compare_standings(a: &TeamStanding, b: &TeamStanding) -> Ordering {
    b.points
        .cmp(&a.points)
        .then(b.goal_diff.cmp(&a.goal_diff))
        .then(b.goals_for.cmp(&a.goals_for))
}

/// Lowercase, ascii-alphanumeric runs joined by `-`.
pub fn team_slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_dash = false;
    for ch in name.trim().chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.extend(ch.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    out
}

/// Team names in the order they first appear across `matches`.
pub fn teams_from_matches(matches: &[Match]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for m in matches {
        for name in [&m.home_team, &m.away_team] {
            if !name.is_empty() && seen.insert(name.as_str()) {
                out.push(name.clone());
            }
        }
    }
    out
}
