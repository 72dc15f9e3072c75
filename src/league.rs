use rayon::prelude::*;
use serde::Serialize;

use crate::model::{LeagueStatistics, Match, TeamStanding};
use crate::standings::{calculate_standings, teams_from_matches};
use crate::statistics::calculate_league_statistics;

#[derive(Debug, Clone)]
pub struct LeagueInput {
    pub league_id: String,
    /// Roster; when empty, teams are taken from the matches.
    pub teams: Vec<String>,
    pub matches: Vec<Match>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeagueSummary {
    pub league_id: String,
    pub standings: Vec<TeamStanding>,
    pub statistics: LeagueStatistics,
}

pub fn summarize_league(input: &LeagueInput) -> LeagueSummary {
    let teams = if input.teams.is_empty() {
        teams_from_matches(&input.matches)
    } else {
        input.teams.clone()
    };
    LeagueSummary {
        league_id: input.league_id.clone(),
        standings: calculate_standings(&teams, &input.matches),
        statistics: calculate_league_statistics(&input.matches),
    }
}

/// Fold newly ingested results into an existing fixture list. A played match fills
/// the first unplayed fixture with the same home and away teams; a played match
/// already recorded with the same teams, date and score is dropped; anything else
/// is appended. Inputs are left untouched.
pub fn merge_results(existing: &[Match], incoming: &[Match]) -> Vec<Match> {
    let mut out = existing.to_vec();
    for m in incoming {
        if m.is_played() && out.iter().any(|e| same_result(e, m)) {
            tracing::debug!(match_id = %m.id, home = %m.home_team, away = %m.away_team, "result already recorded");
            continue;
        }
        let slot = out
            .iter()
            .position(|e| !e.is_played() && e.home_team == m.home_team && e.away_team == m.away_team);
        match slot {
            Some(idx) if m.is_played() => {
                let target = &mut out[idx];
                target.home_score = m.home_score;
                target.away_score = m.away_score;
                target.ht_home_score = m.ht_home_score;
                target.ht_away_score = m.ht_away_score;
                target.played = true;
                if !m.date.is_empty() {
                    target.date = m.date.clone();
                }
                if m.venue.is_some() {
                    target.venue = m.venue.clone();
                }
                if m.referee.is_some() {
                    target.referee = m.referee.clone();
                }
            }
            _ => {
                let mut m = m.clone();
                if out.iter().any(|e| e.id == m.id) {
                    m.id = format!("{}-{}", m.id, out.len() + 1);
                }
                out.push(m);
            }
        }
    }
    out
}

fn same_result(a: &Match, b: &Match) -> bool {
    a.is_played()
        && a.home_team == b.home_team
        && a.away_team == b.away_team
        && a.date == b.date
        && a.score() == b.score()
}

/// Leagues share nothing, so they are computed in parallel. Output keeps input order.
pub fn summarize_leagues(inputs: &[LeagueInput]) -> Vec<LeagueSummary> {
    inputs.par_iter().map(summarize_league).collect()
}
