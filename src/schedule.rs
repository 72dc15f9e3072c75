use chrono::{Duration, NaiveDate};

use crate::model::Match;

const BYE: &str = "BYE";

#[derive(Debug, Clone)]
pub struct ScheduleOptions {
    /// Date of matchday 1. Without it fixtures carry an empty date.
    pub start_date: Option<NaiveDate>,
    pub days_between_rounds: i64,
}

impl Default for ScheduleOptions {
    fn default() -> Self {
        Self {
            start_date: None,
            days_between_rounds: 7,
        }
    }
}

pub fn generate_schedule(team_names: &[String]) -> Vec<Match> {
    generate_schedule_with(team_names, &ScheduleOptions::default())
}

/// Double round-robin via the circle method: the first team stays put while the
/// rest rotate, then every fixture is mirrored for the return leg.
pub fn generate_schedule_with(team_names: &[String], opts: &ScheduleOptions) -> Vec<Match> {
    let mut teams: Vec<&str> = team_names.iter().map(String::as_str).collect();
    if teams.len() < 2 {
        return Vec::new();
    }
    if teams.len() % 2 == 1 {
        teams.push(BYE);
    }

    let total_rounds = teams.len() - 1;
    let matches_per_round = teams.len() / 2;
    let fixed = teams[0];
    let rotating = &teams[1..];
    let size = rotating.len();

    let mut first_leg: Vec<(usize, &str, &str)> = Vec::new();
    for round in 0..total_rounds {
        let mut pairs = vec![(fixed, rotating[round])];
        for m in 0..matches_per_round - 1 {
            let home = rotating[(round + m + 1) % size];
            let away = rotating[(round + size - m - 1) % size];
            pairs.push((home, away));
        }
        for (home, away) in pairs {
            if home == BYE || away == BYE {
                continue;
            }
            first_leg.push((round + 1, home, away));
        }
    }

    let second_leg = first_leg
        .iter()
        .map(|(day, home, away)| (day + total_rounds, *away, *home))
        .collect::<Vec<_>>();

    let mut out = Vec::with_capacity(first_leg.len() * 2);
    let mut slot = 0usize;
    let mut last_day = 0usize;
    for (day, home, away) in first_leg.into_iter().chain(second_leg) {
        if day != last_day {
            slot = 0;
            last_day = day;
        }
        slot += 1;
        let mut m = Match::fixture(format!("md{day}-{slot}"), home, away);
        m.matchday = Some(day as u32);
        m.round = Some(day.to_string());
        m.date = fixture_date(opts, day);
        out.push(m);
    }
    out
}

fn fixture_date(opts: &ScheduleOptions, matchday: usize) -> String {
    let Some(start) = opts.start_date else {
        return String::new();
    };
    let offset = opts.days_between_rounds.saturating_mul(matchday as i64 - 1);
    start
        .checked_add_signed(Duration::days(offset))
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn fewer_than_two_teams_is_empty() {
        assert!(generate_schedule(&[]).is_empty());
        assert!(generate_schedule(&names(&["Solo"])).is_empty());
    }

    #[test]
    fn two_teams_play_home_and_away() {
        let out = generate_schedule(&names(&["A", "B"]));
        assert_eq!(out.len(), 2);
        assert_eq!((out[0].home_team.as_str(), out[0].away_team.as_str()), ("A", "B"));
        assert_eq!((out[1].home_team.as_str(), out[1].away_team.as_str()), ("B", "A"));
        assert_eq!(out[1].matchday, Some(2));
    }

    #[test]
    fn dates_advance_per_matchday() {
        let opts = ScheduleOptions {
            start_date: NaiveDate::from_ymd_opt(2024, 8, 10),
            days_between_rounds: 7,
        };
        let out = generate_schedule_with(&names(&["A", "B", "C", "D"]), &opts);
        let md1 = out.iter().find(|m| m.matchday == Some(1)).unwrap();
        let md4 = out.iter().find(|m| m.matchday == Some(4)).unwrap();
        assert_eq!(md1.date, "2024-08-10");
        assert_eq!(md4.date, "2024-08-31");
    }

    #[test]
    fn fixtures_are_unplayed_placeholders() {
        let out = generate_schedule(&names(&["A", "B", "C", "D"]));
        assert!(out.iter().all(|m| !m.played && m.score().is_none()));
    }
}
