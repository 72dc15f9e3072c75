use serde::{Deserialize, Serialize};

/// Highest goal count either validator accepts for one side of a match.
pub const MAX_SCORE: u32 = 999;

/// One fixture or result. Scores are absent until the match has been played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Match {
    pub id: String,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub home_score: Option<u32>,
    #[serde(default)]
    pub away_score: Option<u32>,
    #[serde(default)]
    pub ht_home_score: Option<u32>,
    #[serde(default)]
    pub ht_away_score: Option<u32>,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub round: Option<String>,
    #[serde(default)]
    pub matchday: Option<u32>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub referee: Option<String>,
    #[serde(default)]
    pub played: bool,
}

impl Match {
    pub fn fixture(id: impl Into<String>, home: &str, away: &str) -> Self {
        Self {
            id: id.into(),
            home_team: home.to_string(),
            away_team: away.to_string(),
            ..Self::default()
        }
    }

    pub fn result(id: impl Into<String>, home: &str, away: &str, home_score: u32, away_score: u32) -> Self {
        Self {
            home_score: Some(home_score),
            away_score: Some(away_score),
            played: true,
            ..Self::fixture(id, home, away)
        }
    }

    /// Full-time score, only when both sides are known.
    pub fn score(&self) -> Option<(u32, u32)> {
        match (self.home_score, self.away_score) {
            (Some(h), Some(a)) => Some((h, a)),
            _ => None,
        }
    }

    pub fn is_played(&self) -> bool {
        self.played && self.score().is_some()
    }

    pub fn involves(&self, team: &str) -> bool {
        self.home_team == team || self.away_team == team
    }

    pub fn outcome(&self) -> Option<Outcome> {
        let (h, a) = self.score()?;
        Some(if h > a {
            Outcome::HomeWin
        } else if h < a {
            Outcome::AwayWin
        } else {
            Outcome::Draw
        })
    }

    /// Goals scored and conceded from `team`'s point of view.
    pub fn goals_for(&self, team: &str) -> Option<(u32, u32)> {
        let (h, a) = self.score()?;
        if self.home_team == team {
            Some((h, a))
        } else if self.away_team == team {
            Some((a, h))
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    HomeWin,
    Draw,
    AwayWin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStanding {
    pub id: String,
    pub name: String,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_diff: i32,
    pub points: u32,
}

impl TeamStanding {
    pub fn new(name: &str) -> Self {
        Self {
            id: crate::standings::team_slug(name),
            name: name.to_string(),
            played: 0,
            wins: 0,
            draws: 0,
            losses: 0,
            goals_for: 0,
            goals_against: 0,
            goal_diff: 0,
            points: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueStatistics {
    pub total_matches: usize,
    pub completed_matches: usize,
    pub total_goals: u32,
    pub average_goals_per_match: f64,
    pub home_wins: usize,
    pub away_wins: usize,
    pub draws: usize,
    pub most_goals_scored_in_match: u32,
    pub clean_sheets: usize,
    /// Team with the most goals scored. A team-level proxy; no player data exists.
    pub top_scorer: String,
    pub top_scorer_goals: u32,
    /// Team with the fewest goals conceded.
    pub most_clean_sheets: String,
    pub fewest_conceded: u32,
}

impl LeagueStatistics {
    pub fn empty() -> Self {
        Self {
            total_matches: 0,
            completed_matches: 0,
            total_goals: 0,
            average_goals_per_match: 0.0,
            home_wins: 0,
            away_wins: 0,
            draws: 0,
            most_goals_scored_in_match: 0,
            clean_sheets: 0,
            top_scorer: "-".to_string(),
            top_scorer_goals: 0,
            most_clean_sheets: "-".to_string(),
            fewest_conceded: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PredictionMethod {
    #[default]
    History,
    Synthetic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub home_team: String,
    pub away_team: String,
    pub home_score: u32,
    pub away_score: u32,
    pub confidence: u8,
    #[serde(default)]
    pub home_win_probability: f64,
    #[serde(default)]
    pub draw_probability: f64,
    #[serde(default)]
    pub away_win_probability: f64,
    #[serde(default)]
    pub analysis: String,
    #[serde(default)]
    pub method: PredictionMethod,
}

impl PredictionResult {
    pub fn is_synthetic(&self) -> bool {
        self.method == PredictionMethod::Synthetic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unplayed_fixture_has_no_score() {
        let m = Match::fixture("m1", "A", "B");
        assert!(m.score().is_none());
        assert!(!m.is_played());
        assert!(m.outcome().is_none());
    }

    #[test]
    fn goals_for_is_from_team_perspective() {
        let m = Match::result("m1", "A", "B", 3, 1);
        assert_eq!(m.goals_for("A"), Some((3, 1)));
        assert_eq!(m.goals_for("B"), Some((1, 3)));
        assert_eq!(m.goals_for("C"), None);
        assert_eq!(m.outcome(), Some(Outcome::HomeWin));
    }

    #[test]
    fn match_deserializes_with_missing_optionals() {
        let raw = r#"{"id":"x","home_team":"A","away_team":"B","date":"2024-08-10"}"#;
        let m: Match = serde_json::from_str(raw).unwrap();
        assert_eq!(m.home_team, "A");
        assert!(m.home_score.is_none());
        assert!(!m.played);
    }
}
