use crate::model::{LeagueStatistics, Match, Outcome};
use crate::standings::{calculate_standings, teams_from_matches};

pub fn calculate_league_statistics(matches: &[Match]) -> LeagueStatistics {
    if matches.is_empty() {
        return LeagueStatistics::empty();
    }

    let mut stats = LeagueStatistics::empty();
    stats.total_matches = matches.len();

    for m in matches {
        let Some((h, a)) = m.score() else { continue };
        stats.completed_matches += 1;
        let goals = h.saturating_add(a);
        stats.total_goals = stats.total_goals.saturating_add(goals);
        stats.most_goals_scored_in_match = stats.most_goals_scored_in_match.max(goals);
        if h == 0 || a == 0 {
            stats.clean_sheets += 1;
        }
        match m.outcome() {
            Some(Outcome::HomeWin) => stats.home_wins += 1,
            Some(Outcome::AwayWin) => stats.away_wins += 1,
            Some(Outcome::Draw) => stats.draws += 1,
            None => {}
        }
    }

    if stats.completed_matches > 0 {
        stats.average_goals_per_match = stats.total_goals as f64 / stats.completed_matches as f64;
    }

    // Team-level stand-ins for the leaderboards; ties go to the higher-ranked side.
    let table = calculate_standings(&teams_from_matches(matches), matches);
    let mut top: Option<(&str, u32)> = None;
    let mut tightest: Option<(&str, u32)> = None;
    for row in &table {
        if top.is_none_or(|(_, best)| row.goals_for > best) {
            top = Some((&row.name, row.goals_for));
        }
        if tightest.is_none_or(|(_, best)| row.goals_against < best) {
            tightest = Some((&row.name, row.goals_against));
        }
    }
    if let Some((name, goals)) = top {
        stats.top_scorer = name.to_string();
        stats.top_scorer_goals = goals;
    }
    if let Some((name, conceded)) = tightest {
        stats.most_clean_sheets = name.to_string();
        stats.fewest_conceded = conceded;
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_sheets_count_matches_not_sides() {
        let matches = vec![Match::result("1", "A", "B", 0, 0), Match::result("2", "A", "C", 2, 0)];
        let stats = calculate_league_statistics(&matches);
        assert_eq!(stats.clean_sheets, 2);
        assert_eq!(stats.draws, 1);
        assert_eq!(stats.home_wins, 1);
    }

    #[test]
    fn unplayed_fixtures_count_toward_total_only() {
        let matches = vec![Match::result("1", "A", "B", 3, 1), Match::fixture("2", "B", "A")];
        let stats = calculate_league_statistics(&matches);
        assert_eq!(stats.total_matches, 2);
        assert_eq!(stats.completed_matches, 1);
        assert!((stats.average_goals_per_match - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn huge_scores_saturate() {
        let matches = vec![
            Match::result("1", "A", "B", 4_000_000_000, 4_000_000_000),
            Match::result("2", "B", "A", u32::MAX, 1),
        ];
        let stats = calculate_league_statistics(&matches);
        assert_eq!(stats.total_goals, u32::MAX);
        assert_eq!(stats.most_goals_scored_in_match, u32::MAX);
        assert_eq!(stats.completed_matches, 2);
    }
}
