use league_engine::model::Match;
use league_engine::standings::{UnknownTeamPolicy, calculate_standings, calculate_standings_with};

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn single_win_is_tallied_for_both_sides() {
    let table = calculate_standings(&names(&["A", "B"]), &[Match::result("1", "A", "B", 2, 1)]);
    let a = table.iter().find(|t| t.name == "A").unwrap();
    let b = table.iter().find(|t| t.name == "B").unwrap();

    assert_eq!((a.played, a.wins, a.points, a.goal_diff), (1, 1, 3, 1));
    assert_eq!((b.played, b.losses, b.points, b.goal_diff), (1, 1, 0, -1));
    assert_eq!(table[0].name, "A");
}

#[test]
fn counters_stay_consistent() {
    let matches = vec![
        Match::result("1", "A", "B", 2, 2),
        Match::result("2", "B", "C", 0, 1),
        Match::result("3", "C", "A", 4, 0),
        Match::fixture("4", "A", "C"),
        Match::result("5", "A", "B", 1, 0),
    ];
    let table = calculate_standings(&names(&["A", "B", "C"]), &matches);
    for t in &table {
        assert_eq!(t.played, t.wins + t.draws + t.losses, "{}", t.name);
        assert_eq!(t.points, t.wins * 3 + t.draws, "{}", t.name);
        assert_eq!(t.goal_diff, t.goals_for as i32 - t.goals_against as i32);
    }
    let total_for: u32 = table.iter().map(|t| t.goals_for).sum();
    let total_against: u32 = table.iter().map(|t| t.goals_against).sum();
    assert_eq!(total_for, total_against);
}

#[test]
fn ties_break_on_goal_difference_then_goals_for() {
    // A and B both win once; B by more. C and D draw; D scored more overall.
    let matches = vec![
        Match::result("1", "A", "X", 1, 0),
        Match::result("2", "B", "Y", 3, 0),
        Match::result("3", "C", "X", 1, 1),
        Match::result("4", "D", "Y", 2, 2),
    ];
    let table = calculate_standings(&names(&["A", "B", "C", "D", "X", "Y"]), &matches);
    let order = table.iter().map(|t| t.name.as_str()).collect::<Vec<_>>();
    assert_eq!(&order[..4], &["B", "A", "D", "C"]);
}

#[test]
fn full_ties_keep_roster_order() {
    let matches = vec![Match::result("1", "B", "A", 1, 1), Match::result("2", "D", "C", 1, 1)];
    let table = calculate_standings(&names(&["D", "A", "C", "B"]), &matches);
    let order = table.iter().map(|t| t.name.as_str()).collect::<Vec<_>>();
    assert_eq!(order, vec!["D", "A", "C", "B"]);
}

#[test]
fn unknown_teams_are_ignored_by_default() {
    let matches = vec![Match::result("1", "A", "Ghost", 5, 0), Match::result("2", "A", "B", 0, 1)];
    let table = calculate_standings(&names(&["A", "B"]), &matches);
    assert_eq!(table.len(), 2);
    let a = table.iter().find(|t| t.name == "A").unwrap();
    assert_eq!((a.played, a.goals_for), (1, 0));
}

#[test]
fn unknown_teams_can_be_auto_registered() {
    let matches = vec![Match::result("1", "A", "Ghost", 5, 0)];
    let table = calculate_standings_with(&names(&["A"]), &matches, UnknownTeamPolicy::AutoRegister);
    assert_eq!(table.len(), 2);
    let ghost = table.iter().find(|t| t.name == "Ghost").unwrap();
    assert_eq!((ghost.played, ghost.losses, ghost.id.as_str()), (1, 1, "ghost"));
}

#[test]
fn inputs_are_not_mutated() {
    let teams = names(&["A", "B"]);
    let matches = vec![Match::result("1", "A", "B", 2, 0)];
    let before = matches.clone();
    let first = calculate_standings(&teams, &matches);
    let second = calculate_standings(&teams, &matches);
    assert_eq!(matches, before);
    assert_eq!(first, second);
}

#[test]
fn huge_margins_keep_goal_difference_sign() {
    let teams = names(&["A", "B"]);
    let matches = vec![Match::result("1", "A", "B", 3_000_000_000, 0)];
    let table = calculate_standings(&teams, &matches);
    assert_eq!(table[0].name, "A");
    assert_eq!(table[0].goal_diff, i32::MAX);
    assert_eq!(table[1].goal_diff, i32::MIN);
    assert!(table[0].goal_diff > 0 && table[1].goal_diff < 0);
}
