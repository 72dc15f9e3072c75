use serde_json::json;

use league_engine::match_schema::validate_matches;

#[test]
fn batch_partitions_valid_and_invalid_rows() {
    let rows = vec![
        json!({"date": "2024-08-10", "home_team": "Arsenal", "away_team": "Wolves", "home_score": 2, "away_score": 0}),
        json!({"date": "2024-08-10", "home_team": "Chelsea", "away_team": "", "home_score": 1, "away_score": "x"}),
        json!({"id": 77, "date": "2024-08-11", "home_team": "Leeds", "away_team": "Hull", "home_score": 0, "away_score": 0, "referee": "M. Dean"}),
        json!(["not", "an", "object"]),
    ];

    let out = validate_matches(&rows);
    assert_eq!(out.valid_matches.len(), 2);
    assert_eq!(out.invalid_matches.len(), 2);

    assert_eq!(out.valid_matches[0].id, "import-1");
    assert_eq!(out.valid_matches[1].id, "77");
    assert_eq!(out.valid_matches[1].referee.as_deref(), Some("M. Dean"));

    let bad = &out.invalid_matches[0];
    assert_eq!(bad.index, 2);
    assert_eq!(bad.data, rows[1]);
    assert!(bad.errors.contains(&"away_team: must not be empty".to_string()));
    assert!(bad.errors.contains(&"away_score: expected a number".to_string()));
    assert_eq!(out.invalid_matches[1].index, 4);
}

#[test]
fn same_team_on_both_sides_is_invalid() {
    let rows = vec![json!({"date": "2024-08-10", "home_team": "A", "away_team": "A", "home_score": 1, "away_score": 1})];
    let out = validate_matches(&rows);
    assert!(out.valid_matches.is_empty());
    assert_eq!(out.invalid_matches[0].errors, vec!["away_team: must differ from home_team"]);
}
