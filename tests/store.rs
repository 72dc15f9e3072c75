use league_engine::model::Match;
use league_engine::store::{LeagueStore, matches_key};

#[test]
fn matches_round_trip_through_indexed_keys() {
    let store = LeagueStore::open_in_memory().expect("in-memory db");
    let epl = vec![Match::result("1", "Arsenal", "Wolves", 2, 0), Match::fixture("2", "Wolves", "Arsenal")];
    let liga = vec![Match::result("1", "Betis", "Girona", 1, 1)];

    assert!(store.save_matches("epl", &epl));
    assert!(store.save_matches("laliga", &liga));

    assert_eq!(store.load_matches("epl"), epl);
    assert_eq!(store.match_keys("epl").unwrap(), vec![matches_key("epl")]);
    assert_eq!(store.league_ids().unwrap(), vec!["epl", "laliga"]);
    assert_eq!(store.load_all_matches().len(), 3);
}

#[test]
fn unindexed_keys_are_not_treated_as_history() {
    let store = LeagueStore::open_in_memory().expect("in-memory db");
    assert!(store.save("matches-stray", &vec![Match::result("1", "A", "B", 1, 0)]));
    assert!(store.load_all_matches().is_empty());
}

#[test]
fn removing_a_key_drops_it_from_the_index() {
    let store = LeagueStore::open_in_memory().expect("in-memory db");
    assert!(store.save_matches("epl", &[Match::result("1", "A", "B", 1, 0)]));
    store.remove(&matches_key("epl")).unwrap();
    assert!(store.load_matches("epl").is_empty());
    assert!(store.league_ids().unwrap().is_empty());
}

#[test]
fn file_backed_store_persists_between_opens() {
    let dir = std::env::temp_dir().join(format!("league_engine_store_{}", std::process::id()));
    let path = dir.join("league.sqlite");
    {
        let store = LeagueStore::open(&path).expect("open file db");
        assert!(store.save("teams-epl", &vec!["Arsenal".to_string(), "Wolves".to_string()]));
    }
    let store = LeagueStore::open(&path).expect("reopen file db");
    let teams: Vec<String> = store.load("teams-epl", Vec::new());
    assert_eq!(teams, vec!["Arsenal", "Wolves"]);
    drop(store);
    let _ = std::fs::remove_dir_all(&dir);
}
