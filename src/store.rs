use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::model::Match;

pub const MATCHES_KEY_PREFIX: &str = "matches-";

/// Key-value persistence for league data: JSON values by string key, plus an
/// index of which match keys belong to which league so history lookups never
/// have to walk every stored key.
pub struct LeagueStore {
    conn: Connection,
}

pub fn matches_key(league_id: &str) -> String {
    format!("{MATCHES_KEY_PREFIX}{league_id}")
}

pub fn roster_key(league_id: &str) -> String {
    format!("teams-{league_id}")
}

impl LeagueStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let conn = Connection::open(path)
            .with_context(|| format!("open sqlite db {}", path.display()))?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory sqlite db")?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Stored value for `key`, or `default` when missing or unreadable.
    pub fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.try_load(key) {
            Ok(Some(v)) => v,
            Ok(None) => default,
            Err(err) => {
                tracing::warn!(key, error = %err, "failed to load stored value");
                default
            }
        }
    }

    pub fn try_load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let raw: Option<String> = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| row.get(0))
            .optional()
            .with_context(|| format!("read key {key}"))?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        let value = serde_json::from_str(&raw).with_context(|| format!("decode key {key}"))?;
        Ok(Some(value))
    }

    /// Returns `false` when the value could not be written.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> bool {
        match self.try_save(key, value) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(key, error = %err, "failed to save value");
                false
            }
        }
    }

    pub fn try_save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value).with_context(|| format!("encode key {key}"))?;
        self.conn
            .execute(
                "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, json],
            )
            .with_context(|| format!("write key {key}"))?;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])
            .with_context(|| format!("delete key {key}"))?;
        self.conn
            .execute("DELETE FROM match_keys WHERE key = ?1", params![key])
            .context("delete match key index row")?;
        Ok(())
    }

    pub fn register_match_key(&self, league_id: &str, key: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR IGNORE INTO match_keys (league_id, key) VALUES (?1, ?2)",
                params![league_id, key],
            )
            .context("register match key")?;
        Ok(())
    }

    pub fn match_keys(&self, league_id: &str) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM match_keys WHERE league_id = ?1 ORDER BY key")
            .context("prepare match key query")?;
        let rows = stmt
            .query_map(params![league_id], |row| row.get::<_, String>(0))
            .context("query match keys")?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row.context("read match key row")?);
        }
        Ok(out)
    }

    pub fn league_ids(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT league_id FROM match_keys ORDER BY league_id")
            .context("prepare league id query")?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .context("query league ids")?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row.context("read league id row")?);
        }
        Ok(out)
    }

    pub fn save_matches(&self, league_id: &str, matches: &[Match]) -> bool {
        let key = matches_key(league_id);
        if !self.save(&key, &matches) {
            return false;
        }
        match self.register_match_key(league_id, &key) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(league_id, error = %err, "failed to index match key");
                false
            }
        }
    }

    /// Returns `false` when the roster could not be written.
    pub fn save_roster(&self, league_id: &str, teams: &[String]) -> bool {
        self.save(&roster_key(league_id), &teams)
    }

    pub fn load_roster(&self, league_id: &str) -> Vec<String> {
        self.load(&roster_key(league_id), Vec::new())
    }

    /// All matches stored under the league's indexed keys.
    pub fn load_matches(&self, league_id: &str) -> Vec<Match> {
        let keys = match self.match_keys(league_id) {
            Ok(keys) => keys,
            Err(err) => {
                tracing::warn!(league_id, error = %err, "failed to read match index");
                return Vec::new();
            }
        };
        keys.iter()
            .flat_map(|key| self.load::<Vec<Match>>(key, Vec::new()))
            .collect()
    }

    pub fn load_all_matches(&self) -> Vec<Match> {
        let leagues = match self.league_ids() {
            Ok(ids) => ids,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read league index");
                return Vec::new();
            }
        };
        leagues.iter().flat_map(|id| self.load_matches(id)).collect()
    }
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS kv (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS match_keys (
            league_id TEXT NOT NULL,
            key TEXT NOT NULL,
            PRIMARY KEY (league_id, key)
        );
        CREATE INDEX IF NOT EXISTS idx_match_keys_key ON match_keys(key);
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_returns_default_for_missing_key() {
        let store = LeagueStore::open_in_memory().unwrap();
        let v: Vec<u32> = store.load("nope", vec![1, 2]);
        assert_eq!(v, vec![1, 2]);
    }

    #[test]
    fn save_then_load_overwrites() {
        let store = LeagueStore::open_in_memory().unwrap();
        assert!(store.save("settings", &"a".to_string()));
        assert!(store.save("settings", &"b".to_string()));
        assert_eq!(store.load("settings", String::new()), "b");
    }

    #[test]
    fn corrupt_value_falls_back_to_default() {
        let store = LeagueStore::open_in_memory().unwrap();
        assert!(store.save("n", &"text"));
        let v: u32 = store.load("n", 5);
        assert_eq!(v, 5);
    }

    #[test]
    fn roster_round_trips() {
        let store = LeagueStore::open_in_memory().unwrap();
        let teams = vec!["Arsenal".to_string(), "Wolves".to_string()];
        assert!(store.save_roster("epl", &teams));
        assert_eq!(store.load_roster("epl"), teams);
        assert!(store.load_roster("liga").is_empty());
    }

    #[test]
    fn failed_writes_are_reported() {
        let store = LeagueStore::open_in_memory().unwrap();
        store.conn.execute_batch("DROP TABLE kv;").unwrap();
        assert!(!store.save_roster("epl", &["Arsenal".to_string()]));
        assert!(!store.save_matches("epl", &[Match::fixture("md1-1", "A", "B")]));
    }
}
