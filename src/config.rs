use std::path::PathBuf;
use std::time::Duration;

const APP_DIR: &str = "league_engine";
const DB_FILE: &str = "league.sqlite";

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub db_path: Option<PathBuf>,
    pub csv_delimiter: u8,
    pub prediction_api_url: Option<String>,
    pub prediction_cache_ttl: Duration,
    pub http_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            db_path: app_cache_dir().map(|dir| dir.join(DB_FILE)),
            csv_delimiter: b',',
            prediction_api_url: None,
            prediction_cache_ttl: Duration::from_secs(300),
            http_timeout: Duration::from_secs(10),
        }
    }
}

impl EngineConfig {
    /// Read settings from the environment. Call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(path) = env_string("LEAGUE_DB_PATH") {
            cfg.db_path = Some(PathBuf::from(path));
        }
        if let Some(delim) = env_string("LEAGUE_CSV_DELIMITER").and_then(|s| parse_delimiter(&s)) {
            cfg.csv_delimiter = delim;
        }
        cfg.prediction_api_url = env_string("PREDICTION_API_URL")
            .map(|url| url.trim_end_matches('/').to_string());
        if let Some(secs) = env_u64("PREDICTION_CACHE_TTL_SECS") {
            cfg.prediction_cache_ttl = Duration::from_secs(secs.max(10));
        }
        if let Some(secs) = env_u64("HTTP_TIMEOUT_SECS") {
            cfg.http_timeout = Duration::from_secs(secs.max(1));
        }
        cfg
    }
}

/// Accepts a single ascii character, or the words `tab` / `\t`.
pub fn parse_delimiter(raw: &str) -> Option<u8> {
    match raw {
        "tab" | "\\t" | "\t" => return Some(b'\t'),
        _ => {}
    }
    let raw = raw.trim();
    let mut bytes = raw.bytes();
    match (bytes.next(), bytes.next()) {
        (Some(b), None) if b.is_ascii() => Some(b),
        _ => None,
    }
}

pub fn app_cache_dir() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CACHE_HOME")
        && !base.trim().is_empty()
    {
        return Some(PathBuf::from(base).join(APP_DIR));
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(APP_DIR))
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.trim().parse::<u64>().ok())
}
