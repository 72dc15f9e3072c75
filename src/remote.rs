use std::time::{Duration, SystemTime};

use anyhow::{Context, Result, anyhow};
use reqwest::Url;

use crate::api_cache::TtlCache;
use crate::http_client::http_client;
use crate::model::PredictionResult;

/// A prediction service outside this process.
pub trait RemotePredictor {
    fn predict(&mut self, home_team: &str, away_team: &str) -> Result<PredictionResult>;
}

/// `GET <base>/predict?home=..&away=..`, answers cached per URL.
pub struct HttpPredictor {
    base_url: String,
    timeout: Duration,
    cache: TtlCache<PredictionResult>,
    clock: fn() -> SystemTime,
}

impl HttpPredictor {
    pub fn new(base_url: impl Into<String>, cache_ttl: Duration, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
            cache: TtlCache::new(cache_ttl),
            clock: SystemTime::now,
        }
    }

    pub fn with_clock(mut self, clock: fn() -> SystemTime) -> Self {
        self.clock = clock;
        self
    }

    pub fn cache(&self) -> &TtlCache<PredictionResult> {
        &self.cache
    }

    pub fn request_url(&self, home_team: &str, away_team: &str) -> Result<Url> {
        let base = format!("{}/predict", self.base_url.trim_end_matches('/'));
        Url::parse_with_params(&base, &[("home", home_team), ("away", away_team)])
            .with_context(|| format!("invalid prediction api url {base}"))
    }
}

impl RemotePredictor for HttpPredictor {
    fn predict(&mut self, home_team: &str, away_team: &str) -> Result<PredictionResult> {
        let url = self.request_url(home_team, away_team)?;
        let now = (self.clock)();
        if let Some(hit) = self.cache.get(url.as_str(), now) {
            tracing::debug!(%url, "prediction cache hit");
            return Ok(hit);
        }

        let client = http_client(self.timeout)?;
        let resp = client
            .get(url.clone())
            .send()
            .context("prediction request failed")?;
        let status = resp.status();
        let body = resp.text().context("failed reading body")?;
        if !status.is_success() {
            return Err(anyhow!("http {}: {}", status, body));
        }
        let result = parse_prediction_json(&body, home_team, away_team)?;

        self.cache.purge_expired(now);
        self.cache.insert(url.as_str(), result.clone(), now);
        Ok(result)
    }
}

/// Decode an API response, filling team names the service may omit.
pub fn parse_prediction_json(raw: &str, home_team: &str, away_team: &str) -> Result<PredictionResult> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(anyhow!("empty prediction response"));
    }
    let mut value: serde_json::Value =
        serde_json::from_str(trimmed).context("invalid prediction json")?;
    if let Some(obj) = value.as_object_mut() {
        obj.entry("home_team").or_insert_with(|| home_team.into());
        obj.entry("away_team").or_insert_with(|| away_team.into());
    }
    let result: PredictionResult =
        serde_json::from_value(value).context("unexpected prediction shape")?;
    if result.confidence > 100 {
        return Err(anyhow!("confidence out of range: {}", result.confidence));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_url_encodes_team_names() {
        let p = HttpPredictor::new(
            "https://example.test/api/",
            Duration::from_secs(60),
            Duration::from_secs(5),
        );
        let url = p.request_url("Brighton & Hove", "Spurs").unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.test/api/predict?home=Brighton+%26+Hove&away=Spurs"
        );
    }

    #[test]
    fn parses_minimal_response() {
        let raw = r#"{"home_score":2,"away_score":1,"confidence":64}"#;
        let p = parse_prediction_json(raw, "A", "B").unwrap();
        assert_eq!(p.home_team, "A");
        assert_eq!((p.home_score, p.away_score, p.confidence), (2, 1, 64));
        assert!(!p.is_synthetic());
    }

    #[test]
    fn rejects_null_and_out_of_range() {
        assert!(parse_prediction_json("null", "A", "B").is_err());
        let raw = r#"{"home_score":2,"away_score":1,"confidence":140}"#;
        assert!(parse_prediction_json(raw, "A", "B").is_err());
    }
}
