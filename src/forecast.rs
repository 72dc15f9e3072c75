use serde::Serialize;

use crate::model::PredictionResult;
use crate::predict::predict_match_outcome;
use crate::remote::RemotePredictor;
use crate::store::LeagueStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastSource {
    Remote,
    LocalHistory,
    Synthetic,
}

#[derive(Debug, Clone, Serialize)]
pub struct Forecast {
    pub source: ForecastSource,
    pub result: PredictionResult,
}

/// Remote service first, then locally stored history, then the synthetic guess.
/// With `league_id` set only that league's matches are used.
pub fn forecast(
    home_team: &str,
    away_team: &str,
    remote: Option<&mut dyn RemotePredictor>,
    store: Option<&LeagueStore>,
    league_id: Option<&str>,
) -> Forecast {
    if let Some(remote) = remote {
        match remote.predict(home_team, away_team) {
            Ok(result) => {
                return Forecast {
                    source: ForecastSource::Remote,
                    result,
                };
            }
            Err(err) => {
                tracing::warn!(home_team, away_team, error = %err, "remote prediction failed; using local data");
            }
        }
    }

    let history = match (store, league_id) {
        (Some(store), Some(id)) => store.load_matches(id),
        (Some(store), None) => store.load_all_matches(),
        (None, _) => Vec::new(),
    };
    let result = predict_match_outcome(home_team, away_team, &history);
    let source = if result.is_synthetic() {
        ForecastSource::Synthetic
    } else {
        ForecastSource::LocalHistory
    };
    Forecast { source, result }
}
