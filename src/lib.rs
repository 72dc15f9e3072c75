pub mod api_cache;
pub mod config;
pub mod csv_ingest;
pub mod export;
pub mod forecast;
pub mod http_client;
pub mod league;
pub mod match_schema;
pub mod model;
pub mod predict;
pub mod remote;
pub mod sanitize;
pub mod schedule;
pub mod standings;
pub mod statistics;
pub mod store;

pub use csv_ingest::{ParseOutcome, parse_matches, rows_to_matches};
pub use match_schema::validate_matches;
pub use model::{LeagueStatistics, Match, PredictionResult, TeamStanding};
pub use predict::predict_match_outcome;
pub use schedule::generate_schedule;
pub use standings::calculate_standings;
pub use statistics::calculate_league_statistics;
