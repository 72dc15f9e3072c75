use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::model::{MAX_SCORE, Match};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

impl FieldError {
    fn new(path: &str, message: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvalidMatch {
    /// 1-based position in the input batch.
    pub index: usize,
    pub data: Value,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct BatchValidation {
    pub valid_matches: Vec<Match>,
    pub invalid_matches: Vec<InvalidMatch>,
}

/// Validate every candidate, keeping the good ones and reporting the rest with
/// their raw data so a bulk import can say exactly which rows failed.
pub fn validate_matches(rows: &[Value]) -> BatchValidation {
    let mut out = BatchValidation::default();
    for (idx, raw) in rows.iter().enumerate() {
        match validate_match(raw) {
            Ok(mut m) => {
                if m.id.is_empty() {
                    m.id = format!("import-{}", idx + 1);
                }
                out.valid_matches.push(m);
            }
            Err(errors) => out.invalid_matches.push(InvalidMatch {
                index: idx + 1,
                data: raw.clone(),
                errors: errors.iter().map(ToString::to_string).collect(),
            }),
        }
    }
    out
}

pub fn validate_match(raw: &Value) -> Result<Match, Vec<FieldError>> {
    let Some(obj) = raw.as_object() else {
        return Err(vec![FieldError::new("(root)", "expected an object")]);
    };

    let mut errors = Vec::new();
    let date = required_string(obj, "date", &mut errors);
    let home_team = required_string(obj, "home_team", &mut errors);
    let away_team = required_string(obj, "away_team", &mut errors);
    let home_score = score(obj, "home_score", true, &mut errors);
    let away_score = score(obj, "away_score", true, &mut errors);
    let ht_home_score = score(obj, "ht_home_score", false, &mut errors);
    let ht_away_score = score(obj, "ht_away_score", false, &mut errors);
    let round = string_or_number(obj, "round", &mut errors);
    let id = string_or_number(obj, "id", &mut errors);
    let venue = optional_string(obj, "venue", &mut errors);
    let referee = optional_string(obj, "referee", &mut errors);

    if !home_team.is_empty() && home_team == away_team {
        errors.push(FieldError::new("away_team", "must differ from home_team"));
    }
    for (path, ht, ft) in [
        ("ht_home_score", ht_home_score, home_score),
        ("ht_away_score", ht_away_score, away_score),
    ] {
        if let (Some(ht), Some(ft)) = (ht, ft)
            && ht > ft
        {
            errors.push(FieldError::new(path, format!("half-time score {ht} exceeds full-time score {ft}")));
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(Match {
        id: id.unwrap_or_default(),
        home_team,
        away_team,
        home_score,
        away_score,
        ht_home_score,
        ht_away_score,
        date,
        matchday: round.as_deref().and_then(|r| r.parse().ok()),
        round,
        venue,
        referee,
        played: home_score.is_some() && away_score.is_some(),
    })
}

fn required_string(obj: &Map<String, Value>, key: &str, errors: &mut Vec<FieldError>) -> String {
    match obj.get(key) {
        None | Some(Value::Null) => {
            errors.push(FieldError::new(key, "is required"));
            String::new()
        }
        Some(Value::String(s)) if s.trim().is_empty() => {
            errors.push(FieldError::new(key, "must not be empty"));
            String::new()
        }
        Some(Value::String(s)) => s.trim().to_string(),
        Some(_) => {
            errors.push(FieldError::new(key, "expected a string"));
            String::new()
        }
    }
}

fn optional_string(obj: &Map<String, Value>, key: &str, errors: &mut Vec<FieldError>) -> Option<String> {
    match obj.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Some(_) => {
            errors.push(FieldError::new(key, "expected a string"));
            None
        }
    }
}

fn string_or_number(obj: &Map<String, Value>, key: &str, errors: &mut Vec<FieldError>) -> Option<String> {
    match obj.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(_) => {
            errors.push(FieldError::new(key, "expected a string or number"));
            None
        }
    }
}

fn score(obj: &Map<String, Value>, key: &str, required: bool, errors: &mut Vec<FieldError>) -> Option<u32> {
    let value = match obj.get(key) {
        None | Some(Value::Null) => {
            if required {
                errors.push(FieldError::new(key, "is required"));
            }
            return None;
        }
        Some(v) => v,
    };
    let Some(n) = value.as_f64() else {
        errors.push(FieldError::new(key, "expected a number"));
        return None;
    };
    if n.fract() != 0.0 {
        errors.push(FieldError::new(key, "expected an integer"));
        return None;
    }
    if n < 0.0 {
        errors.push(FieldError::new(key, "must be greater than or equal to 0"));
        return None;
    }
    if n > MAX_SCORE as f64 {
        errors.push(FieldError::new(key, format!("must be less than or equal to {MAX_SCORE}")));
        return None;
    }
    Some(n as u32)
}
