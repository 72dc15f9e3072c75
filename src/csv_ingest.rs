use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::model::{MAX_SCORE, Match};
use crate::sanitize::strip_tags;

pub const REQUIRED_FIELDS: &[&str] = &["home_team", "away_team", "home_score", "away_score", "date"];

static TIME_OF_DAY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,2}:\d{2}$").expect("time pattern is valid"));

/// One sanitized CSV data row, keyed by header name.
pub type CsvRow = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy)]
pub struct CsvOptions {
    pub delimiter: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ParseOutcome {
    Valid { data: Vec<CsvRow> },
    Invalid { error: String },
}

impl ParseOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ParseOutcome::Valid { .. })
    }

    pub fn rows(&self) -> Option<&[CsvRow]> {
        match self {
            ParseOutcome::Valid { data } => Some(data),
            ParseOutcome::Invalid { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ParseOutcome::Valid { .. } => None,
            ParseOutcome::Invalid { error } => Some(error),
        }
    }
}

pub fn parse_matches(text: &str) -> ParseOutcome {
    parse_matches_with(text, &CsvOptions::default())
}

/// Parse, sanitize and validate CSV match data. Never panics on malformed input.
pub fn parse_matches_with(text: &str, opts: &CsvOptions) -> ParseOutcome {
    let rows = match read_rows(text, opts) {
        Ok(rows) => rows,
        Err(err) => {
            return ParseOutcome::Invalid {
                error: format!("Failed to parse CSV: {err}"),
            };
        }
    };
    let rows = rows.into_iter().map(sanitize_row).collect::<Vec<_>>();
    match validate_rows(&rows) {
        Ok(()) => ParseOutcome::Valid { data: rows },
        Err(error) => ParseOutcome::Invalid { error },
    }
}

fn read_rows(text: &str, opts: &CsvOptions) -> Result<Vec<CsvRow>, csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(opts.delimiter)
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut records = rdr
        .records()
        .filter(|r| match r {
            Ok(rec) => !is_blank(rec),
            Err(_) => true,
        });

    let Some(header) = records.next().transpose()? else {
        return Ok(Vec::new());
    };
    let names = header.iter().map(|h| h.trim().to_string()).collect::<Vec<_>>();

    let mut out = Vec::new();
    for record in records {
        let record = record?;
        let row = names
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), record.get(idx).unwrap_or("").trim().to_string()))
            .collect::<CsvRow>();
        out.push(row);
    }
    Ok(out)
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|f| f.trim().is_empty())
}

fn sanitize_row(row: CsvRow) -> CsvRow {
    row.into_iter().map(|(k, v)| (k, strip_tags(&v))).collect()
}

fn validate_rows(rows: &[CsvRow]) -> Result<(), String> {
    let Some(first) = rows.first() else {
        return Err("CSV contains no data rows".to_string());
    };
    let missing = REQUIRED_FIELDS
        .iter()
        .filter(|f| !first.contains_key(**f))
        .copied()
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        return Err(format!("Missing required fields: {}", missing.join(", ")));
    }

    for (idx, row) in rows.iter().enumerate() {
        let line = idx + 1;
        let home = field(row, "home_score");
        let away = field(row, "away_score");
        for (name, raw) in [("home_score", home), ("away_score", away)] {
            if !raw.is_empty() && parse_score(raw).is_none() {
                return Err(format!(
                    "Row {line}: {name} must be a whole number between 0 and {MAX_SCORE}, got '{raw}'"
                ));
            }
        }
        if home.is_empty() != away.is_empty() {
            return Err(format!("Row {line}: home_score and away_score must both be set or both be empty"));
        }
        for (name, full) in [("ht_home_score", home), ("ht_away_score", away)] {
            let raw = field(row, name);
            if raw.is_empty() {
                continue;
            }
            let Some(ht) = parse_score(raw) else {
                return Err(format!(
                    "Row {line}: {name} must be a whole number between 0 and {MAX_SCORE}, got '{raw}'"
                ));
            };
            let Some(ft) = parse_score(full) else {
                return Err(format!("Row {line}: {name} is set but the match has no full-time score"));
            };
            if ht > ft {
                return Err(format!("Row {line}: {name} ({ht}) exceeds full-time score ({ft})"));
            }
        }
        let date = field(row, "date");
        if !date.is_empty() && !is_valid_date(date) {
            return Err(format!("Row {line}: invalid date '{date}'"));
        }
    }
    Ok(())
}

fn field<'a>(row: &'a CsvRow, name: &str) -> &'a str {
    row.get(name).map(String::as_str).unwrap_or("")
}

/// Scores accept any numeric spelling ("2", "2.0") but must be whole, non-negative
/// and at most [`MAX_SCORE`].
pub fn parse_score(raw: &str) -> Option<u32> {
    let v = raw.trim().parse::<f64>().ok()?;
    if !v.is_finite() || v < 0.0 || v.fract() != 0.0 || v > MAX_SCORE as f64 {
        return None;
    }
    Some(v as u32)
}

/// Calendar dates in the formats league exports use, or a bare `HH:MM` round token.
pub fn is_valid_date(raw: &str) -> bool {
    let s = raw.trim();
    if s.is_empty() {
        return false;
    }
    if NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
        || NaiveDate::parse_from_str(s, "%d/%m/%Y").is_ok()
        || DateTime::parse_from_rfc3339(s).is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").is_ok()
    {
        return true;
    }
    TIME_OF_DAY_RE.is_match(s)
}

/// Turn validated rows into match records. Rows without an explicit round are
/// grouped by their raw date value, numbered in order of first appearance.
pub fn rows_to_matches(rows: &[CsvRow]) -> Vec<Match> {
    let mut rounds: HashMap<&str, u32> = HashMap::new();
    let mut out = Vec::with_capacity(rows.len());

    for (idx, row) in rows.iter().enumerate() {
        let date = field(row, "date");
        let home_score = parse_score(field(row, "home_score"));
        let away_score = parse_score(field(row, "away_score"));
        let explicit_round = Some(field(row, "round")).filter(|s| !s.is_empty());
        let next = rounds.len() as u32 + 1;
        let round = match explicit_round {
            Some(r) => r.to_string(),
            None => rounds.entry(date).or_insert(next).to_string(),
        };
        let matchday = round.parse::<u32>().ok();

        out.push(Match {
            id: format!("csv-{}", idx + 1),
            home_team: field(row, "home_team").to_string(),
            away_team: field(row, "away_team").to_string(),
            home_score,
            away_score,
            ht_home_score: parse_score(field(row, "ht_home_score")),
            ht_away_score: parse_score(field(row, "ht_away_score")),
            date: date.to_string(),
            round: Some(round),
            matchday,
            venue: Some(field(row, "venue").to_string()).filter(|s| !s.is_empty()),
            referee: Some(field(row, "referee").to_string()).filter(|s| !s.is_empty()),
            played: home_score.is_some() && away_score.is_some(),
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_supported_date_formats() {
        assert!(is_valid_date("2024-08-10"));
        assert!(is_valid_date("10/08/2024"));
        assert!(is_valid_date("2024-08-10T15:00:00Z"));
        assert!(is_valid_date("2024-08-10 15:00"));
        assert!(is_valid_date("15:00"));
        assert!(is_valid_date("9:30"));
        assert!(!is_valid_date("not a date"));
        assert!(!is_valid_date("2024-13-45"));
    }

    #[test]
    fn parse_score_rejects_fractions_and_negatives() {
        assert_eq!(parse_score("2"), Some(2));
        assert_eq!(parse_score("3.0"), Some(3));
        assert_eq!(parse_score("1.5"), None);
        assert_eq!(parse_score("-1"), None);
        assert_eq!(parse_score("x"), None);
        assert_eq!(parse_score("999"), Some(999));
        assert_eq!(parse_score("1000"), None);
        assert_eq!(parse_score("4000000000"), None);
    }

    #[test]
    fn short_rows_are_padded() {
        let text = "date,home_team,away_team,home_score,away_score,venue\n2024-08-10,A,B,1,0\n";
        let out = parse_matches(text);
        let rows = out.rows().expect("valid");
        assert_eq!(rows[0].get("venue").map(String::as_str), Some(""));
    }

    #[test]
    fn rounds_group_by_raw_date() {
        let text = "date,home_team,away_team,home_score,away_score\n\
                    15:00,A,B,1,0\n15:00,C,D,2,2\n17:30,A,C,0,1\n";
        let out = parse_matches(text);
        let matches = rows_to_matches(out.rows().expect("valid"));
        assert_eq!(matches[0].round.as_deref(), Some("1"));
        assert_eq!(matches[1].round.as_deref(), Some("1"));
        assert_eq!(matches[2].round.as_deref(), Some("2"));
        assert_eq!(matches[2].matchday, Some(2));
    }
}
