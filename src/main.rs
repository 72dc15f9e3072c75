use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveDate;
use tracing_subscriber::EnvFilter;

use league_engine::config::{EngineConfig, parse_delimiter};
use league_engine::csv_ingest::{CsvOptions, ParseOutcome, parse_matches_with, rows_to_matches};
use league_engine::export::export_standings;
use league_engine::forecast::forecast;
use league_engine::league::{LeagueInput, merge_results, summarize_league, summarize_leagues};
use league_engine::match_schema::validate_matches;
use league_engine::remote::{HttpPredictor, RemotePredictor};
use league_engine::sanitize::sanitize_value;
use league_engine::schedule::{ScheduleOptions, generate_schedule_with};
use league_engine::store::LeagueStore;

const USAGE: &str = "usage: league_engine <command> [args]

commands:
  import <file.csv> --league=ID [--delimiter=;]   ingest CSV results into a league
  import-json <file.json> --league=ID             ingest a JSON array of match records
  schedule <Team A,Team B,...> --league=ID [--start=YYYY-MM-DD] [--every=7]
  standings --league=ID
  stats --league=ID
  predict <home> <away> [--league=ID]
  export <out.xlsx>
  leagues

global flags: --db=PATH";

fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let positional = positional_args(&args);
    let Some(command) = positional.first().copied() else {
        println!("{USAGE}");
        return Ok(());
    };

    let mut cfg = EngineConfig::from_env();
    if let Some(path) = flag_value(&args, "--db") {
        cfg.db_path = Some(PathBuf::from(path));
    }
    if let Some(delim) = flag_value(&args, "--delimiter") {
        cfg.csv_delimiter =
            parse_delimiter(&delim).ok_or_else(|| anyhow!("invalid delimiter '{delim}'"))?;
    }

    match command {
        "import" => {
            let file = positional.get(1).context("import needs a CSV file")?;
            let league = require_league(&args)?;
            import_csv(&cfg, file, &league)
        }
        "import-json" => {
            let file = positional.get(1).context("import-json needs a JSON file")?;
            let league = require_league(&args)?;
            import_json(&cfg, file, &league)
        }
        "schedule" => {
            let teams = positional.get(1).context("schedule needs a comma-separated team list")?;
            let league = require_league(&args)?;
            schedule(&cfg, &args, teams, &league)
        }
        "standings" => standings(&cfg, &require_league(&args)?),
        "stats" => stats(&cfg, &require_league(&args)?),
        "predict" => {
            let (Some(home), Some(away)) = (positional.get(1), positional.get(2)) else {
                bail!("predict needs <home> <away>");
            };
            predict(&cfg, home, away, flag_value(&args, "--league").as_deref())
        }
        "export" => {
            let out = positional.get(1).context("export needs an output path")?;
            export(&cfg, PathBuf::from(out))
        }
        "leagues" => {
            let store = open_store(&cfg)?;
            for id in store.league_ids()? {
                let n = store.load_matches(&id).len();
                println!("{id}: {n} matches");
            }
            Ok(())
        }
        other => {
            println!("{USAGE}");
            Err(anyhow!("unknown command '{other}'"))
        }
    }
}

fn import_csv(cfg: &EngineConfig, file: &str, league: &str) -> Result<()> {
    let text = fs::read_to_string(file).with_context(|| format!("read {file}"))?;
    let opts = CsvOptions {
        delimiter: cfg.csv_delimiter,
    };
    let rows = match parse_matches_with(&text, &opts) {
        ParseOutcome::Valid { data } => data,
        ParseOutcome::Invalid { error } => bail!("{file}: {error}"),
    };
    let incoming = rows_to_matches(&rows);
    save_merged(cfg, league, &incoming)
}

fn import_json(cfg: &EngineConfig, file: &str, league: &str) -> Result<()> {
    let text = fs::read_to_string(file).with_context(|| format!("read {file}"))?;
    let value: serde_json::Value =
        serde_json::from_str(&text).with_context(|| format!("{file} is not valid JSON"))?;
    let rows = match sanitize_value(value) {
        serde_json::Value::Array(rows) => rows,
        _ => bail!("{file}: expected a JSON array of matches"),
    };
    let batch = validate_matches(&rows);
    for bad in &batch.invalid_matches {
        println!("rejected #{}: {}", bad.index, bad.errors.join("; "));
    }
    save_merged(cfg, league, &batch.valid_matches)
}

fn save_merged(cfg: &EngineConfig, league: &str, incoming: &[league_engine::Match]) -> Result<()> {
    let store = open_store(cfg)?;
    let existing = store.load_matches(league);
    let merged = merge_results(&existing, incoming);
    if !store.save_matches(league, &merged) {
        bail!("failed to save matches for league {league}");
    }
    tracing::info!(league, imported = incoming.len(), total = merged.len(), "matches stored");
    println!("Imported {} matches into {league} ({} total)", incoming.len(), merged.len());
    Ok(())
}

fn schedule(cfg: &EngineConfig, args: &[String], teams: &str, league: &str) -> Result<()> {
    let names = teams
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>();
    let mut opts = ScheduleOptions::default();
    if let Some(raw) = flag_value(args, "--start") {
        let date = NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .with_context(|| format!("invalid --start date '{raw}'"))?;
        opts.start_date = Some(date);
    }
    if let Some(raw) = flag_value(args, "--every") {
        opts.days_between_rounds = raw
            .parse::<i64>()
            .with_context(|| format!("invalid --every value '{raw}'"))?
            .max(1);
    }

    let fixtures = generate_schedule_with(&names, &opts);
    let store = open_store(cfg)?;
    if !store.save_matches(league, &fixtures) {
        bail!("failed to save schedule for league {league}");
    }
    if !store.save_roster(league, &names) {
        bail!("failed to save roster for league {league}");
    }

    let mut day = 0;
    for m in &fixtures {
        let md = m.matchday.unwrap_or_default();
        if md != day {
            day = md;
            println!("Matchday {md} {}", m.date);
        }
        println!("  {} vs {}", m.home_team, m.away_team);
    }
    Ok(())
}

fn league_input(store: &LeagueStore, league: &str) -> LeagueInput {
    LeagueInput {
        league_id: league.to_string(),
        teams: store.load_roster(league),
        matches: store.load_matches(league),
    }
}

fn standings(cfg: &EngineConfig, league: &str) -> Result<()> {
    let store = open_store(cfg)?;
    let summary = summarize_league(&league_input(&store, league));
    println!(
        "{:>3}  {:<24} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>4} {:>4}",
        "#", "Team", "P", "W", "D", "L", "GF", "GA", "GD", "Pts"
    );
    for (idx, t) in summary.standings.iter().enumerate() {
        println!(
            "{:>3}  {:<24} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>4} {:>4}",
            idx + 1,
            t.name,
            t.played,
            t.wins,
            t.draws,
            t.losses,
            t.goals_for,
            t.goals_against,
            t.goal_diff,
            t.points
        );
    }
    Ok(())
}

fn stats(cfg: &EngineConfig, league: &str) -> Result<()> {
    let store = open_store(cfg)?;
    let s = summarize_league(&league_input(&store, league)).statistics;
    println!("Matches: {} ({} completed)", s.total_matches, s.completed_matches);
    println!("Goals: {} ({:.2} per match)", s.total_goals, s.average_goals_per_match);
    println!("Home/Draw/Away: {}/{}/{}", s.home_wins, s.draws, s.away_wins);
    println!("Most goals in a match: {}", s.most_goals_scored_in_match);
    println!("Clean sheets: {}", s.clean_sheets);
    println!("Top scoring team: {} ({})", s.top_scorer, s.top_scorer_goals);
    println!("Best defence: {} ({} conceded)", s.most_clean_sheets, s.fewest_conceded);
    Ok(())
}

fn predict(cfg: &EngineConfig, home: &str, away: &str, league: Option<&str>) -> Result<()> {
    let store = match open_store(cfg) {
        Ok(store) => Some(store),
        Err(err) => {
            tracing::warn!(error = %err, "match store unavailable");
            None
        }
    };
    let mut remote = cfg
        .prediction_api_url
        .as_ref()
        .map(|url| HttpPredictor::new(url.clone(), cfg.prediction_cache_ttl, cfg.http_timeout));
    let remote_ref = remote.as_mut().map(|r| r as &mut dyn RemotePredictor);

    let out = forecast(home, away, remote_ref, store.as_ref(), league);
    let r = &out.result;
    println!("{} {} - {} {}", r.home_team, r.home_score, r.away_score, r.away_team);
    println!(
        "Home {:.1}% / Draw {:.1}% / Away {:.1}%",
        r.home_win_probability, r.draw_probability, r.away_win_probability
    );
    println!("Confidence: {}", r.confidence);
    println!("Source: {:?}", out.source);
    if !r.analysis.is_empty() {
        println!("{}", r.analysis);
    }
    Ok(())
}

fn export(cfg: &EngineConfig, out: PathBuf) -> Result<()> {
    let store = open_store(cfg)?;
    let inputs = store
        .league_ids()?
        .iter()
        .map(|id| league_input(&store, id))
        .collect::<Vec<_>>();
    let summaries = summarize_leagues(&inputs);
    let report = export_standings(&out, &summaries)?;
    println!(
        "Exported {} leagues ({} standings rows) to {}",
        report.leagues,
        report.standings_rows,
        out.display()
    );
    Ok(())
}

fn open_store(cfg: &EngineConfig) -> Result<LeagueStore> {
    let path = cfg
        .db_path
        .as_ref()
        .context("unable to resolve sqlite path; set LEAGUE_DB_PATH or --db")?;
    LeagueStore::open(path)
}

fn require_league(args: &[String]) -> Result<String> {
    flag_value(args, "--league").context("missing --league=ID")
}

/// `--name=value` or `--name value`.
fn flag_value(args: &[String], name: &str) -> Option<String> {
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(name).and_then(|rest| rest.strip_prefix('=')) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim().to_string());
        }
    }
    None
}

/// Arguments that are neither flags nor the value of a space-separated flag.
fn positional_args(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if arg.starts_with("--") {
            skip_next = !arg.contains('=');
            continue;
        }
        out.push(arg.as_str());
    }
    out
}
