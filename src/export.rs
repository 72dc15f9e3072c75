use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::league::LeagueSummary;

pub struct ExportReport {
    pub leagues: usize,
    pub standings_rows: usize,
}

/// One `Standings <league>` sheet per league plus a shared `Statistics` sheet.
pub fn export_standings(path: &Path, leagues: &[LeagueSummary]) -> Result<ExportReport> {
    let mut workbook = Workbook::new();
    let mut standings_rows = 0usize;

    for league in leagues {
        let mut rows = vec![
            [
                "Pos", "Team", "P", "W", "D", "L", "GF", "GA", "GD", "Pts",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>(),
        ];
        for (idx, t) in league.standings.iter().enumerate() {
            rows.push(vec![
                (idx + 1).to_string(),
                t.name.clone(),
                t.played.to_string(),
                t.wins.to_string(),
                t.draws.to_string(),
                t.losses.to_string(),
                t.goals_for.to_string(),
                t.goals_against.to_string(),
                t.goal_diff.to_string(),
                t.points.to_string(),
            ]);
        }
        standings_rows += league.standings.len();

        let sheet = workbook.add_worksheet();
        sheet.set_name(sheet_name(&league.league_id))?;
        write_rows(sheet, &rows)?;
    }

    let mut stats_rows = vec![
        [
            "League",
            "Matches",
            "Completed",
            "Goals",
            "Avg Goals",
            "Home Wins",
            "Away Wins",
            "Draws",
            "Most Goals In Match",
            "Clean Sheets",
            "Top Scoring Team",
            "Best Defence",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>(),
    ];
    for league in leagues {
        let s = &league.statistics;
        stats_rows.push(vec![
            league.league_id.clone(),
            s.total_matches.to_string(),
            s.completed_matches.to_string(),
            s.total_goals.to_string(),
            format!("{:.2}", s.average_goals_per_match),
            s.home_wins.to_string(),
            s.away_wins.to_string(),
            s.draws.to_string(),
            s.most_goals_scored_in_match.to_string(),
            s.clean_sheets.to_string(),
            s.top_scorer.clone(),
            s.most_clean_sheets.clone(),
        ]);
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Statistics")?;
        write_rows(sheet, &stats_rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        leagues: leagues.len(),
        standings_rows,
    })
}

/// Excel sheet names: at most 31 chars, none of `[]:*?/\`.
fn sheet_name(league_id: &str) -> String {
    let cleaned = league_id
        .chars()
        .map(|c| if "[]:*?/\\".contains(c) { '_' } else { c })
        .collect::<String>();
    format!("Standings {cleaned}").chars().take(31).collect()
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_names_are_excel_safe() {
        assert_eq!(sheet_name("epl"), "Standings epl");
        assert_eq!(sheet_name("a/b"), "Standings a_b");
        assert_eq!(sheet_name(&"x".repeat(40)).chars().count(), 31);
    }
}
