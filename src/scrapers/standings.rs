//! Season standings, scraped from the AFC and NFC tables on the season
//! front page.

use crate::converters::{col, map_row, ColumnSpec, Converter};
use crate::error::Result;
use crate::fetcher::PageFetcher;
use crate::storage::{Record, StatStore};
use crate::table::{extract_rows, TableRow};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standings {
    pub id: Option<Uuid>,
    pub season: i32,
    pub team: String,
    pub wins: Option<i64>,
    pub losses: Option<i64>,
    pub ties: Option<i64>,
    pub win_pct: Option<f64>,
    pub points_for: Option<i64>,
    pub points_against: Option<i64>,
    pub points_diff: Option<i64>,
    pub margin_of_victory: Option<f64>,
    pub strength_of_schedule: Option<f64>,
    pub srs: Option<f64>,
    pub srs_offense: Option<f64>,
    pub srs_defense: Option<f64>,
}

impl Record for Standings {
    type Key = (i32, String);

    const FAMILY: &'static str = "standings";

    fn natural_key(&self) -> Self::Key {
        (self.season, self.team.clone())
    }

    fn id(&self) -> Option<Uuid> {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = Some(id);
    }
}

const COLUMNS: &[ColumnSpec] = &[
    col("wins", "wins", Converter::Int),
    col("losses", "losses", Converter::Int),
    col("ties", "ties", Converter::Int),
    col("win_loss_perc", "win_pct", Converter::Decimal),
    col("points", "points_for", Converter::Int),
    col("points_opp", "points_against", Converter::Int),
    col("points_diff", "points_diff", Converter::Int),
    col("mov", "margin_of_victory", Converter::Decimal),
    col("sos_total", "strength_of_schedule", Converter::Decimal),
    col("srs_total", "srs", Converter::Decimal),
    col("srs_offense", "srs_offense", Converter::Decimal),
    col("srs_defense", "srs_defense", Converter::Decimal),
];

pub fn parse_rows(rows: &[TableRow], season: i32) -> Vec<Standings> {
    let mut parsed = Vec::new();
    for row in rows {
        let Some(team) = row.get("team").and_then(|t| crate::converters::clean_cell(t)) else {
            continue;
        };
        // Division header rows carry no stats; they parse to all-None and
        // are filtered by the missing wins column.
        let mapped = map_row(row, COLUMNS);
        if mapped.int("wins").is_none() && mapped.int("losses").is_none() {
            continue;
        }
        parsed.push(Standings {
            id: None,
            season,
            team: team.trim_end_matches(['*', '+']).trim().to_string(),
            wins: mapped.int("wins"),
            losses: mapped.int("losses"),
            ties: mapped.int("ties"),
            win_pct: mapped.decimal("win_pct"),
            points_for: mapped.int("points_for"),
            points_against: mapped.int("points_against"),
            points_diff: mapped.int("points_diff"),
            margin_of_victory: mapped.decimal("margin_of_victory"),
            strength_of_schedule: mapped.decimal("strength_of_schedule"),
            srs: mapped.decimal("srs"),
            srs_offense: mapped.decimal("srs_offense"),
            srs_defense: mapped.decimal("srs_defense"),
        });
    }
    parsed
}

pub async fn scrape_and_store(
    store: &StatStore,
    fetcher: &PageFetcher,
    season: i32,
) -> Result<usize> {
    let url = fetcher.season_url(season, "");
    info!(season, "Fetching standings (AFC + NFC)");
    let html = fetcher.fetch_html(&url).await?;

    let mut all_rows: Vec<TableRow> = Vec::new();
    for conference in ["AFC", "NFC"] {
        all_rows.extend(extract_rows(&html, conference)?);
    }

    let parsed = parse_rows(&all_rows, season);
    let saved = parsed.len();
    for record in parsed {
        store.standings.upsert(record)?;
    }
    info!(season, rows_saved = saved, "Stored standings");
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn row(team: &str, wins: &str, pct: &str) -> TableRow {
        let mut r = HashMap::new();
        r.insert("team".to_string(), team.to_string());
        r.insert("wins".to_string(), wins.to_string());
        r.insert("losses".to_string(), "4".to_string());
        r.insert("win_loss_perc".to_string(), pct.to_string());
        r
    }

    #[test]
    fn parses_team_rows_and_skips_division_headers() {
        let rows = vec![
            {
                let mut r = HashMap::new();
                r.insert("team".to_string(), "AFC East".to_string());
                r
            },
            row("Buffalo Bills*", "13", ".765"),
        ];
        let parsed = parse_rows(&rows, 2024);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].team, "Buffalo Bills");
        assert_eq!(parsed[0].wins, Some(13));
        assert_eq!(parsed[0].win_pct, Some(0.765));
        assert_eq!(parsed[0].season, 2024);
    }
}
