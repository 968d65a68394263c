//! Team punting totals, from the team table on the season punting page.
//! Tries `team_punting` before the older `team_stats` id.

use crate::converters::{clean_cell, col, map_row, ColumnSpec, Converter};
use crate::error::Result;
use crate::fetcher::PageFetcher;
use crate::storage::{Record, StatStore};
use crate::table::{extract_rows_any, TableRow};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamPunting {
    pub id: Option<Uuid>,
    pub season: i32,
    pub team: String,
    pub rank: Option<i64>,
    pub games: Option<i64>,
    pub punts: Option<i64>,
    pub punt_yards: Option<i64>,
    pub yards_per_punt: Option<f64>,
    pub return_yards: Option<i64>,
    pub net_yards: Option<i64>,
    pub net_yards_per_punt: Option<f64>,
    pub longest: Option<i64>,
    pub touchbacks: Option<i64>,
    pub touchback_pct: Option<f64>,
    pub inside_20: Option<i64>,
    pub inside_20_pct: Option<f64>,
    pub blocked: Option<i64>,
}

impl Record for TeamPunting {
    type Key = (i32, String);

    const FAMILY: &'static str = "team_punting";

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
    col("ranker", "rank", Converter::Int),
    col("g", "games", Converter::Int),
    col("punt", "punts", Converter::Int),
    col("punt_yds", "punt_yards", Converter::Int),
    col("punt_yds_per_punt", "yards_per_punt", Converter::Decimal),
    col("punt_ret_yds", "return_yards", Converter::Int),
    col("punt_net_yds", "net_yards", Converter::Int),
    col("punt_net_yds_per_punt", "net_yards_per_punt", Converter::Decimal),
    col("punt_long", "longest", Converter::Int),
    col("punt_touchback", "touchbacks", Converter::Int),
    col("punt_touchback_perc", "touchback_pct", Converter::Decimal),
    col("punt_inside_20", "inside_20", Converter::Int),
    col("punt_inside_20_perc", "inside_20_pct", Converter::Decimal),
    col("punt_blocked", "blocked", Converter::Int),
];

pub fn parse_rows(rows: &[TableRow], season: i32) -> Vec<TeamPunting> {
    let mut parsed = Vec::new();
    for row in rows {
        let Some(team) = row.get("team").and_then(|t| clean_cell(t)) else {
            continue;
        };
        if team.starts_with("Avg") || team.starts_with("League") || team == "Tm" {
            continue;
        }
        let mapped = map_row(row, COLUMNS);
        parsed.push(TeamPunting {
            id: None,
            season,
            team,
            rank: mapped.int("rank"),
            games: mapped.int("games"),
            punts: mapped.int("punts"),
            punt_yards: mapped.int("punt_yards"),
            yards_per_punt: mapped.decimal("yards_per_punt"),
            return_yards: mapped.int("return_yards"),
            net_yards: mapped.int("net_yards"),
            net_yards_per_punt: mapped.decimal("net_yards_per_punt"),
            longest: mapped.int("longest"),
            touchbacks: mapped.int("touchbacks"),
            touchback_pct: mapped.decimal("touchback_pct"),
            inside_20: mapped.int("inside_20"),
            inside_20_pct: mapped.decimal("inside_20_pct"),
            blocked: mapped.int("blocked"),
        });
    }
    parsed
}

pub async fn scrape_and_store(
    store: &StatStore,
    fetcher: &PageFetcher,
    season: i32,
) -> Result<usize> {
    let url = fetcher.season_url(season, "punting.htm");
    let html = fetcher.fetch_html(&url).await?;
    let rows = extract_rows_any(&html, &["team_punting", "team_stats"])?;

    let parsed = parse_rows(&rows, season);
    let saved = parsed.len();
    for record in parsed {
        store.team_punting.upsert(record)?;
    }
    info!(season, rows_saved = saved, "Stored team punting");
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn parses_team_rows() {
        let mut team = HashMap::new();
        team.insert("team".to_string(), "Denver Broncos".to_string());
        team.insert("punt".to_string(), "73".to_string());
        team.insert("punt_net_yds_per_punt".to_string(), "41.8".to_string());

        let parsed = parse_rows(std::slice::from_ref(&team), 2024);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].punts, Some(73));
        assert_eq!(parsed[0].net_yards_per_punt, Some(41.8));
    }
}
