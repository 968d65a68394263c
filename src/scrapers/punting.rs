//! Player punting stats, from the `punting` table on the season punting
//! page.

use crate::converters::{clean_cell, clean_player_name, col, map_row, ColumnSpec, Converter};
use crate::error::Result;
use crate::fetcher::PageFetcher;
use crate::storage::{Record, StatStore};
use crate::table::{extract_rows, TableRow};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PuntingStats {
    pub id: Option<Uuid>,
    pub season: i32,
    pub player_name: String,
    pub team: String,
    pub rank: Option<i64>,
    pub age: Option<i64>,
    pub position: Option<String>,
    pub games: Option<i64>,
    pub games_started: Option<i64>,
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
    pub awards: Option<String>,
}

impl Record for PuntingStats {
    type Key = (i32, String, String);

    const FAMILY: &'static str = "punting";

    fn natural_key(&self) -> Self::Key {
        (self.season, self.player_name.clone(), self.team.clone())
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
    col("age", "age", Converter::Int),
    col("pos", "position", Converter::Text),
    col("g", "games", Converter::Int),
    col("gs", "games_started", Converter::Int),
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
    col("awards", "awards", Converter::Text),
];

pub fn parse_rows(rows: &[TableRow], season: i32) -> Vec<PuntingStats> {
    let mut parsed = Vec::new();
    for row in rows {
        let name = row.get("player").and_then(|p| clean_player_name(p));
        let team = row.get("team").and_then(|t| clean_cell(t));
        let (Some(player_name), Some(team)) = (name, team) else {
            continue;
        };
        let mapped = map_row(row, COLUMNS);
        parsed.push(PuntingStats {
            id: None,
            season,
            player_name,
            team,
            rank: mapped.int("rank"),
            age: mapped.int("age"),
            position: mapped.text("position"),
            games: mapped.int("games"),
            games_started: mapped.int("games_started"),
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
            awards: mapped.text("awards"),
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
    let rows = extract_rows(&html, "punting")?;

    let parsed = parse_rows(&rows, season);
    let saved = parsed.len();
    for record in parsed {
        store.punting.upsert(record)?;
    }
    info!(season, rows_saved = saved, "Stored punting stats");
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn maps_punting_columns() {
        let mut row = HashMap::new();
        row.insert("player".to_string(), "Tommy Townsend".to_string());
        row.insert("team".to_string(), "KAN".to_string());
        row.insert("punt".to_string(), "62".to_string());
        row.insert("punt_net_yds_per_punt".to_string(), "42.1".to_string());

        let parsed = parse_rows(std::slice::from_ref(&row), 2024);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].punts, Some(62));
        assert_eq!(parsed[0].net_yards_per_punt, Some(42.1));
    }
}
