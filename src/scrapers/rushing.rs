//! Player rushing stats, from the `rushing` table on the season rushing
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
pub struct RushingStats {
    pub id: Option<Uuid>,
    pub season: i32,
    pub player_name: String,
    pub team: String,
    pub rank: Option<i64>,
    pub age: Option<i64>,
    pub position: Option<String>,
    pub games: Option<i64>,
    pub games_started: Option<i64>,
    pub attempts: Option<i64>,
    pub yards: Option<i64>,
    pub touchdowns: Option<i64>,
    pub first_downs: Option<i64>,
    pub success_pct: Option<f64>,
    pub longest: Option<i64>,
    pub yards_per_attempt: Option<f64>,
    pub yards_per_game: Option<f64>,
    pub attempts_per_game: Option<f64>,
    pub fumbles: Option<i64>,
    pub awards: Option<String>,
}

impl Record for RushingStats {
    type Key = (i32, String, String);

    const FAMILY: &'static str = "rushing";

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
    col("rush_att", "attempts", Converter::Int),
    col("rush_yds", "yards", Converter::Int),
    col("rush_td", "touchdowns", Converter::Int),
    col("rush_first_down", "first_downs", Converter::Int),
    col("rush_success_rate", "success_pct", Converter::Decimal),
    col("rush_long", "longest", Converter::Int),
    col("rush_yds_per_att", "yards_per_attempt", Converter::Decimal),
    col("rush_yds_per_g", "yards_per_game", Converter::Decimal),
    col("rush_att_per_g", "attempts_per_game", Converter::Decimal),
    col("fumbles", "fumbles", Converter::Int),
    col("awards", "awards", Converter::Text),
];

pub fn parse_rows(rows: &[TableRow], season: i32) -> Vec<RushingStats> {
    let mut parsed = Vec::new();
    for row in rows {
        let name = row.get("player").and_then(|p| clean_player_name(p));
        let team = row.get("team").and_then(|t| clean_cell(t));
        let (Some(player_name), Some(team)) = (name, team) else {
            continue;
        };
        let mapped = map_row(row, COLUMNS);
        parsed.push(RushingStats {
            id: None,
            season,
            player_name,
            team,
            rank: mapped.int("rank"),
            age: mapped.int("age"),
            position: mapped.text("position"),
            games: mapped.int("games"),
            games_started: mapped.int("games_started"),
            attempts: mapped.int("attempts"),
            yards: mapped.int("yards"),
            touchdowns: mapped.int("touchdowns"),
            first_downs: mapped.int("first_downs"),
            success_pct: mapped.decimal("success_pct"),
            longest: mapped.int("longest"),
            yards_per_attempt: mapped.decimal("yards_per_attempt"),
            yards_per_game: mapped.decimal("yards_per_game"),
            attempts_per_game: mapped.decimal("attempts_per_game"),
            fumbles: mapped.int("fumbles"),
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
    let url = fetcher.season_url(season, "rushing.htm");
    let html = fetcher.fetch_html(&url).await?;
    let rows = extract_rows(&html, "rushing")?;

    let parsed = parse_rows(&rows, season);
    let saved = parsed.len();
    for record in parsed {
        store.rushing.upsert(record)?;
    }
    info!(season, rows_saved = saved, "Stored rushing stats");
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn maps_rushing_columns() {
        let mut row = HashMap::new();
        row.insert("player".to_string(), "Saquon Barkley*+".to_string());
        row.insert("team".to_string(), "PHI".to_string());
        row.insert("rush_yds".to_string(), "2,005".to_string());
        row.insert("rush_yds_per_att".to_string(), "5.8".to_string());

        let parsed = parse_rows(std::slice::from_ref(&row), 2024);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].player_name, "Saquon Barkley");
        assert_eq!(parsed[0].yards, Some(2005));
        assert_eq!(parsed[0].yards_per_attempt, Some(5.8));
    }
}
