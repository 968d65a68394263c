//! Player punt and kick return stats, from the `returns` table on the
//! season returns page.

use crate::converters::{clean_cell, clean_player_name, col, map_row, ColumnSpec, Converter};
use crate::error::Result;
use crate::fetcher::PageFetcher;
use crate::storage::{Record, StatStore};
use crate::table::{extract_rows, TableRow};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnStats {
    pub id: Option<Uuid>,
    pub season: i32,
    pub player_name: String,
    pub team: String,
    pub rank: Option<i64>,
    pub age: Option<i64>,
    pub position: Option<String>,
    pub games: Option<i64>,
    pub games_started: Option<i64>,
    pub punt_returns: Option<i64>,
    pub punt_return_yards: Option<i64>,
    pub punt_return_touchdowns: Option<i64>,
    pub punt_return_long: Option<i64>,
    pub punt_return_avg: Option<f64>,
    pub kick_returns: Option<i64>,
    pub kick_return_yards: Option<i64>,
    pub kick_return_touchdowns: Option<i64>,
    pub kick_return_long: Option<i64>,
    pub kick_return_avg: Option<f64>,
    pub all_purpose_yards: Option<i64>,
    pub awards: Option<String>,
}

impl Record for ReturnStats {
    type Key = (i32, String, String);

    const FAMILY: &'static str = "returns";

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
    col("punt_ret", "punt_returns", Converter::Int),
    col("punt_ret_yds", "punt_return_yards", Converter::Int),
    col("punt_ret_td", "punt_return_touchdowns", Converter::Int),
    col("punt_ret_long", "punt_return_long", Converter::Int),
    col("punt_ret_yds_per_ret", "punt_return_avg", Converter::Decimal),
    col("kick_ret", "kick_returns", Converter::Int),
    col("kick_ret_yds", "kick_return_yards", Converter::Int),
    col("kick_ret_td", "kick_return_touchdowns", Converter::Int),
    col("kick_ret_long", "kick_return_long", Converter::Int),
    col("kick_ret_yds_per_ret", "kick_return_avg", Converter::Decimal),
    col("all_purpose_yds", "all_purpose_yards", Converter::Int),
    col("awards", "awards", Converter::Text),
];

pub fn parse_rows(rows: &[TableRow], season: i32) -> Vec<ReturnStats> {
    let mut parsed = Vec::new();
    for row in rows {
        let name = row.get("player").and_then(|p| clean_player_name(p));
        let team = row.get("team").and_then(|t| clean_cell(t));
        let (Some(player_name), Some(team)) = (name, team) else {
            continue;
        };
        let mapped = map_row(row, COLUMNS);
        parsed.push(ReturnStats {
            id: None,
            season,
            player_name,
            team,
            rank: mapped.int("rank"),
            age: mapped.int("age"),
            position: mapped.text("position"),
            games: mapped.int("games"),
            games_started: mapped.int("games_started"),
            punt_returns: mapped.int("punt_returns"),
            punt_return_yards: mapped.int("punt_return_yards"),
            punt_return_touchdowns: mapped.int("punt_return_touchdowns"),
            punt_return_long: mapped.int("punt_return_long"),
            punt_return_avg: mapped.decimal("punt_return_avg"),
            kick_returns: mapped.int("kick_returns"),
            kick_return_yards: mapped.int("kick_return_yards"),
            kick_return_touchdowns: mapped.int("kick_return_touchdowns"),
            kick_return_long: mapped.int("kick_return_long"),
            kick_return_avg: mapped.decimal("kick_return_avg"),
            all_purpose_yards: mapped.int("all_purpose_yards"),
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
    let url = fetcher.season_url(season, "returns.htm");
    let html = fetcher.fetch_html(&url).await?;
    let rows = extract_rows(&html, "returns")?;

    let parsed = parse_rows(&rows, season);
    let saved = parsed.len();
    for record in parsed {
        store.returns.upsert(record)?;
    }
    info!(season, rows_saved = saved, "Stored return stats");
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn maps_both_return_groups() {
        let mut row = HashMap::new();
        row.insert("player".to_string(), "KaVontae Turpin*".to_string());
        row.insert("team".to_string(), "DAL".to_string());
        row.insert("punt_ret_yds".to_string(), "288".to_string());
        row.insert("kick_ret_td".to_string(), "1".to_string());
        row.insert("all_purpose_yds".to_string(), "1,213".to_string());

        let parsed = parse_rows(std::slice::from_ref(&row), 2024);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].player_name, "KaVontae Turpin");
        assert_eq!(parsed[0].punt_return_yards, Some(288));
        assert_eq!(parsed[0].kick_return_touchdowns, Some(1));
        assert_eq!(parsed[0].all_purpose_yards, Some(1213));
    }
}
