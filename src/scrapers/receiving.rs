//! Player receiving stats, from the `receiving` table on the season
//! receiving page.

use crate::converters::{clean_cell, clean_player_name, col, map_row, ColumnSpec, Converter};
use crate::error::Result;
use crate::fetcher::PageFetcher;
use crate::storage::{Record, StatStore};
use crate::table::{extract_rows, TableRow};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceivingStats {
    pub id: Option<Uuid>,
    pub season: i32,
    pub player_name: String,
    pub team: String,
    pub rank: Option<i64>,
    pub age: Option<i64>,
    pub position: Option<String>,
    pub games: Option<i64>,
    pub games_started: Option<i64>,
    pub targets: Option<i64>,
    pub receptions: Option<i64>,
    pub yards: Option<i64>,
    pub yards_per_reception: Option<f64>,
    pub touchdowns: Option<i64>,
    pub first_downs: Option<i64>,
    pub success_pct: Option<f64>,
    pub longest: Option<i64>,
    pub receptions_per_game: Option<f64>,
    pub yards_per_game: Option<f64>,
    pub catch_pct: Option<f64>,
    pub yards_per_target: Option<f64>,
    pub fumbles: Option<i64>,
}

impl Record for ReceivingStats {
    type Key = (i32, String, String);

    const FAMILY: &'static str = "receiving";

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
    col("targets", "targets", Converter::Int),
    col("rec", "receptions", Converter::Int),
    col("rec_yds", "yards", Converter::Int),
    col("rec_yds_per_rec", "yards_per_reception", Converter::Decimal),
    col("rec_td", "touchdowns", Converter::Int),
    col("rec_first_down", "first_downs", Converter::Int),
    col("rec_success_rate", "success_pct", Converter::Decimal),
    col("rec_long", "longest", Converter::Int),
    col("rec_per_g", "receptions_per_game", Converter::Decimal),
    col("rec_yds_per_g", "yards_per_game", Converter::Decimal),
    col("catch_pct", "catch_pct", Converter::Decimal),
    col("rec_yds_per_tgt", "yards_per_target", Converter::Decimal),
    col("fumbles", "fumbles", Converter::Int),
];

pub fn parse_rows(rows: &[TableRow], season: i32) -> Vec<ReceivingStats> {
    let mut parsed = Vec::new();
    for row in rows {
        let name = row.get("player").and_then(|p| clean_player_name(p));
        let team = row.get("team").and_then(|t| clean_cell(t));
        let (Some(player_name), Some(team)) = (name, team) else {
            continue;
        };
        let mapped = map_row(row, COLUMNS);
        parsed.push(ReceivingStats {
            id: None,
            season,
            player_name,
            team,
            rank: mapped.int("rank"),
            age: mapped.int("age"),
            position: mapped.text("position"),
            games: mapped.int("games"),
            games_started: mapped.int("games_started"),
            targets: mapped.int("targets"),
            receptions: mapped.int("receptions"),
            yards: mapped.int("yards"),
            yards_per_reception: mapped.decimal("yards_per_reception"),
            touchdowns: mapped.int("touchdowns"),
            first_downs: mapped.int("first_downs"),
            success_pct: mapped.decimal("success_pct"),
            longest: mapped.int("longest"),
            receptions_per_game: mapped.decimal("receptions_per_game"),
            yards_per_game: mapped.decimal("yards_per_game"),
            catch_pct: mapped.decimal("catch_pct"),
            yards_per_target: mapped.decimal("yards_per_target"),
            fumbles: mapped.int("fumbles"),
        });
    }
    parsed
}

pub async fn scrape_and_store(
    store: &StatStore,
    fetcher: &PageFetcher,
    season: i32,
) -> Result<usize> {
    let url = fetcher.season_url(season, "receiving.htm");
    let html = fetcher.fetch_html(&url).await?;
    let rows = extract_rows(&html, "receiving")?;

    let parsed = parse_rows(&rows, season);
    let saved = parsed.len();
    for record in parsed {
        store.receiving.upsert(record)?;
    }
    info!(season, rows_saved = saved, "Stored receiving stats");
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn catch_pct_strips_percent_sign() {
        let mut row = HashMap::new();
        row.insert("player".to_string(), "Ja'Marr Chase*".to_string());
        row.insert("team".to_string(), "CIN".to_string());
        row.insert("catch_pct".to_string(), "72.9%".to_string());
        row.insert("rec".to_string(), "127".to_string());

        let parsed = parse_rows(std::slice::from_ref(&row), 2024);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].catch_pct, Some(72.9));
        assert_eq!(parsed[0].receptions, Some(127));
    }
}
