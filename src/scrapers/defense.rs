//! Player defensive stats, from the `defense` table on the season defense
//! page. Sacks are fractional (half-sack credit), so they map to a
//! decimal.

use crate::converters::{clean_cell, clean_player_name, col, map_row, ColumnSpec, Converter};
use crate::error::Result;
use crate::fetcher::PageFetcher;
use crate::storage::{Record, StatStore};
use crate::table::{extract_rows, TableRow};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefenseStats {
    pub id: Option<Uuid>,
    pub season: i32,
    pub player_name: String,
    pub team: String,
    pub rank: Option<i64>,
    pub age: Option<i64>,
    pub position: Option<String>,
    pub games: Option<i64>,
    pub games_started: Option<i64>,
    pub interceptions: Option<i64>,
    pub interception_yards: Option<i64>,
    pub interception_touchdowns: Option<i64>,
    pub interception_long: Option<i64>,
    pub passes_defended: Option<i64>,
    pub forced_fumbles: Option<i64>,
    pub fumbles: Option<i64>,
    pub fumble_recoveries: Option<i64>,
    pub fumble_recovery_yards: Option<i64>,
    pub fumble_recovery_touchdowns: Option<i64>,
    pub sacks: Option<f64>,
    pub tackles_combined: Option<i64>,
    pub tackles_solo: Option<i64>,
    pub tackles_assists: Option<i64>,
    pub tackles_for_loss: Option<i64>,
    pub qb_hits: Option<i64>,
    pub safeties: Option<i64>,
}

impl Record for DefenseStats {
    type Key = (i32, String, String);

    const FAMILY: &'static str = "defense";

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
    col("def_int", "interceptions", Converter::Int),
    col("def_int_yds", "interception_yards", Converter::Int),
    col("def_int_td", "interception_touchdowns", Converter::Int),
    col("def_int_long", "interception_long", Converter::Int),
    col("pass_defended", "passes_defended", Converter::Int),
    col("fumbles_forced", "forced_fumbles", Converter::Int),
    col("fumbles", "fumbles", Converter::Int),
    col("fumbles_rec", "fumble_recoveries", Converter::Int),
    col("fumbles_rec_yds", "fumble_recovery_yards", Converter::Int),
    col("fumbles_rec_td", "fumble_recovery_touchdowns", Converter::Int),
    col("sacks", "sacks", Converter::Decimal),
    col("tackles_combined", "tackles_combined", Converter::Int),
    col("tackles_solo", "tackles_solo", Converter::Int),
    col("tackles_assists", "tackles_assists", Converter::Int),
    col("tackles_loss", "tackles_for_loss", Converter::Int),
    col("qb_hits", "qb_hits", Converter::Int),
    col("safety_md", "safeties", Converter::Int),
];

pub fn parse_rows(rows: &[TableRow], season: i32) -> Vec<DefenseStats> {
    let mut parsed = Vec::new();
    for row in rows {
        let name = row.get("player").and_then(|p| clean_player_name(p));
        let team = row.get("team").and_then(|t| clean_cell(t));
        let (Some(player_name), Some(team)) = (name, team) else {
            continue;
        };
        let mapped = map_row(row, COLUMNS);
        parsed.push(DefenseStats {
            id: None,
            season,
            player_name,
            team,
            rank: mapped.int("rank"),
            age: mapped.int("age"),
            position: mapped.text("position"),
            games: mapped.int("games"),
            games_started: mapped.int("games_started"),
            interceptions: mapped.int("interceptions"),
            interception_yards: mapped.int("interception_yards"),
            interception_touchdowns: mapped.int("interception_touchdowns"),
            interception_long: mapped.int("interception_long"),
            passes_defended: mapped.int("passes_defended"),
            forced_fumbles: mapped.int("forced_fumbles"),
            fumbles: mapped.int("fumbles"),
            fumble_recoveries: mapped.int("fumble_recoveries"),
            fumble_recovery_yards: mapped.int("fumble_recovery_yards"),
            fumble_recovery_touchdowns: mapped.int("fumble_recovery_touchdowns"),
            sacks: mapped.decimal("sacks"),
            tackles_combined: mapped.int("tackles_combined"),
            tackles_solo: mapped.int("tackles_solo"),
            tackles_assists: mapped.int("tackles_assists"),
            tackles_for_loss: mapped.int("tackles_for_loss"),
            qb_hits: mapped.int("qb_hits"),
            safeties: mapped.int("safeties"),
        });
    }
    parsed
}

pub async fn scrape_and_store(
    store: &StatStore,
    fetcher: &PageFetcher,
    season: i32,
) -> Result<usize> {
    let url = fetcher.season_url(season, "defense.htm");
    let html = fetcher.fetch_html(&url).await?;
    let rows = extract_rows(&html, "defense")?;

    let parsed = parse_rows(&rows, season);
    let saved = parsed.len();
    for record in parsed {
        store.defense.upsert(record)?;
    }
    info!(season, rows_saved = saved, "Stored defense stats");
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn maps_defense_columns_with_fractional_sacks() {
        let mut row = HashMap::new();
        row.insert("player".to_string(), "T.J. Watt*".to_string());
        row.insert("team".to_string(), "PIT".to_string());
        row.insert("sacks".to_string(), "11.5".to_string());
        row.insert("tackles_combined".to_string(), "61".to_string());

        let mut headerless = HashMap::new();
        headerless.insert("team".to_string(), "PIT".to_string());

        let parsed = parse_rows(&[row, headerless], 2024);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].player_name, "T.J. Watt");
        assert_eq!(parsed[0].sacks, Some(11.5));
        assert_eq!(parsed[0].tackles_combined, Some(61));
    }
}
