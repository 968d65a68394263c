//! Player scoring stats, from the `scoring` table on the season scoring
//! page. Touchdowns are broken out by how they were scored.

use crate::converters::{clean_cell, clean_player_name, col, map_row, ColumnSpec, Converter};
use crate::error::Result;
use crate::fetcher::PageFetcher;
use crate::storage::{Record, StatStore};
use crate::table::{extract_rows, TableRow};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringStats {
    pub id: Option<Uuid>,
    pub season: i32,
    pub player_name: String,
    pub team: String,
    pub rank: Option<i64>,
    pub age: Option<i64>,
    pub position: Option<String>,
    pub games: Option<i64>,
    pub games_started: Option<i64>,
    pub rush_touchdowns: Option<i64>,
    pub receiving_touchdowns: Option<i64>,
    pub punt_return_touchdowns: Option<i64>,
    pub kick_return_touchdowns: Option<i64>,
    pub fumble_recovery_touchdowns: Option<i64>,
    pub interception_touchdowns: Option<i64>,
    pub other_touchdowns: Option<i64>,
    pub total_touchdowns: Option<i64>,
    pub two_point_conversions: Option<i64>,
    pub defensive_two_points: Option<i64>,
    pub xp_made: Option<i64>,
    pub xp_attempts: Option<i64>,
    pub fg_made: Option<i64>,
    pub fg_attempts: Option<i64>,
    pub safeties: Option<i64>,
    pub points: Option<i64>,
    pub points_per_game: Option<f64>,
    pub awards: Option<String>,
}

impl Record for ScoringStats {
    type Key = (i32, String, String);

    const FAMILY: &'static str = "scoring";

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
    col("rush_td", "rush_touchdowns", Converter::Int),
    col("rec_td", "receiving_touchdowns", Converter::Int),
    col("punt_ret_td", "punt_return_touchdowns", Converter::Int),
    col("kick_ret_td", "kick_return_touchdowns", Converter::Int),
    col("fumbles_rec_td", "fumble_recovery_touchdowns", Converter::Int),
    col("def_int_td", "interception_touchdowns", Converter::Int),
    col("other_td", "other_touchdowns", Converter::Int),
    col("all_td", "total_touchdowns", Converter::Int),
    col("two_pt_md", "two_point_conversions", Converter::Int),
    col("def_two_pt_md", "defensive_two_points", Converter::Int),
    col("xpm", "xp_made", Converter::Int),
    col("xpa", "xp_attempts", Converter::Int),
    col("fgm", "fg_made", Converter::Int),
    col("fga", "fg_attempts", Converter::Int),
    col("safety_md", "safeties", Converter::Int),
    col("points", "points", Converter::Int),
    col("pts_per_g", "points_per_game", Converter::Decimal),
    col("awards", "awards", Converter::Text),
];

pub fn parse_rows(rows: &[TableRow], season: i32) -> Vec<ScoringStats> {
    let mut parsed = Vec::new();
    for row in rows {
        let name = row.get("player").and_then(|p| clean_player_name(p));
        let team = row.get("team").and_then(|t| clean_cell(t));
        let (Some(player_name), Some(team)) = (name, team) else {
            continue;
        };
        let mapped = map_row(row, COLUMNS);
        parsed.push(ScoringStats {
            id: None,
            season,
            player_name,
            team,
            rank: mapped.int("rank"),
            age: mapped.int("age"),
            position: mapped.text("position"),
            games: mapped.int("games"),
            games_started: mapped.int("games_started"),
            rush_touchdowns: mapped.int("rush_touchdowns"),
            receiving_touchdowns: mapped.int("receiving_touchdowns"),
            punt_return_touchdowns: mapped.int("punt_return_touchdowns"),
            kick_return_touchdowns: mapped.int("kick_return_touchdowns"),
            fumble_recovery_touchdowns: mapped.int("fumble_recovery_touchdowns"),
            interception_touchdowns: mapped.int("interception_touchdowns"),
            other_touchdowns: mapped.int("other_touchdowns"),
            total_touchdowns: mapped.int("total_touchdowns"),
            two_point_conversions: mapped.int("two_point_conversions"),
            defensive_two_points: mapped.int("defensive_two_points"),
            xp_made: mapped.int("xp_made"),
            xp_attempts: mapped.int("xp_attempts"),
            fg_made: mapped.int("fg_made"),
            fg_attempts: mapped.int("fg_attempts"),
            safeties: mapped.int("safeties"),
            points: mapped.int("points"),
            points_per_game: mapped.decimal("points_per_game"),
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
    let url = fetcher.season_url(season, "scoring.htm");
    let html = fetcher.fetch_html(&url).await?;
    let rows = extract_rows(&html, "scoring")?;

    let parsed = parse_rows(&rows, season);
    let saved = parsed.len();
    for record in parsed {
        store.scoring.upsert(record)?;
    }
    info!(season, rows_saved = saved, "Stored scoring stats");
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn maps_touchdown_breakdown() {
        let mut row = HashMap::new();
        row.insert("player".to_string(), "Derrick Henry*".to_string());
        row.insert("team".to_string(), "BAL".to_string());
        row.insert("rush_td".to_string(), "16".to_string());
        row.insert("all_td".to_string(), "18".to_string());
        row.insert("points".to_string(), "110".to_string());
        row.insert("pts_per_g".to_string(), "6.5".to_string());

        let parsed = parse_rows(std::slice::from_ref(&row), 2024);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].rush_touchdowns, Some(16));
        assert_eq!(parsed[0].total_touchdowns, Some(18));
        assert_eq!(parsed[0].points_per_game, Some(6.5));
    }
}
