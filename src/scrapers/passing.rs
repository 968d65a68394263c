//! Player passing stats, from the `passing` table on the season passing
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
pub struct PassingStats {
    pub id: Option<Uuid>,
    pub season: i32,
    pub player_name: String,
    pub team: String,
    pub rank: Option<i64>,
    pub age: Option<i64>,
    pub position: Option<String>,
    pub games: Option<i64>,
    pub games_started: Option<i64>,
    pub qb_record: Option<String>,
    pub completions: Option<i64>,
    pub attempts: Option<i64>,
    pub completion_pct: Option<f64>,
    pub yards: Option<i64>,
    pub touchdowns: Option<i64>,
    pub td_pct: Option<f64>,
    pub interceptions: Option<i64>,
    pub int_pct: Option<f64>,
    pub first_downs: Option<i64>,
    pub success_pct: Option<f64>,
    pub longest: Option<i64>,
    pub yards_per_attempt: Option<f64>,
    pub adj_yards_per_attempt: Option<f64>,
    pub yards_per_completion: Option<f64>,
    pub yards_per_game: Option<f64>,
    pub passer_rating: Option<f64>,
    pub qbr: Option<f64>,
    pub sacked: Option<i64>,
    pub sack_yards: Option<i64>,
    pub sack_pct: Option<f64>,
    pub net_yards_per_attempt: Option<f64>,
    pub adj_net_yards_per_attempt: Option<f64>,
    pub fourth_quarter_comebacks: Option<i64>,
    pub game_winning_drives: Option<i64>,
}

impl Record for PassingStats {
    type Key = (i32, String, String);

    const FAMILY: &'static str = "passing";

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
    col("qb_rec", "qb_record", Converter::Text),
    col("pass_cmp", "completions", Converter::Int),
    col("pass_att", "attempts", Converter::Int),
    col("pass_cmp_perc", "completion_pct", Converter::Decimal),
    col("pass_yds", "yards", Converter::Int),
    col("pass_td", "touchdowns", Converter::Int),
    col("pass_td_perc", "td_pct", Converter::Decimal),
    col("pass_int", "interceptions", Converter::Int),
    col("pass_int_perc", "int_pct", Converter::Decimal),
    col("pass_first_down", "first_downs", Converter::Int),
    col("pass_success_rate", "success_pct", Converter::Decimal),
    col("pass_long", "longest", Converter::Int),
    col("pass_yds_per_att", "yards_per_attempt", Converter::Decimal),
    col("pass_adj_yds_per_att", "adj_yards_per_attempt", Converter::Decimal),
    col("pass_yds_per_cmp", "yards_per_completion", Converter::Decimal),
    col("pass_yds_per_g", "yards_per_game", Converter::Decimal),
    col("pass_rating", "passer_rating", Converter::Decimal),
    col("qbr", "qbr", Converter::Decimal),
    col("pass_sacked", "sacked", Converter::Int),
    col("pass_sacked_yds", "sack_yards", Converter::Int),
    col("pass_sacked_perc", "sack_pct", Converter::Decimal),
    col("pass_net_yds_per_att", "net_yards_per_attempt", Converter::Decimal),
    col("pass_adj_net_yds_per_att", "adj_net_yards_per_attempt", Converter::Decimal),
    col("comebacks", "fourth_quarter_comebacks", Converter::Int),
    col("gwd", "game_winning_drives", Converter::Int),
];

pub fn parse_rows(rows: &[TableRow], season: i32) -> Vec<PassingStats> {
    let mut parsed = Vec::new();
    for row in rows {
        let name = row.get("player").and_then(|p| clean_player_name(p));
        let team = row.get("team").and_then(|t| clean_cell(t));
        let (Some(player_name), Some(team)) = (name, team) else {
            continue;
        };
        let mapped = map_row(row, COLUMNS);
        parsed.push(PassingStats {
            id: None,
            season,
            player_name,
            team,
            rank: mapped.int("rank"),
            age: mapped.int("age"),
            position: mapped.text("position"),
            games: mapped.int("games"),
            games_started: mapped.int("games_started"),
            qb_record: mapped.text("qb_record"),
            completions: mapped.int("completions"),
            attempts: mapped.int("attempts"),
            completion_pct: mapped.decimal("completion_pct"),
            yards: mapped.int("yards"),
            touchdowns: mapped.int("touchdowns"),
            td_pct: mapped.decimal("td_pct"),
            interceptions: mapped.int("interceptions"),
            int_pct: mapped.decimal("int_pct"),
            first_downs: mapped.int("first_downs"),
            success_pct: mapped.decimal("success_pct"),
            longest: mapped.int("longest"),
            yards_per_attempt: mapped.decimal("yards_per_attempt"),
            adj_yards_per_attempt: mapped.decimal("adj_yards_per_attempt"),
            yards_per_completion: mapped.decimal("yards_per_completion"),
            yards_per_game: mapped.decimal("yards_per_game"),
            passer_rating: mapped.decimal("passer_rating"),
            qbr: mapped.decimal("qbr"),
            sacked: mapped.int("sacked"),
            sack_yards: mapped.int("sack_yards"),
            sack_pct: mapped.decimal("sack_pct"),
            net_yards_per_attempt: mapped.decimal("net_yards_per_attempt"),
            adj_net_yards_per_attempt: mapped.decimal("adj_net_yards_per_attempt"),
            fourth_quarter_comebacks: mapped.int("fourth_quarter_comebacks"),
            game_winning_drives: mapped.int("game_winning_drives"),
        });
    }
    parsed
}

pub async fn scrape_and_store(
    store: &StatStore,
    fetcher: &PageFetcher,
    season: i32,
) -> Result<usize> {
    let url = fetcher.season_url(season, "passing.htm");
    let html = fetcher.fetch_html(&url).await?;
    let rows = extract_rows(&html, "passing")?;

    let parsed = parse_rows(&rows, season);
    let saved = parsed.len();
    for record in parsed {
        store.passing.upsert(record)?;
    }
    info!(season, rows_saved = saved, "Stored passing stats");
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn cleans_player_name_and_maps_stats() {
        let mut row = HashMap::new();
        row.insert("player".to_string(), "Patrick Mahomes*+".to_string());
        row.insert("team".to_string(), "KAN".to_string());
        row.insert("pass_yds".to_string(), "4,183".to_string());
        row.insert("pass_cmp_perc".to_string(), "67.2".to_string());
        row.insert("qb_rec".to_string(), "15-1-0".to_string());

        let parsed = parse_rows(std::slice::from_ref(&row), 2024);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].player_name, "Patrick Mahomes");
        assert_eq!(parsed[0].yards, Some(4183));
        assert_eq!(parsed[0].completion_pct, Some(67.2));
        assert_eq!(parsed[0].qb_record, Some("15-1-0".to_string()));
    }

    #[test]
    fn skips_rows_missing_player_or_team() {
        let mut no_team = HashMap::new();
        no_team.insert("player".to_string(), "Someone".to_string());
        let mut header = HashMap::new();
        header.insert("player".to_string(), "".to_string());
        header.insert("team".to_string(), "Tm".to_string());

        assert!(parse_rows(&[no_team], 2024).is_empty());
        assert!(parse_rows(&[header], 2024).is_empty());
    }
}
