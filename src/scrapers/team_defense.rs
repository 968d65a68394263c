//! Team defense totals, from the `team_stats` table on the opponent-stats
//! page.

use crate::converters::{clean_cell, col, map_row, ColumnSpec, Converter};
use crate::error::Result;
use crate::fetcher::PageFetcher;
use crate::storage::{Record, StatStore};
use crate::table::{extract_rows, TableRow};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamDefense {
    pub id: Option<Uuid>,
    pub season: i32,
    pub team: String,
    pub games: Option<i64>,
    pub points_allowed: Option<i64>,
    pub total_yards: Option<i64>,
    pub plays: Option<i64>,
    pub yards_per_play: Option<f64>,
    pub takeaways: Option<i64>,
    pub fumbles_recovered: Option<i64>,
    pub first_downs: Option<i64>,
    pub pass_completions: Option<i64>,
    pub pass_attempts: Option<i64>,
    pub pass_yards: Option<i64>,
    pub pass_touchdowns: Option<i64>,
    pub interceptions: Option<i64>,
    pub net_yards_per_pass: Option<f64>,
    pub pass_first_downs: Option<i64>,
    pub rush_attempts: Option<i64>,
    pub rush_yards: Option<i64>,
    pub rush_touchdowns: Option<i64>,
    pub rush_yards_per_attempt: Option<f64>,
    pub rush_first_downs: Option<i64>,
    pub penalties: Option<i64>,
    pub penalty_yards: Option<i64>,
    pub penalty_first_downs: Option<i64>,
    pub score_pct: Option<f64>,
    pub turnover_pct: Option<f64>,
    pub expected_points: Option<f64>,
}

impl Record for TeamDefense {
    type Key = (i32, String);

    const FAMILY: &'static str = "team_defense";

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
    col("g", "games", Converter::Int),
    col("points", "points_allowed", Converter::Int),
    col("total_yds", "total_yards", Converter::Int),
    col("plays", "plays", Converter::Int),
    col("yds_per_play", "yards_per_play", Converter::Decimal),
    col("turnovers", "takeaways", Converter::Int),
    col("fumbles_lost", "fumbles_recovered", Converter::Int),
    col("first_down", "first_downs", Converter::Int),
    col("pass_cmp", "pass_completions", Converter::Int),
    col("pass_att", "pass_attempts", Converter::Int),
    col("pass_yds", "pass_yards", Converter::Int),
    col("pass_td", "pass_touchdowns", Converter::Int),
    col("pass_int", "interceptions", Converter::Int),
    col("pass_net_yds_per_att", "net_yards_per_pass", Converter::Decimal),
    col("pass_fd", "pass_first_downs", Converter::Int),
    col("rush_att", "rush_attempts", Converter::Int),
    col("rush_yds", "rush_yards", Converter::Int),
    col("rush_td", "rush_touchdowns", Converter::Int),
    col("rush_yds_per_att", "rush_yards_per_attempt", Converter::Decimal),
    col("rush_fd", "rush_first_downs", Converter::Int),
    col("penalties", "penalties", Converter::Int),
    col("penalties_yds", "penalty_yards", Converter::Int),
    col("pen_fd", "penalty_first_downs", Converter::Int),
    col("score_pct", "score_pct", Converter::Decimal),
    col("turnover_pct", "turnover_pct", Converter::Decimal),
    col("exp_pts_def", "expected_points", Converter::Decimal),
];

pub fn parse_rows(rows: &[TableRow], season: i32) -> Vec<TeamDefense> {
    let mut parsed = Vec::new();
    for row in rows {
        let Some(team) = row.get("team").and_then(|t| clean_cell(t)) else {
            continue;
        };
        if team.starts_with("Avg") || team.starts_with("League") || team == "Tm" {
            continue;
        }
        let mapped = map_row(row, COLUMNS);
        parsed.push(TeamDefense {
            id: None,
            season,
            team,
            games: mapped.int("games"),
            points_allowed: mapped.int("points_allowed"),
            total_yards: mapped.int("total_yards"),
            plays: mapped.int("plays"),
            yards_per_play: mapped.decimal("yards_per_play"),
            takeaways: mapped.int("takeaways"),
            fumbles_recovered: mapped.int("fumbles_recovered"),
            first_downs: mapped.int("first_downs"),
            pass_completions: mapped.int("pass_completions"),
            pass_attempts: mapped.int("pass_attempts"),
            pass_yards: mapped.int("pass_yards"),
            pass_touchdowns: mapped.int("pass_touchdowns"),
            interceptions: mapped.int("interceptions"),
            net_yards_per_pass: mapped.decimal("net_yards_per_pass"),
            pass_first_downs: mapped.int("pass_first_downs"),
            rush_attempts: mapped.int("rush_attempts"),
            rush_yards: mapped.int("rush_yards"),
            rush_touchdowns: mapped.int("rush_touchdowns"),
            rush_yards_per_attempt: mapped.decimal("rush_yards_per_attempt"),
            rush_first_downs: mapped.int("rush_first_downs"),
            penalties: mapped.int("penalties"),
            penalty_yards: mapped.int("penalty_yards"),
            penalty_first_downs: mapped.int("penalty_first_downs"),
            score_pct: mapped.decimal("score_pct"),
            turnover_pct: mapped.decimal("turnover_pct"),
            expected_points: mapped.decimal("expected_points"),
        });
    }
    parsed
}

pub async fn scrape_and_store(
    store: &StatStore,
    fetcher: &PageFetcher,
    season: i32,
) -> Result<usize> {
    let url = fetcher.season_url(season, "opp.htm");
    let html = fetcher.fetch_html(&url).await?;
    let rows = extract_rows(&html, "team_stats")?;

    let parsed = parse_rows(&rows, season);
    let saved = parsed.len();
    for record in parsed {
        store.team_defense.upsert(record)?;
    }
    info!(season, rows_saved = saved, "Stored team defense");
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn maps_defense_columns() {
        let mut row = HashMap::new();
        row.insert("team".to_string(), "Baltimore Ravens".to_string());
        row.insert("points".to_string(), "280".to_string());
        row.insert("plays".to_string(), "1,013".to_string());
        row.insert("exp_pts_def".to_string(), "42.5".to_string());

        let parsed = parse_rows(std::slice::from_ref(&row), 2024);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].points_allowed, Some(280));
        assert_eq!(parsed[0].plays, Some(1013));
        assert_eq!(parsed[0].expected_points, Some(42.5));
    }
}
