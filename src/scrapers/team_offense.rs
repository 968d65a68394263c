//! Team offense totals, from the `team_stats` table on the season front
//! page (served inside an HTML comment).

use crate::converters::{clean_cell, col, map_row, ColumnSpec, Converter};
use crate::error::Result;
use crate::fetcher::PageFetcher;
use crate::storage::{Record, StatStore};
use crate::table::{extract_rows, TableRow};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamOffense {
    pub id: Option<Uuid>,
    pub season: i32,
    pub team: String,
    pub games: Option<i64>,
    pub points: Option<i64>,
    pub total_yards: Option<i64>,
    pub plays: Option<i64>,
    pub yards_per_play: Option<f64>,
    pub turnovers: Option<i64>,
    pub fumbles_lost: Option<i64>,
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

impl Record for TeamOffense {
    type Key = (i32, String);

    const FAMILY: &'static str = "team_offense";

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
    col("points", "points", Converter::Int),
    col("total_yds", "total_yards", Converter::Int),
    col("plays_offense", "plays", Converter::Int),
    col("yds_per_play_offense", "yards_per_play", Converter::Decimal),
    col("turnovers", "turnovers", Converter::Int),
    col("fumbles_lost", "fumbles_lost", Converter::Int),
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
    col("exp_pts_tot", "expected_points", Converter::Decimal),
];

fn record_from_row(row: &TableRow, season: i32) -> Option<TeamOffense> {
    let team = row.get("team").and_then(|t| clean_cell(t))?;
    // League average / total rows are not teams
    if team.starts_with("Avg") || team.starts_with("League") || team == "Tm" {
        return None;
    }
    let mapped = map_row(row, COLUMNS);
    Some(TeamOffense {
        id: None,
        season,
        team,
        games: mapped.int("games"),
        points: mapped.int("points"),
        total_yards: mapped.int("total_yards"),
        plays: mapped.int("plays"),
        yards_per_play: mapped.decimal("yards_per_play"),
        turnovers: mapped.int("turnovers"),
        fumbles_lost: mapped.int("fumbles_lost"),
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
    })
}

pub fn parse_rows(rows: &[TableRow], season: i32) -> Vec<TeamOffense> {
    rows.iter()
        .filter_map(|row| record_from_row(row, season))
        .collect()
}

pub async fn scrape_and_store(
    store: &StatStore,
    fetcher: &PageFetcher,
    season: i32,
) -> Result<usize> {
    let url = fetcher.season_url(season, "");
    let html = fetcher.fetch_html(&url).await?;
    let rows = extract_rows(&html, "team_stats")?;

    let parsed = parse_rows(&rows, season);
    let saved = parsed.len();
    for record in parsed {
        store.team_offense.upsert(record)?;
    }
    info!(season, rows_saved = saved, "Stored team offense");
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn parses_team_row_and_skips_league_average() {
        let mut team = HashMap::new();
        team.insert("team".to_string(), "Kansas City Chiefs".to_string());
        team.insert("points".to_string(), "371".to_string());
        team.insert("total_yds".to_string(), "5,470".to_string());
        team.insert("yds_per_play_offense".to_string(), "5.0".to_string());

        let mut avg = HashMap::new();
        avg.insert("team".to_string(), "Avg Team".to_string());
        avg.insert("points".to_string(), "357".to_string());

        let parsed = parse_rows(&[team, avg], 2024);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].team, "Kansas City Chiefs");
        assert_eq!(parsed[0].total_yards, Some(5470));
        assert_eq!(parsed[0].yards_per_play, Some(5.0));
    }
}
