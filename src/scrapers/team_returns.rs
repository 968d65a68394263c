//! Team return totals, from the team table on the season returns page.
//! Tries `team_returns` before the older `team_stats` id.

use crate::converters::{clean_cell, col, map_row, ColumnSpec, Converter};
use crate::error::Result;
use crate::fetcher::PageFetcher;
use crate::storage::{Record, StatStore};
use crate::table::{extract_rows_any, TableRow};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamReturns {
    pub id: Option<Uuid>,
    pub season: i32,
    pub team: String,
    pub rank: Option<i64>,
    pub games: Option<i64>,
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
}

impl Record for TeamReturns {
    type Key = (i32, String);

    const FAMILY: &'static str = "team_returns";

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
];

pub fn parse_rows(rows: &[TableRow], season: i32) -> Vec<TeamReturns> {
    let mut parsed = Vec::new();
    for row in rows {
        let Some(team) = row.get("team").and_then(|t| clean_cell(t)) else {
            continue;
        };
        if team.starts_with("Avg") || team.starts_with("League") || team == "Tm" {
            continue;
        }
        let mapped = map_row(row, COLUMNS);
        parsed.push(TeamReturns {
            id: None,
            season,
            team,
            rank: mapped.int("rank"),
            games: mapped.int("games"),
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
    let rows = extract_rows_any(&html, &["team_returns", "team_stats"])?;

    let parsed = parse_rows(&rows, season);
    let saved = parsed.len();
    for record in parsed {
        store.team_returns.upsert(record)?;
    }
    info!(season, rows_saved = saved, "Stored team returns");
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn parses_team_rows() {
        let mut team = HashMap::new();
        team.insert("team".to_string(), "Dallas Cowboys".to_string());
        team.insert("punt_ret".to_string(), "35".to_string());
        team.insert("kick_ret_yds_per_ret".to_string(), "27.3".to_string());

        let parsed = parse_rows(std::slice::from_ref(&team), 2024);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].punt_returns, Some(35));
        assert_eq!(parsed[0].kick_return_avg, Some(27.3));
    }
}
