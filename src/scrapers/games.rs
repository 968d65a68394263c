//! Season schedule and results, from the `games` table on the schedule
//! page.

use crate::converters::{clean_cell, to_int};
use crate::error::Result;
use crate::fetcher::PageFetcher;
use crate::storage::{Record, StatStore};
use crate::table::{extract_rows, TableRow};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: Option<Uuid>,
    pub season: i32,
    pub week: Option<i64>,
    pub game_day: Option<String>,
    pub game_date: Option<NaiveDate>,
    pub kickoff_time: Option<String>,
    pub winner: String,
    pub loser: String,
    pub pts_winner: Option<i64>,
    pub pts_loser: Option<i64>,
    pub yards_winner: Option<i64>,
    pub turnovers_winner: Option<i64>,
    pub yards_loser: Option<i64>,
    pub turnovers_loser: Option<i64>,
}

impl Record for Game {
    type Key = (i32, Option<i64>, String, String);

    const FAMILY: &'static str = "games";

    fn natural_key(&self) -> Self::Key {
        (
            self.season,
            self.week,
            self.winner.clone(),
            self.loser.clone(),
        )
    }

    fn id(&self) -> Option<Uuid> {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = Some(id);
    }
}

fn parse_date(raw: Option<&String>) -> Option<NaiveDate> {
    let raw = raw.and_then(|r| clean_cell(r))?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d").ok()
}

pub fn parse_rows(rows: &[TableRow], season: i32) -> Vec<Game> {
    let mut parsed = Vec::new();
    for row in rows {
        let winner = row.get("winner").and_then(|v| clean_cell(v));
        let loser = row.get("loser").and_then(|v| clean_cell(v));
        let (Some(winner), Some(loser)) = (winner, loser) else {
            // Playoff separator and header rows have no matchup
            continue;
        };

        parsed.push(Game {
            id: None,
            season,
            week: row.get("week_num").and_then(|v| to_int(v)),
            game_day: row.get("game_day_of_week").and_then(|v| clean_cell(v)),
            game_date: parse_date(row.get("game_date")),
            kickoff_time: row.get("gametime").and_then(|v| clean_cell(v)),
            winner,
            loser,
            pts_winner: row.get("pts_win").and_then(|v| to_int(v)),
            pts_loser: row.get("pts_lose").and_then(|v| to_int(v)),
            yards_winner: row.get("yards_win").and_then(|v| to_int(v)),
            turnovers_winner: row.get("to_win").and_then(|v| to_int(v)),
            yards_loser: row.get("yards_lose").and_then(|v| to_int(v)),
            turnovers_loser: row.get("to_lose").and_then(|v| to_int(v)),
        });
    }
    parsed
}

pub async fn scrape_and_store(
    store: &StatStore,
    fetcher: &PageFetcher,
    season: i32,
) -> Result<usize> {
    let url = fetcher.season_url(season, "games.htm");
    let html = fetcher.fetch_html(&url).await?;
    let rows = extract_rows(&html, "games")?;

    let parsed = parse_rows(&rows, season);
    let saved = parsed.len();
    for record in parsed {
        store.games.upsert(record)?;
    }
    info!(season, rows_saved = saved, "Stored games");
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn skips_rows_without_matchup_and_parses_date() {
        let mut game = HashMap::new();
        game.insert("week_num".to_string(), "1".to_string());
        game.insert("winner".to_string(), "Kansas City Chiefs".to_string());
        game.insert("loser".to_string(), "Baltimore Ravens".to_string());
        game.insert("game_date".to_string(), "2024-09-05".to_string());
        game.insert("pts_win".to_string(), "27".to_string());
        game.insert("pts_lose".to_string(), "20".to_string());

        let mut header = HashMap::new();
        header.insert("week_num".to_string(), "Week".to_string());

        let parsed = parse_rows(&[header, game], 2024);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].week, Some(1));
        assert_eq!(
            parsed[0].game_date,
            NaiveDate::from_ymd_opt(2024, 9, 5)
        );
        assert_eq!(parsed[0].pts_winner, Some(27));
    }
}
