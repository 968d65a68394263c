//! Per-team gamelogs, from `/teams/{team}/{season}.htm`. This is the
//! per-target unit the batch orchestrator drives.

use crate::batch::{ScrapeTarget, ScrapeUnit};
use crate::converters::{clean_cell, to_int};
use crate::error::Result;
use crate::fetcher::PageFetcher;
use crate::storage::{Record, StatStore};
use crate::table::{extract_rows, TableRow};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamGame {
    pub id: Option<Uuid>,
    pub team: String,
    pub season: i32,
    pub week: i64,
    pub day: Option<String>,
    pub game_date: Option<NaiveDate>,
    pub game_time: Option<String>,
    pub winner: Option<String>,
    pub loser: Option<String>,
    pub pts_winner: Option<i64>,
    pub pts_loser: Option<i64>,
    pub yards_winner: Option<i64>,
    pub turnovers_winner: Option<i64>,
    pub yards_loser: Option<i64>,
    pub turnovers_loser: Option<i64>,
}

impl Record for TeamGame {
    type Key = (String, i32, i64);

    const FAMILY: &'static str = "team_games";

    fn natural_key(&self) -> Self::Key {
        (self.team.clone(), self.season, self.week)
    }

    fn id(&self) -> Option<Uuid> {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = Some(id);
    }
}

/// Parse a `game_result` cell like `W 31-10` into (winner, loser,
/// winner pts, loser pts) from *team*'s perspective. Ties keep the team
/// first.
fn parse_result(
    raw: Option<&String>,
    team: &str,
    opponent: Option<&str>,
) -> (Option<String>, Option<String>, Option<i64>, Option<i64>) {
    let Some(result) = raw.and_then(|r| clean_cell(r)) else {
        return (None, None, None, None);
    };
    let mut parts = result.split_whitespace();
    let outcome = parts.next().unwrap_or("");
    let scores = parts.next().unwrap_or("");

    let (team_pts, opp_pts) = match scores.split_once('-') {
        Some((a, b)) => (to_int(a), to_int(b)),
        None => (None, None),
    };

    let team = team.to_string();
    let opponent = opponent.map(str::to_string);
    match outcome {
        "L" => (opponent, Some(team), opp_pts, team_pts),
        _ => (Some(team), opponent, team_pts, opp_pts),
    }
}

pub fn parse_rows(rows: &[TableRow], team: &str, season: i32) -> Vec<TeamGame> {
    let team_upper = team.to_uppercase();
    let mut parsed = Vec::new();

    for row in rows {
        let Some(week) = row.get("week_num").and_then(|v| to_int(v)) else {
            continue;
        };
        let opponent = row
            .get("opp")
            .or_else(|| row.get("opp_id"))
            .and_then(|v| clean_cell(v));

        let (winner, loser, pts_winner, pts_loser) = parse_result(
            row.get("game_result"),
            &team_upper,
            opponent.as_deref(),
        );

        let team_yards = row
            .get("yards_off")
            .or_else(|| row.get("yards_offense"))
            .and_then(|v| to_int(v));
        let team_turnovers = row
            .get("turnovers")
            .or_else(|| row.get("to_off"))
            .and_then(|v| to_int(v));
        let opp_yards = row
            .get("opp_yards_off")
            .or_else(|| row.get("opp_yards_offense"))
            .and_then(|v| to_int(v));
        let opp_turnovers = row
            .get("opp_turnovers")
            .or_else(|| row.get("opp_to"))
            .and_then(|v| to_int(v));

        let team_won = winner.as_deref() == Some(team_upper.as_str());
        let (yards_winner, yards_loser, turnovers_winner, turnovers_loser) = if team_won {
            (team_yards, opp_yards, team_turnovers, opp_turnovers)
        } else {
            (opp_yards, team_yards, opp_turnovers, team_turnovers)
        };

        parsed.push(TeamGame {
            id: None,
            team: team_upper.clone(),
            season,
            week,
            day: row.get("game_day_of_week").and_then(|v| clean_cell(v)),
            game_date: row
                .get("game_date")
                .and_then(|v| clean_cell(v))
                .and_then(|v| NaiveDate::parse_from_str(&v, "%Y-%m-%d").ok()),
            game_time: row.get("gametime").and_then(|v| clean_cell(v)),
            winner,
            loser,
            pts_winner,
            pts_loser,
            yards_winner,
            turnovers_winner,
            yards_loser,
            turnovers_loser,
        });
    }
    parsed
}

pub async fn scrape_and_store(
    store: &StatStore,
    fetcher: &PageFetcher,
    team: &str,
    season: i32,
) -> Result<usize> {
    let url = fetcher.team_url(team, season);
    let html = fetcher.fetch_html(&url).await?;
    let rows = extract_rows(&html, &format!("gamelog{season}"))?;

    let parsed = parse_rows(&rows, team, season);
    let saved = parsed.len();
    for record in parsed {
        store.team_games.upsert(record)?;
    }
    info!(team, season, rows_saved = saved, "Stored team gamelog");
    Ok(saved)
}

/// Production scrape unit: one team gamelog page per batch target.
pub struct TeamGamelogUnit {
    store: StatStore,
    fetcher: Arc<PageFetcher>,
}

impl TeamGamelogUnit {
    pub fn new(store: StatStore, fetcher: Arc<PageFetcher>) -> Self {
        Self { store, fetcher }
    }
}

#[async_trait]
impl ScrapeUnit for TeamGamelogUnit {
    async fn scrape_and_store(&self, target: &ScrapeTarget) -> Result<()> {
        scrape_and_store(&self.store, &self.fetcher, &target.team, target.year).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn gamelog_row(week: &str, result: &str, opp: &str) -> TableRow {
        let mut r = HashMap::new();
        r.insert("week_num".to_string(), week.to_string());
        r.insert("game_result".to_string(), result.to_string());
        r.insert("opp".to_string(), opp.to_string());
        r.insert("yards_off".to_string(), "400".to_string());
        r.insert("opp_yards_off".to_string(), "300".to_string());
        r
    }

    #[test]
    fn win_puts_team_first() {
        let rows = vec![gamelog_row("1", "W 31-10", "DEN")];
        let parsed = parse_rows(&rows, "kan", 2024);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].team, "KAN");
        assert_eq!(parsed[0].winner.as_deref(), Some("KAN"));
        assert_eq!(parsed[0].loser.as_deref(), Some("DEN"));
        assert_eq!(parsed[0].pts_winner, Some(31));
        assert_eq!(parsed[0].pts_loser, Some(10));
        assert_eq!(parsed[0].yards_winner, Some(400));
        assert_eq!(parsed[0].yards_loser, Some(300));
    }

    #[test]
    fn loss_puts_opponent_first() {
        let rows = vec![gamelog_row("5", "L 17-24", "BUF")];
        let parsed = parse_rows(&rows, "kan", 2024);
        assert_eq!(parsed[0].winner.as_deref(), Some("BUF"));
        assert_eq!(parsed[0].loser.as_deref(), Some("KAN"));
        assert_eq!(parsed[0].pts_winner, Some(24));
        assert_eq!(parsed[0].pts_loser, Some(17));
        // Yardage follows the winner/loser orientation
        assert_eq!(parsed[0].yards_winner, Some(300));
        assert_eq!(parsed[0].yards_loser, Some(400));
    }

    #[test]
    fn rows_without_week_are_skipped() {
        let mut bye = HashMap::new();
        bye.insert("week_num".to_string(), "".to_string());
        assert!(parse_rows(&[bye], "kan", 2024).is_empty());
    }
}
