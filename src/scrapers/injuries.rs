//! Weekly injury reports, from `/years/{season}/week_{week}_injuries.htm`.
//!
//! The injury table has no stable per-row natural key (the player set
//! changes between scrapes), so storage is a partial-key replace: every
//! report for the season/week is dropped and the fresh set inserted.
//! The table also lacks reliable `data-stat` attributes, so cells are read
//! positionally: player, team, position, injury, game status.

use crate::converters::clean_cell;
use crate::error::Result;
use crate::fetcher::PageFetcher;
use crate::storage::{Record, StatStore};
use chrono::NaiveDate;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InjuryReport {
    pub id: Option<Uuid>,
    pub season: i32,
    pub week: i64,
    pub player_name: String,
    pub team: String,
    pub position: Option<String>,
    pub designation: String,
    pub injury_type: Option<String>,
    pub report_date: Option<NaiveDate>,
}

impl Record for InjuryReport {
    // Weekly scope; individual rows have no stable identity across runs.
    type Key = (i32, i64);

    const FAMILY: &'static str = "injuries";

    fn natural_key(&self) -> Self::Key {
        (self.season, self.week)
    }

    fn id(&self) -> Option<Uuid> {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = Some(id);
    }
}

pub fn parse_injury_page(html: &str, season: i32, week: i64) -> Vec<InjuryReport> {
    let document = Html::parse_document(html);
    let table_selector = Selector::parse(r#"table[id="injuries"]"#).unwrap();
    let row_selector = Selector::parse("tbody tr").unwrap();
    let cell_selector = Selector::parse("th, td").unwrap();

    let Some(table) = document.select(&table_selector).next() else {
        warn!(season, week, "No injury table found");
        return Vec::new();
    };

    let mut reports = Vec::new();
    for tr in table.select(&row_selector) {
        if tr.value().classes().any(|c| c == "thead") {
            continue;
        }
        let cells: Vec<String> = tr
            .select(&cell_selector)
            .map(|cell| cell.text().collect::<String>().trim().to_string())
            .collect();
        if cells.len() < 5 {
            continue;
        }

        let player_name = clean_cell(&cells[0]);
        let team = clean_cell(&cells[1]);
        let position = clean_cell(&cells[2]);
        let injury_type = clean_cell(&cells[3]);
        let designation = clean_cell(&cells[4]);

        let (Some(player_name), Some(team), Some(designation)) =
            (player_name, team, designation)
        else {
            continue;
        };

        reports.push(InjuryReport {
            id: None,
            season,
            week,
            player_name,
            team,
            position,
            designation,
            injury_type,
            report_date: None,
        });
    }
    reports
}

/// Replace every stored report for the season/week with *reports*.
pub fn store_week_reports(
    store: &StatStore,
    season: i32,
    week: i64,
    reports: Vec<InjuryReport>,
) -> Result<Vec<InjuryReport>> {
    store
        .injuries
        .replace_where(|r| r.season == season && r.week == week, reports)
}

pub async fn scrape_and_store(
    store: &StatStore,
    fetcher: &PageFetcher,
    season: i32,
    week: i64,
) -> Result<usize> {
    let url = fetcher.season_url(season, &format!("week_{week}_injuries.htm"));
    let html = fetcher.fetch_html(&url).await?;

    let reports = parse_injury_page(&html, season, week);
    let saved = store_week_reports(store, season, week, reports)?.len();
    info!(season, week, rows_saved = saved, "Stored injury reports");
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
        <table id="injuries">
          <thead><tr><th>Player</th><th>Tm</th><th>Pos</th><th>Injury</th><th>Status</th></tr></thead>
          <tbody>
            <tr><th>Chris Jones</th><td>KAN</td><td>DT</td><td>Calf</td><td>Questionable</td></tr>
            <tr class="thead"><th>Player</th><td>Tm</td><td>Pos</td><td>Injury</td><td>Status</td></tr>
            <tr><th>Von Miller</th><td>BUF</td><td>LB</td><td></td><td>Out</td></tr>
            <tr><th></th><td>MIA</td><td>WR</td><td>Knee</td><td>Doubtful</td></tr>
          </tbody>
        </table>
        </body></html>
    "#;

    #[test]
    fn parses_rows_positionally() {
        let reports = parse_injury_page(PAGE, 2024, 5);
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].player_name, "Chris Jones");
        assert_eq!(reports[0].designation, "Questionable");
        assert_eq!(reports[0].injury_type, Some("Calf".to_string()));
        // Missing injury cell is tolerated; missing player is not
        assert_eq!(reports[1].player_name, "Von Miller");
        assert_eq!(reports[1].injury_type, None);
    }

    #[test]
    fn missing_table_yields_empty() {
        assert!(parse_injury_page("<html></html>", 2024, 5).is_empty());
    }
}
