//! Team kicking totals, from the team table on the season kicking page.
//! The table id changed across site revisions, so lookup tries
//! `team_kicking` before the older `team_stats`.

use crate::converters::{clean_cell, col, map_row, ColumnSpec, Converter};
use crate::error::Result;
use crate::fetcher::PageFetcher;
use crate::storage::{Record, StatStore};
use crate::table::{extract_rows_any, TableRow};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamKicking {
    pub id: Option<Uuid>,
    pub season: i32,
    pub team: String,
    pub rank: Option<i64>,
    pub games: Option<i64>,
    pub fga_0_19: Option<i64>,
    pub fgm_0_19: Option<i64>,
    pub fga_20_29: Option<i64>,
    pub fgm_20_29: Option<i64>,
    pub fga_30_39: Option<i64>,
    pub fgm_30_39: Option<i64>,
    pub fga_40_49: Option<i64>,
    pub fgm_40_49: Option<i64>,
    pub fga_50_plus: Option<i64>,
    pub fgm_50_plus: Option<i64>,
    pub fg_attempts: Option<i64>,
    pub fg_made: Option<i64>,
    pub fg_long: Option<i64>,
    pub fg_pct: Option<f64>,
    pub xp_attempts: Option<i64>,
    pub xp_made: Option<i64>,
    pub xp_pct: Option<f64>,
    pub kickoffs: Option<i64>,
    pub kickoff_yards: Option<i64>,
    pub touchbacks: Option<i64>,
    pub touchback_pct: Option<f64>,
    pub kickoff_avg: Option<f64>,
}

impl Record for TeamKicking {
    type Key = (i32, String);

    const FAMILY: &'static str = "team_kicking";

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
    col("fga1", "fga_0_19", Converter::Int),
    col("fgm1", "fgm_0_19", Converter::Int),
    col("fga2", "fga_20_29", Converter::Int),
    col("fgm2", "fgm_20_29", Converter::Int),
    col("fga3", "fga_30_39", Converter::Int),
    col("fgm3", "fgm_30_39", Converter::Int),
    col("fga4", "fga_40_49", Converter::Int),
    col("fgm4", "fgm_40_49", Converter::Int),
    col("fga5", "fga_50_plus", Converter::Int),
    col("fgm5", "fgm_50_plus", Converter::Int),
    col("fga", "fg_attempts", Converter::Int),
    col("fgm", "fg_made", Converter::Int),
    col("fg_long", "fg_long", Converter::Int),
    col("fg_perc", "fg_pct", Converter::Decimal),
    col("xpa", "xp_attempts", Converter::Int),
    col("xpm", "xp_made", Converter::Int),
    col("xp_perc", "xp_pct", Converter::Decimal),
    col("kickoffs", "kickoffs", Converter::Int),
    col("kickoff_yds", "kickoff_yards", Converter::Int),
    col("touchbacks", "touchbacks", Converter::Int),
    col("tb_perc", "touchback_pct", Converter::Decimal),
    col("kickoff_avg", "kickoff_avg", Converter::Decimal),
];

pub fn parse_rows(rows: &[TableRow], season: i32) -> Vec<TeamKicking> {
    let mut parsed = Vec::new();
    for row in rows {
        let Some(team) = row.get("team").and_then(|t| clean_cell(t)) else {
            continue;
        };
        if team.starts_with("Avg") || team.starts_with("League") || team == "Tm" {
            continue;
        }
        let mapped = map_row(row, COLUMNS);
        parsed.push(TeamKicking {
            id: None,
            season,
            team,
            rank: mapped.int("rank"),
            games: mapped.int("games"),
            fga_0_19: mapped.int("fga_0_19"),
            fgm_0_19: mapped.int("fgm_0_19"),
            fga_20_29: mapped.int("fga_20_29"),
            fgm_20_29: mapped.int("fgm_20_29"),
            fga_30_39: mapped.int("fga_30_39"),
            fgm_30_39: mapped.int("fgm_30_39"),
            fga_40_49: mapped.int("fga_40_49"),
            fgm_40_49: mapped.int("fgm_40_49"),
            fga_50_plus: mapped.int("fga_50_plus"),
            fgm_50_plus: mapped.int("fgm_50_plus"),
            fg_attempts: mapped.int("fg_attempts"),
            fg_made: mapped.int("fg_made"),
            fg_long: mapped.int("fg_long"),
            fg_pct: mapped.decimal("fg_pct"),
            xp_attempts: mapped.int("xp_attempts"),
            xp_made: mapped.int("xp_made"),
            xp_pct: mapped.decimal("xp_pct"),
            kickoffs: mapped.int("kickoffs"),
            kickoff_yards: mapped.int("kickoff_yards"),
            touchbacks: mapped.int("touchbacks"),
            touchback_pct: mapped.decimal("touchback_pct"),
            kickoff_avg: mapped.decimal("kickoff_avg"),
        });
    }
    parsed
}

pub async fn scrape_and_store(
    store: &StatStore,
    fetcher: &PageFetcher,
    season: i32,
) -> Result<usize> {
    let url = fetcher.season_url(season, "kicking.htm");
    let html = fetcher.fetch_html(&url).await?;
    let rows = extract_rows_any(&html, &["team_kicking", "team_stats"])?;

    let parsed = parse_rows(&rows, season);
    let saved = parsed.len();
    for record in parsed {
        store.team_kicking.upsert(record)?;
    }
    info!(season, rows_saved = saved, "Stored team kicking");
    Ok(saved)
}
