//! Per-stat-family scrapers.
//!
//! Each family owns its entity type, a declarative column table mapping PFR
//! `data-stat` names to stored fields, and a `scrape_and_store` entry point
//! that fetches the page, extracts rows, and upserts them.

pub mod defense;
pub mod games;
pub mod injuries;
pub mod kicking;
pub mod passing;
pub mod punting;
pub mod receiving;
pub mod returns;
pub mod rushing;
pub mod scoring;
pub mod standings;
pub mod team_defense;
pub mod team_games;
pub mod team_kicking;
pub mod team_offense;
pub mod team_punting;
pub mod team_returns;
pub mod weather;

use crate::error::{Result, ScraperError};
use crate::fetcher::PageFetcher;
use crate::storage::StatStore;
use serde::Serialize;
use std::str::FromStr;

/// Season-level stat categories dispatchable from the CLI and API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatCategory {
    Standings,
    Games,
    TeamOffense,
    TeamDefense,
    TeamKicking,
    TeamPunting,
    TeamReturns,
    Passing,
    Rushing,
    Receiving,
    Defense,
    Kicking,
    Punting,
    Returns,
    Scoring,
}

impl StatCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatCategory::Standings => "standings",
            StatCategory::Games => "games",
            StatCategory::TeamOffense => "team-offense",
            StatCategory::TeamDefense => "team-defense",
            StatCategory::TeamKicking => "team-kicking",
            StatCategory::TeamPunting => "team-punting",
            StatCategory::TeamReturns => "team-returns",
            StatCategory::Passing => "passing",
            StatCategory::Rushing => "rushing",
            StatCategory::Receiving => "receiving",
            StatCategory::Defense => "defense",
            StatCategory::Kicking => "kicking",
            StatCategory::Punting => "punting",
            StatCategory::Returns => "returns",
            StatCategory::Scoring => "scoring",
        }
    }

    pub fn all() -> &'static [StatCategory] {
        &[
            StatCategory::Standings,
            StatCategory::Games,
            StatCategory::TeamOffense,
            StatCategory::TeamDefense,
            StatCategory::TeamKicking,
            StatCategory::TeamPunting,
            StatCategory::TeamReturns,
            StatCategory::Passing,
            StatCategory::Rushing,
            StatCategory::Receiving,
            StatCategory::Defense,
            StatCategory::Kicking,
            StatCategory::Punting,
            StatCategory::Returns,
            StatCategory::Scoring,
        ]
    }
}

impl FromStr for StatCategory {
    type Err = ScraperError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "standings" => Ok(StatCategory::Standings),
            "games" => Ok(StatCategory::Games),
            "team-offense" | "offense" => Ok(StatCategory::TeamOffense),
            "team-defense" => Ok(StatCategory::TeamDefense),
            "team-kicking" => Ok(StatCategory::TeamKicking),
            "team-punting" => Ok(StatCategory::TeamPunting),
            "team-returns" => Ok(StatCategory::TeamReturns),
            "passing" => Ok(StatCategory::Passing),
            "rushing" => Ok(StatCategory::Rushing),
            "receiving" => Ok(StatCategory::Receiving),
            "defense" => Ok(StatCategory::Defense),
            "kicking" => Ok(StatCategory::Kicking),
            "punting" => Ok(StatCategory::Punting),
            "returns" => Ok(StatCategory::Returns),
            "scoring" => Ok(StatCategory::Scoring),
            other => Err(ScraperError::InvalidTarget(format!(
                "Unknown stat category '{other}'"
            ))),
        }
    }
}

/// Result of one season-level scrape.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeReport {
    pub category: String,
    pub season: i32,
    pub rows_saved: usize,
}

/// Dispatch a season-level scrape for one category.
pub async fn scrape_category(
    store: &StatStore,
    fetcher: &PageFetcher,
    category: StatCategory,
    season: i32,
) -> Result<ScrapeReport> {
    let rows_saved = match category {
        StatCategory::Standings => standings::scrape_and_store(store, fetcher, season).await?,
        StatCategory::Games => games::scrape_and_store(store, fetcher, season).await?,
        StatCategory::TeamOffense => team_offense::scrape_and_store(store, fetcher, season).await?,
        StatCategory::TeamDefense => team_defense::scrape_and_store(store, fetcher, season).await?,
        StatCategory::TeamKicking => team_kicking::scrape_and_store(store, fetcher, season).await?,
        StatCategory::TeamPunting => team_punting::scrape_and_store(store, fetcher, season).await?,
        StatCategory::TeamReturns => team_returns::scrape_and_store(store, fetcher, season).await?,
        StatCategory::Passing => passing::scrape_and_store(store, fetcher, season).await?,
        StatCategory::Rushing => rushing::scrape_and_store(store, fetcher, season).await?,
        StatCategory::Receiving => receiving::scrape_and_store(store, fetcher, season).await?,
        StatCategory::Defense => defense::scrape_and_store(store, fetcher, season).await?,
        StatCategory::Kicking => kicking::scrape_and_store(store, fetcher, season).await?,
        StatCategory::Punting => punting::scrape_and_store(store, fetcher, season).await?,
        StatCategory::Returns => returns::scrape_and_store(store, fetcher, season).await?,
        StatCategory::Scoring => scoring::scrape_and_store(store, fetcher, season).await?,
    };
    Ok(ScrapeReport {
        category: category.as_str().to_string(),
        season,
        rows_saved,
    })
}
