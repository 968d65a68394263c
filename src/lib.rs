//! Scraper for NFL statistics from pro-football-reference.com.
//!
//! Season-level stat pages (standings, games, team and player stats) are
//! fetched rate-limited, parsed out of PFR's comment-wrapped tables, and
//! upserted into natural-key stat tables. Multi-team gamelog scrapes run as
//! tracked batch jobs with per-target error capture.

pub mod batch;
pub mod config;
pub mod converters;
pub mod error;
pub mod fetcher;
pub mod jobs;
pub mod logging;
pub mod query;
pub mod scrapers;
pub mod server;
pub mod storage;
pub mod table;
