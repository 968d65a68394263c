//! Game weather records.
//!
//! Weather arrives from callers (API ingest or backfill jobs) rather than
//! a PFR page; the upstream weather provider client is outside this crate.
//! Storage is delete-then-insert per (season, week, home_team) so repeated
//! fetches for one game never accumulate rows.

use crate::error::Result;
use crate::storage::{Record, StatStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameWeather {
    pub id: Option<Uuid>,
    pub season: i32,
    pub week: i64,
    pub home_team: String,
    pub stadium: Option<String>,
    pub is_dome: bool,
    /// Fahrenheit; None for domed stadiums
    pub temperature: Option<f64>,
    /// mph
    pub wind_speed: Option<f64>,
    /// inches
    pub precipitation: Option<f64>,
    /// percentage
    pub humidity: Option<f64>,
    pub weather_condition: Option<String>,
    pub game_time: Option<DateTime<Utc>>,
    pub fetched_at: DateTime<Utc>,
}

impl Record for GameWeather {
    type Key = (i32, i64, String);

    const FAMILY: &'static str = "weather";

    fn natural_key(&self) -> Self::Key {
        (self.season, self.week, self.home_team.clone())
    }

    fn id(&self) -> Option<Uuid> {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = Some(id);
    }
}

/// Idempotent store: drop any existing row for the game, insert the new
/// one.
pub fn upsert_game_weather(store: &StatStore, record: GameWeather) -> Result<GameWeather> {
    let key = record.natural_key();
    let mut stored = store
        .weather
        .replace_where(|r| r.natural_key() == key, vec![record])?;
    Ok(stored.remove(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weather(temp: Option<f64>) -> GameWeather {
        GameWeather {
            id: None,
            season: 2024,
            week: 5,
            home_team: "KAN".to_string(),
            stadium: Some("GEHA Field at Arrowhead Stadium".to_string()),
            is_dome: false,
            temperature: temp,
            wind_speed: Some(12.0),
            precipitation: None,
            humidity: Some(55.0),
            weather_condition: Some("clear".to_string()),
            game_time: None,
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn refetch_replaces_the_game_row() -> Result<()> {
        let store = StatStore::new();
        upsert_game_weather(&store, weather(Some(68.0)))?;
        let second = upsert_game_weather(&store, weather(Some(54.0)))?;

        assert_eq!(store.weather.len(), 1);
        assert_eq!(second.temperature, Some(54.0));
        let rows = store.weather.all();
        assert_eq!(rows[0].temperature, Some(54.0));
        Ok(())
    }
}
