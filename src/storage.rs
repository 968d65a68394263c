//! Stat storage with natural-key upsert semantics.
//!
//! Every stat family shares the same contract: a natural key identifies at
//! most one live row, and re-storing a row for an existing key overwrites
//! all of its fields while preserving the storage identity. Families whose
//! rows have no stable per-row key (weekly injury lists) instead replace
//! every row matching a coarser key.
//!
//! Tables keep their rows in memory and optionally write through to a
//! shared SQLite database, one generic `stat_records` table keyed by
//! (family, row id) with the record serialized as JSON. Opening a store
//! against a database path reloads every family, so upserts converge
//! across process runs rather than only within one.

use crate::error::{Result, ScraperError};
use crate::scrapers::defense::DefenseStats;
use crate::scrapers::games::Game;
use crate::scrapers::injuries::InjuryReport;
use crate::scrapers::kicking::KickingStats;
use crate::scrapers::passing::PassingStats;
use crate::scrapers::punting::PuntingStats;
use crate::scrapers::receiving::ReceivingStats;
use crate::scrapers::returns::ReturnStats;
use crate::scrapers::rushing::RushingStats;
use crate::scrapers::scoring::ScoringStats;
use crate::scrapers::standings::Standings;
use crate::scrapers::team_defense::TeamDefense;
use crate::scrapers::team_games::TeamGame;
use crate::scrapers::team_kicking::TeamKicking;
use crate::scrapers::team_offense::TeamOffense;
use crate::scrapers::team_punting::TeamPunting;
use crate::scrapers::team_returns::TeamReturns;
use crate::scrapers::weather::GameWeather;
use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// A storable stat record with a natural key.
pub trait Record: Clone + Send + Serialize + DeserializeOwned + 'static {
    type Key: PartialEq;

    /// Family name used as the persistence partition.
    const FAMILY: &'static str;

    fn natural_key(&self) -> Self::Key;
    fn id(&self) -> Option<Uuid>;
    fn set_id(&mut self, id: Uuid);
}

type SharedDb = Arc<Mutex<Connection>>;

/// One stat family's table. Cheap to clone; rows (and the database handle,
/// if any) are shared.
pub struct Table<T: Record> {
    rows: Arc<Mutex<HashMap<Uuid, T>>>,
    db: Option<SharedDb>,
}

impl<T: Record> Clone for Table<T> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
            db: self.db.clone(),
        }
    }
}

impl<T: Record> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> Table<T> {
    /// Memory-only table; nothing survives the process.
    pub fn new() -> Self {
        Self {
            rows: Arc::new(Mutex::new(HashMap::new())),
            db: None,
        }
    }

    /// Table backed by *db*: existing rows for this family are loaded and
    /// every mutation writes through.
    fn load(db: &SharedDb) -> Result<Self> {
        let mut rows = HashMap::new();
        {
            let conn = db.lock().unwrap();
            let mut stmt =
                conn.prepare("SELECT id, data FROM stat_records WHERE family = ?1")?;
            let stored = stmt.query_map(params![T::FAMILY], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?;
            for entry in stored {
                let (id, data) = entry?;
                let id = Uuid::parse_str(&id).map_err(|_| {
                    ScraperError::Parse(format!("Invalid stored row id '{id}'"))
                })?;
                rows.insert(id, serde_json::from_str(&data)?);
            }
        }
        Ok(Self {
            rows: Arc::new(Mutex::new(rows)),
            db: Some(db.clone()),
        })
    }

    fn persist(&self, id: Uuid, row: &T) -> Result<()> {
        if let Some(db) = &self.db {
            let conn = db.lock().unwrap();
            conn.execute(
                "INSERT INTO stat_records (family, id, data) VALUES (?1, ?2, ?3)
                 ON CONFLICT (family, id) DO UPDATE SET data = excluded.data",
                params![T::FAMILY, id.to_string(), serde_json::to_string(row)?],
            )?;
        }
        Ok(())
    }

    fn unpersist(&self, ids: &[Uuid]) -> Result<()> {
        if let Some(db) = &self.db {
            let conn = db.lock().unwrap();
            for id in ids {
                conn.execute(
                    "DELETE FROM stat_records WHERE family = ?1 AND id = ?2",
                    params![T::FAMILY, id.to_string()],
                )?;
            }
        }
        Ok(())
    }

    /// Insert *candidate* or overwrite the existing row with the same
    /// natural key. The match is exact equality; on overwrite the stored
    /// identity is preserved and every other field takes the candidate's
    /// value (last-write-wins, no merging).
    pub fn upsert(&self, mut candidate: T) -> Result<T> {
        let mut rows = self.rows.lock().unwrap();
        let key = candidate.natural_key();
        let existing_id = rows
            .iter()
            .find(|(_, row)| row.natural_key() == key)
            .map(|(id, _)| *id);

        let id = existing_id.unwrap_or_else(Uuid::new_v4);
        candidate.set_id(id);
        rows.insert(id, candidate.clone());
        self.persist(id, &candidate)?;
        Ok(candidate)
    }

    /// Delete every row matching *predicate*; returns the number removed.
    pub fn delete_where<F: Fn(&T) -> bool>(&self, predicate: F) -> Result<usize> {
        let mut rows = self.rows.lock().unwrap();
        let doomed: Vec<Uuid> = rows
            .iter()
            .filter(|(_, row)| predicate(row))
            .map(|(id, _)| *id)
            .collect();
        for id in &doomed {
            rows.remove(id);
        }
        self.unpersist(&doomed)?;
        Ok(doomed.len())
    }

    /// Partial-key replace: delete every row matching *predicate*, then
    /// insert *replacements* unconditionally with fresh identities.
    pub fn replace_where<F: Fn(&T) -> bool>(
        &self,
        predicate: F,
        replacements: Vec<T>,
    ) -> Result<Vec<T>> {
        self.delete_where(predicate)?;
        let mut rows = self.rows.lock().unwrap();
        let mut stored = Vec::with_capacity(replacements.len());
        for mut row in replacements {
            let id = Uuid::new_v4();
            row.set_id(id);
            rows.insert(id, row.clone());
            self.persist(id, &row)?;
            stored.push(row);
        }
        Ok(stored)
    }

    pub fn select<F: Fn(&T) -> bool>(&self, predicate: F) -> Vec<T> {
        let rows = self.rows.lock().unwrap();
        rows.values().filter(|row| predicate(row)).cloned().collect()
    }

    pub fn all(&self) -> Vec<T> {
        let rows = self.rows.lock().unwrap();
        rows.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// All stat tables behind one handle. Clones share the same rows, so one
/// store per process acts as the single storage session.
#[derive(Clone, Default)]
pub struct StatStore {
    pub standings: Table<Standings>,
    pub games: Table<Game>,
    pub team_offense: Table<TeamOffense>,
    pub team_defense: Table<TeamDefense>,
    pub team_kicking: Table<TeamKicking>,
    pub team_punting: Table<TeamPunting>,
    pub team_returns: Table<TeamReturns>,
    pub passing: Table<PassingStats>,
    pub rushing: Table<RushingStats>,
    pub receiving: Table<ReceivingStats>,
    pub defense: Table<DefenseStats>,
    pub kicking: Table<KickingStats>,
    pub punting: Table<PuntingStats>,
    pub returns: Table<ReturnStats>,
    pub scoring: Table<ScoringStats>,
    pub team_games: Table<TeamGame>,
    pub injuries: Table<InjuryReport>,
    pub weather: Table<GameWeather>,
}

impl StatStore {
    /// Memory-only store for tests and ephemeral runs.
    pub fn new() -> Self {
        Self::default()
    }

    /// SQLite-backed store; rows survive across runs.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            CREATE TABLE IF NOT EXISTS stat_records (
                family TEXT NOT NULL,
                id     TEXT NOT NULL,
                data   TEXT NOT NULL,
                PRIMARY KEY (family, id)
            );
            "#,
        )?;
        let db: SharedDb = Arc::new(Mutex::new(conn));
        Ok(Self {
            standings: Table::load(&db)?,
            games: Table::load(&db)?,
            team_offense: Table::load(&db)?,
            team_defense: Table::load(&db)?,
            team_kicking: Table::load(&db)?,
            team_punting: Table::load(&db)?,
            team_returns: Table::load(&db)?,
            passing: Table::load(&db)?,
            rushing: Table::load(&db)?,
            receiving: Table::load(&db)?,
            defense: Table::load(&db)?,
            kicking: Table::load(&db)?,
            punting: Table::load(&db)?,
            returns: Table::load(&db)?,
            scoring: Table::load(&db)?,
            team_games: Table::load(&db)?,
            injuries: Table::load(&db)?,
            weather: Table::load(&db)?,
        })
    }
}
