//! Batch scrape job tracking.
//!
//! A [`ScrapeJob`] records one batch run: how many targets it covers, how
//! many have succeeded or failed so far, and structured per-target errors.
//! Mutation helpers return `None` when the job id does not resolve; callers
//! branch on that sentinel rather than catching an error.
//!
//! The increments are only correct under the orchestrator's single-writer
//! sequential execution model. The SQLite implementation pushes the
//! arithmetic into the UPDATE statement; the in-memory one serializes
//! through a single lock.

use crate::batch::ScrapeTarget;
use crate::error::{Result, ScraperError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Complete,
    /// Defined terminal state that the batch runner never assigns; jobs
    /// carry partial failures in their error list and still end Complete.
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Complete => "complete",
            JobStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(JobStatus::Pending),
            "running" => Some(JobStatus::Running),
            "complete" => Some(JobStatus::Complete),
            "failed" => Some(JobStatus::Failed),
            _ => None,
        }
    }
}

/// One failed target, captured in processing order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetError {
    pub target: ScrapeTarget,
    pub error: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeJob {
    pub id: i64,
    pub status: JobStatus,
    pub total_urls: u32,
    pub processed: u32,
    pub failed: u32,
    pub errors: Vec<TargetError>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Persistence boundary for job state. All mutators return the updated job,
/// or `None` for an unknown id.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn create_job(&self, total_urls: u32) -> Result<ScrapeJob>;
    async fn get_job(&self, id: i64) -> Result<Option<ScrapeJob>>;
    async fn set_status(&self, id: i64, status: JobStatus) -> Result<Option<ScrapeJob>>;
    async fn increment_processed(&self, id: i64) -> Result<Option<ScrapeJob>>;
    async fn increment_failed(&self, id: i64, error: TargetError) -> Result<Option<ScrapeJob>>;
    async fn mark_complete(&self, id: i64) -> Result<Option<ScrapeJob>>;
    async fn list_jobs(&self, status: Option<JobStatus>, limit: usize) -> Result<Vec<ScrapeJob>>;
}

/// In-memory job store for tests and ephemeral runs.
pub struct InMemoryJobStore {
    jobs: Mutex<HashMap<i64, ScrapeJob>>,
    next_id: AtomicI64,
}

impl Default for InMemoryJobStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self {
            jobs: Mutex::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    fn update<F: FnOnce(&mut ScrapeJob)>(&self, id: i64, f: F) -> Option<ScrapeJob> {
        let mut jobs = self.jobs.lock().unwrap();
        let job = jobs.get_mut(&id)?;
        f(job);
        Some(job.clone())
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn create_job(&self, total_urls: u32) -> Result<ScrapeJob> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let job = ScrapeJob {
            id,
            status: JobStatus::Pending,
            total_urls,
            processed: 0,
            failed: 0,
            errors: Vec::new(),
            created_at: Utc::now(),
            completed_at: None,
        };
        self.jobs.lock().unwrap().insert(id, job.clone());
        debug!(job_id = id, total_urls, "Created scrape job");
        Ok(job)
    }

    async fn get_job(&self, id: i64) -> Result<Option<ScrapeJob>> {
        Ok(self.jobs.lock().unwrap().get(&id).cloned())
    }

    async fn set_status(&self, id: i64, status: JobStatus) -> Result<Option<ScrapeJob>> {
        Ok(self.update(id, |job| job.status = status))
    }

    async fn increment_processed(&self, id: i64) -> Result<Option<ScrapeJob>> {
        Ok(self.update(id, |job| job.processed += 1))
    }

    async fn increment_failed(&self, id: i64, error: TargetError) -> Result<Option<ScrapeJob>> {
        Ok(self.update(id, |job| {
            job.failed += 1;
            job.errors.push(error);
        }))
    }

    async fn mark_complete(&self, id: i64) -> Result<Option<ScrapeJob>> {
        Ok(self.update(id, |job| {
            job.status = JobStatus::Complete;
            job.completed_at = Some(Utc::now());
        }))
    }

    async fn list_jobs(&self, status: Option<JobStatus>, limit: usize) -> Result<Vec<ScrapeJob>> {
        let jobs = self.jobs.lock().unwrap();
        let mut list: Vec<ScrapeJob> = jobs
            .values()
            .filter(|job| status.map_or(true, |s| job.status == s))
            .cloned()
            .collect();
        list.sort_by_key(|job| job.id);
        list.truncate(limit);
        Ok(list)
    }
}

/// SQLite-backed job store; the one the binary runs with.
pub struct SqliteJobStore {
    conn: Mutex<Connection>,
}

impl SqliteJobStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            CREATE TABLE IF NOT EXISTS scrape_jobs (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                status       TEXT NOT NULL,
                total_urls   INTEGER NOT NULL,
                processed    INTEGER NOT NULL DEFAULT 0,
                failed       INTEGER NOT NULL DEFAULT 0,
                errors       TEXT NOT NULL DEFAULT '[]',
                created_at   TEXT NOT NULL,
                completed_at TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_scrape_jobs_status ON scrape_jobs(status);
            "#,
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn row_to_raw(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawJobRow> {
        Ok(RawJobRow {
            id: row.get(0)?,
            status: row.get(1)?,
            total_urls: row.get(2)?,
            processed: row.get(3)?,
            failed: row.get(4)?,
            errors: row.get(5)?,
            created_at: row.get(6)?,
            completed_at: row.get(7)?,
        })
    }

    fn fetch(conn: &Connection, id: i64) -> Result<Option<ScrapeJob>> {
        let raw = conn
            .query_row(
                "SELECT id, status, total_urls, processed, failed, errors, created_at, completed_at
                 FROM scrape_jobs WHERE id = ?1",
                params![id],
                Self::row_to_raw,
            )
            .optional()?;
        raw.map(Self::hydrate).transpose()
    }

    fn hydrate(raw: RawJobRow) -> Result<ScrapeJob> {
        let status = JobStatus::parse(&raw.status)
            .ok_or_else(|| ScraperError::Parse(format!("Unknown job status '{}'", raw.status)))?;
        Ok(ScrapeJob {
            id: raw.id,
            status,
            total_urls: raw.total_urls,
            processed: raw.processed,
            failed: raw.failed,
            errors: serde_json::from_str(&raw.errors)?,
            created_at: parse_timestamp(&raw.created_at)?,
            completed_at: raw
                .completed_at
                .as_deref()
                .map(parse_timestamp)
                .transpose()?,
        })
    }
}

struct RawJobRow {
    id: i64,
    status: String,
    total_urls: u32,
    processed: u32,
    failed: u32,
    errors: String,
    created_at: String,
    completed_at: Option<String>,
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ScraperError::Parse(format!("Invalid stored timestamp '{raw}'")))
}

#[async_trait]
impl JobStore for SqliteJobStore {
    async fn create_job(&self, total_urls: u32) -> Result<ScrapeJob> {
        let conn = self.conn.lock().unwrap();
        let created_at = Utc::now();
        conn.execute(
            "INSERT INTO scrape_jobs (status, total_urls, processed, failed, errors, created_at)
             VALUES (?1, ?2, 0, 0, '[]', ?3)",
            params![
                JobStatus::Pending.as_str(),
                total_urls,
                created_at.to_rfc3339()
            ],
        )?;
        let id = conn.last_insert_rowid();
        debug!(job_id = id, total_urls, "Created scrape job");
        Ok(ScrapeJob {
            id,
            status: JobStatus::Pending,
            total_urls,
            processed: 0,
            failed: 0,
            errors: Vec::new(),
            created_at,
            completed_at: None,
        })
    }

    async fn get_job(&self, id: i64) -> Result<Option<ScrapeJob>> {
        let conn = self.conn.lock().unwrap();
        Self::fetch(&conn, id)
    }

    async fn set_status(&self, id: i64, status: JobStatus) -> Result<Option<ScrapeJob>> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "UPDATE scrape_jobs SET status = ?1 WHERE id = ?2",
            params![status.as_str(), id],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        Self::fetch(&conn, id)
    }

    async fn increment_processed(&self, id: i64) -> Result<Option<ScrapeJob>> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "UPDATE scrape_jobs SET processed = processed + 1 WHERE id = ?1",
            params![id],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        Self::fetch(&conn, id)
    }

    async fn increment_failed(&self, id: i64, error: TargetError) -> Result<Option<ScrapeJob>> {
        let conn = self.conn.lock().unwrap();
        let Some(job) = Self::fetch(&conn, id)? else {
            return Ok(None);
        };
        let mut errors = job.errors;
        errors.push(error);
        conn.execute(
            "UPDATE scrape_jobs SET failed = failed + 1, errors = ?1 WHERE id = ?2",
            params![serde_json::to_string(&errors)?, id],
        )?;
        Self::fetch(&conn, id)
    }

    async fn mark_complete(&self, id: i64) -> Result<Option<ScrapeJob>> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "UPDATE scrape_jobs SET status = ?1, completed_at = ?2 WHERE id = ?3",
            params![JobStatus::Complete.as_str(), Utc::now().to_rfc3339(), id],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        Self::fetch(&conn, id)
    }

    async fn list_jobs(&self, status: Option<JobStatus>, limit: usize) -> Result<Vec<ScrapeJob>> {
        let conn = self.conn.lock().unwrap();
        let raw_rows: Vec<RawJobRow> = if let Some(status) = status {
            let mut stmt = conn.prepare(
                "SELECT id, status, total_urls, processed, failed, errors, created_at, completed_at
                 FROM scrape_jobs WHERE status = ?1 ORDER BY id LIMIT ?2",
            )?;
            let rows = stmt.query_map(params![status.as_str(), limit as i64], Self::row_to_raw)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        } else {
            let mut stmt = conn.prepare(
                "SELECT id, status, total_urls, processed, failed, errors, created_at, completed_at
                 FROM scrape_jobs ORDER BY id LIMIT ?1",
            )?;
            let rows = stmt.query_map(params![limit as i64], Self::row_to_raw)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        };
        raw_rows.into_iter().map(Self::hydrate).collect()
    }
}
