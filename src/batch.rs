//! Batch scrape orchestration.
//!
//! One batch job walks an ordered list of team/year targets, invoking the
//! per-target scrape unit strictly sequentially with a delay between
//! targets. A target's failure is captured into the job's error list and
//! processing continues; the job always reaches Complete once execution
//! starts. Job state is mutated only here during a run.

use crate::error::{Result, ScraperError};
use crate::jobs::{JobStatus, JobStore, ScrapeJob, TargetError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// One unit of batch work: a team abbreviation plus a season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeTarget {
    pub team: String,
    pub year: i32,
}

impl ScrapeTarget {
    pub fn new(team: impl Into<String>, year: i32) -> Self {
        Self {
            team: team.into(),
            year,
        }
    }
}

impl std::fmt::Display for ScrapeTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.team, self.year)
    }
}

/// The per-target scrape-and-store collaborator. The orchestrator treats it
/// as opaque and atomic: it either succeeds or fails, and the orchestrator
/// never inspects why.
#[async_trait]
pub trait ScrapeUnit: Send + Sync {
    async fn scrape_and_store(&self, target: &ScrapeTarget) -> Result<()>;
}

/// Summary returned after a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub job_id: i64,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub errors: Vec<TargetError>,
}

/// Full job projection for status queries. `completed_at` serializes as an
/// explicit null until the job finishes.
#[derive(Debug, Clone, Serialize)]
pub struct JobStatusView {
    pub job_id: i64,
    pub status: JobStatus,
    pub total_urls: u32,
    pub processed: u32,
    pub failed: u32,
    pub errors: Vec<TargetError>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<ScrapeJob> for JobStatusView {
    fn from(job: ScrapeJob) -> Self {
        Self {
            job_id: job.id,
            status: job.status,
            total_urls: job.total_urls,
            processed: job.processed,
            failed: job.failed,
            errors: job.errors,
            created_at: job.created_at,
            completed_at: job.completed_at,
        }
    }
}

/// Listing projection: everything but the error list.
#[derive(Debug, Clone, Serialize)]
pub struct JobSummaryView {
    pub job_id: i64,
    pub status: JobStatus,
    pub total_urls: u32,
    pub processed: u32,
    pub failed: u32,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<ScrapeJob> for JobSummaryView {
    fn from(job: ScrapeJob) -> Self {
        Self {
            job_id: job.id,
            status: job.status,
            total_urls: job.total_urls,
            processed: job.processed,
            failed: job.failed,
            created_at: job.created_at,
            completed_at: job.completed_at,
        }
    }
}

pub struct BatchScraper {
    jobs: Arc<dyn JobStore>,
    unit: Arc<dyn ScrapeUnit>,
    delay: Duration,
}

impl BatchScraper {
    pub fn new(jobs: Arc<dyn JobStore>, unit: Arc<dyn ScrapeUnit>, delay: Duration) -> Self {
        Self { jobs, unit, delay }
    }

    /// Validate targets and create a Pending job row. No scraping happens
    /// here; execution is a separate step.
    pub async fn create_batch_job(&self, targets: &[ScrapeTarget]) -> Result<i64> {
        if targets.is_empty() {
            return Err(ScraperError::InvalidTarget(
                "Targets list cannot be empty".to_string(),
            ));
        }
        for target in targets {
            if target.team.trim().is_empty() {
                return Err(ScraperError::InvalidTarget(
                    "Each target must have a non-empty team".to_string(),
                ));
            }
            if target.year <= 0 {
                return Err(ScraperError::InvalidTarget(format!(
                    "Target '{}' has an invalid year",
                    target.team
                )));
            }
        }

        let job = self.jobs.create_job(targets.len() as u32).await?;
        Ok(job.id)
    }

    /// Run a created job over *targets*, strictly sequentially and in input
    /// order. Per-target failures are recorded and do not abort the batch.
    /// The only errors that escape are an unknown job id and job-store
    /// failures.
    #[instrument(skip(self, targets), fields(total = targets.len()))]
    pub async fn execute_batch_job(
        &self,
        job_id: i64,
        targets: &[ScrapeTarget],
    ) -> Result<BatchSummary> {
        self.jobs
            .get_job(job_id)
            .await?
            .ok_or(ScraperError::JobNotFound(job_id))?;

        self.jobs.set_status(job_id, JobStatus::Running).await?;
        info!(job_id, "Batch job running");

        let mut succeeded = 0usize;
        let mut failed = 0usize;
        let mut errors: Vec<TargetError> = Vec::new();

        for (idx, target) in targets.iter().enumerate() {
            match self.unit.scrape_and_store(target).await {
                Ok(()) => {
                    self.jobs.increment_processed(job_id).await?;
                    succeeded += 1;
                    info!(job_id, %target, "Target scraped");
                }
                Err(e) => {
                    let error = TargetError {
                        target: target.clone(),
                        error: e.to_string(),
                        timestamp: Utc::now(),
                    };
                    self.jobs.increment_failed(job_id, error.clone()).await?;
                    failed += 1;
                    errors.push(error);
                    warn!(job_id, %target, error = %e, "Target failed; continuing");
                }
            }

            // Rate limiting between targets; no trailing delay after the
            // last one.
            let is_last = idx == targets.len() - 1;
            if !is_last {
                tokio::time::sleep(self.delay).await;
            }
        }

        self.jobs.mark_complete(job_id).await?;
        info!(job_id, succeeded, failed, "Batch job complete");

        Ok(BatchSummary {
            job_id,
            total: targets.len(),
            succeeded,
            failed,
            errors,
        })
    }

    /// Create and execute in one call.
    pub async fn run_batch_scrape(&self, targets: &[ScrapeTarget]) -> Result<BatchSummary> {
        let job_id = self.create_batch_job(targets).await?;
        self.execute_batch_job(job_id, targets).await
    }

    pub async fn get_job_status(&self, job_id: i64) -> Result<Option<JobStatusView>> {
        Ok(self.jobs.get_job(job_id).await?.map(JobStatusView::from))
    }

    pub async fn list_jobs(
        &self,
        status: Option<JobStatus>,
        limit: usize,
    ) -> Result<Vec<JobSummaryView>> {
        let jobs = self.jobs.list_jobs(status, limit).await?;
        Ok(jobs.into_iter().map(JobSummaryView::from).collect())
    }
}
