use async_trait::async_trait;
use pfr_scraper::batch::{BatchScraper, ScrapeTarget, ScrapeUnit};
use pfr_scraper::error::{Result, ScraperError};
use pfr_scraper::jobs::{InMemoryJobStore, JobStatus, JobStore};
use std::sync::Arc;
use std::time::Duration;

/// Unit that succeeds for every target.
struct AlwaysSucceeds;

#[async_trait]
impl ScrapeUnit for AlwaysSucceeds {
    async fn scrape_and_store(&self, _target: &ScrapeTarget) -> Result<()> {
        Ok(())
    }
}

/// Unit that fails for the named teams and succeeds otherwise.
struct FailsFor(Vec<&'static str>);

#[async_trait]
impl ScrapeUnit for FailsFor {
    async fn scrape_and_store(&self, target: &ScrapeTarget) -> Result<()> {
        if self.0.contains(&target.team.as_str()) {
            Err(ScraperError::Parse("scrape failed".to_string()))
        } else {
            Ok(())
        }
    }
}

fn scraper_with(unit: impl ScrapeUnit + 'static) -> (BatchScraper, Arc<InMemoryJobStore>) {
    let jobs = Arc::new(InMemoryJobStore::new());
    let scraper = BatchScraper::new(jobs.clone(), Arc::new(unit), Duration::ZERO);
    (scraper, jobs)
}

fn targets(teams: &[&str], year: i32) -> Vec<ScrapeTarget> {
    teams.iter().map(|t| ScrapeTarget::new(*t, year)).collect()
}

#[tokio::test]
async fn create_initializes_counters() {
    let (scraper, jobs) = scraper_with(AlwaysSucceeds);
    let job_id = scraper
        .create_batch_job(&targets(&["kan", "buf", "phi"], 2024))
        .await
        .unwrap();

    let job = jobs.get_job(job_id).await.unwrap().unwrap();
    assert_eq!(job.status, JobStatus::Pending);
    assert_eq!(job.total_urls, 3);
    assert_eq!(job.processed, 0);
    assert_eq!(job.failed, 0);
    assert!(job.errors.is_empty());
    assert!(job.completed_at.is_none());
}

#[tokio::test]
async fn empty_target_list_is_rejected() {
    let (scraper, _) = scraper_with(AlwaysSucceeds);
    let err = scraper.create_batch_job(&[]).await.unwrap_err();
    assert!(matches!(err, ScraperError::InvalidTarget(_)));
}

#[tokio::test]
async fn blank_team_is_rejected() {
    let (scraper, _) = scraper_with(AlwaysSucceeds);
    let err = scraper
        .create_batch_job(&targets(&["kan", "  "], 2024))
        .await
        .unwrap_err();
    assert!(matches!(err, ScraperError::InvalidTarget(_)));
}

#[tokio::test]
async fn invalid_year_is_rejected() {
    let (scraper, _) = scraper_with(AlwaysSucceeds);
    let err = scraper
        .create_batch_job(&targets(&["kan"], 0))
        .await
        .unwrap_err();
    assert!(matches!(err, ScraperError::InvalidTarget(_)));
}

#[tokio::test]
async fn all_targets_succeed() {
    let (scraper, jobs) = scraper_with(AlwaysSucceeds);
    let summary = scraper
        .run_batch_scrape(&targets(&["kan", "buf", "phi"], 2024))
        .await
        .unwrap();

    assert_eq!(summary.total, 3);
    assert_eq!(summary.succeeded, 3);
    assert_eq!(summary.failed, 0);
    assert!(summary.errors.is_empty());

    let job = jobs.get_job(summary.job_id).await.unwrap().unwrap();
    assert_eq!(job.status, JobStatus::Complete);
    assert_eq!(job.processed, 3);
    assert_eq!(job.failed, 0);
    assert!(job.completed_at.is_some());
}

#[tokio::test]
async fn partial_failure_still_completes() {
    let (scraper, jobs) = scraper_with(FailsFor(vec!["chiefs"]));
    let summary = scraper
        .run_batch_scrape(&targets(&["chiefs", "bills"], 2024))
        .await
        .unwrap();

    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.errors[0].target.team, "chiefs");
    assert!(summary.errors[0].error.contains("scrape failed"));

    // Failure never escalates to the Failed status; the job completes with
    // its error list populated.
    let job = jobs.get_job(summary.job_id).await.unwrap().unwrap();
    assert_eq!(job.status, JobStatus::Complete);
    assert_eq!(job.processed, 1);
    assert_eq!(job.failed, 1);
    assert_eq!(job.errors.len(), job.failed as usize);
    assert!(job.processed + job.failed <= job.total_urls);
}

#[tokio::test]
async fn every_target_failing_still_completes() {
    let (scraper, jobs) = scraper_with(FailsFor(vec!["a", "b", "c"]));
    let summary = scraper
        .run_batch_scrape(&targets(&["a", "b", "c"], 2023))
        .await
        .unwrap();

    assert_eq!(summary.succeeded, 0);
    assert_eq!(summary.failed, 3);

    let job = jobs.get_job(summary.job_id).await.unwrap().unwrap();
    assert_eq!(job.status, JobStatus::Complete);
    assert_eq!(job.errors.len(), 3);
}

#[tokio::test(start_paused = true)]
async fn delay_runs_between_targets_but_not_after_the_last() {
    let delay = Duration::from_secs(5);
    let jobs = Arc::new(InMemoryJobStore::new());
    let scraper = BatchScraper::new(jobs, Arc::new(AlwaysSucceeds), delay);

    // With the clock paused, sleeps complete instantly but still advance
    // virtual time, so elapsed time counts exactly the sleeps taken.
    let start = tokio::time::Instant::now();
    scraper
        .run_batch_scrape(&targets(&["kan", "buf", "phi"], 2024))
        .await
        .unwrap();
    assert_eq!(start.elapsed(), delay * 2);

    let start = tokio::time::Instant::now();
    scraper
        .run_batch_scrape(&targets(&["kan"], 2024))
        .await
        .unwrap();
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test]
async fn errors_preserve_target_order() {
    let (scraper, _) = scraper_with(FailsFor(vec!["den", "lac"]));
    let summary = scraper
        .run_batch_scrape(&targets(&["den", "kan", "lac"], 2024))
        .await
        .unwrap();

    let failed: Vec<&str> = summary
        .errors
        .iter()
        .map(|e| e.target.team.as_str())
        .collect();
    assert_eq!(failed, vec!["den", "lac"]);
}

#[tokio::test]
async fn executing_unknown_job_errors() {
    let (scraper, _) = scraper_with(AlwaysSucceeds);
    let err = scraper
        .execute_batch_job(999, &targets(&["kan"], 2024))
        .await
        .unwrap_err();
    assert!(matches!(err, ScraperError::JobNotFound(999)));
}

#[tokio::test]
async fn unknown_job_status_is_none() {
    let (scraper, _) = scraper_with(AlwaysSucceeds);
    assert!(scraper.get_job_status(42).await.unwrap().is_none());
}

#[tokio::test]
async fn list_jobs_filters_by_status() {
    let (scraper, _) = scraper_with(AlwaysSucceeds);
    let pending_id = scraper
        .create_batch_job(&targets(&["kan"], 2024))
        .await
        .unwrap();
    let summary = scraper
        .run_batch_scrape(&targets(&["buf"], 2024))
        .await
        .unwrap();

    let pending = scraper.list_jobs(Some(JobStatus::Pending), 10).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].job_id, pending_id);

    let complete = scraper
        .list_jobs(Some(JobStatus::Complete), 10)
        .await
        .unwrap();
    assert_eq!(complete.len(), 1);
    assert_eq!(complete[0].job_id, summary.job_id);

    let all = scraper.list_jobs(None, 10).await.unwrap();
    assert_eq!(all.len(), 2);
}
