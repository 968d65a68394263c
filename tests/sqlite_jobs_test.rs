use anyhow::Result;
use chrono::Utc;
use pfr_scraper::batch::ScrapeTarget;
use pfr_scraper::jobs::{JobStatus, JobStore, SqliteJobStore, TargetError};
use tempfile::tempdir;

fn target_error(team: &str, message: &str) -> TargetError {
    TargetError {
        target: ScrapeTarget::new(team, 2024),
        error: message.to_string(),
        timestamp: Utc::now(),
    }
}

#[tokio::test]
async fn job_lifecycle_round_trips() -> Result<()> {
    let store = SqliteJobStore::open_in_memory()?;

    let job = store.create_job(3).await?;
    assert_eq!(job.status, JobStatus::Pending);
    assert_eq!(job.total_urls, 3);

    store.set_status(job.id, JobStatus::Running).await?;
    store.increment_processed(job.id).await?;
    store.increment_processed(job.id).await?;
    store
        .increment_failed(job.id, target_error("den", "HTTP request failed"))
        .await?;
    let done = store.mark_complete(job.id).await?.unwrap();

    assert_eq!(done.status, JobStatus::Complete);
    assert_eq!(done.processed, 2);
    assert_eq!(done.failed, 1);
    assert_eq!(done.errors.len(), 1);
    assert_eq!(done.errors[0].target.team, "den");
    assert!(done.completed_at.is_some());
    Ok(())
}

#[tokio::test]
async fn errors_survive_reopen() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("jobs.db");

    let job_id = {
        let store = SqliteJobStore::open(&path)?;
        let job = store.create_job(2).await?;
        store
            .increment_failed(job.id, target_error("lac", "parse error"))
            .await?;
        store.mark_complete(job.id).await?;
        job.id
    };

    let reopened = SqliteJobStore::open(&path)?;
    let job = reopened.get_job(job_id).await?.unwrap();
    assert_eq!(job.status, JobStatus::Complete);
    assert_eq!(job.failed, 1);
    assert_eq!(job.errors[0].target, ScrapeTarget::new("lac", 2024));
    assert_eq!(job.errors[0].error, "parse error");
    Ok(())
}

#[tokio::test]
async fn corrupt_timestamp_is_an_error_not_fabricated_data() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("jobs.db");

    let job_id = {
        let store = SqliteJobStore::open(&path)?;
        store.create_job(1).await?.id
    };

    // Mangle the stored timestamp out-of-band.
    let conn = rusqlite::Connection::open(&path)?;
    conn.execute(
        "UPDATE scrape_jobs SET created_at = 'not-a-timestamp' WHERE id = ?1",
        rusqlite::params![job_id],
    )?;
    drop(conn);

    let store = SqliteJobStore::open(&path)?;
    let err = store.get_job(job_id).await.unwrap_err();
    assert!(matches!(
        err,
        pfr_scraper::error::ScraperError::Parse(_)
    ));
    Ok(())
}

#[tokio::test]
async fn unknown_ids_return_none() {
    let store = SqliteJobStore::open_in_memory().unwrap();

    assert!(store.get_job(99).await.unwrap().is_none());
    assert!(store.set_status(99, JobStatus::Running).await.unwrap().is_none());
    assert!(store.increment_processed(99).await.unwrap().is_none());
    assert!(store
        .increment_failed(99, target_error("kan", "x"))
        .await
        .unwrap()
        .is_none());
    assert!(store.mark_complete(99).await.unwrap().is_none());
}

#[tokio::test]
async fn list_jobs_orders_and_filters() {
    let store = SqliteJobStore::open_in_memory().unwrap();

    let a = store.create_job(1).await.unwrap();
    let b = store.create_job(2).await.unwrap();
    let c = store.create_job(3).await.unwrap();
    store.mark_complete(b.id).await.unwrap();

    let all = store.list_jobs(None, 10).await.unwrap();
    assert_eq!(
        all.iter().map(|j| j.id).collect::<Vec<_>>(),
        vec![a.id, b.id, c.id]
    );

    let pending = store.list_jobs(Some(JobStatus::Pending), 10).await.unwrap();
    assert_eq!(pending.len(), 2);

    let limited = store.list_jobs(None, 2).await.unwrap();
    assert_eq!(limited.len(), 2);
}

#[tokio::test]
async fn ids_are_assigned_sequentially() {
    let store = SqliteJobStore::open_in_memory().unwrap();
    let first = store.create_job(1).await.unwrap();
    let second = store.create_job(1).await.unwrap();
    assert_eq!(second.id, first.id + 1);
}
