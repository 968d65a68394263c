use clap::{Parser, Subcommand};
use tracing::error;

use pfr_scraper::batch::{BatchScraper, ScrapeTarget};
use pfr_scraper::config::Config;
use pfr_scraper::fetcher::PageFetcher;
use pfr_scraper::jobs::{JobStatus, JobStore, SqliteJobStore};
use pfr_scraper::logging;
use pfr_scraper::query::QueryService;
use pfr_scraper::scrapers::team_games::TeamGamelogUnit;
use pfr_scraper::scrapers::{self, injuries, team_games, StatCategory};
use pfr_scraper::server::{start_server, AppState};
use pfr_scraper::storage::StatStore;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "pfr_scraper")]
#[command(about = "NFL statistics scraper for pro-football-reference.com")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape one season-level stat category
    Scrape {
        /// Category: standings, games, team-offense, team-defense,
        /// team-kicking, team-punting, team-returns, passing, rushing,
        /// receiving, defense, kicking, punting, returns, scoring
        category: String,
        /// Season year, e.g. 2024
        season: i32,
    },
    /// Scrape the weekly injury report for one season/week
    Injuries {
        season: i32,
        week: i64,
    },
    /// Scrape one team's gamelog for a season
    Team {
        /// Team abbreviation, e.g. kan, buf
        team: String,
        season: i32,
    },
    /// Batch-scrape gamelogs for several teams as a tracked job
    Batch {
        /// Comma-separated team abbreviations
        #[arg(long)]
        teams: String,
        /// Season year applied to every team
        #[arg(long)]
        year: i32,
    },
    /// List tracked batch jobs
    Jobs {
        /// Filter: pending, running, complete, failed
        #[arg(long)]
        status: Option<String>,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Show one job with its error list
    Job {
        id: i64,
    },
    /// Run the HTTP API server
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
}

fn build_batch_scraper(
    config: &Config,
    store: &StatStore,
    fetcher: &Arc<PageFetcher>,
) -> Result<Arc<BatchScraper>, Box<dyn std::error::Error>> {
    let jobs: Arc<dyn JobStore> = Arc::new(SqliteJobStore::open(&config.server.job_db_path)?);
    let unit = Arc::new(TeamGamelogUnit::new(store.clone(), fetcher.clone()));
    Ok(Arc::new(BatchScraper::new(
        jobs,
        unit,
        config.scrape.delay(),
    )))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load()?;

    let store = StatStore::open(&config.server.stat_db_path)?;
    let fetcher = Arc::new(PageFetcher::new(&config.scrape));

    match cli.command {
        Commands::Scrape { category, season } => {
            let category: StatCategory = category.parse()?;
            println!("🔄 Scraping {} for {season}...", category.as_str());
            match scrapers::scrape_category(&store, &fetcher, category, season).await {
                Ok(report) => {
                    println!("\n📊 Scrape results:");
                    println!("   Category: {}", report.category);
                    println!("   Season: {}", report.season);
                    println!("   Rows saved: {}", report.rows_saved);
                }
                Err(e) => {
                    error!("Scrape failed: {}", e);
                    println!("⚠️  Scrape failed: {e}");
                }
            }
        }
        Commands::Injuries { season, week } => {
            println!("🔄 Scraping injury report for {season} week {week}...");
            let saved = injuries::scrape_and_store(&store, &fetcher, season, week).await?;
            println!("📊 Saved {saved} injury rows");
        }
        Commands::Team { team, season } => {
            println!("🔄 Scraping {team} gamelog for {season}...");
            let saved = team_games::scrape_and_store(&store, &fetcher, &team, season).await?;
            println!("📊 Saved {saved} games for {}", team.to_uppercase());
        }
        Commands::Batch { teams, year } => {
            let targets: Vec<ScrapeTarget> = teams
                .split(',')
                .map(|t| ScrapeTarget::new(t.trim(), year))
                .collect();

            let batch = build_batch_scraper(&config, &store, &fetcher)?;
            println!("🔄 Running batch scrape over {} targets...", targets.len());
            let summary = batch.run_batch_scrape(&targets).await?;

            println!("\n📊 Batch job {} results:", summary.job_id);
            println!("   Total: {}", summary.total);
            println!("   Succeeded: {}", summary.succeeded);
            println!("   Failed: {}", summary.failed);
            if !summary.errors.is_empty() {
                println!("\n⚠️  Failed targets:");
                for err in &summary.errors {
                    println!("   - {}: {}", err.target, err.error);
                }
            }
        }
        Commands::Jobs { status, limit } => {
            let status = match status.as_deref() {
                Some(raw) => match JobStatus::parse(raw) {
                    Some(s) => Some(s),
                    None => {
                        println!("⚠️  Unknown status: {raw}");
                        return Ok(());
                    }
                },
                None => None,
            };
            let batch = build_batch_scraper(&config, &store, &fetcher)?;
            let jobs = batch.list_jobs(status, limit).await?;
            if jobs.is_empty() {
                println!("No jobs found");
            }
            for job in jobs {
                println!(
                    "#{} {} {}/{} processed, {} failed, created {}",
                    job.job_id,
                    job.status.as_str(),
                    job.processed,
                    job.total_urls,
                    job.failed,
                    job.created_at
                );
            }
        }
        Commands::Job { id } => {
            let batch = build_batch_scraper(&config, &store, &fetcher)?;
            match batch.get_job_status(id).await? {
                Some(job) => {
                    println!("Job #{}", job.job_id);
                    println!("   Status: {}", job.status.as_str());
                    println!("   Targets: {}", job.total_urls);
                    println!("   Processed: {}", job.processed);
                    println!("   Failed: {}", job.failed);
                    println!("   Created: {}", job.created_at);
                    match job.completed_at {
                        Some(at) => println!("   Completed: {at}"),
                        None => println!("   Completed: -"),
                    }
                    if !job.errors.is_empty() {
                        println!("\n⚠️  Errors:");
                        for err in &job.errors {
                            println!("   - {}: {}", err.target, err.error);
                        }
                    }
                }
                None => println!("⚠️  Job {id} not found"),
            }
        }
        Commands::Serve { port } => {
            let batch = build_batch_scraper(&config, &store, &fetcher)?;
            let state = Arc::new(AppState {
                store: store.clone(),
                fetcher: fetcher.clone(),
                batch,
                query: QueryService::new(store),
            });
            start_server(state, port.unwrap_or(config.server.port)).await?;
        }
    }

    Ok(())
}
