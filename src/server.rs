use crate::batch::{BatchScraper, JobStatusView, JobSummaryView, ScrapeTarget};
use crate::error::ScraperError;
use crate::fetcher::PageFetcher;
use crate::jobs::JobStatus;
use crate::query::{Page, QueryService};
use crate::scrapers::weather::{upsert_game_weather, GameWeather};
use crate::scrapers::{self, injuries, team_games, StatCategory};
use crate::storage::StatStore;
use axum::{
    extract::{Path, Query},
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Extension, Router,
};
use chrono::{DateTime, Utc};
use hyper::Server;
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

/// Shared state for all handlers.
pub struct AppState {
    pub store: StatStore,
    pub fetcher: Arc<PageFetcher>,
    pub batch: Arc<BatchScraper>,
    pub query: QueryService,
}

impl IntoResponse for ScraperError {
    fn into_response(self) -> Response {
        let status = match &self {
            ScraperError::InvalidTarget(_) => StatusCode::BAD_REQUEST,
            ScraperError::JobNotFound(_) => StatusCode::NOT_FOUND,
            ScraperError::Http(_) | ScraperError::TableNotFound(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<T>, ScraperError>;

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "pfr-scraper",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[derive(Debug, Deserialize)]
struct StatsQuery {
    season: Option<i32>,
    week: Option<i64>,
    team: Option<String>,
    limit: Option<usize>,
    offset: Option<usize>,
}

impl StatsQuery {
    fn page(&self) -> Page {
        let default = Page::default();
        Page {
            limit: self.limit.unwrap_or(default.limit),
            offset: self.offset.unwrap_or(default.offset),
        }
    }
}

async fn scrape_stat(
    Extension(state): Extension<Arc<AppState>>,
    Path((category, season)): Path<(String, i32)>,
) -> ApiResult<scrapers::ScrapeReport> {
    let category: StatCategory = category.parse()?;
    let report = scrapers::scrape_category(&state.store, &state.fetcher, category, season).await?;
    Ok(Json(report))
}

async fn scrape_injuries(
    Extension(state): Extension<Arc<AppState>>,
    Path((season, week)): Path<(i32, i64)>,
) -> ApiResult<serde_json::Value> {
    let saved = injuries::scrape_and_store(&state.store, &state.fetcher, season, week).await?;
    Ok(Json(serde_json::json!({
        "season": season,
        "week": week,
        "rows_saved": saved,
    })))
}

async fn scrape_team(
    Extension(state): Extension<Arc<AppState>>,
    Path((team, season)): Path<(String, i32)>,
) -> ApiResult<serde_json::Value> {
    let saved = team_games::scrape_and_store(&state.store, &state.fetcher, &team, season).await?;
    Ok(Json(serde_json::json!({
        "team": team,
        "season": season,
        "rows_saved": saved,
    })))
}

#[derive(Debug, Deserialize)]
struct BatchRequest {
    targets: Vec<ScrapeTarget>,
}

async fn scrape_batch(
    Extension(state): Extension<Arc<AppState>>,
    Json(req): Json<BatchRequest>,
) -> ApiResult<crate::batch::BatchSummary> {
    let summary = state.batch.run_batch_scrape(&req.targets).await?;
    Ok(Json(summary))
}

#[derive(Debug, Deserialize)]
struct JobsQuery {
    status: Option<String>,
    limit: Option<usize>,
}

async fn list_jobs(
    Extension(state): Extension<Arc<AppState>>,
    Query(q): Query<JobsQuery>,
) -> ApiResult<Vec<JobSummaryView>> {
    let status = match q.status.as_deref() {
        Some(raw) => Some(JobStatus::parse(raw).ok_or_else(|| {
            ScraperError::InvalidTarget(format!("Unknown job status '{raw}'"))
        })?),
        None => None,
    };
    let jobs = state.batch.list_jobs(status, q.limit.unwrap_or(50)).await?;
    Ok(Json(jobs))
}

async fn job_detail(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<JobStatusView> {
    let job = state
        .batch
        .get_job_status(id)
        .await?
        .ok_or(ScraperError::JobNotFound(id))?;
    Ok(Json(job))
}

/// Weather observations arrive from an external collector rather than a
/// scraped page, so ingestion is a plain POST.
#[derive(Debug, Deserialize)]
struct WeatherIngest {
    season: i32,
    week: i64,
    home_team: String,
    stadium: Option<String>,
    #[serde(default)]
    is_dome: bool,
    temperature: Option<f64>,
    wind_speed: Option<f64>,
    precipitation: Option<f64>,
    humidity: Option<f64>,
    weather_condition: Option<String>,
    game_time: Option<DateTime<Utc>>,
}

async fn ingest_weather(
    Extension(state): Extension<Arc<AppState>>,
    Json(body): Json<WeatherIngest>,
) -> ApiResult<GameWeather> {
    let record = GameWeather {
        id: None,
        season: body.season,
        week: body.week,
        home_team: body.home_team.to_uppercase(),
        stadium: body.stadium,
        is_dome: body.is_dome,
        temperature: body.temperature,
        wind_speed: body.wind_speed,
        precipitation: body.precipitation,
        humidity: body.humidity,
        weather_condition: body.weather_condition,
        game_time: body.game_time,
        fetched_at: Utc::now(),
    };
    Ok(Json(upsert_game_weather(&state.store, record)?))
}

macro_rules! stats_handler {
    ($name:ident, $method:ident, season_only) => {
        async fn $name(
            Extension(state): Extension<Arc<AppState>>,
            Query(q): Query<StatsQuery>,
        ) -> impl IntoResponse {
            Json(state.query.$method(q.season, q.page()))
        }
    };
    ($name:ident, $method:ident, season_week) => {
        async fn $name(
            Extension(state): Extension<Arc<AppState>>,
            Query(q): Query<StatsQuery>,
        ) -> impl IntoResponse {
            Json(state.query.$method(q.season, q.week, q.page()))
        }
    };
}

stats_handler!(stats_standings, standings, season_only);
stats_handler!(stats_games, games, season_week);
stats_handler!(stats_team_offense, team_offense, season_only);
stats_handler!(stats_team_defense, team_defense, season_only);
stats_handler!(stats_passing, passing, season_only);
stats_handler!(stats_rushing, rushing, season_only);
stats_handler!(stats_receiving, receiving, season_only);
stats_handler!(stats_defense, defense, season_only);
stats_handler!(stats_kicking, kicking, season_only);
stats_handler!(stats_punting, punting, season_only);
stats_handler!(stats_returns, returns, season_only);
stats_handler!(stats_scoring, scoring, season_only);
stats_handler!(stats_team_kicking, team_kicking, season_only);
stats_handler!(stats_team_punting, team_punting, season_only);
stats_handler!(stats_team_returns, team_returns, season_only);
stats_handler!(stats_injuries, injuries, season_week);
stats_handler!(stats_weather, weather, season_week);

async fn stats_team_games(
    Extension(state): Extension<Arc<AppState>>,
    Query(q): Query<StatsQuery>,
) -> impl IntoResponse {
    Json(state.query.team_games(q.team.clone(), q.season, q.page()))
}

/// Create the HTTP server with all routes
pub fn create_server(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        // Scrape triggers
        .route("/scrape/batch", post(scrape_batch))
        .route("/scrape/injuries/:season/:week", post(scrape_injuries))
        .route("/scrape/team/:team/:season", post(scrape_team))
        .route("/scrape/:category/:season", post(scrape_stat))
        // Job status
        .route("/jobs", get(list_jobs))
        .route("/jobs/:id", get(job_detail))
        // Weather ingestion
        .route("/weather", post(ingest_weather))
        // Stored stat reads
        .route("/stats/standings", get(stats_standings))
        .route("/stats/games", get(stats_games))
        .route("/stats/team-offense", get(stats_team_offense))
        .route("/stats/team-defense", get(stats_team_defense))
        .route("/stats/passing", get(stats_passing))
        .route("/stats/rushing", get(stats_rushing))
        .route("/stats/receiving", get(stats_receiving))
        .route("/stats/defense", get(stats_defense))
        .route("/stats/kicking", get(stats_kicking))
        .route("/stats/punting", get(stats_punting))
        .route("/stats/returns", get(stats_returns))
        .route("/stats/scoring", get(stats_scoring))
        .route("/stats/team-kicking", get(stats_team_kicking))
        .route("/stats/team-punting", get(stats_team_punting))
        .route("/stats/team-returns", get(stats_team_returns))
        .route("/stats/team-games", get(stats_team_games))
        .route("/stats/injuries", get(stats_injuries))
        .route("/stats/weather", get(stats_weather))
        .layer(Extension(state))
        .layer(ServiceBuilder::new().layer(cors))
}

/// Start the HTTP server on the specified port
pub async fn start_server(
    state: Arc<AppState>,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_server(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    println!("🚀 HTTP server running on http://localhost:{port}");
    println!("💚 Health check: http://localhost:{port}/health");
    println!("📊 Stats:        http://localhost:{port}/stats/standings");

    Server::bind(&addr).serve(app.into_make_service()).await?;

    Ok(())
}
