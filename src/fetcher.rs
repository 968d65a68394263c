use crate::config::ScrapeConfig;
use crate::error::Result;
use rand::seq::SliceRandom;
use reqwest::header::USER_AGENT;
use std::time::Duration;
use tracing::info;

/// Rotated per request; PFR 403-bans clients that look automated.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:124.0) Gecko/20100101 Firefox/124.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
];

/// Fetches PFR pages with a fixed pre-request delay and a randomized
/// User-Agent.
pub struct PageFetcher {
    client: reqwest::Client,
    delay: Duration,
    base_url: String,
}

impl PageFetcher {
    pub fn new(config: &ScrapeConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            delay: config.delay(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// URL of a season page, e.g. `/years/2024/passing.htm`.
    pub fn season_url(&self, season: i32, path: &str) -> String {
        if path.is_empty() {
            format!("{}/years/{}/", self.base_url, season)
        } else {
            format!("{}/years/{}/{}", self.base_url, season, path)
        }
    }

    /// URL of a team gamelog page, e.g. `/teams/kan/2024.htm`.
    pub fn team_url(&self, team: &str, season: i32) -> String {
        format!("{}/teams/{}/{}.htm", self.base_url, team.to_lowercase(), season)
    }

    /// GET a page as text. Sleeps the configured delay first, then sends
    /// with a random User-Agent. Non-2xx statuses are errors.
    pub async fn fetch_html(&self, url: &str) -> Result<String> {
        tokio::time::sleep(self.delay).await;

        let user_agent = USER_AGENTS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(USER_AGENTS[0]);

        info!(%url, "Fetching page");
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, user_agent)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScrapeConfig;

    fn fetcher() -> PageFetcher {
        PageFetcher::new(&ScrapeConfig {
            delay_seconds: 0,
            request_timeout_seconds: 5,
            base_url: "https://www.pro-football-reference.com".to_string(),
        })
    }

    #[test]
    fn season_url_with_and_without_path() {
        let f = fetcher();
        assert_eq!(
            f.season_url(2024, "passing.htm"),
            "https://www.pro-football-reference.com/years/2024/passing.htm"
        );
        assert_eq!(
            f.season_url(2024, ""),
            "https://www.pro-football-reference.com/years/2024/"
        );
    }

    #[test]
    fn team_url_lowercases_abbreviation() {
        let f = fetcher();
        assert_eq!(
            f.team_url("KAN", 2024),
            "https://www.pro-football-reference.com/teams/kan/2024.htm"
        );
    }
}
