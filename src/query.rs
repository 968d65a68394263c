//! Read-only listing over stored stat tables: filter, stable sort,
//! limit/offset pagination. No scraping or mutation happens here.

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
use crate::storage::StatStore;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Page {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    100
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
        }
    }
}

fn paginate<T>(mut rows: Vec<T>, page: Page) -> Vec<T> {
    if page.offset >= rows.len() {
        return Vec::new();
    }
    rows.drain(..page.offset);
    rows.truncate(page.limit);
    rows
}

#[derive(Clone)]
pub struct QueryService {
    store: StatStore,
}

impl QueryService {
    pub fn new(store: StatStore) -> Self {
        Self { store }
    }

    pub fn standings(&self, season: Option<i32>, page: Page) -> Vec<Standings> {
        let mut rows = self
            .store
            .standings
            .select(|r| season.map_or(true, |s| r.season == s));
        rows.sort_by(|a, b| (a.season, &a.team).cmp(&(b.season, &b.team)));
        paginate(rows, page)
    }

    pub fn games(&self, season: Option<i32>, week: Option<i64>, page: Page) -> Vec<Game> {
        let mut rows = self.store.games.select(|r| {
            season.map_or(true, |s| r.season == s) && week.map_or(true, |w| r.week == Some(w))
        });
        rows.sort_by(|a, b| (a.season, a.week, &a.winner).cmp(&(b.season, b.week, &b.winner)));
        paginate(rows, page)
    }

    pub fn team_offense(&self, season: Option<i32>, page: Page) -> Vec<TeamOffense> {
        let mut rows = self
            .store
            .team_offense
            .select(|r| season.map_or(true, |s| r.season == s));
        rows.sort_by(|a, b| (a.season, &a.team).cmp(&(b.season, &b.team)));
        paginate(rows, page)
    }

    pub fn team_defense(&self, season: Option<i32>, page: Page) -> Vec<TeamDefense> {
        let mut rows = self
            .store
            .team_defense
            .select(|r| season.map_or(true, |s| r.season == s));
        rows.sort_by(|a, b| (a.season, &a.team).cmp(&(b.season, &b.team)));
        paginate(rows, page)
    }

    pub fn passing(&self, season: Option<i32>, page: Page) -> Vec<PassingStats> {
        let mut rows = self
            .store
            .passing
            .select(|r| season.map_or(true, |s| r.season == s));
        rows.sort_by(|a, b| (a.season, &a.player_name).cmp(&(b.season, &b.player_name)));
        paginate(rows, page)
    }

    pub fn rushing(&self, season: Option<i32>, page: Page) -> Vec<RushingStats> {
        let mut rows = self
            .store
            .rushing
            .select(|r| season.map_or(true, |s| r.season == s));
        rows.sort_by(|a, b| (a.season, &a.player_name).cmp(&(b.season, &b.player_name)));
        paginate(rows, page)
    }

    pub fn receiving(&self, season: Option<i32>, page: Page) -> Vec<ReceivingStats> {
        let mut rows = self
            .store
            .receiving
            .select(|r| season.map_or(true, |s| r.season == s));
        rows.sort_by(|a, b| (a.season, &a.player_name).cmp(&(b.season, &b.player_name)));
        paginate(rows, page)
    }

    pub fn defense(&self, season: Option<i32>, page: Page) -> Vec<DefenseStats> {
        let mut rows = self
            .store
            .defense
            .select(|r| season.map_or(true, |s| r.season == s));
        rows.sort_by(|a, b| (a.season, &a.player_name).cmp(&(b.season, &b.player_name)));
        paginate(rows, page)
    }

    pub fn kicking(&self, season: Option<i32>, page: Page) -> Vec<KickingStats> {
        let mut rows = self
            .store
            .kicking
            .select(|r| season.map_or(true, |s| r.season == s));
        rows.sort_by(|a, b| (a.season, &a.player_name).cmp(&(b.season, &b.player_name)));
        paginate(rows, page)
    }

    pub fn punting(&self, season: Option<i32>, page: Page) -> Vec<PuntingStats> {
        let mut rows = self
            .store
            .punting
            .select(|r| season.map_or(true, |s| r.season == s));
        rows.sort_by(|a, b| (a.season, &a.player_name).cmp(&(b.season, &b.player_name)));
        paginate(rows, page)
    }

    pub fn returns(&self, season: Option<i32>, page: Page) -> Vec<ReturnStats> {
        let mut rows = self
            .store
            .returns
            .select(|r| season.map_or(true, |s| r.season == s));
        rows.sort_by(|a, b| (a.season, &a.player_name).cmp(&(b.season, &b.player_name)));
        paginate(rows, page)
    }

    pub fn scoring(&self, season: Option<i32>, page: Page) -> Vec<ScoringStats> {
        let mut rows = self
            .store
            .scoring
            .select(|r| season.map_or(true, |s| r.season == s));
        rows.sort_by(|a, b| (a.season, &a.player_name).cmp(&(b.season, &b.player_name)));
        paginate(rows, page)
    }

    pub fn team_kicking(&self, season: Option<i32>, page: Page) -> Vec<TeamKicking> {
        let mut rows = self
            .store
            .team_kicking
            .select(|r| season.map_or(true, |s| r.season == s));
        rows.sort_by(|a, b| (a.season, &a.team).cmp(&(b.season, &b.team)));
        paginate(rows, page)
    }

    pub fn team_punting(&self, season: Option<i32>, page: Page) -> Vec<TeamPunting> {
        let mut rows = self
            .store
            .team_punting
            .select(|r| season.map_or(true, |s| r.season == s));
        rows.sort_by(|a, b| (a.season, &a.team).cmp(&(b.season, &b.team)));
        paginate(rows, page)
    }

    pub fn team_returns(&self, season: Option<i32>, page: Page) -> Vec<TeamReturns> {
        let mut rows = self
            .store
            .team_returns
            .select(|r| season.map_or(true, |s| r.season == s));
        rows.sort_by(|a, b| (a.season, &a.team).cmp(&(b.season, &b.team)));
        paginate(rows, page)
    }

    pub fn team_games(&self, team: Option<String>, season: Option<i32>, page: Page) -> Vec<TeamGame> {
        let team = team.map(|t| t.to_uppercase());
        let mut rows = self.store.team_games.select(|r| {
            season.map_or(true, |s| r.season == s)
                && team.as_deref().map_or(true, |t| r.team == t)
        });
        rows.sort_by(|a, b| (&a.team, a.season, a.week).cmp(&(&b.team, b.season, b.week)));
        paginate(rows, page)
    }

    pub fn injuries(&self, season: Option<i32>, week: Option<i64>, page: Page) -> Vec<InjuryReport> {
        let mut rows = self.store.injuries.select(|r| {
            season.map_or(true, |s| r.season == s) && week.map_or(true, |w| r.week == w)
        });
        rows.sort_by(|a, b| {
            (&a.team, &a.player_name, a.week).cmp(&(&b.team, &b.player_name, b.week))
        });
        paginate(rows, page)
    }

    pub fn weather(&self, season: Option<i32>, week: Option<i64>, page: Page) -> Vec<GameWeather> {
        let mut rows = self.store.weather.select(|r| {
            season.map_or(true, |s| r.season == s) && week.map_or(true, |w| r.week == w)
        });
        rows.sort_by(|a, b| (a.season, a.week, &a.home_team).cmp(&(b.season, b.week, &b.home_team)));
        paginate(rows, page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StatStore;

    fn standings_row(season: i32, team: &str, wins: i64) -> Standings {
        Standings {
            id: None,
            season,
            team: team.to_string(),
            wins: Some(wins),
            losses: None,
            ties: None,
            win_pct: None,
            points_for: None,
            points_against: None,
            points_diff: None,
            margin_of_victory: None,
            strength_of_schedule: None,
            srs: None,
            srs_offense: None,
            srs_defense: None,
        }
    }

    #[test]
    fn filters_by_season_and_paginates() -> crate::error::Result<()> {
        let store = StatStore::new();
        store.standings.upsert(standings_row(2023, "Buffalo Bills", 11))?;
        store.standings.upsert(standings_row(2024, "Buffalo Bills", 13))?;
        store.standings.upsert(standings_row(2024, "Miami Dolphins", 8))?;

        let query = QueryService::new(store);
        let all_2024 = query.standings(Some(2024), Page::default());
        assert_eq!(all_2024.len(), 2);
        assert_eq!(all_2024[0].team, "Buffalo Bills");

        let second = query.standings(
            Some(2024),
            Page {
                limit: 1,
                offset: 1,
            },
        );
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].team, "Miami Dolphins");

        let past_end = query.standings(
            Some(2024),
            Page {
                limit: 10,
                offset: 5,
            },
        );
        assert!(past_end.is_empty());
        Ok(())
    }
}
