use crate::config::Config;
use crate::domain::{
    AccountId, HeroId, HeroMatchup, HeroMetaStat, HeroRecord, ItemCatalog, MatchDetail, MatchId,
    MatchRecord, PlayerHeroStat, PlayerProfile, PlayerSearchHit,
};
use crate::error::AppError;
use governor::{
    clock::{Clock, DefaultClock},
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

use super::models::*;
use super::provider::{self, DataProvider, MatchQuery};

const MAX_RETRIES: u32 = 3;
const RETRY_BACKOFF_MS: u64 = 2000;

pub struct OpenDotaClient {
    config: Config,
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    clock: DefaultClock,
}

impl OpenDotaClient {
    pub fn new(config: Config) -> Self {
        let per_minute = NonZeroU32::new(config.requests_per_minute).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = RateLimiter::direct(Quota::per_minute(per_minute));
        OpenDotaClient {
            config,
            rate_limiter,
            clock: DefaultClock::default(),
        }
    }

    /// GET request for `endpoint`; query values are percent-encoded by ureq.
    fn request(&self, endpoint: &str, query: &[(&str, String)]) -> ureq::Request {
        let mut request = ureq::get(&format!("{}{}", self.config.base_url, endpoint))
            .set("User-Agent", "dota_insight/0.1.0");
        for (key, value) in query {
            request = request.query(key, value);
        }
        if let Some(key) = &self.config.api_key {
            request = request.query("api_key", key);
        }
        request
    }

    /// Blocks until the local quota allows another request.
    fn wait_for_permit(&self) {
        while let Err(not_until) = self.rate_limiter.check() {
            let wait = not_until.wait_time_from(self.clock.now());
            debug!(wait_ms = wait.as_millis() as u64, "Waiting for rate limiter");
            thread::sleep(wait);
        }
    }

    fn execute_request(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<String, AppError> {
        let mut retry_count = 0;

        loop {
            self.wait_for_permit();
            debug!(endpoint, "GET");

            let response = self.request(endpoint, query).call();

            match response {
                Ok(resp) => {
                    return resp
                        .into_string()
                        .map_err(|e| AppError::HttpError(e.to_string()));
                }
                Err(ureq::Error::Status(429, _)) => {
                    if retry_count >= MAX_RETRIES {
                        return Err(AppError::RateLimited);
                    }
                    let wait_ms = RETRY_BACKOFF_MS * u64::from(retry_count + 1);
                    warn!(endpoint, wait_ms, "Rate limited by provider, retrying");
                    thread::sleep(Duration::from_millis(wait_ms));
                    retry_count += 1;
                }
                Err(ureq::Error::Status(code, resp)) => {
                    return Err(AppError::ProviderFailure(format!(
                        "{} returned {} {}",
                        endpoint,
                        code,
                        resp.status_text()
                    )));
                }
                Err(e) => {
                    return Err(AppError::HttpError(e.to_string()));
                }
            }
        }
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        let body = self.execute_request(endpoint, query)?;
        serde_json::from_str(&body)
            .map_err(|e| AppError::JsonError(format!("{}: {}", endpoint, e)))
    }
}

impl DataProvider for OpenDotaClient {
    fn fetch_heroes(&self) -> Result<Vec<HeroRecord>, AppError> {
        let heroes: Vec<HeroDto> = self.get_json("/heroes", &[])?;
        Ok(heroes.into_iter().map(provider::hero_from_dto).collect())
    }

    fn fetch_hero_meta_stats(&self) -> Result<Vec<HeroMetaStat>, AppError> {
        let stats: Vec<HeroStatsDto> = self.get_json("/heroStats", &[])?;
        Ok(provider::meta_stats_from_dtos(&stats))
    }

    fn fetch_player_matches(
        &self,
        account_id: AccountId,
        query: &MatchQuery,
    ) -> Result<Vec<MatchRecord>, AppError> {
        let mut params = vec![("limit", query.limit.to_string())];
        if let Some(hero_id) = query.hero_id {
            params.push(("hero_id", hero_id.to_string()));
        }

        let endpoint = format!("/players/{}/matches", account_id);
        let matches: Vec<PlayerMatchDto> = self.get_json(&endpoint, &params)?;
        Ok(matches.into_iter().map(provider::match_from_dto).collect())
    }

    fn fetch_match_detail(&self, match_id: MatchId) -> Result<MatchDetail, AppError> {
        let endpoint = format!("/matches/{}", match_id);
        let detail: MatchDetailDto = self.get_json(&endpoint, &[])?;
        Ok(provider::match_detail_from_dto(detail))
    }

    fn fetch_hero_matchups(&self, hero_id: HeroId) -> Result<Vec<HeroMatchup>, AppError> {
        let endpoint = format!("/heroes/{}/matchups", hero_id);
        let matchups: Vec<HeroMatchupDto> = self.get_json(&endpoint, &[])?;
        Ok(matchups.into_iter().map(provider::matchup_from_dto).collect())
    }

    fn fetch_item_catalog(&self) -> Result<ItemCatalog, AppError> {
        let items: HashMap<String, ItemDto> = self.get_json("/constants/items", &[])?;
        Ok(provider::item_catalog_from_dtos(items))
    }

    fn fetch_player_heroes(&self, account_id: AccountId) -> Result<Vec<PlayerHeroStat>, AppError> {
        let endpoint = format!("/players/{}/heroes", account_id);
        let heroes: Vec<PlayerHeroDto> = self.get_json(&endpoint, &[])?;
        Ok(provider::player_heroes_from_dtos(heroes))
    }

    fn fetch_player_search(&self, name: &str) -> Result<Vec<PlayerSearchHit>, AppError> {
        let hits: Vec<PlayerSearchDto> = self.get_json("/search", &[("q", name.to_string())])?;
        Ok(hits.into_iter().map(provider::search_hit_from_dto).collect())
    }

    fn fetch_player_profile(&self, account_id: AccountId) -> Result<PlayerProfile, AppError> {
        let endpoint = format!("/players/{}", account_id);
        let profile: PlayerProfileDto = self.get_json(&endpoint, &[])?;
        Ok(provider::profile_from_dto(account_id, profile))
    }
}
