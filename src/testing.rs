//! In-memory provider and record builders for unit tests.

use crate::api::{DataProvider, MatchQuery};
use crate::domain::*;
use crate::error::AppError;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

#[derive(Default)]
pub struct FakeProvider {
    heroes: Vec<HeroRecord>,
    meta: Vec<HeroMetaStat>,
    matches: Vec<MatchRecord>,
    details: HashMap<MatchId, MatchDetail>,
    matchups: Vec<HeroMatchup>,
    items: Vec<ItemInfo>,
    player_heroes: Vec<PlayerHeroStat>,
    search_hits: Vec<PlayerSearchHit>,
    profiles: HashMap<AccountId, PlayerProfile>,
    failing: HashSet<&'static str>,
    failing_details: HashSet<MatchId>,
    calls: RefCell<HashMap<&'static str, usize>>,
}

impl FakeProvider {
    pub fn hero(id: HeroId, name: &str, roles: &[&str]) -> HeroRecord {
        HeroRecord {
            id,
            name: format!("npc_dota_hero_{}", name.to_lowercase().replace(' ', "_")),
            localized_name: name.to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            primary_attr: "agi".to_string(),
            attack_type: "Melee".to_string(),
        }
    }

    pub fn item(id: ItemId, name: &str) -> ItemInfo {
        ItemInfo {
            id,
            display_name: name.to_string(),
            category: None,
        }
    }

    pub fn with_heroes(mut self, heroes: Vec<HeroRecord>) -> Self {
        self.heroes = heroes;
        self
    }

    pub fn with_meta(mut self, meta: Vec<HeroMetaStat>) -> Self {
        self.meta = meta;
        self
    }

    pub fn with_matches(mut self, matches: Vec<MatchRecord>) -> Self {
        self.matches = matches;
        self
    }

    pub fn with_detail(mut self, detail: MatchDetail) -> Self {
        self.details.insert(detail.match_id, detail);
        self
    }

    pub fn with_matchups(mut self, matchups: Vec<HeroMatchup>) -> Self {
        self.matchups = matchups;
        self
    }

    pub fn with_items(mut self, items: Vec<ItemInfo>) -> Self {
        self.items = items;
        self
    }

    pub fn with_player_heroes(mut self, stats: Vec<PlayerHeroStat>) -> Self {
        self.player_heroes = stats;
        self
    }

    pub fn with_search_hits(mut self, hits: Vec<PlayerSearchHit>) -> Self {
        self.search_hits = hits;
        self
    }

    pub fn with_profile(mut self, profile: PlayerProfile) -> Self {
        self.profiles.insert(profile.account_id, profile);
        self
    }

    /// Makes every call to the named endpoint fail.
    pub fn failing(mut self, endpoint: &'static str) -> Self {
        self.failing.insert(endpoint);
        self
    }

    pub fn failing_detail(mut self, match_id: MatchId) -> Self {
        self.failing_details.insert(match_id);
        self
    }

    pub fn calls(&self, endpoint: &str) -> usize {
        self.calls.borrow().get(endpoint).copied().unwrap_or(0)
    }

    fn hit(&self, endpoint: &'static str) -> Result<(), AppError> {
        *self.calls.borrow_mut().entry(endpoint).or_insert(0) += 1;
        if self.failing.contains(endpoint) {
            Err(AppError::HttpError(format!("{} unavailable", endpoint)))
        } else {
            Ok(())
        }
    }
}

impl DataProvider for FakeProvider {
    fn fetch_heroes(&self) -> Result<Vec<HeroRecord>, AppError> {
        self.hit("heroes")?;
        Ok(self.heroes.clone())
    }

    fn fetch_hero_meta_stats(&self) -> Result<Vec<HeroMetaStat>, AppError> {
        self.hit("meta")?;
        Ok(self.meta.clone())
    }

    fn fetch_player_matches(
        &self,
        _account_id: AccountId,
        query: &MatchQuery,
    ) -> Result<Vec<MatchRecord>, AppError> {
        self.hit("matches")?;
        Ok(self
            .matches
            .iter()
            .filter(|m| query.hero_id.map_or(true, |hero| m.hero_id == hero))
            .take(query.limit)
            .cloned()
            .collect())
    }

    fn fetch_match_detail(&self, match_id: MatchId) -> Result<MatchDetail, AppError> {
        self.hit("detail")?;
        if self.failing_details.contains(&match_id) {
            return Err(AppError::ProviderFailure(format!("match {} returned 500", match_id)));
        }
        self.details
            .get(&match_id)
            .cloned()
            .ok_or_else(|| AppError::ProviderFailure(format!("match {} returned 404", match_id)))
    }

    fn fetch_hero_matchups(&self, _hero_id: HeroId) -> Result<Vec<HeroMatchup>, AppError> {
        self.hit("matchups")?;
        Ok(self.matchups.clone())
    }

    fn fetch_item_catalog(&self) -> Result<ItemCatalog, AppError> {
        self.hit("items")?;
        Ok(ItemCatalog::new(self.items.clone()))
    }

    fn fetch_player_heroes(&self, _account_id: AccountId) -> Result<Vec<PlayerHeroStat>, AppError> {
        self.hit("player_heroes")?;
        Ok(self.player_heroes.clone())
    }

    fn fetch_player_search(&self, _name: &str) -> Result<Vec<PlayerSearchHit>, AppError> {
        self.hit("search")?;
        Ok(self.search_hits.clone())
    }

    fn fetch_player_profile(&self, account_id: AccountId) -> Result<PlayerProfile, AppError> {
        self.hit("profile")?;
        self.profiles.get(&account_id).cloned().ok_or_else(|| {
            AppError::ProviderFailure(format!("player {} returned 404", account_id))
        })
    }
}

/// Builder for match records; defaults to a 35 minute solo ranked win on Radiant.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    record: MatchRecord,
}

pub fn record(match_id: MatchId) -> RecordBuilder {
    RecordBuilder {
        record: MatchRecord {
            match_id,
            hero_id: 1,
            duration_secs: 2100,
            start_time: 1_700_000_000,
            player_slot: 0,
            radiant_win: true,
            kills: 5,
            deaths: 5,
            assists: 5,
            lobby_type: RANKED_LOBBY,
            party_size: Some(1),
            items: Vec::new(),
        },
    }
}

impl RecordBuilder {
    pub fn hero(mut self, hero_id: HeroId) -> Self {
        self.record.hero_id = hero_id;
        self
    }

    pub fn duration(mut self, secs: u32) -> Self {
        self.record.duration_secs = secs;
        self
    }

    pub fn won(mut self, won: bool) -> Self {
        self.record.player_slot = 0;
        self.record.radiant_win = won;
        self
    }

    pub fn kda(mut self, kills: u32, deaths: u32, assists: u32) -> Self {
        self.record.kills = kills;
        self.record.deaths = deaths;
        self.record.assists = assists;
        self
    }

    pub fn lobby(mut self, lobby_type: u32) -> Self {
        self.record.lobby_type = lobby_type;
        self
    }

    pub fn party(mut self, size: Option<u32>) -> Self {
        self.record.party_size = size;
        self
    }

    pub fn build(self) -> MatchRecord {
        self.record
    }
}

/// `wins` winning records followed by `losses` losing ones.
pub fn records_with(
    wins: usize,
    losses: usize,
    shape: impl Fn(RecordBuilder) -> RecordBuilder,
) -> Vec<MatchRecord> {
    (0..wins + losses)
        .map(|idx| shape(record(idx as MatchId + 1)).won(idx < wins).build())
        .collect()
}

pub fn player_detail(
    match_id: MatchId,
    account_id: AccountId,
    won: bool,
    items: &[ItemId],
) -> PlayerDetail {
    PlayerDetail {
        match_id,
        account_id: Some(account_id),
        player_slot: 0,
        hero_id: 1,
        won,
        items: items.to_vec(),
        ability_upgrades: Vec::new(),
    }
}

pub fn match_detail(players: Vec<PlayerDetail>) -> MatchDetail {
    let match_id = players.first().map(|p| p.match_id).unwrap_or_default();
    let radiant_win = players.first().map(|p| p.won).unwrap_or(false);
    MatchDetail {
        match_id,
        radiant_win,
        players,
    }
}
