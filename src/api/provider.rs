//! The seam between the analyses and wherever the numbers come from.

use crate::domain::{
    AccountId, Bracket, HeroId, HeroMatchup, HeroMetaStat, HeroRecord, ItemCatalog, ItemInfo,
    MatchDetail, MatchId, MatchRecord, Metric, PlayerDetail, PlayerHeroStat, PlayerProfile,
    PlayerSearchHit,
};
use crate::error::AppError;
use std::collections::HashMap;

use super::models::*;

/// Filters for a player's match history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchQuery {
    pub hero_id: Option<HeroId>,
    pub limit: usize,
}

impl MatchQuery {
    pub fn recent(limit: usize) -> Self {
        MatchQuery {
            hero_id: None,
            limit,
        }
    }

    pub fn for_hero(hero_id: HeroId, limit: usize) -> Self {
        MatchQuery {
            hero_id: Some(hero_id),
            limit,
        }
    }
}

pub trait DataProvider {
    fn fetch_heroes(&self) -> Result<Vec<HeroRecord>, AppError>;

    fn fetch_hero_meta_stats(&self) -> Result<Vec<HeroMetaStat>, AppError>;

    /// Most recent first.
    fn fetch_player_matches(
        &self,
        account_id: AccountId,
        query: &MatchQuery,
    ) -> Result<Vec<MatchRecord>, AppError>;

    fn fetch_match_detail(&self, match_id: MatchId) -> Result<MatchDetail, AppError>;

    fn fetch_hero_matchups(&self, hero_id: HeroId) -> Result<Vec<HeroMatchup>, AppError>;

    fn fetch_item_catalog(&self) -> Result<ItemCatalog, AppError>;

    fn fetch_player_heroes(&self, account_id: AccountId) -> Result<Vec<PlayerHeroStat>, AppError>;

    /// Accounts whose persona name resembles `name`, closest first.
    fn fetch_player_search(&self, name: &str) -> Result<Vec<PlayerSearchHit>, AppError>;

    fn fetch_player_profile(&self, account_id: AccountId) -> Result<PlayerProfile, AppError>;
}

pub fn hero_from_dto(dto: HeroDto) -> HeroRecord {
    HeroRecord {
        id: dto.id,
        name: dto.name,
        localized_name: dto.localized_name,
        roles: dto.roles,
        primary_attr: dto.primary_attr,
        attack_type: dto.attack_type,
    }
}

pub fn match_from_dto(dto: PlayerMatchDto) -> MatchRecord {
    MatchRecord {
        match_id: dto.match_id,
        hero_id: dto.hero_id,
        duration_secs: dto.duration,
        start_time: dto.start_time,
        player_slot: dto.player_slot,
        radiant_win: dto.radiant_win.unwrap_or(false),
        kills: dto.kills,
        deaths: dto.deaths,
        assists: dto.assists,
        lobby_type: dto.lobby_type,
        party_size: dto.party_size,
        items: dto.slots.filled(),
    }
}

pub fn match_detail_from_dto(dto: MatchDetailDto) -> MatchDetail {
    let radiant_win = dto.radiant_win.unwrap_or(false);
    let players = dto
        .players
        .into_iter()
        .map(|p| PlayerDetail {
            match_id: dto.match_id,
            account_id: p.account_id,
            player_slot: p.player_slot,
            hero_id: p.hero_id,
            won: crate::domain::won_from_slot(p.player_slot, radiant_win),
            items: p.slots.filled(),
            ability_upgrades: p.ability_upgrades_arr.unwrap_or_default(),
        })
        .collect();

    MatchDetail {
        match_id: dto.match_id,
        radiant_win,
        players,
    }
}

/// Entries without a hero id the provider can express as a number are dropped.
pub fn player_heroes_from_dtos(dtos: Vec<PlayerHeroDto>) -> Vec<PlayerHeroStat> {
    dtos.into_iter()
        .filter_map(|dto| {
            dto.hero_id.value().map(|hero_id| PlayerHeroStat {
                hero_id,
                games: dto.games,
                wins: dto.win,
            })
        })
        .collect()
}

pub fn matchup_from_dto(dto: HeroMatchupDto) -> HeroMatchup {
    HeroMatchup {
        hero_id: dto.hero_id,
        games_played: dto.games_played,
        wins: dto.wins,
    }
}

/// Recipes and other entries without a display name are left out.
pub fn item_catalog_from_dtos(dtos: HashMap<String, ItemDto>) -> ItemCatalog {
    ItemCatalog::new(dtos.into_values().filter_map(|dto| {
        dto.dname.filter(|name| !name.is_empty()).map(|display_name| ItemInfo {
            id: dto.id,
            display_name,
            category: dto.qual,
        })
    }))
}

pub fn search_hit_from_dto(dto: PlayerSearchDto) -> PlayerSearchHit {
    PlayerSearchHit {
        account_id: dto.account_id,
        persona_name: dto.personaname.unwrap_or_default(),
    }
}

pub fn profile_from_dto(account_id: AccountId, dto: PlayerProfileDto) -> PlayerProfile {
    let rank_tier = dto.rank_tier;
    match dto.profile {
        Some(profile) => PlayerProfile {
            account_id,
            persona_name: profile.personaname,
            steam_id: profile.steamid,
            profile_url: profile.profileurl,
            country_code: profile.loccountrycode,
            plus: profile.plus.unwrap_or(false),
            last_login: profile.last_login,
            rank_tier,
        },
        None => PlayerProfile {
            account_id,
            rank_tier,
            ..PlayerProfile::default()
        },
    }
}

const PICKS_PER_MATCH: f64 = 10.0;

/// Turns raw per-bracket pick/win counts into percentages.
///
/// Win rate is wins over picks. Pick rate is the share of the bracket's
/// matches featuring the hero, with the match count recovered from the total
/// number of picks in that bracket.
pub fn meta_stats_from_dtos(dtos: &[HeroStatsDto]) -> Vec<HeroMetaStat> {
    let counter = |dto: &HeroStatsDto, bracket: Bracket, suffix: &str| -> Option<f64> {
        dto.counters
            .get(&format!("{}_{}", bracket.key(), suffix))
            .and_then(|value| value.as_f64())
    };

    let mut matches_per_bracket: HashMap<Bracket, f64> = HashMap::new();
    for dto in dtos {
        for bracket in Bracket::ALL {
            if let Some(picks) = counter(dto, bracket, "pick") {
                *matches_per_bracket.entry(bracket).or_insert(0.0) += picks / PICKS_PER_MATCH;
            }
        }
    }

    dtos.iter()
        .map(|dto| {
            let mut stat = HeroMetaStat::new(dto.id);
            for bracket in Bracket::ALL {
                let Some(picks) = counter(dto, bracket, "pick") else {
                    continue;
                };
                if let Some(matches) = matches_per_bracket.get(&bracket).filter(|m| **m > 0.0) {
                    stat.set(bracket, Metric::PickRate, picks / matches * 100.0);
                }
                if picks > 0.0 {
                    if let Some(wins) = counter(dto, bracket, "win") {
                        stat.set(bracket, Metric::WinRate, wins / picks * 100.0);
                    }
                }
            }
            stat
        })
        .collect()
}
