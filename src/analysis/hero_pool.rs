//! A player's hero pool and a summary of their recent matches.

use crate::domain::{MatchRecord, PlayerHeroStat};
use std::cmp::Ordering;

pub const POOL_LIST_LEN: usize = 10;
pub const MIN_EFFECTIVE_GAMES: u32 = 5;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeroPool {
    pub most_played: Vec<PlayerHeroStat>,
    /// Best win rate among heroes with enough games.
    pub most_effective: Vec<PlayerHeroStat>,
}

pub fn hero_pool(stats: &[PlayerHeroStat]) -> HeroPool {
    let mut most_played = stats.to_vec();
    most_played.sort_by(|a, b| b.games.cmp(&a.games));
    most_played.truncate(POOL_LIST_LEN);

    let mut effective: Vec<(PlayerHeroStat, f64)> = stats
        .iter()
        .filter(|s| s.games >= MIN_EFFECTIVE_GAMES)
        .filter_map(|s| s.win_rate().map(|rate| (s.clone(), rate)))
        .collect();
    effective.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    HeroPool {
        most_played,
        most_effective: effective
            .into_iter()
            .take(POOL_LIST_LEN)
            .map(|(stat, _)| stat)
            .collect(),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecentSummary {
    pub matches: usize,
    pub wins: usize,
    pub win_rate: Option<f64>,
    pub avg_kills: f64,
    pub avg_deaths: f64,
    pub avg_assists: f64,
}

pub fn summarize_recent(records: &[MatchRecord]) -> RecentSummary {
    if records.is_empty() {
        return RecentSummary::default();
    }
    let n = records.len() as f64;
    let wins = records.iter().filter(|r| r.won()).count();
    let sum = |f: fn(&MatchRecord) -> u32| records.iter().map(|r| f64::from(f(r))).sum::<f64>();

    RecentSummary {
        matches: records.len(),
        wins,
        win_rate: Some(wins as f64 / n),
        avg_kills: sum(|r| r.kills) / n,
        avg_deaths: sum(|r| r.deaths) / n,
        avg_assists: sum(|r| r.assists) / n,
    }
}
