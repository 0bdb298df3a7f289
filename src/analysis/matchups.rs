use crate::domain::{ratio, HeroId, HeroMatchup};
use std::cmp::Ordering;

/// Matchups with fewer games than this are too noisy to rank.
pub const MIN_MATCHUP_GAMES: u32 = 50;
pub const MATCHUP_LIST_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct RankedMatchup {
    pub opponent: HeroId,
    pub games: u32,
    pub wins: u32,
    pub win_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchupRanking {
    /// Opponents this hero beats most often.
    pub best: Vec<RankedMatchup>,
    /// Opponents that beat this hero most often.
    pub worst: Vec<RankedMatchup>,
}

pub fn rank_matchups(matchups: &[HeroMatchup]) -> MatchupRanking {
    let qualified: Vec<RankedMatchup> = matchups
        .iter()
        .filter(|m| m.games_played >= MIN_MATCHUP_GAMES)
        .filter_map(|m| {
            ratio(m.wins, m.games_played).map(|win_rate| RankedMatchup {
                opponent: m.hero_id,
                games: m.games_played,
                wins: m.wins,
                win_rate,
            })
        })
        .collect();

    let mut best = qualified.clone();
    best.sort_by(|a, b| b.win_rate.partial_cmp(&a.win_rate).unwrap_or(Ordering::Equal));
    best.truncate(MATCHUP_LIST_LEN);

    let mut worst = qualified;
    worst.sort_by(|a, b| a.win_rate.partial_cmp(&b.win_rate).unwrap_or(Ordering::Equal));
    worst.truncate(MATCHUP_LIST_LEN);

    MatchupRanking { best, worst }
}
