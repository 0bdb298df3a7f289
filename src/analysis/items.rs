//! Item loadout frequency and win rates over a small sample of detailed matches.

use crate::domain::{ratio, ItemCatalog, ItemId, PlayerDetail};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Detailed matches sampled per hero/account pair.
pub const ITEM_SAMPLE_SIZE: usize = 10;
pub const MIN_ITEM_GAMES: u32 = 2;
pub const MIN_WIN_RATE_GAMES: u32 = 3;
pub const FREQUENT_LIST_LEN: usize = 15;
pub const WIN_RATE_LIST_LEN: usize = 10;
pub const CORE_ITEM_SHARE: f64 = 0.5;
pub const CORE_ITEM_MIN_WIN_RATE: f64 = 0.5;

pub const FARMING_ITEMS: [&str; 6] = [
    "Battle Fury",
    "Radiance",
    "Maelstrom",
    "Mjollnir",
    "Hand of Midas",
    "Battlefury",
];

pub const FIGHTING_ITEMS: [&str; 6] = [
    "Black King Bar",
    "Blade Mail",
    "Drum of Endurance",
    "Phase Boots",
    "Magic Wand",
    "Diffusal Blade",
];

#[derive(Debug, Clone, PartialEq)]
pub struct ItemStat {
    pub item_id: ItemId,
    pub name: String,
    pub games: u32,
    pub wins: u32,
    pub win_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildTendency {
    Farming,
    Fighting,
    /// Neither side dominates, or there is nothing to compare.
    Balanced,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemBuildReport {
    pub sample_size: usize,
    pub most_frequent: Vec<ItemStat>,
    pub highest_win_rate: Vec<ItemStat>,
    pub core_items: Vec<ItemStat>,
    pub farming_items: Vec<ItemStat>,
    pub fighting_items: Vec<ItemStat>,
    pub farming_games: u32,
    pub fighting_games: u32,
    pub tendency: BuildTendency,
}

fn matches_any(name: &str, keywords: &[&str]) -> bool {
    let name = name.to_lowercase();
    keywords.iter().any(|k| name.contains(&k.to_lowercase()))
}

/// Per-item games and wins, first-seen order, filtered to the minimum sample.
pub fn item_stats(samples: &[PlayerDetail], catalog: &ItemCatalog) -> Vec<ItemStat> {
    let mut order: Vec<ItemId> = Vec::new();
    let mut counts: HashMap<ItemId, (u32, u32)> = HashMap::new();

    for sample in samples {
        for item_id in sample.items.iter().copied().filter(|id| *id > 0) {
            let entry = counts.entry(item_id).or_insert_with(|| {
                order.push(item_id);
                (0, 0)
            });
            entry.0 += 1;
            if sample.won {
                entry.1 += 1;
            }
        }
    }

    order
        .into_iter()
        .filter_map(|item_id| {
            let (games, wins) = counts.get(&item_id).copied()?;
            if games < MIN_ITEM_GAMES {
                return None;
            }
            Some(ItemStat {
                item_id,
                name: catalog.display_name(item_id),
                games,
                wins,
                win_rate: ratio(wins, games)?,
            })
        })
        .collect()
}

pub fn classify_tendency(farming_games: u32, fighting_games: u32) -> BuildTendency {
    if farming_games > fighting_games && farming_games > 0 {
        BuildTendency::Farming
    } else if fighting_games > farming_games && fighting_games > 0 {
        BuildTendency::Fighting
    } else {
        BuildTendency::Balanced
    }
}

pub fn analyze_item_builds(samples: &[PlayerDetail], catalog: &ItemCatalog) -> ItemBuildReport {
    let samples = &samples[..samples.len().min(ITEM_SAMPLE_SIZE)];
    let stats = item_stats(samples, catalog);

    let mut most_frequent = stats.clone();
    most_frequent.sort_by(|a, b| b.games.cmp(&a.games));

    let mut highest_win_rate: Vec<ItemStat> = most_frequent
        .iter()
        .filter(|s| s.games >= MIN_WIN_RATE_GAMES)
        .cloned()
        .collect();
    highest_win_rate.sort_by(|a, b| b.win_rate.partial_cmp(&a.win_rate).unwrap_or(Ordering::Equal));
    highest_win_rate.truncate(WIN_RATE_LIST_LEN);

    let core_games = (samples.len() as f64 * CORE_ITEM_SHARE).ceil() as u32;
    let core_items = most_frequent
        .iter()
        .filter(|s| s.games >= core_games && s.win_rate >= CORE_ITEM_MIN_WIN_RATE)
        .cloned()
        .collect();

    let farming_items: Vec<ItemStat> = most_frequent
        .iter()
        .filter(|s| matches_any(&s.name, &FARMING_ITEMS))
        .cloned()
        .collect();
    let fighting_items: Vec<ItemStat> = most_frequent
        .iter()
        .filter(|s| matches_any(&s.name, &FIGHTING_ITEMS))
        .cloned()
        .collect();
    let farming_games = farming_items.iter().map(|s| s.games).sum();
    let fighting_games = fighting_items.iter().map(|s| s.games).sum();

    most_frequent.truncate(FREQUENT_LIST_LEN);

    ItemBuildReport {
        sample_size: samples.len(),
        most_frequent,
        highest_win_rate,
        core_items,
        farming_items,
        fighting_items,
        farming_games,
        fighting_games,
        tendency: classify_tendency(farming_games, fighting_games),
    }
}
