//! Groups match records into named buckets and counts games and wins per bucket.

use crate::cache::HeroIndex;
use crate::domain::{ratio, MatchRecord};

/// Games shorter than this are "short".
pub const SHORT_GAME_SECS: u32 = 1800;
/// Games at least this long are "long".
pub const LONG_GAME_SECS: u32 = 2400;

pub const SHORT: &str = "short";
pub const MEDIUM: &str = "medium";
pub const LONG: &str = "long";
pub const RANKED: &str = "ranked";
pub const UNRANKED: &str = "unranked";
pub const SOLO: &str = "solo";
pub const PARTY: &str = "party";
pub const RECENT: &str = "recent";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BucketStats {
    pub games: u32,
    pub wins: u32,
}

impl BucketStats {
    pub fn add_game(&mut self, won: bool) {
        self.games += 1;
        if won {
            self.wins += 1;
        }
    }

    /// Absent when the bucket is empty.
    pub fn win_rate(&self) -> Option<f64> {
        ratio(self.wins, self.games)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub label: String,
    pub stats: BucketStats,
}

/// Buckets in the order their labels were first seen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BucketMap {
    buckets: Vec<Bucket>,
}

impl BucketMap {
    fn entry(&mut self, label: &str) -> &mut BucketStats {
        let idx = match self.buckets.iter().position(|b| b.label == label) {
            Some(idx) => idx,
            None => {
                self.buckets.push(Bucket {
                    label: label.to_string(),
                    stats: BucketStats::default(),
                });
                self.buckets.len() - 1
            }
        };
        &mut self.buckets[idx].stats
    }

    /// Unknown labels read as an empty bucket.
    pub fn get(&self, label: &str) -> BucketStats {
        self.buckets
            .iter()
            .find(|b| b.label == label)
            .map(|b| b.stats)
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bucket> {
        self.buckets.iter()
    }
}

impl FromIterator<(String, BucketStats)> for BucketMap {
    fn from_iter<T: IntoIterator<Item = (String, BucketStats)>>(iter: T) -> Self {
        let mut map = BucketMap::default();
        for (label, stats) in iter {
            let entry = map.entry(&label);
            entry.games += stats.games;
            entry.wins += stats.wins;
        }
        map
    }
}

pub fn duration_bucket(duration_secs: u32) -> &'static str {
    if duration_secs < SHORT_GAME_SECS {
        SHORT
    } else if duration_secs < LONG_GAME_SECS {
        MEDIUM
    } else {
        LONG
    }
}

/// How a record is assigned to buckets.
#[derive(Debug, Clone, Copy)]
pub enum Discriminator<'a> {
    Duration,
    /// One bucket per role of the hero played.
    Role(&'a HeroIndex),
    Lobby,
    Party,
    /// The first N records of the sequence.
    Recent(usize),
}

impl Discriminator<'_> {
    pub fn keys(&self, position: usize, record: &MatchRecord) -> Vec<String> {
        match self {
            Discriminator::Duration => vec![duration_bucket(record.duration_secs).to_string()],
            Discriminator::Role(heroes) => heroes
                .get(record.hero_id)
                .map(|hero| hero.roles.clone())
                .unwrap_or_default(),
            Discriminator::Lobby => {
                let key = if record.is_ranked() { RANKED } else { UNRANKED };
                vec![key.to_string()]
            }
            Discriminator::Party => match record.party_size {
                Some(1) => vec![SOLO.to_string()],
                Some(size) if size > 1 => vec![PARTY.to_string()],
                _ => Vec::new(),
            },
            Discriminator::Recent(n) => {
                if position < *n {
                    vec![RECENT.to_string()]
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Labels that always exist in the output, even with zero games.
    fn seed_labels(&self) -> &'static [&'static str] {
        match self {
            Discriminator::Duration => &[SHORT, MEDIUM, LONG],
            Discriminator::Role(_) => &[],
            Discriminator::Lobby => &[RANKED, UNRANKED],
            Discriminator::Party => &[SOLO, PARTY],
            Discriminator::Recent(_) => &[RECENT],
        }
    }
}

pub struct StatsAggregator;

impl StatsAggregator {
    pub fn aggregate(records: &[MatchRecord], discriminator: Discriminator<'_>) -> BucketMap {
        let mut map = BucketMap::default();
        for label in discriminator.seed_labels() {
            map.entry(label);
        }
        for (position, record) in records.iter().enumerate() {
            for key in discriminator.keys(position, record) {
                map.entry(&key).add_game(record.won());
            }
        }
        map
    }

    /// Baseline over the whole sequence.
    pub fn overall(records: &[MatchRecord]) -> BucketStats {
        let mut stats = BucketStats::default();
        for record in records {
            stats.add_game(record.won());
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{record, records_with, FakeProvider};
    use rstest::rstest;

    #[rstest]
    #[case(0, SHORT)]
    #[case(1799, SHORT)]
    #[case(1800, MEDIUM)]
    #[case(2399, MEDIUM)]
    #[case(2400, LONG)]
    #[case(5000, LONG)]
    fn duration_thresholds(#[case] secs: u32, #[case] expected: &str) {
        assert_eq!(duration_bucket(secs), expected);
    }

    #[test]
    fn empty_bucket_has_no_win_rate() {
        let records = records_with(2, 1, |r| r.duration(1000));
        let map = StatsAggregator::aggregate(&records, Discriminator::Duration);

        let short = map.get(SHORT);
        assert_eq!(short.games, 3);
        assert_eq!(short.wins, 2);

        let long = map.get(LONG);
        assert_eq!(long.games, 0);
        assert_eq!(long.win_rate(), None);
    }

    #[test]
    fn win_rates_stay_in_unit_interval() {
        let records: Vec<_> = (0..30)
            .map(|i| record(i).duration(600 + i as u32 * 100).won(i % 3 == 0).build())
            .collect();
        let map = StatsAggregator::aggregate(&records, Discriminator::Duration);

        for bucket in map.iter() {
            match bucket.stats.win_rate() {
                Some(rate) => assert!((0.0..=1.0).contains(&rate)),
                None => assert_eq!(bucket.stats.games, 0),
            }
        }
    }

    #[test]
    fn duration_buckets_keep_fixed_order() {
        let records = vec![record(1).duration(3000).build(), record(2).duration(100).build()];
        let map = StatsAggregator::aggregate(&records, Discriminator::Duration);
        let labels: Vec<_> = map.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec![SHORT, MEDIUM, LONG]);
    }

    #[test]
    fn records_land_in_every_role_bucket() {
        let heroes = HeroIndex::new(vec![
            FakeProvider::hero(1, "Axe", &["Initiator", "Durable"]),
            FakeProvider::hero(2, "Lion", &["Support", "Disabler"]),
        ]);
        let records = vec![
            record(1).hero(1).won(true).build(),
            record(2).hero(2).won(false).build(),
            record(3).hero(99).won(true).build(),
        ];

        let map = StatsAggregator::aggregate(&records, Discriminator::Role(&heroes));
        assert_eq!(map.iter().count(), 4);
        assert_eq!(map.get("Initiator"), BucketStats { games: 1, wins: 1 });
        assert_eq!(map.get("Support"), BucketStats { games: 1, wins: 0 });
    }

    #[test]
    fn splits_lobby_and_party() {
        let records = vec![
            record(1).lobby(7).party(Some(1)).build(),
            record(2).lobby(0).party(Some(3)).won(false).build(),
            record(3).lobby(0).party(None).build(),
        ];

        let lobby = StatsAggregator::aggregate(&records, Discriminator::Lobby);
        assert_eq!(lobby.get(RANKED).games, 1);
        assert_eq!(lobby.get(UNRANKED).games, 2);

        let party = StatsAggregator::aggregate(&records, Discriminator::Party);
        assert_eq!(party.get(SOLO).games, 1);
        assert_eq!(party.get(PARTY), BucketStats { games: 1, wins: 0 });
    }

    #[test]
    fn recent_takes_leading_records() {
        let records = records_with(3, 12, |r| r);
        let map = StatsAggregator::aggregate(&records, Discriminator::Recent(10));
        assert_eq!(map.get(RECENT), BucketStats { games: 10, wins: 3 });
    }

    #[test]
    fn aggregation_is_deterministic() {
        let records = records_with(4, 6, |r| r.duration(2500));
        let first = StatsAggregator::aggregate(&records, Discriminator::Duration);
        let second = StatsAggregator::aggregate(&records, Discriminator::Duration);
        assert_eq!(first, second);
    }
}
