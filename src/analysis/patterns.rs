//! Flags buckets whose win rate strays from the player's baseline.
//!
//! Every category has a fixed deviation threshold, a minimum sample and a
//! fixed confidence. Nothing here is fitted to data.

use super::buckets::{self, BucketMap, BucketStats, Discriminator, StatsAggregator};
use crate::cache::HeroIndex;
use crate::domain::MatchRecord;
use std::cmp::Ordering;

/// Absorbs float noise so that a rate sitting exactly on the threshold does not count.
const EPSILON: f64 = 1e-9;

pub const TIMING_THRESHOLD: f64 = 0.05;
pub const ROLE_THRESHOLD: f64 = 0.10;
pub const FORM_THRESHOLD: f64 = 0.10;
pub const CONTEXT_THRESHOLD: f64 = 0.10;

pub const ROLE_MIN_GAMES: u32 = 5;
pub const FORM_WINDOW: usize = 10;
pub const FORM_MIN_GAMES: u32 = 10;

pub const HIGH_DEATHS: f64 = 8.0;
pub const ASSIST_TO_KILL_RATIO: f64 = 1.5;

pub const TOP_PATTERNS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternCategory {
    Timing,
    Combat,
    Role,
    Form,
    Context,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Strength,
    Weakness,
}

impl PatternCategory {
    pub fn confidence(self, direction: Direction) -> f64 {
        match (self, direction) {
            (PatternCategory::Timing, _) => 0.8,
            (PatternCategory::Combat, _) => 0.9,
            (PatternCategory::Role, Direction::Strength) => 0.9,
            (PatternCategory::Role, Direction::Weakness) => 0.8,
            (PatternCategory::Form, _) => 0.7,
            (PatternCategory::Context, _) => 0.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub category: PatternCategory,
    pub direction: Direction,
    /// Bucket label or check name the pattern is about.
    pub subject: String,
    pub description: String,
    pub confidence: f64,
    pub sample_size: u32,
    pub recommendation: String,
    /// Measured value (win rate, or average for combat checks).
    pub observed: f64,
    /// What `observed` was compared against.
    pub reference: f64,
}

impl Pattern {
    fn new(
        category: PatternCategory,
        direction: Direction,
        subject: &str,
        sample_size: u32,
        observed: f64,
        reference: f64,
    ) -> Self {
        Pattern {
            category,
            direction,
            subject: subject.to_string(),
            description: describe(category, direction, subject),
            confidence: category.confidence(direction),
            sample_size,
            recommendation: recommend(category, direction, subject),
            observed,
            reference,
        }
    }
}

fn classify(rate: f64, reference: f64, threshold: f64) -> Option<Direction> {
    let delta = rate - reference;
    if delta > threshold + EPSILON {
        Some(Direction::Strength)
    } else if delta < -(threshold + EPSILON) {
        Some(Direction::Weakness)
    } else {
        None
    }
}

fn duration_range(label: &str) -> &'static str {
    match label {
        buckets::SHORT => "under 30 minutes",
        buckets::MEDIUM => "30 to 40 minutes",
        _ => "40 minutes or more",
    }
}

fn describe(category: PatternCategory, direction: Direction, subject: &str) -> String {
    use Direction::*;
    use PatternCategory::*;

    match (category, direction, subject) {
        (Timing, Strength, _) => {
            format!("Wins more often in {} games ({})", subject, duration_range(subject))
        }
        (Timing, Weakness, _) => {
            format!("Loses more often in {} games ({})", subject, duration_range(subject))
        }
        (Combat, _, DEATHS_CHECK) => "Dies more than 8 times per game on average".to_string(),
        (Combat, _, _) => "Assists outnumber kills by more than 1.5 to 1".to_string(),
        (Role, Strength, _) => format!("Above baseline on {} heroes", subject),
        (Role, Weakness, _) => format!("Below baseline on {} heroes", subject),
        (Form, Strength, _) => "Recent matches are going better than usual".to_string(),
        (Form, Weakness, _) => "Recent matches are going worse than usual".to_string(),
        (Context, Strength, _) => format!("Wins more in {} games", subject),
        (Context, Weakness, _) => format!("Wins less in {} games", subject),
    }
}

fn recommend(category: PatternCategory, direction: Direction, subject: &str) -> String {
    use Direction::*;
    use PatternCategory::*;

    let text = match (category, direction, subject) {
        (Timing, Strength, buckets::SHORT) => "Focus on early game aggression and tempo",
        (Timing, Weakness, buckets::SHORT) => {
            "Play safer in the early game and draft to survive the first 30 minutes"
        }
        (Timing, Strength, buckets::MEDIUM) => {
            "Convert your mid-game leads into objectives before the enemy scales"
        }
        (Timing, Weakness, buckets::MEDIUM) => "Improve mid-game rotations and objective control",
        (Timing, Strength, _) => "Draft scaling heroes and play for the late game",
        (Timing, Weakness, _) => "Close games out earlier and sharpen late-game decision making",
        (Combat, _, DEATHS_CHECK) => "Work on positioning and map awareness to die less",
        (Combat, _, _) => "Lean into team fights with initiators and supports",
        (Role, Strength, _) => return format!("Prioritize {} heroes when drafting", subject),
        (Role, Weakness, _) => {
            return format!("Practice {} heroes outside ranked before relying on them", subject)
        }
        (Form, Strength, _) => "Keep queueing while in form and stick to your current hero pool",
        (Form, Weakness, _) => "Take a break or review recent replays before the next session",
        (Context, Strength, buckets::PARTY) => "Queue with your party when possible",
        (Context, Weakness, buckets::PARTY) => "Favor solo queue for climbing",
        (Context, Strength, _) => "Keep ranked as your main queue",
        (Context, Weakness, _) => "Warm up in unranked before ranked sessions",
    };
    text.to_string()
}

const DEATHS_CHECK: &str = "deaths";
const ASSISTS_CHECK: &str = "assists";

pub struct PatternDetector;

impl PatternDetector {
    /// Runs every category in order: timing, combat, role, form, context.
    ///
    /// Records must be newest first; the form check reads the leading ones.
    pub fn detect(records: &[MatchRecord], heroes: &HeroIndex) -> Vec<Pattern> {
        let Some(baseline) = StatsAggregator::overall(records).win_rate() else {
            return Vec::new();
        };

        let timing = StatsAggregator::aggregate(records, Discriminator::Duration);
        let roles = StatsAggregator::aggregate(records, Discriminator::Role(heroes));
        let recent = StatsAggregator::aggregate(records, Discriminator::Recent(FORM_WINDOW));
        let party = StatsAggregator::aggregate(records, Discriminator::Party);
        let lobby = StatsAggregator::aggregate(records, Discriminator::Lobby);

        let mut patterns = Self::timing(baseline, &timing);
        patterns.extend(Self::combat(records));
        patterns.extend(Self::role(baseline, &roles));
        patterns.extend(Self::form(baseline, recent.get(buckets::RECENT)));
        patterns.extend(Self::context(
            (buckets::PARTY, party.get(buckets::PARTY)),
            (buckets::SOLO, party.get(buckets::SOLO)),
        ));
        patterns.extend(Self::context(
            (buckets::RANKED, lobby.get(buckets::RANKED)),
            (buckets::UNRANKED, lobby.get(buckets::UNRANKED)),
        ));
        patterns
    }

    pub fn timing(baseline: f64, buckets: &BucketMap) -> Vec<Pattern> {
        buckets
            .iter()
            .filter_map(|bucket| {
                let rate = bucket.stats.win_rate()?;
                let direction = classify(rate, baseline, TIMING_THRESHOLD)?;
                Some(Pattern::new(
                    PatternCategory::Timing,
                    direction,
                    &bucket.label,
                    bucket.stats.games,
                    rate,
                    baseline,
                ))
            })
            .collect()
    }

    /// Absolute checks on raw averages over every record.
    pub fn combat(records: &[MatchRecord]) -> Vec<Pattern> {
        if records.is_empty() {
            return Vec::new();
        }
        let games = records.len() as f64;
        let sample = records.len() as u32;
        let average = |f: fn(&MatchRecord) -> u32| {
            records.iter().map(|r| f64::from(f(r))).sum::<f64>() / games
        };

        let avg_kills = average(|r| r.kills);
        let avg_deaths = average(|r| r.deaths);
        let avg_assists = average(|r| r.assists);

        let mut patterns = Vec::new();
        if avg_deaths > HIGH_DEATHS {
            patterns.push(Pattern::new(
                PatternCategory::Combat,
                Direction::Weakness,
                DEATHS_CHECK,
                sample,
                avg_deaths,
                HIGH_DEATHS,
            ));
        }
        let assist_bar = avg_kills * ASSIST_TO_KILL_RATIO;
        if avg_assists > assist_bar {
            patterns.push(Pattern::new(
                PatternCategory::Combat,
                Direction::Strength,
                ASSISTS_CHECK,
                sample,
                avg_assists,
                assist_bar,
            ));
        }
        patterns
    }

    /// Role buckets, best win rate first.
    pub fn role(baseline: f64, buckets: &BucketMap) -> Vec<Pattern> {
        let mut rated: Vec<(&str, BucketStats, f64)> = buckets
            .iter()
            .filter(|b| b.stats.games >= ROLE_MIN_GAMES)
            .filter_map(|b| b.stats.win_rate().map(|rate| (b.label.as_str(), b.stats, rate)))
            .collect();
        rated.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(Ordering::Equal));

        rated
            .into_iter()
            .filter_map(|(label, stats, rate)| {
                let direction = classify(rate, baseline, ROLE_THRESHOLD)?;
                Some(Pattern::new(
                    PatternCategory::Role,
                    direction,
                    label,
                    stats.games,
                    rate,
                    baseline,
                ))
            })
            .collect()
    }

    pub fn form(baseline: f64, recent: BucketStats) -> Option<Pattern> {
        if recent.games < FORM_MIN_GAMES {
            return None;
        }
        let rate = recent.win_rate()?;
        let direction = classify(rate, baseline, FORM_THRESHOLD)?;
        Some(Pattern::new(
            PatternCategory::Form,
            direction,
            buckets::RECENT,
            recent.games,
            rate,
            baseline,
        ))
    }

    /// Compares two complementary buckets with each other.
    ///
    /// Direction is from the first bucket's point of view; the sample is the
    /// smaller of the two.
    pub fn context(
        (label, stats): (&str, BucketStats),
        (_, other): (&str, BucketStats),
    ) -> Option<Pattern> {
        let rate = stats.win_rate()?;
        let other_rate = other.win_rate()?;
        let direction = classify(rate, other_rate, CONTEXT_THRESHOLD)?;
        Some(Pattern::new(
            PatternCategory::Context,
            direction,
            label,
            stats.games.min(other.games),
            rate,
            other_rate,
        ))
    }

    /// Highest confidence first; equal confidence keeps generation order.
    pub fn top_patterns(patterns: &[Pattern], n: usize) -> Vec<Pattern> {
        let mut sorted = patterns.to_vec();
        sorted.sort_by(|a, b| b.confidence.partial_cmp(&a.confidence).unwrap_or(Ordering::Equal));
        sorted.truncate(n);
        sorted
    }
}
