use crate::domain::{AbilityId, PlayerDetail};
use std::collections::BTreeMap;

pub const MAX_HERO_LEVEL: usize = 25;

#[derive(Debug, Clone, PartialEq)]
pub struct LevelChoice {
    pub level: usize,
    pub ability_id: AbilityId,
    pub count: u32,
    /// Share of the sampled matches that took this ability at this level.
    pub share: f64,
}

/// Most common skill pick per level. Ties go to the lowest ability id.
///
/// Samples without any upgrades are ignored.
pub fn most_common_build(samples: &[PlayerDetail]) -> Vec<LevelChoice> {
    let with_upgrades: Vec<&PlayerDetail> = samples
        .iter()
        .filter(|s| !s.ability_upgrades.is_empty())
        .collect();
    if with_upgrades.is_empty() {
        return Vec::new();
    }

    let mut by_level: BTreeMap<usize, BTreeMap<AbilityId, u32>> = BTreeMap::new();
    for sample in &with_upgrades {
        for (idx, ability_id) in sample.ability_upgrades.iter().enumerate() {
            let level = idx + 1;
            if level > MAX_HERO_LEVEL {
                break;
            }
            *by_level.entry(level).or_default().entry(*ability_id).or_insert(0) += 1;
        }
    }

    let sample_size = with_upgrades.len() as f64;
    by_level
        .into_iter()
        .filter_map(|(level, counts)| {
            let mut best: Option<(AbilityId, u32)> = None;
            for (ability_id, count) in counts {
                if best.map_or(true, |(_, top)| count > top) {
                    best = Some((ability_id, count));
                }
            }
            best.map(|(ability_id, count)| LevelChoice {
                level,
                ability_id,
                count,
                share: f64::from(count) / sample_size,
            })
        })
        .collect()
}

/// Number of samples that actually carried an ability build.
pub fn samples_with_builds(samples: &[PlayerDetail]) -> usize {
    samples.iter().filter(|s| !s.ability_upgrades.is_empty()).count()
}
