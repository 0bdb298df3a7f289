//! Wires provider, reference cache and analyses together, one method per command.

use crate::analysis::abilities::{self, LevelChoice};
use crate::analysis::buckets::{BucketMap, BucketStats, Discriminator, StatsAggregator};
use crate::analysis::draft::{
    team_roles, DraftState, HeroSuggestionScorer, ScoredHero, PLAYER_MIN_GAMES,
};
use crate::analysis::hero_pool::{self, HeroPool, RecentSummary};
use crate::analysis::items::{self, ItemBuildReport};
use crate::analysis::matchups::{self, MatchupRanking};
use crate::analysis::patterns::{Pattern, PatternDetector, TOP_PATTERNS};
use crate::api::{DataProvider, MatchQuery};
use crate::cache::{HeroIndex, ReferenceCache};
use crate::domain::{
    AccountId, HeroId, ItemCatalog, MatchRecord, PlayerProfile, PlayerSearchHit,
};
use crate::error::AppError;
use crate::sampling::{self, Sample, SkippedMatch};
use indicatif::ProgressBar;
use tracing::{info, warn};

/// Hero-specific history fetched before sampling match details.
pub const HERO_MATCH_LIMIT: usize = 20;

#[derive(Debug, Clone)]
pub struct RecentReport {
    pub records: Vec<MatchRecord>,
    pub summary: RecentSummary,
}

#[derive(Debug, Clone)]
pub struct PatternReport {
    pub baseline: BucketStats,
    pub timing: BucketMap,
    pub roles: BucketMap,
    pub patterns: Vec<Pattern>,
    pub top: Vec<Pattern>,
}

#[derive(Debug, Clone)]
pub struct AbilityReport {
    pub hero_id: HeroId,
    pub sample_size: usize,
    pub skipped: Vec<SkippedMatch>,
    pub levels: Vec<LevelChoice>,
}

#[derive(Debug, Clone)]
pub struct ItemReport {
    pub hero_id: HeroId,
    pub skipped: Vec<SkippedMatch>,
    pub builds: ItemBuildReport,
}

#[derive(Debug, Clone)]
pub struct DraftReport {
    pub draft: DraftState,
    pub ally_roles: Vec<String>,
    pub suggestions: Vec<ScoredHero>,
    /// A player was given but no usable history came back.
    pub player_history_missing: bool,
}

#[derive(Debug, Clone)]
pub struct PlayerSearchReport {
    /// Closest match; its profile is the one fetched.
    pub hit: PlayerSearchHit,
    pub profile: PlayerProfile,
    pub other_hits: usize,
}

pub struct InsightService<'a, P: DataProvider> {
    provider: &'a P,
    cache: &'a ReferenceCache,
}

impl<'a, P: DataProvider> InsightService<'a, P> {
    pub fn new(provider: &'a P, cache: &'a ReferenceCache) -> Self {
        InsightService { provider, cache }
    }

    pub fn heroes(&self) -> Result<&'a HeroIndex, AppError> {
        let heroes = self.cache.heroes(self.provider)?;
        if heroes.is_empty() {
            return Err(AppError::DataUnavailable("hero list is empty".to_string()));
        }
        Ok(heroes)
    }

    pub fn items(&self) -> Result<&'a ItemCatalog, AppError> {
        let items = self.cache.items(self.provider)?;
        if items.is_empty() {
            return Err(AppError::DataUnavailable("item catalog is empty".to_string()));
        }
        Ok(items)
    }

    pub fn search_player(&self, steam_name: &str) -> Result<PlayerSearchReport, AppError> {
        let mut hits = self.provider.fetch_player_search(steam_name)?;
        if hits.is_empty() {
            return Err(AppError::DataUnavailable(format!(
                "no players found with the name \"{}\"",
                steam_name
            )));
        }

        let hit = hits.remove(0);
        info!(account_id = hit.account_id, other_hits = hits.len(), "Resolved player search");
        let profile = self.provider.fetch_player_profile(hit.account_id)?;
        Ok(PlayerSearchReport {
            hit,
            profile,
            other_hits: hits.len(),
        })
    }

    pub fn player_heroes(&self, account_id: AccountId) -> Result<HeroPool, AppError> {
        let stats = self.provider.fetch_player_heroes(account_id)?;
        if stats.is_empty() {
            return Err(AppError::DataUnavailable(format!(
                "no hero statistics for player {}",
                account_id
            )));
        }
        Ok(hero_pool::hero_pool(&stats))
    }

    pub fn recent(&self, account_id: AccountId, limit: usize) -> Result<RecentReport, AppError> {
        let records = self.player_matches(account_id, &MatchQuery::recent(limit))?;
        let summary = hero_pool::summarize_recent(&records);
        Ok(RecentReport { records, summary })
    }

    pub fn patterns(&self, account_id: AccountId, limit: usize) -> Result<PatternReport, AppError> {
        let heroes = self.heroes()?;
        let records = self.player_matches(account_id, &MatchQuery::recent(limit))?;

        let patterns = PatternDetector::detect(&records, heroes);
        let top = PatternDetector::top_patterns(&patterns, TOP_PATTERNS);
        info!(
            account_id,
            matches = records.len(),
            patterns = patterns.len(),
            "Detected performance patterns"
        );

        Ok(PatternReport {
            baseline: StatsAggregator::overall(&records),
            timing: StatsAggregator::aggregate(&records, Discriminator::Duration),
            roles: StatsAggregator::aggregate(&records, Discriminator::Role(heroes)),
            patterns,
            top,
        })
    }

    pub fn ability_builds(
        &self,
        account_id: AccountId,
        hero_id: HeroId,
        progress: &ProgressBar,
    ) -> Result<AbilityReport, AppError> {
        let sample = self.sample_hero_matches(account_id, hero_id, progress)?;
        let details = sample.details();
        if abilities::samples_with_builds(&details) == 0 {
            return Err(AppError::DataUnavailable(format!(
                "no detailed ability build data for hero {}",
                hero_id
            )));
        }

        Ok(AbilityReport {
            hero_id,
            sample_size: abilities::samples_with_builds(&details),
            skipped: sample.skipped(),
            levels: abilities::most_common_build(&details),
        })
    }

    pub fn matchups(&self, hero_id: HeroId) -> Result<MatchupRanking, AppError> {
        let matchups = self.provider.fetch_hero_matchups(hero_id)?;
        if matchups.is_empty() {
            return Err(AppError::DataUnavailable(format!(
                "no matchup data for hero {}",
                hero_id
            )));
        }
        Ok(matchups::rank_matchups(&matchups))
    }

    pub fn item_builds(
        &self,
        account_id: AccountId,
        hero_id: HeroId,
        progress: &ProgressBar,
    ) -> Result<ItemReport, AppError> {
        let catalog = self.cache.items(self.provider)?;
        let sample = self.sample_hero_matches(account_id, hero_id, progress)?;
        let details = sample.details();
        if details.is_empty() {
            return Err(AppError::DataUnavailable(format!(
                "no detailed item build data for hero {}",
                hero_id
            )));
        }

        Ok(ItemReport {
            hero_id,
            skipped: sample.skipped(),
            builds: items::analyze_item_builds(&details, catalog),
        })
    }

    pub fn draft(
        &self,
        draft: DraftState,
        player: Option<AccountId>,
    ) -> Result<DraftReport, AppError> {
        let heroes = self.heroes()?;
        let meta = self.cache.meta(self.provider)?;
        if meta.is_empty() {
            return Err(AppError::DataUnavailable("hero meta stats are empty".to_string()));
        }

        // Personal history only sharpens the ranking, so a failure here is not fatal.
        let player_stats = player.and_then(|account_id| {
            match self.provider.fetch_player_heroes(account_id) {
                Ok(stats) => Some(stats),
                Err(error) => {
                    warn!(account_id, %error, "Could not fetch player hero data");
                    None
                }
            }
        });
        let player_history_missing = player.is_some()
            && player_stats
                .as_ref()
                .map_or(true, |stats| stats.iter().all(|s| s.games < PLAYER_MIN_GAMES));

        let scorer = HeroSuggestionScorer::new(heroes, meta);
        let suggestions = scorer.suggest(&draft, player_stats.as_deref());

        Ok(DraftReport {
            ally_roles: team_roles(heroes, &draft.ally_heroes),
            draft,
            suggestions,
            player_history_missing,
        })
    }

    fn player_matches(
        &self,
        account_id: AccountId,
        query: &MatchQuery,
    ) -> Result<Vec<MatchRecord>, AppError> {
        let records = self.provider.fetch_player_matches(account_id, query)?;
        if records.is_empty() {
            return Err(AppError::DataUnavailable(format!(
                "no matches found for player {}",
                account_id
            )));
        }
        Ok(records)
    }

    fn sample_hero_matches(
        &self,
        account_id: AccountId,
        hero_id: HeroId,
        progress: &ProgressBar,
    ) -> Result<Sample, AppError> {
        let records =
            self.player_matches(account_id, &MatchQuery::for_hero(hero_id, HERO_MATCH_LIMIT))?;
        progress.set_length(records.len().min(sampling::DETAIL_SAMPLE_LIMIT) as u64);

        let sample = sampling::sample_details(self.provider, account_id, &records, progress);
        progress.finish_and_clear();
        info!(
            account_id,
            hero_id,
            collected = sample.details().len(),
            skipped = sample.skipped().len(),
            "Sampled match details"
        );
        Ok(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::items::BuildTendency;
    use crate::analysis::patterns::PatternCategory;
    use crate::domain::{Bracket, HeroMatchup, HeroMetaStat, Metric, PlayerHeroStat};
    use crate::testing::{match_detail, player_detail, record, records_with, FakeProvider};

    fn heroes() -> Vec<crate::domain::HeroRecord> {
        vec![
            FakeProvider::hero(1, "Axe", &["Initiator", "Durable"]),
            FakeProvider::hero(2, "Lion", &["Support", "Nuker"]),
            FakeProvider::hero(3, "Juggernaut", &["Carry"]),
        ]
    }

    fn hit(account_id: AccountId, name: &str) -> PlayerSearchHit {
        PlayerSearchHit {
            account_id,
            persona_name: name.to_string(),
        }
    }

    #[test]
    fn search_resolves_first_hit_profile() {
        let provider = FakeProvider::default()
            .with_search_hits(vec![hit(70388657, "Dendi"), hit(1, "Dendi fan")])
            .with_profile(PlayerProfile {
                account_id: 70388657,
                persona_name: Some("Dendi".to_string()),
                country_code: Some("UA".to_string()),
                plus: true,
                ..PlayerProfile::default()
            });
        let cache = ReferenceCache::new();
        let service = InsightService::new(&provider, &cache);

        let report = service.search_player("Dendi").unwrap();

        assert_eq!(report.hit.account_id, 70388657);
        assert_eq!(report.profile.country_code.as_deref(), Some("UA"));
        assert!(report.profile.plus);
        assert_eq!(report.other_hits, 1);
        assert_eq!(provider.calls("profile"), 1);
    }

    #[test]
    fn search_without_hits_is_data_unavailable() {
        let provider = FakeProvider::default();
        let cache = ReferenceCache::new();
        let service = InsightService::new(&provider, &cache);

        let result = service.search_player("nobody");

        assert!(matches!(result, Err(AppError::DataUnavailable(_))));
        assert_eq!(provider.calls("profile"), 0);
    }

    #[test]
    fn empty_match_history_is_data_unavailable() {
        let provider = FakeProvider::default();
        let cache = ReferenceCache::new();
        let service = InsightService::new(&provider, &cache);

        let result = service.recent(7, 20);
        assert!(matches!(result, Err(AppError::DataUnavailable(_))));
    }

    #[test]
    fn provider_failure_surfaces() {
        let provider = FakeProvider::default().failing("matches");
        let cache = ReferenceCache::new();
        let service = InsightService::new(&provider, &cache);

        let error = service.recent(7, 20).unwrap_err();
        assert!(error.is_provider_failure());
    }

    #[test]
    fn pattern_report_uses_cached_heroes() {
        let provider = FakeProvider::default()
            .with_heroes(heroes())
            .with_matches(records_with(10, 2, |r| r.hero(2).duration(1500)));
        let cache = ReferenceCache::new();
        let service = InsightService::new(&provider, &cache);

        let report = service.patterns(7, 50).unwrap();
        service.patterns(7, 50).unwrap();

        assert_eq!(report.baseline.games, 12);
        assert_eq!(report.roles.get("Support").games, 12);
        assert!(report
            .patterns
            .iter()
            .any(|p| p.category == PatternCategory::Form));
        assert!(report.top.len() <= TOP_PATTERNS);
        assert_eq!(provider.calls("heroes"), 1);
        assert_eq!(provider.calls("matches"), 2);
    }

    #[test]
    fn item_builds_tolerate_failed_details() {
        let matches: Vec<_> = (1..=3).map(|id| record(id).hero(3).build()).collect();
        let provider = FakeProvider::default()
            .with_items(vec![FakeProvider::item(145, "Battle Fury")])
            .with_matches(matches)
            .with_detail(match_detail(vec![player_detail(1, 7, true, &[145])]))
            .with_detail(match_detail(vec![player_detail(3, 7, false, &[145])]))
            .failing_detail(2);
        let cache = ReferenceCache::new();
        let service = InsightService::new(&provider, &cache);

        let report = service.item_builds(7, 3, &ProgressBar::hidden()).unwrap();

        let skipped: Vec<_> = report.skipped.iter().map(|m| m.match_id).collect();
        assert_eq!(skipped, vec![2]);
        assert_eq!(report.builds.sample_size, 2);
        assert_eq!(report.builds.most_frequent[0].name, "Battle Fury");
        assert_eq!(report.builds.tendency, BuildTendency::Farming);
    }

    #[test]
    fn ability_builds_need_upgrades() {
        let provider = FakeProvider::default()
            .with_matches(vec![record(1).hero(3).build()])
            .with_detail(match_detail(vec![player_detail(1, 7, true, &[])]));
        let cache = ReferenceCache::new();
        let service = InsightService::new(&provider, &cache);

        let result = service.ability_builds(7, 3, &ProgressBar::hidden());
        assert!(matches!(result, Err(AppError::DataUnavailable(_))));
    }

    #[test]
    fn matchups_ranked_from_provider() {
        let provider = FakeProvider::default().with_matchups(vec![
            HeroMatchup { hero_id: 2, games_played: 60, wins: 40 },
            HeroMatchup { hero_id: 3, games_played: 40, wins: 30 },
        ]);
        let cache = ReferenceCache::new();
        let service = InsightService::new(&provider, &cache);

        let ranking = service.matchups(1).unwrap();
        assert_eq!(ranking.best.len(), 1);
        assert_eq!(ranking.best[0].opponent, 2);
    }

    #[test]
    fn draft_survives_missing_player_history() {
        let provider = FakeProvider::default()
            .with_heroes(heroes())
            .with_meta(vec![HeroMetaStat::new(2)
                .with(Bracket::Divine, Metric::WinRate, 53.0)
                .with(Bracket::Divine, Metric::PickRate, 20.0)])
            .failing("player_heroes");
        let cache = ReferenceCache::new();
        let service = InsightService::new(&provider, &cache);

        let draft = DraftState {
            ally_heroes: vec![1],
            enemy_heroes: vec![3],
        };
        let report = service.draft(draft, Some(7)).unwrap();

        assert!(report.player_history_missing);
        assert_eq!(report.ally_roles, vec!["Initiator", "Durable"]);
        assert_eq!(report.suggestions.len(), 1);
        assert_eq!(report.suggestions[0].score, 65);
    }

    #[test]
    fn draft_uses_player_history() {
        let provider = FakeProvider::default()
            .with_heroes(heroes())
            .with_meta(vec![HeroMetaStat::new(2), HeroMetaStat::new(3)])
            .with_player_heroes(vec![PlayerHeroStat { hero_id: 3, games: 10, wins: 8 }]);
        let cache = ReferenceCache::new();
        let service = InsightService::new(&provider, &cache);

        let report = service.draft(DraftState::default(), Some(7)).unwrap();

        assert!(!report.player_history_missing);
        assert_eq!(report.suggestions[0].hero.id, 3);
        assert_eq!(report.suggestions[0].score, 25 + 30);
    }
}
