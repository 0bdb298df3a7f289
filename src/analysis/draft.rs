use crate::cache::{HeroIndex, MetaIndex};
use crate::domain::{Bracket, HeroId, HeroRecord, PlayerHeroStat};
use std::fmt;

/// Bracket whose meta numbers drive the suggestions.
pub const META_BRACKET: Bracket = Bracket::Divine;

/// Roles a balanced lineup is expected to cover.
pub const CORE_ROLES: [&str; 5] = ["Carry", "Support", "Initiator", "Durable", "Nuker"];

pub const META_WIN_RATE_THRESHOLD: f64 = 52.0;
pub const POPULAR_PICK_RATE_THRESHOLD: f64 = 15.0;
pub const PLAYER_WIN_RATE_THRESHOLD: f64 = 0.55;
pub const PLAYER_MIN_GAMES: u32 = 3;
pub const PLAYER_EXPERIENCE_GAMES: u32 = 10;
pub const MAX_SUGGESTIONS: usize = 10;

const META_STRENGTH_POINTS: u32 = 20;
const ROLE_FIT_POINTS: u32 = 25;
const COUNTER_POINTS: u32 = 10;
const PLAYER_WIN_RATE_POINTS: u32 = 30;
const PLAYER_EXPERIENCE_POINTS: u32 = 15;
const POPULAR_PICK_POINTS: u32 = 10;

/// Why a hero earned points, in the order the points were awarded.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreReason {
    MetaStrength { win_rate: f64 },
    FillsRole { role: String },
    /// Awarded whenever the enemy has picked; no matchup data is consulted.
    CounterPotential,
    PlayerWinRate { win_rate: f64, games: u32 },
    PlayerExperience { games: u32 },
    PopularPick,
}

impl fmt::Display for ScoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreReason::MetaStrength { win_rate } => {
                write!(f, "Strong in meta ({:.1}% win rate)", win_rate)
            }
            ScoreReason::FillsRole { role } => write!(f, "Fills needed role: {}", role),
            ScoreReason::CounterPotential => write!(f, "Has counter potential vs enemy picks"),
            ScoreReason::PlayerWinRate { win_rate, games } => write!(
                f,
                "Player has {:.1}% win rate ({} games)",
                win_rate * 100.0,
                games
            ),
            ScoreReason::PlayerExperience { games } => {
                write!(f, "Player experienced ({} games)", games)
            }
            ScoreReason::PopularPick => write!(f, "Popular pick in high MMR"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredHero {
    pub hero: HeroRecord,
    pub score: u32,
    pub reasons: Vec<ScoreReason>,
}

#[derive(Debug, Clone, Default)]
pub struct DraftState {
    pub ally_heroes: Vec<HeroId>,
    pub enemy_heroes: Vec<HeroId>,
}

impl DraftState {
    pub fn is_picked(&self, hero_id: HeroId) -> bool {
        self.ally_heroes.contains(&hero_id) || self.enemy_heroes.contains(&hero_id)
    }
}

/// Union of the roles covered by the given heroes. Unknown ids add nothing.
pub fn team_roles(heroes: &HeroIndex, team: &[HeroId]) -> Vec<String> {
    let mut roles: Vec<String> = Vec::new();
    for hero in team.iter().filter_map(|id| heroes.get(*id)) {
        for role in &hero.roles {
            if !roles.contains(role) {
                roles.push(role.clone());
            }
        }
    }
    roles
}

pub struct HeroSuggestionScorer<'a> {
    heroes: &'a HeroIndex,
    meta: &'a MetaIndex,
}

impl<'a> HeroSuggestionScorer<'a> {
    pub fn new(heroes: &'a HeroIndex, meta: &'a MetaIndex) -> Self {
        HeroSuggestionScorer { heroes, meta }
    }

    /// Every unpicked hero, scored, in hero list order.
    pub fn score_all(
        &self,
        draft: &DraftState,
        player_heroes: Option<&[PlayerHeroStat]>,
    ) -> Vec<ScoredHero> {
        let ally_roles = team_roles(self.heroes, &draft.ally_heroes);
        let missing_roles: Vec<&str> = CORE_ROLES
            .iter()
            .copied()
            .filter(|role| !ally_roles.iter().any(|r| r.as_str() == *role))
            .collect();

        let pool: Vec<&PlayerHeroStat> = player_heroes
            .unwrap_or_default()
            .iter()
            .filter(|stat| stat.games >= PLAYER_MIN_GAMES)
            .collect();

        let enemy_has_picks = !draft.enemy_heroes.is_empty();

        self.heroes
            .all()
            .iter()
            .filter(|hero| !draft.is_picked(hero.id))
            .map(|hero| {
                let familiarity = pool.iter().find(|stat| stat.hero_id == hero.id).copied();
                self.score_hero(hero, &missing_roles, enemy_has_picks, familiarity)
            })
            .collect()
    }

    /// Top suggestions, highest score first; ties keep hero list order.
    pub fn suggest(
        &self,
        draft: &DraftState,
        player_heroes: Option<&[PlayerHeroStat]>,
    ) -> Vec<ScoredHero> {
        let mut scored = self.score_all(draft, player_heroes);
        scored.sort_by(|a, b| b.score.cmp(&a.score));
        scored.truncate(MAX_SUGGESTIONS);
        scored
    }

    fn score_hero(
        &self,
        hero: &HeroRecord,
        missing_roles: &[&str],
        enemy_has_picks: bool,
        familiarity: Option<&PlayerHeroStat>,
    ) -> ScoredHero {
        let Some(meta) = self.meta.get(hero.id) else {
            return ScoredHero {
                hero: hero.clone(),
                score: 0,
                reasons: Vec::new(),
            };
        };

        let mut score = 0;
        let mut reasons = Vec::new();

        let meta_win_rate = meta.win_rate(META_BRACKET).unwrap_or(0.0);
        if meta_win_rate > META_WIN_RATE_THRESHOLD {
            score += META_STRENGTH_POINTS;
            reasons.push(ScoreReason::MetaStrength {
                win_rate: meta_win_rate,
            });
        }

        if let Some(role) = hero.roles.iter().find(|r| missing_roles.contains(&r.as_str())) {
            score += ROLE_FIT_POINTS;
            reasons.push(ScoreReason::FillsRole { role: role.clone() });
        }

        if enemy_has_picks {
            score += COUNTER_POINTS;
            reasons.push(ScoreReason::CounterPotential);
        }

        if let Some(stat) = familiarity {
            match stat.win_rate() {
                Some(win_rate) if win_rate > PLAYER_WIN_RATE_THRESHOLD => {
                    score += PLAYER_WIN_RATE_POINTS;
                    reasons.push(ScoreReason::PlayerWinRate {
                        win_rate,
                        games: stat.games,
                    });
                }
                _ if stat.games >= PLAYER_EXPERIENCE_GAMES => {
                    score += PLAYER_EXPERIENCE_POINTS;
                    reasons.push(ScoreReason::PlayerExperience { games: stat.games });
                }
                _ => {}
            }
        }

        let pick_rate = meta.pick_rate(META_BRACKET).unwrap_or(0.0);
        if pick_rate > POPULAR_PICK_RATE_THRESHOLD {
            score += POPULAR_PICK_POINTS;
            reasons.push(ScoreReason::PopularPick);
        }

        ScoredHero {
            hero: hero.clone(),
            score,
            reasons,
        }
    }
}
