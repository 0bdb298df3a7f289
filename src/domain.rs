//! Records shared by the provider, the cache, and the analyses.
//!
//! Everything here is plain data obtained from the statistics provider and
//! never mutated afterwards.

use std::collections::HashMap;
use std::fmt;

pub type HeroId = u32;
pub type ItemId = u32;
pub type AbilityId = u32;
pub type AccountId = u32;
pub type MatchId = u64;

/// Lobby type the provider uses for ranked matchmaking.
pub const RANKED_LOBBY: u32 = 7;

/// Player slots below this value sit on the Radiant side.
const DIRE_SLOT_START: u32 = 128;

pub fn won_from_slot(player_slot: u32, radiant_win: bool) -> bool {
    (player_slot < DIRE_SLOT_START) == radiant_win
}

/// One match from a player's history, seen from that player's side.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecord {
    pub match_id: MatchId,
    pub hero_id: HeroId,
    pub duration_secs: u32,
    pub start_time: i64,
    pub player_slot: u32,
    pub radiant_win: bool,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub lobby_type: u32,
    pub party_size: Option<u32>,
    pub items: Vec<ItemId>,
}

impl MatchRecord {
    pub fn won(&self) -> bool {
        won_from_slot(self.player_slot, self.radiant_win)
    }

    pub fn is_ranked(&self) -> bool {
        self.lobby_type == RANKED_LOBBY
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeroRecord {
    pub id: HeroId,
    pub name: String,
    pub localized_name: String,
    pub roles: Vec<String>,
    pub primary_attr: String,
    pub attack_type: String,
}

/// Skill tier used to segment meta statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bracket {
    Herald,
    Guardian,
    Crusader,
    Archon,
    Legend,
    Ancient,
    Divine,
    Immortal,
    Pro,
}

impl Bracket {
    pub const ALL: [Bracket; 9] = [
        Bracket::Herald,
        Bracket::Guardian,
        Bracket::Crusader,
        Bracket::Archon,
        Bracket::Legend,
        Bracket::Ancient,
        Bracket::Divine,
        Bracket::Immortal,
        Bracket::Pro,
    ];

    /// Provider key prefix: "1" through "8", or "pro".
    pub fn key(self) -> &'static str {
        match self {
            Bracket::Herald => "1",
            Bracket::Guardian => "2",
            Bracket::Crusader => "3",
            Bracket::Archon => "4",
            Bracket::Legend => "5",
            Bracket::Ancient => "6",
            Bracket::Divine => "7",
            Bracket::Immortal => "8",
            Bracket::Pro => "pro",
        }
    }
}

impl fmt::Display for Bracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    PickRate,
    WinRate,
}

/// Per-bracket meta numbers for one hero, all in percent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeroMetaStat {
    pub hero_id: HeroId,
    values: HashMap<(Bracket, Metric), f64>,
}

impl HeroMetaStat {
    pub fn new(hero_id: HeroId) -> Self {
        HeroMetaStat {
            hero_id,
            values: HashMap::new(),
        }
    }

    #[cfg(test)]
    pub fn with(mut self, bracket: Bracket, metric: Metric, value: f64) -> Self {
        self.set(bracket, metric, value);
        self
    }

    pub fn set(&mut self, bracket: Bracket, metric: Metric, value: f64) {
        self.values.insert((bracket, metric), value);
    }

    pub fn get(&self, bracket: Bracket, metric: Metric) -> Option<f64> {
        self.values.get(&(bracket, metric)).copied()
    }

    pub fn pick_rate(&self, bracket: Bracket) -> Option<f64> {
        self.get(bracket, Metric::PickRate)
    }

    pub fn win_rate(&self, bracket: Bracket) -> Option<f64> {
        self.get(bracket, Metric::WinRate)
    }
}

/// A player's lifetime record on one hero.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerHeroStat {
    pub hero_id: HeroId,
    pub games: u32,
    pub wins: u32,
}

impl PlayerHeroStat {
    pub fn win_rate(&self) -> Option<f64> {
        ratio(self.wins, self.games)
    }
}

/// Aggregate record of one hero against an opponent hero.
#[derive(Debug, Clone, PartialEq)]
pub struct HeroMatchup {
    pub hero_id: HeroId,
    pub games_played: u32,
    pub wins: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemInfo {
    pub id: ItemId,
    pub display_name: String,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    items: HashMap<ItemId, ItemInfo>,
}

impl ItemCatalog {
    pub fn new(items: impl IntoIterator<Item = ItemInfo>) -> Self {
        ItemCatalog {
            items: items.into_iter().map(|item| (item.id, item)).collect(),
        }
    }

    pub fn get(&self, id: ItemId) -> Option<&ItemInfo> {
        self.items.get(&id)
    }

    pub fn display_name(&self, id: ItemId) -> String {
        self.get(id)
            .map(|item| item.display_name.clone())
            .unwrap_or_else(|| format!("Item ID {}", id))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items ordered by id.
    pub fn sorted(&self) -> Vec<&ItemInfo> {
        let mut items: Vec<&ItemInfo> = self.items.values().collect();
        items.sort_by_key(|item| item.id);
        items
    }
}

/// One participant of a fully detailed match.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerDetail {
    pub match_id: MatchId,
    pub account_id: Option<AccountId>,
    pub player_slot: u32,
    pub hero_id: HeroId,
    pub won: bool,
    pub items: Vec<ItemId>,
    /// Ability learned at each level, in level order.
    pub ability_upgrades: Vec<AbilityId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchDetail {
    pub match_id: MatchId,
    pub radiant_win: bool,
    pub players: Vec<PlayerDetail>,
}

impl MatchDetail {
    pub fn player(&self, account_id: AccountId) -> Option<&PlayerDetail> {
        self.players
            .iter()
            .find(|p| p.account_id == Some(account_id))
    }
}

/// One row of a name search, best match first.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSearchHit {
    pub account_id: AccountId,
    pub persona_name: String,
}

/// Public profile fields. Private or unknown accounts leave most of them empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerProfile {
    pub account_id: AccountId,
    pub persona_name: Option<String>,
    pub steam_id: Option<String>,
    pub profile_url: Option<String>,
    pub country_code: Option<String>,
    pub plus: bool,
    /// RFC 3339 timestamp as sent by the provider.
    pub last_login: Option<String>,
    pub rank_tier: Option<u32>,
}

/// wins / games, undefined when there are no games.
pub fn ratio(wins: u32, games: u32) -> Option<f64> {
    if games == 0 {
        None
    } else {
        Some(f64::from(wins) / f64::from(games))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, true, true)]
    #[case(4, false, false)]
    #[case(128, false, true)]
    #[case(132, true, false)]
    fn resolves_winner_from_slot(
        #[case] slot: u32,
        #[case] radiant_win: bool,
        #[case] expected: bool,
    ) {
        assert_eq!(won_from_slot(slot, radiant_win), expected);
    }

    #[test]
    fn meta_stat_lookup_is_per_bracket_and_metric() {
        let stat = HeroMetaStat::new(1)
            .with(Bracket::Divine, Metric::WinRate, 53.0)
            .with(Bracket::Divine, Metric::PickRate, 20.0);

        assert_eq!(stat.win_rate(Bracket::Divine), Some(53.0));
        assert_eq!(stat.pick_rate(Bracket::Divine), Some(20.0));
        assert_eq!(stat.win_rate(Bracket::Pro), None);
    }

    #[test]
    fn ratio_is_absent_without_games() {
        assert_eq!(ratio(0, 0), None);
        assert_eq!(ratio(3, 5), Some(0.6));
    }

    #[test]
    fn unknown_items_fall_back_to_id() {
        let catalog = ItemCatalog::new(vec![ItemInfo {
            id: 1,
            display_name: "Blink Dagger".to_string(),
            category: Some("component".to_string()),
        }]);
        assert_eq!(catalog.display_name(1), "Blink Dagger");
        assert_eq!(catalog.display_name(999), "Item ID 999");
    }
}
