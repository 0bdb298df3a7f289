use serde::Deserialize;
use std::collections::HashMap;

// GET /heroes
#[derive(Debug, Deserialize, Clone)]
pub struct HeroDto {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    pub localized_name: String,
    #[serde(default)]
    pub primary_attr: String,
    #[serde(default)]
    pub attack_type: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

// GET /heroStats
// Bracket counts arrive as flat keys such as "7_pick", "7_win", "pro_pick".
#[derive(Debug, Deserialize, Clone)]
pub struct HeroStatsDto {
    pub id: u32,
    #[serde(flatten)]
    pub counters: HashMap<String, serde_json::Value>,
}

// GET /players/{account_id}/matches
#[derive(Debug, Deserialize, Clone)]
pub struct PlayerMatchDto {
    pub match_id: u64,
    pub player_slot: u32,
    #[serde(default)]
    pub radiant_win: Option<bool>,
    pub duration: u32,
    #[serde(default)]
    pub lobby_type: u32,
    pub hero_id: u32,
    pub start_time: i64,
    #[serde(default)]
    pub kills: u32,
    #[serde(default)]
    pub deaths: u32,
    #[serde(default)]
    pub assists: u32,
    #[serde(default)]
    pub party_size: Option<u32>,
    #[serde(flatten)]
    pub slots: ItemSlots,
}

// GET /players/{account_id}/heroes
#[derive(Debug, Deserialize, Clone)]
pub struct PlayerHeroDto {
    pub hero_id: IdRepr,
    pub games: u32,
    pub win: u32,
}

/// Some endpoints send ids as JSON strings.
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum IdRepr {
    Number(u32),
    Text(String),
}

impl IdRepr {
    pub fn value(&self) -> Option<u32> {
        match self {
            IdRepr::Number(id) => Some(*id),
            IdRepr::Text(raw) => raw.trim().parse().ok(),
        }
    }
}

// GET /matches/{match_id}
#[derive(Debug, Deserialize, Clone)]
pub struct MatchDetailDto {
    pub match_id: u64,
    #[serde(default)]
    pub radiant_win: Option<bool>,
    #[serde(default)]
    pub players: Vec<DetailedPlayerDto>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DetailedPlayerDto {
    #[serde(default)]
    pub account_id: Option<u32>,
    pub player_slot: u32,
    pub hero_id: u32,
    #[serde(default)]
    pub ability_upgrades_arr: Option<Vec<u32>>,
    #[serde(flatten)]
    pub slots: ItemSlots,
}

/// Final inventory, slots 0-5. Zero or null means empty.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ItemSlots {
    #[serde(default)]
    pub item_0: Option<u32>,
    #[serde(default)]
    pub item_1: Option<u32>,
    #[serde(default)]
    pub item_2: Option<u32>,
    #[serde(default)]
    pub item_3: Option<u32>,
    #[serde(default)]
    pub item_4: Option<u32>,
    #[serde(default)]
    pub item_5: Option<u32>,
}

impl ItemSlots {
    pub fn filled(&self) -> Vec<u32> {
        [
            self.item_0,
            self.item_1,
            self.item_2,
            self.item_3,
            self.item_4,
            self.item_5,
        ]
        .into_iter()
        .flatten()
        .filter(|id| *id > 0)
        .collect()
    }
}

// GET /heroes/{hero_id}/matchups
#[derive(Debug, Deserialize, Clone)]
pub struct HeroMatchupDto {
    pub hero_id: u32,
    pub games_played: u32,
    pub wins: u32,
}

// GET /constants/items, keyed by internal item name
#[derive(Debug, Deserialize, Clone)]
pub struct ItemDto {
    pub id: u32,
    #[serde(default)]
    pub dname: Option<String>,
    #[serde(default)]
    pub qual: Option<String>,
}

// GET /search?q=<name>
#[derive(Debug, Deserialize, Clone)]
pub struct PlayerSearchDto {
    pub account_id: u32,
    #[serde(default)]
    pub personaname: Option<String>,
}

// GET /players/{account_id}
#[derive(Debug, Deserialize, Clone)]
pub struct PlayerProfileDto {
    #[serde(default)]
    pub profile: Option<ProfileDto>,
    #[serde(default)]
    pub rank_tier: Option<u32>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProfileDto {
    #[serde(default)]
    pub personaname: Option<String>,
    #[serde(default)]
    pub steamid: Option<String>,
    #[serde(default)]
    pub profileurl: Option<String>,
    #[serde(default)]
    pub loccountrycode: Option<String>,
    #[serde(default)]
    pub plus: Option<bool>,
    #[serde(default)]
    pub last_login: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_player_match_with_sparse_fields() {
        let body = r#"{
            "match_id": 7000000001,
            "player_slot": 130,
            "radiant_win": false,
            "duration": 2410,
            "game_mode": 22,
            "lobby_type": 7,
            "hero_id": 14,
            "start_time": 1700000000,
            "kills": 5,
            "deaths": 7,
            "assists": 12,
            "party_size": null,
            "item_0": 1,
            "item_1": 0
        }"#;

        let dto: PlayerMatchDto = serde_json::from_str(body).unwrap();
        assert_eq!(dto.match_id, 7_000_000_001);
        assert_eq!(dto.party_size, None);
        assert_eq!(dto.slots.filled(), vec![1]);
    }

    #[test]
    fn hero_ids_may_be_strings() {
        let dto: PlayerHeroDto =
            serde_json::from_str(r#"{"hero_id": "42", "games": 12, "win": 7}"#).unwrap();
        assert_eq!(dto.hero_id.value(), Some(42));

        let dto: PlayerHeroDto =
            serde_json::from_str(r#"{"hero_id": 42, "games": 12, "win": 7}"#).unwrap();
        assert_eq!(dto.hero_id.value(), Some(42));
    }

    #[test]
    fn hero_stats_keep_bracket_counters() {
        let body = r#"{
            "id": 1,
            "localized_name": "Anti-Mage",
            "7_pick": 1200,
            "7_win": 630,
            "pro_pick": 4
        }"#;
        let dto: HeroStatsDto = serde_json::from_str(body).unwrap();
        assert_eq!(dto.counters.get("7_pick").and_then(|v| v.as_f64()), Some(1200.0));
        assert!(dto.counters.contains_key("pro_pick"));
    }

    #[test]
    fn private_profile_decodes_without_fields() {
        let dto: PlayerProfileDto =
            serde_json::from_str(r#"{"profile": null, "rank_tier": null}"#).unwrap();
        assert!(dto.profile.is_none());

        let dto: PlayerProfileDto = serde_json::from_str(
            r#"{"profile": {"personaname": "Miracle-", "plus": true, "last_login": null}}"#,
        )
        .unwrap();
        let profile = dto.profile.unwrap();
        assert_eq!(profile.personaname.as_deref(), Some("Miracle-"));
        assert_eq!(profile.plus, Some(true));
        assert_eq!(profile.steamid, None);
    }
}
