//! Match and player records in the layout served by the OpenDota
//! `/matches/{id}` endpoint.
//!
//! Every field is always serialised. Values that cannot be derived from a
//! parsed replay are emitted as `null`, `0` or empty collections so consumers
//! see the same schema regardless of input quality.

use std::collections::BTreeMap;

pub type Counters = BTreeMap<String, i64>;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Match {
    pub match_id: u64,
    pub match_seq_num: u64,
    pub duration: i64,
    pub pre_game_duration: i64,
    pub start_time: i64,
    pub radiant_win: bool,
    pub first_blood_time: Option<i64>,

    pub radiant_team_id: Option<i64>,
    pub dire_team_id: Option<i64>,
    pub radiant_name: String,
    pub radiant_logo: Option<u64>,
    pub radiant_team_complete: Option<u8>,
    pub radiant_captain: Option<u64>,
    pub dire_captain: Option<u64>,
    pub radiant_score: i64,
    pub dire_score: i64,

    pub tower_status_radiant: u32,
    pub tower_status_dire: u32,
    pub barracks_status_radiant: u32,
    pub barracks_status_dire: u32,

    pub cluster: Option<u32>,
    pub lobby_type: u32,
    pub human_players: usize,
    pub leagueid: Option<u32>,
    pub game_mode: u32,
    pub flags: u32,
    pub engine: u32,
    pub patch: Option<u32>,
    pub region: Option<u32>,

    pub picks_bans: Vec<PickBan>,

    pub od_data: serde_json::Map<String, serde_json::Value>,
    pub metadata: serde_json::Map<String, serde_json::Value>,

    pub players: Vec<Player>,

    pub radiant_team: TeamRef,
    pub dire_team: TeamRef,

    pub version: u32,
    pub replay_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PickBan {
    pub is_pick: bool,
    pub hero_id: u32,
    pub team: u8,
    pub order: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TeamRef {
    pub team_id: Option<i64>,
    pub name: String,
    pub tag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Player {
    pub account_id: Option<i64>,
    /// 0-4 for the first team, 128-132 for the second.
    pub player_slot: u8,
    pub team_number: u8,
    pub team_slot: u8,
    pub hero_id: Option<u32>,
    pub hero_variant: u32,

    pub item_0: u32,
    pub item_1: u32,
    pub item_2: u32,
    pub item_3: u32,
    pub item_4: u32,
    pub item_5: u32,
    pub backpack_0: u32,
    pub backpack_1: u32,
    pub backpack_2: u32,
    pub item_neutral: u32,
    pub item_neutral2: u32,

    pub kills: i64,
    pub deaths: i64,
    pub assists: i64,
    pub leaver_status: u32,
    pub last_hits: i64,
    pub denies: i64,
    pub gold_per_min: i64,
    pub xp_per_min: i64,
    pub level: i64,
    pub net_worth: i64,

    pub aghanims_scepter: u32,
    pub aghanims_shard: u32,
    pub moonshard: u32,

    pub hero_damage: i64,
    pub tower_damage: i64,
    pub hero_healing: i64,

    pub gold: i64,
    pub gold_spent: i64,
    pub total_gold: i64,
    pub total_xp: i64,

    pub stuns: f64,
    pub obs_placed: i64,
    pub sen_placed: i64,
    pub creeps_stacked: i64,
    pub camps_stacked: i64,
    pub rune_pickups: i64,
    pub firstblood_claimed: i64,
    pub teamfight_participation: f64,
    pub towers_killed: i64,
    pub roshans_killed: i64,
    pub observers_placed: i64,

    pub ability_upgrades_arr: Vec<u32>,

    pub ability_uses: Counters,
    pub item_uses: Counters,
    pub damage_taken: Counters,
    pub damage_targets: Counters,

    pub personaname: Option<String>,
    pub name: Option<String>,
    pub last_login: Option<String>,
    pub rank_tier: Option<u32>,
    pub is_subscriber: bool,
    pub is_contributor: bool,

    pub radiant_win: bool,
    pub start_time: i64,
    pub duration: i64,
    pub cluster: Option<u32>,
    pub lobby_type: u32,
    pub game_mode: u32,
    pub patch: Option<u32>,
    pub region: Option<u32>,

    #[serde(rename = "isRadiant")]
    pub is_radiant: bool,
    pub win: u8,
    pub lose: u8,
    pub kills_per_min: f64,
    pub kda: f64,
    pub abandons: u32,

    pub benchmarks: serde_json::Map<String, serde_json::Value>,
}
