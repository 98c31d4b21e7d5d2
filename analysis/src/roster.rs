//! Player roster taken from the epilogue event.
//!
//! The epilogue is the final game summary written by the replay parser. Its
//! `key` field holds the match info, including the per-player records, as a
//! JSON document. Slots are assigned positionally (see [`positional_slot`]).

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use crate::events::{value_as_i64, Event, EventKind};

/// Difference between a 64-bit Steam id and its 32-bit account id.
pub const STEAM64_OFFSET: i64 = 76561197960265728;

/// Raw `gameTeam_` values of the two playing teams.
pub const FIRST_TEAM_CODE: i64 = 2;
pub const SECOND_TEAM_CODE: i64 = 3;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RosterEntry {
    pub slot: usize,
    pub account_id: Option<i64>,
    pub steam64: Option<i64>,
    pub personaname: Option<String>,
    pub hero_name: Option<String>,
    pub game_team: Option<i64>,
    pub is_fake_client: bool,
}

impl RosterEntry {
    /// `false` when the raw team indicator names a playing team that does not
    /// own the entry's slot. Unknown indicators are not judged.
    pub fn team_matches_slot(&self) -> bool {
        let expected = if crate::is_first_team(self.slot) {
            FIRST_TEAM_CODE
        } else {
            SECOND_TEAM_CODE
        };

        match self.game_team {
            Some(team @ (FIRST_TEAM_CODE | SECOND_TEAM_CODE)) => team == expected,
            _ => true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct TeamInfo {
    pub radiant_team_id: Option<i64>,
    pub dire_team_id: Option<i64>,
    pub radiant_tag: Option<String>,
    pub dire_tag: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct Roster {
    /// Ordered by slot.
    pub players: Vec<RosterEntry>,
    pub teams: TeamInfo,
    /// Slots whose raw team indicator disagrees with the positional slot.
    pub team_mismatches: Vec<usize>,
}

impl Roster {
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn get(&self, slot: usize) -> Option<&RosterEntry> {
        self.players.get(slot)
    }

    pub fn hero_index(&self) -> HeroIndex {
        let mut heroes = HashMap::new();
        for entry in self.players.iter().filter(|p| p.slot < crate::PLAYER_SLOTS) {
            if let Some(hero) = entry.hero_name.as_ref() {
                heroes.insert(hero.clone(), entry.slot);
            }
        }

        HeroIndex { heroes }
    }
}

/// Maps the unit names used in combat log events onto player slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeroIndex {
    heroes: HashMap<String, usize>,
}

impl HeroIndex {
    pub fn slot_of(&self, name: Option<&str>) -> Option<usize> {
        name.and_then(|n| self.heroes.get(n)).copied()
    }

    pub fn len(&self) -> usize {
        self.heroes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heroes.is_empty()
    }
}

/// The epilogue lists players team by team, seat by seat, so the list index
/// is used as the slot. Nothing in the record itself carries the slot.
pub fn positional_slot(index: usize) -> usize {
    index
}

#[tracing::instrument(name = "Roster", skip(events))]
pub fn resolve(events: &[Event]) -> Roster {
    let epilogue = match events.iter().rev().find(|e| e.kind() == EventKind::Epilogue) {
        Some(e) => e,
        None => {
            tracing::warn!("No epilogue event found, player identification will be limited");
            return Roster::default();
        }
    };

    let payload = match epilogue_payload(epilogue) {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!("Failed to parse epilogue data: {}", e);
            return Roster::default();
        }
    };

    let game_info = payload
        .get("gameInfo_")
        .and_then(|g| g.get("dota_"))
        .unwrap_or(&Value::Null);
    let player_infos = game_info
        .get("playerInfo_")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    tracing::info!("Found {} players in epilogue data", player_infos.len());

    let players: Vec<RosterEntry> = player_infos
        .iter()
        .enumerate()
        .map(|(index, info)| roster_entry(positional_slot(index), info))
        .collect();

    for entry in players.iter() {
        tracing::info!(
            steam32 = ?entry.account_id,
            hero = entry.hero_name.as_deref().unwrap_or("Unknown"),
            "Player {}: {}",
            entry.slot,
            entry.personaname.as_deref().unwrap_or("Unknown"),
        );
    }

    let mut team_mismatches = Vec::new();
    for entry in players.iter().filter(|p| !p.team_matches_slot()) {
        tracing::warn!(
            slot = entry.slot,
            game_team = ?entry.game_team,
            "Team indicator does not match positional slot"
        );
        team_mismatches.push(entry.slot);
    }

    let teams = TeamInfo {
        radiant_team_id: game_info.get("radiantTeamId_").and_then(value_as_i64),
        dire_team_id: game_info.get("direTeamId_").and_then(value_as_i64),
        radiant_tag: decode_signed_chars(&raw_bytes(game_info, "radiantTeamTag_")),
        dire_tag: decode_signed_chars(&raw_bytes(game_info, "direTeamTag_")),
    };
    tracing::info!(
        "Teams: Radiant ID {:?} ({:?}) vs Dire ID {:?} ({:?})",
        teams.radiant_team_id,
        teams.radiant_tag,
        teams.dire_team_id,
        teams.dire_tag
    );

    Roster {
        players,
        teams,
        team_mismatches,
    }
}

fn epilogue_payload(event: &Event) -> Result<Value, serde_json::Error> {
    match event.get("key") {
        Some(Value::String(raw)) => serde_json::from_str(raw),
        Some(inline @ Value::Object(_)) => Ok(inline.clone()),
        _ => Ok(Value::Object(serde_json::Map::new())),
    }
}

fn roster_entry(slot: usize, info: &Value) -> RosterEntry {
    let steam64 = info
        .get("steamid_")
        .and_then(value_as_i64)
        .filter(|id| *id != 0);

    RosterEntry {
        slot,
        account_id: steam64.map(|id| id - STEAM64_OFFSET),
        steam64,
        personaname: decode_player_name(&raw_bytes(info, "playerName_")),
        hero_name: decode_signed_chars(&raw_bytes(info, "heroName_")),
        game_team: info.get("gameTeam_").and_then(value_as_i64),
        is_fake_client: info
            .get("isFakeClient_")
            .and_then(Value::as_bool)
            .unwrap_or(false),
    }
}

/// Byte strings are serialised as `{"bytes": [...]}` with signed values.
fn raw_bytes(container: &Value, field: &str) -> Vec<i64> {
    container
        .get(field)
        .and_then(|f| f.get("bytes"))
        .and_then(Value::as_array)
        .map(|bytes| bytes.iter().filter_map(value_as_i64).collect())
        .unwrap_or_default()
}

fn unsigned(byte: i64) -> i64 {
    if byte < 0 {
        byte + 256
    } else {
        byte
    }
}

/// Decodes a display name as UTF-8, replacing invalid sequences.
///
/// Values that do not fit in a byte even after the signed to unsigned shift
/// make the whole name fall back to its 7-bit ASCII characters.
pub fn decode_player_name(bytes: &[i64]) -> Option<String> {
    if bytes.is_empty() {
        return None;
    }

    let raw: Option<Vec<u8>> = bytes
        .iter()
        .map(|b| u8::try_from(unsigned(*b)).ok())
        .collect();

    match raw {
        Some(raw) => Some(String::from_utf8_lossy(&raw).into_owned()),
        None => Some(
            bytes
                .iter()
                .filter(|b| (0..=127).contains(*b))
                .filter_map(|b| char::from_u32(*b as u32))
                .collect(),
        ),
    }
}

/// Maps every value to the character with the same code point. Hero names and
/// team tags are plain ASCII, so no UTF-8 decoding is attempted.
pub fn decode_signed_chars(bytes: &[i64]) -> Option<String> {
    if bytes.is_empty() {
        return None;
    }

    Some(
        bytes
            .iter()
            .filter_map(|b| u32::try_from(unsigned(*b)).ok())
            .filter_map(char::from_u32)
            .collect(),
    )
}

/// Collects the `player_slot` events into a player id to slot mapping.
pub fn player_slot_assignments(events: &[Event]) -> BTreeMap<i64, i64> {
    let mut slots = BTreeMap::new();
    for event in events.iter().filter(|e| e.kind() == EventKind::PlayerSlot) {
        let player_id = event.int("key").unwrap_or(-1);
        let slot = event.int("value").unwrap_or(-1);
        if player_id >= 0 && slot >= 0 {
            slots.insert(player_id, slot);
        }
    }

    tracing::info!("Found player slots: {:?}", slots);

    slots
}
