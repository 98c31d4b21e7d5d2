//! Projection of the roster, combat totals and final snapshots onto the
//! OpenDota match layout.

use std::collections::BTreeMap;

use common::opendota;

use crate::combat::{CombatTotals, PlayerCombat};
use crate::metadata::MatchMetadata;
use crate::roster::{Roster, RosterEntry, TeamInfo};
use crate::snapshot::FinalSnapshot;

/// Second-team slots 5-9 become 128-132.
pub const SECOND_TEAM_SLOT_OFFSET: u8 = 123;

const SOURCE2_ENGINE: u32 = 1;
const DEFAULT_HERO_VARIANT: u32 = 1;

pub fn external_slot(slot: usize) -> u8 {
    if crate::is_first_team(slot) {
        slot as u8
    } else {
        slot as u8 + SECOND_TEAM_SLOT_OFFSET
    }
}

/// Match duration in minutes, treating an unknown duration as one minute.
fn duration_minutes(duration: i64) -> f64 {
    if duration != 0 {
        duration as f64 / 60.0
    } else {
        1.0
    }
}

/// Rate over the snapshot's own elapsed time, not over the match duration.
/// Saturates instead of overflowing on out of range counters.
fn per_minute(value: i64, elapsed: Option<i64>) -> i64 {
    match elapsed {
        Some(t) if t != 0 => value.saturating_mul(60).div_euclid(t.saturating_abs().max(1)),
        _ => 0,
    }
}

pub fn player_record(
    slot: usize,
    stats: &FinalSnapshot,
    metadata: &MatchMetadata,
    identity: Option<&RosterEntry>,
    combat: Option<&PlayerCombat>,
) -> opendota::Player {
    let is_radiant = crate::is_first_team(slot);
    let (team_number, team_slot) = if is_radiant {
        (0, slot as u8)
    } else {
        (1, (slot - crate::TEAM_SIZE) as u8)
    };
    let won = is_radiant == metadata.radiant_win;

    let minutes = duration_minutes(metadata.duration);
    let kills_per_min = if minutes > 0.0 {
        stats.kills as f64 / minutes
    } else {
        0.0
    };

    let default_combat = PlayerCombat::default();
    let combat = combat.unwrap_or(&default_combat);

    opendota::Player {
        account_id: identity.and_then(|p| p.account_id),
        player_slot: external_slot(slot),
        team_number,
        team_slot,
        hero_id: None,
        hero_variant: DEFAULT_HERO_VARIANT,

        item_0: 0,
        item_1: 0,
        item_2: 0,
        item_3: 0,
        item_4: 0,
        item_5: 0,
        backpack_0: 0,
        backpack_1: 0,
        backpack_2: 0,
        item_neutral: 0,
        item_neutral2: 0,

        kills: stats.kills,
        deaths: stats.deaths,
        assists: stats.assists,
        leaver_status: 0,
        last_hits: stats.last_hits,
        denies: stats.denies,
        gold_per_min: per_minute(stats.gold, stats.time),
        xp_per_min: per_minute(stats.xp, stats.time),
        level: stats.level,
        net_worth: stats.networth,

        aghanims_scepter: 0,
        aghanims_shard: 0,
        moonshard: 0,

        hero_damage: combat.hero_damage,
        tower_damage: combat.tower_damage,
        hero_healing: combat.hero_healing,

        gold: stats.gold,
        gold_spent: combat.gold_spent,
        total_gold: stats.networth.saturating_add(stats.gold),
        total_xp: stats.xp,

        stuns: stats.stuns,
        obs_placed: stats.obs_placed,
        sen_placed: stats.sen_placed,
        creeps_stacked: stats.creeps_stacked,
        camps_stacked: stats.camps_stacked,
        rune_pickups: stats.rune_pickups,
        firstblood_claimed: stats.firstblood_claimed,
        teamfight_participation: stats.teamfight_participation,
        towers_killed: stats.towers_killed,
        roshans_killed: stats.roshans_killed,
        observers_placed: stats.observers_placed,

        ability_upgrades_arr: Vec::new(),

        ability_uses: combat.ability_uses.clone(),
        item_uses: combat.item_uses.clone(),
        damage_taken: combat.damage_taken.clone(),
        damage_targets: combat.damage_targets.clone(),

        personaname: identity.and_then(|p| p.personaname.clone()),
        name: None,
        last_login: None,
        rank_tier: None,
        is_subscriber: false,
        is_contributor: false,

        radiant_win: metadata.radiant_win,
        start_time: metadata.start_time,
        duration: metadata.duration,
        cluster: None,
        lobby_type: 0,
        game_mode: 0,
        patch: None,
        region: None,

        is_radiant,
        win: u8::from(won),
        lose: u8::from(!won),
        kills_per_min,
        kda: stats.kills.saturating_add(stats.assists) as f64 / stats.deaths.max(1) as f64,
        abandons: 0,

        benchmarks: serde_json::Map::new(),
    }
}

pub fn players(
    snapshots: &BTreeMap<usize, FinalSnapshot>,
    metadata: &MatchMetadata,
    roster: &Roster,
    combat: &CombatTotals,
) -> Vec<opendota::Player> {
    snapshots
        .iter()
        .filter(|(slot, _)| **slot < crate::PLAYER_SLOTS)
        .map(|(slot, stats)| {
            player_record(
                *slot,
                stats,
                metadata,
                roster.get(*slot),
                combat.player(*slot),
            )
        })
        .collect()
}

pub fn match_record(
    metadata: &MatchMetadata,
    players: Vec<opendota::Player>,
    teams: &TeamInfo,
) -> opendota::Match {
    let (radiant_score, dire_score) = players.iter().fold((0i64, 0i64), |(radiant, dire), p| {
        if p.is_radiant {
            (radiant.saturating_add(p.kills), dire)
        } else {
            (radiant, dire.saturating_add(p.kills))
        }
    });

    opendota::Match {
        match_id: metadata.match_id,
        match_seq_num: 0,
        duration: metadata.duration,
        pre_game_duration: 0,
        start_time: metadata.start_time,
        radiant_win: metadata.radiant_win,
        first_blood_time: metadata.first_blood_time,

        radiant_team_id: teams.radiant_team_id,
        dire_team_id: teams.dire_team_id,
        radiant_name: "Radiant".to_owned(),
        radiant_logo: None,
        radiant_team_complete: None,
        radiant_captain: None,
        dire_captain: None,
        radiant_score,
        dire_score,

        tower_status_radiant: 0,
        tower_status_dire: 0,
        barracks_status_radiant: 0,
        barracks_status_dire: 0,

        cluster: None,
        lobby_type: 0,
        human_players: players.len(),
        leagueid: None,
        game_mode: 0,
        flags: 0,
        engine: SOURCE2_ENGINE,
        patch: None,
        region: None,

        picks_bans: metadata.picks_bans.clone(),

        od_data: serde_json::Map::new(),
        metadata: serde_json::Map::new(),

        players,

        radiant_team: opendota::TeamRef {
            team_id: teams.radiant_team_id,
            name: "Radiant".to_owned(),
            tag: teams.radiant_tag.clone(),
        },
        dire_team: opendota::TeamRef {
            team_id: teams.dire_team_id,
            name: "Dire".to_owned(),
            tag: teams.dire_tag.clone(),
        },

        version: common::RECONSTRUCTED_VERSION,
        replay_url: None,
    }
}
