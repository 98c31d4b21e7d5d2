use std::collections::BTreeMap;

use crate::events::{Event, EventKind};

/// The last `interval` event seen for a slot.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct FinalSnapshot {
    /// Position of the source event in the loaded sequence.
    pub event_index: usize,
    /// Elapsed time of the snapshot, `None` when absent.
    pub time: Option<i64>,
    pub kills: i64,
    pub deaths: i64,
    pub assists: i64,
    pub last_hits: i64,
    pub denies: i64,
    pub gold: i64,
    pub networth: i64,
    pub xp: i64,
    pub level: i64,
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
}

impl FinalSnapshot {
    pub fn from_event(event_index: usize, event: &Event) -> Self {
        let count = |field: &str| event.int(field).unwrap_or(0);

        Self {
            event_index,
            time: event.time(),
            kills: count("kills"),
            deaths: count("deaths"),
            assists: count("assists"),
            last_hits: count("lh"),
            denies: count("denies"),
            gold: count("gold"),
            networth: count("networth"),
            xp: count("xp"),
            level: event.int("level").unwrap_or(1),
            stuns: event.float("stuns").unwrap_or(0.0),
            obs_placed: count("obs_placed"),
            sen_placed: count("sen_placed"),
            creeps_stacked: count("creeps_stacked"),
            camps_stacked: count("camps_stacked"),
            rune_pickups: count("rune_pickups"),
            firstblood_claimed: count("firstblood_claimed"),
            teamfight_participation: event.float("teamfight_participation").unwrap_or(0.0),
            towers_killed: count("towers_killed"),
            roshans_killed: count("roshans_killed"),
            observers_placed: count("observers_placed"),
        }
    }
}

/// Keeps the latest interval event per slot, by sequence position only.
///
/// Slots outside of `0..PLAYER_SLOTS` are ignored.
#[tracing::instrument(name = "Snapshots", skip(events))]
pub fn select_final(events: &[Event]) -> BTreeMap<usize, FinalSnapshot> {
    let mut latest = BTreeMap::<usize, usize>::new();

    for (index, event) in events.iter().enumerate() {
        if event.kind() != EventKind::Interval {
            continue;
        }

        let slot = match event.int("slot") {
            Some(s) => s,
            None => continue,
        };

        match usize::try_from(slot).ok().filter(|s| *s < crate::PLAYER_SLOTS) {
            Some(slot) => {
                latest.insert(slot, index);
            }
            None => {
                tracing::warn!(slot, event = index, "Ignoring interval event with out of range slot");
            }
        };
    }

    let snapshots: BTreeMap<_, _> = latest
        .into_iter()
        .map(|(slot, index)| (slot, FinalSnapshot::from_event(index, &events[index])))
        .collect();

    tracing::info!("Extracted stats for {} players", snapshots.len());

    snapshots
}
