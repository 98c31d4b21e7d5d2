use std::collections::BTreeMap;

use crate::events::{Event, EventKind};
use crate::snapshot::FinalSnapshot;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct MatchMetadata {
    pub match_id: u64,
    /// Seconds.
    pub duration: i64,
    pub radiant_win: bool,
    pub first_blood_time: Option<i64>,
    /// Not recoverable from replay events, always 0.
    pub start_time: i64,
    /// Draft data is not part of the event stream, always empty.
    pub picks_bans: Vec<common::opendota::PickBan>,
}

/// Timestamps gathered in one pass over the events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timeline {
    pub max_time: i64,
    pub min_time: i64,
    /// Time of the first event with a non-negative timestamp.
    pub game_start_time: Option<i64>,
    pub first_blood_time: Option<i64>,
}

impl Timeline {
    pub fn scan(events: &[Event]) -> Self {
        let mut timeline = Self::default();

        for event in events.iter() {
            if event.kind() == EventKind::FirstBlood && timeline.first_blood_time.is_none() {
                timeline.first_blood_time = Some(event.time().unwrap_or(0).max(0));
            }

            let time = match event.time() {
                Some(t) => t,
                None => continue,
            };

            timeline.max_time = timeline.max_time.max(time);
            timeline.min_time = timeline.min_time.min(time);

            if timeline.game_start_time.is_none() && time >= 0 {
                timeline.game_start_time = Some(time);
            }
        }

        timeline
    }

    /// Pre-game setup is encoded with negative timestamps, so the duration is
    /// measured from the first non-negative one when there is any.
    ///
    /// Events without a `time` field do not take part, so they can never
    /// become the game start.
    pub fn duration(&self) -> i64 {
        match self.game_start_time {
            Some(start) => self.max_time - start,
            None if self.max_time > 0 => self.max_time,
            None => self.min_time.saturating_abs(),
        }
    }
}

/// Stand-in for the real match outcome, which replay events do not carry: the
/// first team wins when it has at least as many kills as the second.
pub fn radiant_win_by_kills(snapshots: &BTreeMap<usize, FinalSnapshot>) -> bool {
    let (radiant_kills, dire_kills) = team_kills(snapshots);
    radiant_kills >= dire_kills
}

pub fn team_kills(snapshots: &BTreeMap<usize, FinalSnapshot>) -> (i64, i64) {
    snapshots
        .iter()
        .fold((0, 0), |(radiant, dire), (slot, snapshot)| {
            if crate::is_first_team(*slot) {
                (radiant.saturating_add(snapshot.kills), dire)
            } else {
                (radiant, dire.saturating_add(snapshot.kills))
            }
        })
}

/// Parsed replays are stored as `<match id>.json`.
pub fn match_id_from_source(source: &str) -> u64 {
    let stem = std::path::Path::new(source)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();

    stem.parse().unwrap_or(0)
}

pub fn derive(
    events: &[Event],
    snapshots: &BTreeMap<usize, FinalSnapshot>,
    source: &str,
) -> MatchMetadata {
    let timeline = Timeline::scan(events);

    let metadata = MatchMetadata {
        match_id: match_id_from_source(source),
        duration: timeline.duration(),
        radiant_win: radiant_win_by_kills(snapshots),
        first_blood_time: timeline.first_blood_time,
        start_time: 0,
        picks_bans: Vec::new(),
    };

    tracing::debug!(?timeline, ?metadata, "Derived match metadata");

    metadata
}
