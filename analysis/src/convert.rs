use std::collections::BTreeMap;

use crate::combat::CombatCounts;
use crate::events::LoadedEvents;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ConversionReport {
    pub events: usize,
    pub skipped_lines: usize,
    pub roster_size: usize,
    pub team_mismatches: Vec<usize>,
    pub combat: CombatCounts,
    pub snapshots: usize,
    /// Player id to slot, from `player_slot` events.
    pub player_slots: BTreeMap<i64, i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub record: common::opendota::Match,
    pub report: ConversionReport,
}

/// Builds the match record for an already loaded event log.
///
/// `source` is the name of the log, its stem is used as the match id.
#[tracing::instrument(name = "Convert", skip(loaded))]
pub fn convert(loaded: &LoadedEvents, source: &str) -> Conversion {
    let events = loaded.events.as_slice();

    let roster = crate::roster::resolve(events);
    let player_slots = crate::roster::player_slot_assignments(events);
    let combat = crate::combat::aggregate(events, &roster.hero_index());
    let snapshots = crate::snapshot::select_final(events);

    let metadata = crate::metadata::derive(events, &snapshots, source);
    let players = crate::synthesize::players(&snapshots, &metadata, &roster, &combat);
    let record = crate::synthesize::match_record(&metadata, players, &roster.teams);

    let report = ConversionReport {
        events: events.len(),
        skipped_lines: loaded.skipped,
        roster_size: roster.players.len(),
        team_mismatches: roster.team_mismatches.clone(),
        combat: combat.counts,
        snapshots: snapshots.len(),
        player_slots,
    };

    Conversion { record, report }
}

/// Loads a line-delimited event log and converts it.
pub fn convert_reader<R>(reader: R, source: &str) -> std::io::Result<Conversion>
where
    R: std::io::BufRead,
{
    let loaded = crate::events::load(reader)?;
    Ok(convert(&loaded, source))
}
