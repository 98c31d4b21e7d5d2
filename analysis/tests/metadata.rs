use std::collections::BTreeMap;

use analysis::events::Event;
use analysis::metadata::{self, Timeline};
use analysis::snapshot::FinalSnapshot;
use pretty_assertions::assert_eq;
use serde_json::json;

fn timed(times: &[i64]) -> Vec<Event> {
    times
        .iter()
        .map(|t| Event::from_value(json!({ "type": "interval", "time": t })).unwrap())
        .collect()
}

fn with_kills(kills: &[(usize, i64)]) -> BTreeMap<usize, FinalSnapshot> {
    kills
        .iter()
        .map(|(slot, k)| {
            let event = Event::from_value(json!({ "type": "interval", "slot": slot, "kills": k })).unwrap();
            (*slot, FinalSnapshot::from_event(0, &event))
        })
        .collect()
}

#[test]
fn duration_from_game_start() {
    let timeline = Timeline::scan(&timed(&[-30, -10, 0, 5, 42]));

    assert_eq!(Some(0), timeline.game_start_time);
    assert_eq!(42, timeline.max_time);
    assert_eq!(-30, timeline.min_time);
    assert_eq!(42, timeline.duration());
}

#[test]
fn duration_from_first_non_negative_time() {
    assert_eq!(90, Timeline::scan(&timed(&[-60, 10, 100])).duration());
}

#[test]
fn duration_with_only_pregame_times() {
    assert_eq!(45, Timeline::scan(&timed(&[-45, -20, -3])).duration());
}

#[test]
fn duration_without_times() {
    let events = vec![Event::from_value(json!({ "type": "epilogue" })).unwrap()];

    assert_eq!(0, Timeline::scan(&events).duration());
}

#[test]
fn first_blood_is_first_occurrence_clamped() {
    let events: Vec<Event> = [
        json!({ "type": "DOTA_COMBATLOG_FIRST_BLOOD", "time": -5 }),
        json!({ "type": "DOTA_COMBATLOG_FIRST_BLOOD", "time": 300 }),
    ]
    .into_iter()
    .map(|v| Event::from_value(v).unwrap())
    .collect();

    assert_eq!(Some(0), Timeline::scan(&events).first_blood_time);
    assert_eq!(None, Timeline::scan(&timed(&[1, 2])).first_blood_time);
}

#[test]
fn tie_favours_first_team() {
    let snapshots = with_kills(&[(0, 6), (3, 4), (5, 7), (9, 3)]);

    assert_eq!((10, 10), metadata::team_kills(&snapshots));
    assert!(metadata::radiant_win_by_kills(&snapshots));
}

#[test]
fn more_second_team_kills() {
    let snapshots = with_kills(&[(0, 6), (5, 7)]);

    assert!(!metadata::radiant_win_by_kills(&snapshots));
}

#[test]
fn no_snapshots_is_a_first_team_win() {
    assert!(metadata::radiant_win_by_kills(&BTreeMap::new()));
}

#[test]
fn match_id_from_source() {
    assert_eq!(8423006415, metadata::match_id_from_source("8423006415.json"));
    assert_eq!(8423006415, metadata::match_id_from_source("/data/replays/8423006415.json"));
    assert_eq!(8423006415, metadata::match_id_from_source("8423006415"));
    assert_eq!(0, metadata::match_id_from_source("replay.json"));
    assert_eq!(0, metadata::match_id_from_source("8423006415_parsed.json"));
    assert_eq!(0, metadata::match_id_from_source(""));
}

#[test]
fn derived_metadata() {
    let events = timed(&[-30, 0, 1200]);
    let snapshots = with_kills(&[(1, 2), (6, 3)]);

    let derived = metadata::derive(&events, &snapshots, "77.json");

    assert_eq!(
        metadata::MatchMetadata {
            match_id: 77,
            duration: 1200,
            radiant_win: false,
            first_blood_time: None,
            start_time: 0,
            picks_bans: Vec::new(),
        },
        derived
    );
}

#[test]
fn lowest_possible_pregame_time() {
    let timeline = Timeline::scan(&timed(&[i64::MIN]));

    assert_eq!(None, timeline.game_start_time);
    assert_eq!(i64::MAX, timeline.duration());
}

#[test]
fn untimed_events_never_start_the_game() {
    let mut events = vec![Event::from_value(json!({ "type": "player_slot", "key": 0, "value": 0 })).unwrap()];
    events.extend(timed(&[-20, 30, 90]));

    let timeline = Timeline::scan(&events);

    assert_eq!(Some(30), timeline.game_start_time);
    assert_eq!(60, timeline.duration());
}

#[test]
fn fractional_times_truncate() {
    let events: Vec<Event> = [json!({ "type": "interval", "time": -0.5 }), json!({ "type": "interval", "time": 12.9 })]
        .into_iter()
        .map(|v| Event::from_value(v).unwrap())
        .collect();

    let timeline = Timeline::scan(&events);

    assert_eq!(Some(0), timeline.game_start_time);
    assert_eq!(12, timeline.duration());
}
