use analysis::events::{self, Event};
use analysis::roster::{self, RosterEntry, TeamInfo};
use pretty_assertions::assert_eq;
use serde_json::json;
use tracing_test::traced_test;

fn load_fixture() -> Vec<Event> {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../testfiles/8423006415.json");
    let input = std::fs::read(path).unwrap();
    events::load(input.as_slice()).unwrap().events
}

fn to_events(values: &[serde_json::Value]) -> Vec<Event> {
    values
        .iter()
        .map(|v| Event::from_value(v.clone()).unwrap())
        .collect()
}

fn signed(text: &str) -> serde_json::Value {
    let bytes: Vec<i64> = text.bytes().map(|b| b as i8 as i64).collect();
    json!({ "bytes": bytes })
}

fn epilogue(players: serde_json::Value) -> serde_json::Value {
    let payload = json!({
        "gameInfo_": {
            "dota_": {
                "playerInfo_": players,
            }
        }
    });
    json!({ "type": "epilogue", "time": 100, "key": payload.to_string() })
}

#[test]
fn decode_non_ascii_name() {
    assert_eq!(Some("©".to_owned()), roster::decode_player_name(&[-62, -87]));
    assert_eq!(Some("Café".to_owned()), roster::decode_player_name(&[67, 97, 102, -61, -87]));
}

#[test]
fn decode_invalid_utf8_replaces() {
    assert_eq!(
        Some("a\u{FFFD}b".to_owned()),
        roster::decode_player_name(&[97, -1, 98])
    );
}

#[test]
fn decode_out_of_range_falls_back_to_ascii() {
    assert_eq!(
        Some("ab".to_owned()),
        roster::decode_player_name(&[97, 300, -62, 98, -400])
    );
}

#[test]
fn decode_empty() {
    assert_eq!(None, roster::decode_player_name(&[]));
    assert_eq!(None, roster::decode_signed_chars(&[]));
}

#[test]
fn decode_signed_chars_maps_code_points() {
    assert_eq!(Some("RAD".to_owned()), roster::decode_signed_chars(&[82, 65, 68]));
    assert_eq!(Some("\u{e9}".to_owned()), roster::decode_signed_chars(&[-23]));
}

#[test]
fn fixture_roster() {
    let events = load_fixture();

    let roster = roster::resolve(&events);

    assert_eq!(10, roster.players.len());
    assert_eq!(
        &RosterEntry {
            slot: 2,
            account_id: Some(1002),
            steam64: Some(76561197960266730),
            personaname: Some("Café".to_owned()),
            hero_name: Some("npc_dota_hero_crystal_maiden".to_owned()),
            game_team: Some(2),
            is_fake_client: false,
        },
        roster.get(2).unwrap()
    );
    assert_eq!(
        TeamInfo {
            radiant_team_id: Some(111),
            dire_team_id: Some(222),
            radiant_tag: Some("RAD".to_owned()),
            dire_tag: Some("DIR".to_owned()),
        },
        roster.teams
    );
    assert!(roster.team_mismatches.is_empty());

    let heroes = roster.hero_index();
    assert_eq!(10, heroes.len());
    assert_eq!(Some(5), heroes.slot_of(Some("npc_dota_hero_sniper")));
    assert_eq!(None, heroes.slot_of(Some("npc_dota_creep_badguys_melee")));
    assert_eq!(None, heroes.slot_of(None));
}

#[test]
fn resolution_is_idempotent() {
    let events = load_fixture();

    let first = serde_json::to_string(&roster::resolve(&events)).unwrap();
    let second = serde_json::to_string(&roster::resolve(&events)).unwrap();

    assert_eq!(first, second);
}

#[test]
#[traced_test]
fn missing_epilogue() {
    let events = to_events(&[json!({ "type": "interval", "slot": 0 })]);

    let roster = roster::resolve(&events);

    assert!(roster.is_empty());
    assert_eq!(TeamInfo::default(), roster.teams);
    assert!(roster.hero_index().is_empty());
    assert!(logs_contain("No epilogue event found"));
}

#[test]
#[traced_test]
fn unparseable_epilogue() {
    let events = to_events(&[json!({ "type": "epilogue", "key": "{not json" })]);

    let roster = roster::resolve(&events);

    assert!(roster.is_empty());
    assert!(logs_contain("Failed to parse epilogue data"));
}

#[test]
fn last_epilogue_wins() {
    let events = to_events(&[
        epilogue(json!([{ "steamid_": 76561197960265829_i64, "heroName_": signed("npc_dota_hero_axe") }])),
        epilogue(json!([{ "steamid_": 76561197960265830_i64, "heroName_": signed("npc_dota_hero_lina") }])),
    ]);

    let roster = roster::resolve(&events);

    assert_eq!(1, roster.players.len());
    assert_eq!(Some(102), roster.players[0].account_id);
    assert_eq!(Some("npc_dota_hero_lina"), roster.players[0].hero_name.as_deref());
}

#[test]
fn inline_epilogue_payload() {
    let events = to_events(&[json!({
        "type": "epilogue",
        "key": {
            "gameInfo_": { "dota_": { "playerInfo_": [{ "heroName_": signed("npc_dota_hero_axe") }] } }
        }
    })]);

    let roster = roster::resolve(&events);

    assert_eq!(1, roster.players.len());
    assert_eq!(Some("npc_dota_hero_axe"), roster.players[0].hero_name.as_deref());
}

#[test]
fn missing_identity_fields_default_to_none() {
    let events = to_events(&[epilogue(json!([{ "steamid_": 0 }, {}]))]);

    let roster = roster::resolve(&events);

    assert_eq!(
        vec![
            RosterEntry {
                slot: 0,
                account_id: None,
                steam64: None,
                personaname: None,
                hero_name: None,
                game_team: None,
                is_fake_client: false,
            },
            RosterEntry {
                slot: 1,
                account_id: None,
                steam64: None,
                personaname: None,
                hero_name: None,
                game_team: None,
                is_fake_client: false,
            },
        ],
        roster.players
    );
}

#[test]
#[traced_test]
fn team_mismatch_is_reported() {
    let events = to_events(&[epilogue(json!([
        { "gameTeam_": 3, "isFakeClient_": true },
        { "gameTeam_": 2 },
    ]))]);

    let roster = roster::resolve(&events);

    assert_eq!(vec![0], roster.team_mismatches);
    assert!(roster.players[0].is_fake_client);
    assert_eq!(0, roster.players[0].slot);
    assert!(logs_contain("Team indicator does not match positional slot"));
}

#[test]
fn duplicate_hero_names_keep_later_slot() {
    let events = to_events(&[epilogue(json!([
        { "heroName_": signed("npc_dota_hero_axe") },
        { "heroName_": signed("npc_dota_hero_axe") },
    ]))]);

    let heroes = roster::resolve(&events).hero_index();

    assert_eq!(Some(1), heroes.slot_of(Some("npc_dota_hero_axe")));
}

#[test]
fn player_slot_assignments() {
    let events = to_events(&[
        json!({ "type": "player_slot", "key": "0", "value": 0 }),
        json!({ "type": "player_slot", "key": 5, "value": "128" }),
        json!({ "type": "player_slot", "key": "7", "value": -1 }),
        json!({ "type": "player_slot", "key": "0", "value": 3 }),
        json!({ "type": "player_slot" }),
    ]);

    let slots = roster::player_slot_assignments(&events);

    assert_eq!(vec![(0, 3), (5, 128)], slots.into_iter().collect::<Vec<_>>());
}
