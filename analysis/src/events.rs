//! Loading of line-delimited replay event logs.
//!
//! Every line of the log is a JSON object carrying a `type` tag. The set of
//! fields differs per type and any of them may be missing, so [`Event`] keeps
//! the raw object around and only offers `Option` returning accessors.

use std::io::BufRead;

use serde_json::Value;

const PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Epilogue,
    Interval,
    PlayerSlot,
    Damage,
    Heal,
    Purchase,
    Ability,
    Item,
    FirstBlood,
    Other,
}

pub static EVENT_KINDS: phf::Map<&'static str, EventKind> = phf::phf_map! {
    "epilogue" => EventKind::Epilogue,
    "interval" => EventKind::Interval,
    "player_slot" => EventKind::PlayerSlot,
    "DOTA_COMBATLOG_DAMAGE" => EventKind::Damage,
    "DOTA_COMBATLOG_HEAL" => EventKind::Heal,
    "DOTA_COMBATLOG_PURCHASE" => EventKind::Purchase,
    "DOTA_COMBATLOG_ABILITY" => EventKind::Ability,
    "DOTA_COMBATLOG_ITEM" => EventKind::Item,
    "DOTA_COMBATLOG_FIRST_BLOOD" => EventKind::FirstBlood,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    kind: EventKind,
    fields: serde_json::Map<String, Value>,
}

impl Event {
    /// Returns `None` for anything that is not a JSON object.
    pub fn from_value(value: Value) -> Option<Self> {
        let fields = match value {
            Value::Object(fields) => fields,
            _ => return None,
        };

        let kind = fields
            .get("type")
            .and_then(Value::as_str)
            .and_then(|tag| EVENT_KINDS.get(tag))
            .copied()
            .unwrap_or(EventKind::Other);

        Some(Self { kind, fields })
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn type_name(&self) -> Option<&str> {
        self.str("type")
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    pub fn int(&self, field: &str) -> Option<i64> {
        self.fields.get(field).and_then(value_as_i64)
    }

    pub fn float(&self, field: &str) -> Option<f64> {
        self.fields.get(field).and_then(value_as_f64)
    }

    /// Missing fields count as `false`, numbers as `!= 0`.
    pub fn flag(&self, field: &str) -> bool {
        match self.fields.get(field) {
            Some(Value::Bool(b)) => *b,
            Some(other) => value_as_f64(other).is_some_and(|v| v != 0.0),
            None => false,
        }
    }

    pub fn time(&self) -> Option<i64> {
        self.int("time")
    }
}

/// Accepts integers, floats and numeric strings.
///
/// Floats are truncated toward zero and clamped to the `i64` range, so a
/// timestamp of `-0.5` reads as `0` and counts as a non-negative time.
pub fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedEvents {
    pub events: Vec<Event>,
    /// Non-blank lines that could not be turned into an [`Event`].
    pub skipped: usize,
}

/// Reads one event per line, in source order.
///
/// Lines that are not valid JSON objects are logged and skipped. Only I/O
/// failures of the reader itself are returned as errors.
#[tracing::instrument(name = "LoadEvents", skip(reader))]
pub fn load<R>(mut reader: R) -> std::io::Result<LoadedEvents>
where
    R: BufRead,
{
    let mut loaded = LoadedEvents::default();
    let mut buf = Vec::new();
    let mut line_number = 0usize;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_number += 1;

        let line = buf.trim_ascii();
        if line.is_empty() {
            continue;
        }

        let value = match serde_json::from_slice::<Value>(line) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(
                    line = line_number,
                    error = %e,
                    "Failed to parse line: {}...",
                    preview(line)
                );
                loaded.skipped += 1;
                continue;
            }
        };

        match Event::from_value(value) {
            Some(event) => loaded.events.push(event),
            None => {
                tracing::warn!(line = line_number, "Line is not a JSON object: {}...", preview(line));
                loaded.skipped += 1;
            }
        }
    }

    tracing::info!(skipped = loaded.skipped, "Parsed {} events", loaded.events.len());

    Ok(loaded)
}

fn preview(line: &[u8]) -> String {
    String::from_utf8_lossy(line).chars().take(PREVIEW_CHARS).collect()
}
