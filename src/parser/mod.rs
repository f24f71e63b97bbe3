use anyhow::{Context, Result, anyhow};
use log::{info, warn};
use serde_json::Value;

use crate::model::{CommandList, Event, MapEvents};

/// Parse a map export into its events.
///
/// The file is expected to contain a top-level `events` entry, either an
/// object keyed by event id (as the engine stores it) or a plain array.
/// `null` slots, which the exporter writes for deleted ids, are skipped.
pub fn load_from_json(json: &str) -> Result<MapEvents> {
    let root: Value = serde_json::from_str(json).context("Failed to parse JSON")?;

    let events = root
        .get("events")
        .ok_or_else(|| anyhow!("file has no `events` entry"))?;

    let slots: Vec<(String, &Value)> = match events {
        Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
        Value::Array(arr) => arr
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        _ => return Err(anyhow!("`events` must be an object or an array")),
    };

    info!("Found {} event slots", slots.len());

    let mut out = Vec::with_capacity(slots.len());
    for (key, value) in slots {
        if value.is_null() {
            continue;
        }
        let event = parse_event(&key, value)?;
        info!("Event {} '{}': {} page(s)", event.id, event.name, event.pages.len());
        out.push(event);
    }
    out.sort_by_key(|e| e.id);

    Ok(MapEvents { events: out })
}

/// Parse one page's command list (a JSON array of command records).
pub fn load_command_list(json: &str) -> Result<CommandList> {
    let list: CommandList = serde_json::from_str(json).context("Parsing command list")?;
    info!("Command list parsed: {} commands", list.len());
    Ok(list)
}

fn parse_event(key: &str, value: &Value) -> Result<Event> {
    let mut event: Event = serde_json::from_value(value.clone())
        .with_context(|| format!("event `{key}` is malformed"))?;

    if event.pages.is_empty() {
        warn!("event {} has no pages", event.id);
    }
    for (i, page) in event.pages.iter().enumerate() {
        if page.list.is_empty() {
            warn!("event {} page {} has an empty command list", event.id, i + 1);
        }
    }
    if let Ok(id) = key.parse::<u32>() {
        if id != event.id && id != 0 {
            warn!("event key {} does not match its id {}; using the id", id, event.id);
        }
    }
    if event.name.is_empty() {
        event.name = format!("EV{:03}", event.id);
    }
    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Indent;

    #[test]
    fn events_keyed_by_id() {
        let json = r#"{
            "events": {
                "2": {"id": 2, "name": "Door", "x": 1, "y": 2,
                      "pages": [{"list": [{"code": 101, "indent": "0", "parameters": ["hi"]}]}]},
                "1": {"id": 1, "pages": []}
            }
        }"#;
        let map = load_from_json(json).unwrap();
        assert_eq!(map.events.len(), 2);
        assert_eq!(map.events[0].id, 1);
        assert_eq!(map.events[0].name, "EV001");
        assert_eq!(map.events[1].pages[0].list.len(), 1);
    }

    #[test]
    fn events_as_array_with_null_slots() {
        let json = r#"{"events": [null, {"id": 1, "name": "A", "pages": [{"list": []}]}]}"#;
        let map = load_from_json(json).unwrap();
        assert_eq!(map.events.len(), 1);
        assert_eq!(map.events[0].name, "A");
    }

    #[test]
    fn missing_events_is_an_error() {
        let err = load_from_json(r#"{"tiles": []}"#).unwrap_err();
        assert!(err.to_string().contains("no `events`"), "got: {err}");
    }

    #[test]
    fn command_list_accepts_numeric_and_label_indents() {
        let list = load_command_list(
            r#"[{"code": 509, "indent": "Jump", "parameters": []},
                {"code": 101, "indent": 2, "parameters": ["x"]}]"#,
        )
        .unwrap();
        assert_eq!(list.get(0).unwrap().indent, Indent::Placeholder("Jump".into()));
        assert_eq!(list.get(1).unwrap().indent, Indent::Level(2));
    }
}
