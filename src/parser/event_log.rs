//! Event log loader.
//!
//! Decodes a JSON event log into typed events. The log is either a bare
//! array of events or an object carrying the array under one of
//! `EVENT_FIELD_NAMES`. Decoding is strict: an event that fails to parse
//! fails the whole load, since dropping a transition would skew every
//! statistic computed after it.

use super::event::Event;
use crate::utils::config::EVENT_FIELD_NAMES;
use crate::utils::error::ParseError;
use log::{debug, info};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Detected layout of the event log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    /// `[ {event}, ... ]`
    BareArray,
    /// `{ "events": [ {event}, ... ], ... }`
    Wrapped(&'static str),
}

/// Load and decode an event log from disk
///
/// **Public** - main entry point used by commands
///
/// # Errors
/// * `ParseError::IoError` - file cannot be opened
/// * `ParseError::JsonError` - file is not JSON or an event is malformed
/// * `ParseError::InvalidFormat` - no event array found
pub fn load_events(path: impl AsRef<Path>) -> Result<Vec<Event>, ParseError> {
    let path = path.as_ref();
    info!("Loading event log: {}", path.display());

    let file = File::open(path)?;
    let raw: serde_json::Value = serde_json::from_reader(BufReader::new(file))?;

    parse_events(&raw)
}

/// Decode events from an already-parsed JSON value
///
/// **Public** - useful for tests and in-memory logs
pub fn parse_events(raw: &serde_json::Value) -> Result<Vec<Event>, ParseError> {
    let (array, format) = detect_log_format(raw)?;
    debug!("Event log format: {:?}", format);

    let events = parse_event_array(array)?;
    debug!("Decoded {} events", events.len());

    Ok(events)
}

/// Locate the event array and report which layout held it
///
/// **Private** - internal helper for parse_events
fn detect_log_format(
    raw: &serde_json::Value,
) -> Result<(&[serde_json::Value], LogFormat), ParseError> {
    match raw {
        serde_json::Value::Array(items) => Ok((items.as_slice(), LogFormat::BareArray)),

        serde_json::Value::Object(obj) => EVENT_FIELD_NAMES
            .iter()
            .find_map(|field| {
                obj.get(*field)
                    .and_then(|v| v.as_array())
                    .map(|items| (items.as_slice(), LogFormat::Wrapped(*field)))
            })
            .ok_or_else(|| {
                ParseError::InvalidFormat(format!(
                    "object has no event array (looked for {})",
                    EVENT_FIELD_NAMES.join(", ")
                ))
            }),

        _ => Err(ParseError::InvalidFormat(
            "Event log must be a JSON array or object".to_string(),
        )),
    }
}

/// Decode every element of the event array
///
/// **Private** - internal parsing logic
fn parse_event_array(items: &[serde_json::Value]) -> Result<Vec<Event>, ParseError> {
    let mut events = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let event = Event::deserialize(item).map_err(|e| {
            ParseError::InvalidFormat(format!("event {} is malformed: {}", index, e))
        })?;
        events.push(event);
    }

    Ok(events)
}
