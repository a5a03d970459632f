//! Line-oriented `key = value` parsing.

use std::collections::HashMap;

use tracing::error;

use super::value::{coerce_value, PropertyValue};

/// Receives the assignments produced by [`parse_properties`].
pub trait PropertySink {
    fn add(&mut self, property: String, value: PropertyValue);
}

impl PropertySink for HashMap<String, PropertyValue> {
    fn add(&mut self, property: String, value: PropertyValue) {
        self.insert(property, value);
    }
}

/// Parses `text` into `sink`, one assignment per line.
///
/// Everything from the first `#` to the end of the line is a comment. Blank
/// lines are ignored. A line without a key before its `=` is logged against
/// `name` and skipped.
pub fn parse_properties(sink: &mut impl PropertySink, text: &str, name: &str) {
    for (index, raw) in text.lines().enumerate() {
        let line = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        }
        .trim();
        if line.is_empty() {
            continue;
        }

        match split_assignment(line) {
            Some((key, value)) => sink.add(key.to_string(), coerce_value(value)),
            None => error!("Bad line: {} in {}: {}", line, name, index + 1),
        }
    }
}

fn split_assignment(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value.trim()))
}
