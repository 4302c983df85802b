//! LLM response parsing into life events.
//!
//! Models are asked for a bare JSON array but often wrap it in a code
//! fence, surround it with prose, or leave a trailing comma. Each recovery
//! strategy is tried in turn. Individual entries are validated leniently:
//! an entry without a name or a usable age is dropped, an unknown type
//! becomes `standard`.

use lifetree_types::{EventCategory, LifeEvent, MAX_AGE_YEARS};
use tracing::{debug, warn};

use crate::error::NarratorError;

/// Parse an LLM response into events.
///
/// Strategies, in order:
/// 1. Direct `serde_json` parse of the trimmed text
/// 2. Contents of a markdown code block
/// 3. The span from the first `[` to the last `]`
///
/// Each candidate is retried with trailing commas stripped. Fails with
/// [`NarratorError::Parse`] when no candidate yields a JSON array.
pub fn parse_events(raw: &str) -> Result<Vec<LifeEvent>, NarratorError> {
    let entries = extract_array(raw.trim()).ok_or_else(|| {
        NarratorError::Parse(format!("no JSON event array found in response: {}", raw.trim()))
    })?;

    let total = entries.len();
    let events: Vec<LifeEvent> = entries.iter().filter_map(convert_entry).collect();

    if events.len() < total {
        warn!(
            kept = events.len(),
            dropped = total.saturating_sub(events.len()),
            "dropped malformed events from LLM response"
        );
    }
    debug!(events = events.len(), "parsed LLM events");

    Ok(events)
}

/// Find the first candidate that parses as a JSON array.
fn extract_array(text: &str) -> Option<Vec<serde_json::Value>> {
    let candidates = [
        Some(text),
        extract_json_from_codeblock(text),
        extract_bracket_span(text),
    ];

    candidates.into_iter().flatten().find_map(|candidate| {
        serde_json::from_str::<Vec<serde_json::Value>>(candidate)
            .ok()
            .or_else(|| serde_json::from_str(&strip_trailing_commas(candidate)).ok())
    })
}

/// Turn one array entry into an event, or `None` if it is unusable.
fn convert_entry(entry: &serde_json::Value) -> Option<LifeEvent> {
    let name = entry.get("name")?.as_str()?.trim();
    if name.is_empty() {
        return None;
    }

    let age = entry.get("age").and_then(parse_age)?;

    let category = entry
        .get("type")
        .and_then(serde_json::Value::as_str)
        .and_then(EventCategory::parse)
        .unwrap_or(EventCategory::Standard);

    Some(LifeEvent::at_age(name, age, category))
}

/// Accept integer ages, whole-number floats, and numeric strings in
/// `0..=99`.
fn parse_age(value: &serde_json::Value) -> Option<u8> {
    let age = match value {
        serde_json::Value::Number(n) => n.as_u64().or_else(|| {
            let f = n.as_f64()?;
            (0..=MAX_AGE_YEARS)
                .find(|a| (f64::from(*a) - f).abs() < f64::EPSILON)
                .map(u64::from)
        }),
        serde_json::Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }?;
    u8::try_from(age).ok().filter(|a| *a <= MAX_AGE_YEARS)
}

/// Extract JSON content from a markdown code block.
fn extract_json_from_codeblock(text: &str) -> Option<&str> {
    let start = text
        .find("```json")
        .map(|i| i.saturating_add(7))
        .or_else(|| text.find("```").map(|i| i.saturating_add(3)))?;

    let body_start = text
        .get(start..)
        .and_then(|s| s.find('\n'))
        .and_then(|nl| start.checked_add(nl))
        .and_then(|pos| pos.checked_add(1))
        .unwrap_or(start);

    let remaining = text.get(body_start..)?;
    let end = remaining.find("```")?;
    remaining.get(..end).map(str::trim)
}

/// The span from the first `[` to the last `]`, inclusive.
fn extract_bracket_span(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end < start {
        return None;
    }
    text.get(start..=end)
}

/// Strip trailing commas before closing braces and brackets.
fn strip_trailing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut result = String::with_capacity(text.len());

    for (i, &c) in chars.iter().enumerate() {
        if c == ',' {
            let next = chars
                .iter()
                .skip(i.saturating_add(1))
                .copied()
                .find(|ch| !ch.is_whitespace());
            if matches!(next, Some('}' | ']')) {
                continue;
            }
        }
        result.push(c);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(events: &[LifeEvent]) -> Vec<&str> {
        events.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn parse_clean_array() {
        let raw = r#"[
            {"name": "First Steps", "age": 1, "type": "standard"},
            {"name": "Flood", "age": 12, "type": "karmic"},
            {"name": "Inheritance", "age": 58, "type": "dharmic"}
        ]"#;
        let events = parse_events(raw);
        assert!(events.is_ok());
        let events = events.unwrap_or_default();
        assert_eq!(names(&events), vec!["First Steps", "Flood", "Inheritance"]);
        assert!((events.get(1).map_or(0.0, |e| e.time) - 0.12).abs() < 1e-12);
        assert_eq!(events.get(2).map(|e| e.category), Some(EventCategory::Dharmic));
    }

    #[test]
    fn parse_from_code_block() {
        let raw = "Here you go:\n```json\n[{\"name\": \"Wedding\", \"age\": 28, \"type\": \"standard\"}]\n```\n";
        let events = parse_events(raw).unwrap_or_default();
        assert_eq!(names(&events), vec!["Wedding"]);
    }

    #[test]
    fn parse_with_surrounding_prose() {
        let raw = r#"Sure! The life: [{"name": "Bankruptcy", "age": 42, "type": "karmic"}] Hope it helps."#;
        let events = parse_events(raw).unwrap_or_default();
        assert_eq!(names(&events), vec!["Bankruptcy"]);
    }

    #[test]
    fn parse_with_trailing_commas() {
        let raw = r#"```
[
  {"name": "Promotion", "age": 30, "type": "standard",},
  {"name": "Lottery Win", "age": 40, "type": "dharmic"},
]
```"#;
        let events = parse_events(raw).unwrap_or_default();
        assert_eq!(names(&events), vec!["Promotion", "Lottery Win"]);
    }

    #[test]
    fn unknown_type_falls_back_to_standard() {
        let raw = r#"[{"name": "Strange Dream", "age": 33, "type": "mystic"}, {"name": "Trip", "age": 24}]"#;
        let events = parse_events(raw).unwrap_or_default();
        assert!(events.iter().all(|e| e.category == EventCategory::Standard));
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn out_of_range_and_malformed_entries_are_dropped() {
        let raw = r#"[
            {"name": "Too Old", "age": 104, "type": "standard"},
            {"name": "Negative", "age": -3, "type": "standard"},
            {"name": "", "age": 10, "type": "standard"},
            {"age": 10, "type": "standard"},
            {"name": "Fractional", "age": 30.5},
            {"name": "Stringly", "age": "45", "type": "karmic"},
            {"name": "Float Age", "age": 50.0, "type": "dharmic"}
        ]"#;
        let events = parse_events(raw).unwrap_or_default();
        assert_eq!(names(&events), vec!["Stringly", "Float Age"]);
        assert_eq!(events.get(1).map(|e| e.age_years), Some(50));
    }

    #[test]
    fn no_array_is_a_parse_error() {
        assert!(matches!(
            parse_events("I cannot help with that."),
            Err(NarratorError::Parse(_))
        ));
        assert!(matches!(parse_events("{\"events\": 3}"), Err(NarratorError::Parse(_))));
    }

    #[test]
    fn strip_trailing_commas_array() {
        assert_eq!(strip_trailing_commas("[1, 2, 3,]"), "[1, 2, 3]");
        assert_eq!(strip_trailing_commas(r#"{"a": 1, "b": 2,  }"#), r#"{"a": 1, "b": 2  }"#);
    }
}
