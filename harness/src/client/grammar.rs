//! # Structured Output Grammar
//!
//! File: harness/src/client/grammar.rs
//!
//! ## Overview
//!
//! Parsers for the client's structured text output. The client prints
//! protobuf-text-style trees (`field { ... }` blocks nesting `key: value`
//! scalars), and listing commands separate records with dash-rule lines.
//! These parsers own that grammar; the dispatch in `client::output` treats
//! them as opaque functions.
//!
//! Parsed values are `serde_json::Value` trees, so suites can assert on them
//! with ordinary JSON tooling. Repeated fields collect into arrays, matching
//! how repeated protobuf fields print.
//!
use crate::core::error::{HarnessError, Result};
use anyhow::anyhow;
use serde_json::{Map, Number, Value};

/// Parses one structured key/value document into a JSON tree.
///
/// # Errors
///
/// `HarnessError::Grammar` on unbalanced braces or lines that are neither a
/// block delimiter nor a `key: value` scalar. The reported line number is
/// 1-based within `text`.
pub fn parse(text: &str) -> Result<Value> {
    let mut stack: Vec<Map<String, Value>> = vec![Map::new()];
    let mut open_keys: Vec<String> = Vec::new();

    for (index, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(key) = line.strip_suffix('{') {
            let key = key.trim();
            if key.is_empty() {
                return Err(grammar_error(index, "block opened without a field name"));
            }
            open_keys.push(key.to_string());
            stack.push(Map::new());
        } else if line == "}" {
            let closed = stack
                .pop()
                .ok_or_else(|| grammar_error(index, "unmatched closing brace"))?;
            let key = open_keys
                .pop()
                .ok_or_else(|| grammar_error(index, "unmatched closing brace"))?;
            let parent = stack
                .last_mut()
                .ok_or_else(|| grammar_error(index, "unmatched closing brace"))?;
            insert_field(parent, key, Value::Object(closed));
        } else if let Some((key, value)) = line.split_once(':') {
            let parent = stack
                .last_mut()
                .ok_or_else(|| grammar_error(index, "scalar outside any block"))?;
            insert_field(parent, key.trim().to_string(), scalar(value.trim()));
        } else {
            return Err(grammar_error(
                index,
                &format!("unrecognized line '{line}'"),
            ));
        }
    }

    if stack.len() != 1 {
        return Err(anyhow!(HarnessError::Grammar {
            line: text.lines().count(),
            message: "unterminated block".to_string(),
        }));
    }
    Ok(Value::Object(stack.pop().unwrap_or_default()))
}

/// Parses a block listing: dash-separated records, each a key/value document.
pub fn parse_show_blocks(text: &str) -> Result<Vec<Value>> {
    parse_records(text)
}

/// Parses a deploy listing: same sectioning as the block listing.
pub fn parse_show_deploys(text: &str) -> Result<Vec<Value>> {
    parse_records(text)
}

fn parse_records(text: &str) -> Result<Vec<Value>> {
    let mut records = Vec::new();
    for section in split_sections(text) {
        let parsed = parse(&section)?;
        if let Value::Object(map) = &parsed {
            if map.is_empty() {
                continue;
            }
            // A section carrying only the listing count is a trailer, not a
            // record.
            if map.len() == 1 && map.contains_key("count") {
                continue;
            }
        }
        records.push(parsed);
    }
    Ok(records)
}

/// Splits on separator lines. Separators are dash rules, possibly carrying a
/// record label ("----- block @ 0 -----"); content lines never start with a
/// dash.
fn split_sections(text: &str) -> Vec<String> {
    let mut sections = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        if line.trim_start().starts_with("---") {
            if !current.is_empty() {
                sections.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        sections.push(current.join("\n"));
    }
    sections
}

fn insert_field(map: &mut Map<String, Value>, key: String, value: Value) {
    match map.get_mut(&key) {
        None => {
            map.insert(key, value);
        }
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
    }
}

/// Coerces a scalar token: quoted strings are unquoted; integers, floats and
/// booleans parse to their JSON counterparts; everything else stays a string.
fn scalar(raw: &str) -> Value {
    if let Some(stripped) = raw
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        return Value::String(stripped.to_string());
    }
    if let Ok(int) = raw.parse::<i64>() {
        return Value::Number(int.into());
    }
    if let Ok(float) = raw.parse::<f64>() {
        if let Some(number) = Number::from_f64(float) {
            return Value::Number(number);
        }
    }
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::String(raw.to_string()),
    }
}

fn grammar_error(index: usize, message: &str) -> anyhow::Error {
    anyhow!(HarnessError::Grammar {
        line: index + 1,
        message: message.to_string(),
    })
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_nested_blocks_and_scalars() {
        let text = r#"
summary {
  block_hash: "9d2c0f"
  header {
    rank: 1
    timestamp: 1569361938384
  }
}
status {
  fault_tolerance: -0.33
  finalized: true
}
"#;
        let value = parse(text).expect("well-formed document");
        assert_eq!(
            value,
            json!({
                "summary": {
                    "block_hash": "9d2c0f",
                    "header": { "rank": 1, "timestamp": 1569361938384i64 }
                },
                "status": { "fault_tolerance": -0.33, "finalized": true }
            })
        );
    }

    #[test]
    fn test_repeated_fields_collect_into_arrays() {
        let text = "parent_hashes: \"aa\"\nparent_hashes: \"bb\"\n";
        let value = parse(text).expect("repeated scalars");
        assert_eq!(value, json!({ "parent_hashes": ["aa", "bb"] }));

        let blocks = "bond {\n  stake: 10\n}\nbond {\n  stake: 20\n}\n";
        let value = parse(blocks).expect("repeated blocks");
        assert_eq!(
            value,
            json!({ "bond": [{ "stake": 10 }, { "stake": 20 }] })
        );
    }

    #[test]
    fn test_unquoted_non_numeric_scalar_stays_a_string() {
        let value = parse("status: PROCESSED\n").expect("bare token scalar");
        assert_eq!(value, json!({ "status": "PROCESSED" }));
    }

    #[test]
    fn test_unbalanced_document_is_rejected_with_line() {
        let err = parse("header {\n  rank: 1\n").expect_err("unterminated block");
        let harness_err = err
            .downcast_ref::<HarnessError>()
            .expect("typed harness error");
        assert!(matches!(harness_err, HarnessError::Grammar { .. }));

        let err = parse("}\n").expect_err("unmatched closing brace");
        assert!(err
            .downcast_ref::<HarnessError>()
            .is_some_and(|e| matches!(e, HarnessError::Grammar { line: 1, .. })));
    }

    #[test]
    fn test_unrecognized_line_is_rejected() {
        let err = parse("not a field\n").expect_err("free text is not grammar");
        assert!(err
            .downcast_ref::<HarnessError>()
            .is_some_and(|e| matches!(e, HarnessError::Grammar { .. })));
    }

    #[test]
    fn test_listing_splits_records_and_drops_count_trailer() {
        let text = r#"------------- block @ 0 ---------------
summary {
  block_hash: "aa11"
}
-----------------------------------------------------
------------- block @ 1 ---------------
summary {
  block_hash: "bb22"
}
-----------------------------------------------------
count: 2
"#;
        let records = parse_show_blocks(text).expect("listing parses");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["summary"]["block_hash"], json!("aa11"));
        assert_eq!(records[1]["summary"]["block_hash"], json!("bb22"));
    }

    #[test]
    fn test_empty_listing_yields_no_records() {
        assert!(parse_show_deploys("count: 0\n")
            .expect("trailer-only listing")
            .is_empty());
        assert!(parse_show_deploys("").expect("empty listing").is_empty());
    }
}
