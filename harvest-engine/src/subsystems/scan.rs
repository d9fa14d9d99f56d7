//! Payload scanner: finds record-bearing JSON wherever the transport hid
//! it.
//!
//! Two entry points cover the two transports that carry chat data:
//! [`scan_payload`] for RPC bodies (framed, possibly chunked, with
//! records buried in double-encoded string fragments) and [`scan_html`]
//! for pages that hydrate state through inline bootstrap script blocks.

use regex::Regex;
use serde_json::{Deserializer, Value};

use harvest_core::ChatTurn;

use super::extract::{self, ExtractContext};
use super::framing;

/// Invocation marker of a data-bootstrap script block.
const BOOTSTRAP_MARKER: &str = "AF_initDataCallback";

/// Key preceding the array literal inside a bootstrap block.
const DATA_KEY: &str = "data:";

/// Script elements, body captured. `(?s)` so blocks spanning lines match.
const SCRIPT_PATTERN: &str = r"(?s)<script[^>]*>(.*?)</script>";

/// RPC entry point: strip framing, then walk every top-level JSON
/// document in the body.
///
/// Streamed RPC responses concatenate several whitespace-separated
/// documents (interleaved with bare chunk-length numbers, which parse as
/// standalone number documents and fall out of the value walk naturally).
/// The loop stops cleanly at end of input; a parse failure mid-stream
/// ends this transaction's processing without failing the run.
pub fn scan_payload(body: &str, ctx: &ExtractContext) -> Vec<ChatTurn> {
    let stripped = framing::strip_framing(body);

    let mut turns = Vec::new();
    for document in Deserializer::from_str(stripped).into_iter::<Value>() {
        match document {
            Ok(value) => turns.extend(scan_value(&value, ctx)),
            Err(e) => {
                tracing::debug!("Stopping at unparseable stream document: {}", e);
                break;
            }
        }
    }
    turns
}

/// Extract records from one outer JSON value: the value itself is handed
/// to the record extractor, then every embedded stringified fragment is
/// decoded and treated as a new outer value in turn.
pub fn scan_value(value: &Value, ctx: &ExtractContext) -> Vec<ChatTurn> {
    let mut turns = extract::extract_turns(value, ctx);
    turns.extend(scan_embedded(value, ctx));
    turns
}

/// Depth-first search for double-encoded fragments: a string element of a
/// sequence qualifies when, after trimming, it opens with two consecutive
/// opening brackets and ends with a closing bracket. Qualifying strings
/// that fail to parse are skipped silently; fragments can nest, so every
/// decoded fragment is scanned again.
fn scan_embedded(value: &Value, ctx: &ExtractContext) -> Vec<ChatTurn> {
    let mut turns = Vec::new();
    match value {
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::String(text) if looks_like_embedded_json(text) => {
                        if let Ok(decoded) = serde_json::from_str::<Value>(text.trim()) {
                            turns.extend(scan_value(&decoded, ctx));
                        }
                    }
                    Value::Array(_) | Value::Object(_) => {
                        turns.extend(scan_embedded(item, ctx));
                    }
                    _ => {}
                }
            }
        }
        Value::Object(map) => {
            for child in map.values() {
                turns.extend(scan_embedded(child, ctx));
            }
        }
        _ => {}
    }
    turns
}

/// Cheap shape test before attempting a real parse.
fn looks_like_embedded_json(text: &str) -> bool {
    let trimmed = text.trim();
    let mut chars = trimmed.chars();
    let opens_double = matches!(
        (chars.next(), chars.next()),
        (Some(a), Some(b)) if is_opening_bracket(a) && is_opening_bracket(b)
    );
    opens_double && trimmed.ends_with([']', '}'])
}

fn is_opening_bracket(c: char) -> bool {
    c == '[' || c == '{'
}

/// HTML entry point: records live in the `data:` array literal of inline
/// bootstrap script blocks. Unlike the RPC case the literal is plain
/// JSON, not double-encoded, so it goes straight to the extractor.
pub fn scan_html(document: &str, ctx: &ExtractContext) -> Vec<ChatTurn> {
    let Ok(script_re) = Regex::new(SCRIPT_PATTERN) else {
        return Vec::new();
    };

    let mut turns = Vec::new();
    for captures in script_re.captures_iter(document) {
        let script = &captures[1];
        if !script.contains(BOOTSTRAP_MARKER) {
            continue;
        }
        let Some(literal) = bootstrap_data_literal(script) else {
            continue;
        };
        match serde_json::from_str::<Value>(literal) {
            Ok(value) => turns.extend(extract::extract_turns(&value, ctx)),
            Err(e) => tracing::debug!("Bootstrap data block failed to parse: {}", e),
        }
    }
    turns
}

/// Locate the `data:` field's array literal by text search and return the
/// balanced `[...]` slice.
fn bootstrap_data_literal(script: &str) -> Option<&str> {
    let data_pos = script.find(DATA_KEY)?;
    let after = &script[data_pos + DATA_KEY.len()..];
    let array_start = after.find('[')?;
    balanced_array(&after[array_start..])
}

/// Slice from the opening `[` to its matching `]`, string-literal and
/// escape aware.
fn balanced_array(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, b) in text.bytes().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'[' => depth += 1,
            b']' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&text[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}
