//! Record extractor: positional/structural signature matching over
//! untyped nested arrays.
//!
//! The wire format carries no named schema; a chat turn is recognized
//! purely by the shape of the array it sits in. The index contracts are
//! documented on each predicate so a format change touches one function.

use chrono::{DateTime, NaiveDateTime};
use serde_json::Value;

use harvest_core::{ChatTurn, ResponseRenderer};

/// Literal at slot 2 of the prompt-signature sub-array.
const PROMPT_MARKER: &str = "Prompted";

/// Epoch integers above this are microseconds since epoch.
const MICROS_FLOOR: i64 = 1_600_000_000_000_000;

/// Epoch integers above this (and below [`MICROS_FLOOR`]) are milliseconds.
const MILLIS_FLOOR: i64 = 1_600_000_000_000;

/// Record slots that carry opaque traceability identifiers when present.
const TRACE_ID_SLOTS: [usize; 2] = [5, 6];

/// Per-transaction context threaded through extraction.
pub struct ExtractContext<'a> {
    /// Index of the originating transaction in the input log.
    pub source_entry: usize,
    /// Session hint from the transaction URL, if any.
    pub session_hint: Option<&'a str>,
    /// HTML -> markdown collaborator for response bodies.
    pub renderer: &'a dyn ResponseRenderer,
}

/// Walk `value` for chat-turn records.
///
/// An array containing a prompt-signature element at any position IS a
/// record: at most one turn is emitted and the walk does not descend
/// beneath it (a matched record does not contain further distinct
/// records). Any other array recurses into its elements; non-arrays
/// yield nothing.
pub fn extract_turns(value: &Value, ctx: &ExtractContext) -> Vec<ChatTurn> {
    let Value::Array(items) = value else {
        return Vec::new();
    };

    if items.iter().any(is_prompt_signature) {
        return build_turn(items, ctx).into_iter().collect();
    }

    items
        .iter()
        .flat_map(|item| extract_turns(item, ctx))
        .collect()
}

/// Prompt-signature contract: an array of length >= 3 whose slot 2 is the
/// literal `"Prompted"` and whose slot 0 is a non-blank string (the
/// prompt text itself).
fn is_prompt_signature(value: &Value) -> bool {
    let Value::Array(inner) = value else {
        return false;
    };
    inner.len() >= 3
        && inner[2].as_str() == Some(PROMPT_MARKER)
        && inner[0].as_str().is_some_and(|s| !s.trim().is_empty())
}

/// Assemble a turn from a record array that contains a prompt signature.
///
/// The timestamp is mandatory: a record with no qualifying epoch integer
/// is dropped entirely rather than kept as a partial turn.
fn build_turn(items: &[Value], ctx: &ExtractContext) -> Option<ChatTurn> {
    let prompt = items
        .iter()
        .find(|item| is_prompt_signature(item))
        .and_then(signature_prompt)?;

    let Some(timestamp) = find_timestamp(items) else {
        tracing::debug!("Dropping record without a recoverable timestamp");
        return None;
    };

    let response = find_response_html(items).map(|html| ctx.renderer.render(html));

    Some(ChatTurn {
        timestamp,
        prompt,
        response,
        trace_ids: trace_ids_at_slots(items),
        source_entry: ctx.source_entry,
        session_hint: ctx.session_hint.map(str::to_string),
    })
}

/// Slot 0 of a prompt-signature array, trimmed.
fn signature_prompt(value: &Value) -> Option<String> {
    let prompt = value.get(0)?.as_str()?.trim();
    (!prompt.is_empty()).then(|| prompt.to_string())
}

/// First qualifying epoch integer among the record's top-level elements.
/// Integers below the millisecond band (list indices, flags, counters)
/// do not qualify and scanning continues past them.
fn find_timestamp(items: &[Value]) -> Option<NaiveDateTime> {
    items
        .iter()
        .filter_map(Value::as_i64)
        .find_map(classify_epoch)
}

/// Magnitude classification: > 1.6e15 microseconds, > 1.6e12 milliseconds.
fn classify_epoch(value: i64) -> Option<NaiveDateTime> {
    if value > MICROS_FLOOR {
        DateTime::from_timestamp_micros(value).map(|dt| dt.naive_utc())
    } else if value > MILLIS_FLOOR {
        DateTime::from_timestamp_millis(value).map(|dt| dt.naive_utc())
    } else {
        None
    }
}

/// Response-shape contract, scanning record slots from the end backward:
/// take an array element, descend up to two levels through slot 0 (each
/// step only while that slot is itself an array), then accept slot 1 at
/// the arrived-at depth when it is a string containing markup.
///
/// Best-effort: the first structural match from the end wins, which is
/// not necessarily the true response when several nested candidates
/// exist.
fn find_response_html(items: &[Value]) -> Option<&str> {
    items.iter().rev().find_map(|item| {
        if !item.is_array() {
            return None;
        }
        let mut node = item;
        for _ in 0..2 {
            match node.get(0) {
                Some(inner) if inner.is_array() => node = inner,
                _ => break,
            }
        }
        let candidate = node.get(1)?.as_str()?;
        candidate.contains('<').then_some(candidate)
    })
}

/// Opaque identifiers at fixed record slots; no meaning to the engine.
fn trace_ids_at_slots(items: &[Value]) -> Vec<String> {
    TRACE_ID_SLOTS
        .iter()
        .filter_map(|&slot| items.get(slot).and_then(Value::as_str))
        .map(str::to_string)
        .collect()
}
