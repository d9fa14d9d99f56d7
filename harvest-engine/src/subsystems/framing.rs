//! Framing stripper: peels the non-JSON wrapping off RPC response bodies.
//!
//! Two framings occur in the wild, each optional and independently
//! detectable:
//! - the anti-hijacking literal `)]}'` at the very start of the body
//! - a decimal chunk-length run, then whitespace, then the JSON itself
//!
//! Stripping is idempotent: the output always starts at a JSON opening
//! bracket (or is returned unchanged), so a second pass is a no-op.

use regex::Regex;

/// Literal prefix Google-style RPC endpoints prepend against JSON hijacking.
const ANTI_HIJACK_PREFIX: &str = ")]}'";

/// Chunk-length framing: digit run, at least one whitespace char, then the
/// opening bracket of the real document. Leading whitespace is tolerated
/// because the length run follows the stripped anti-hijack line.
const LENGTH_PREFIX_PATTERN: &str = r"^\s*[0-9]+\s+[\[{]";

/// Remove any recognized framing from the front of `text`.
///
/// Text that does not match either convention is returned unchanged; in
/// particular a digit run NOT followed by whitespace-then-bracket is left
/// alone, since it may be a legitimate JSON number document.
pub fn strip_framing(text: &str) -> &str {
    let mut text = text;
    while let Some(rest) = text.strip_prefix(ANTI_HIJACK_PREFIX) {
        text = rest;
    }

    if let Ok(re) = Regex::new(LENGTH_PREFIX_PATTERN) {
        if let Some(m) = re.find(text) {
            // The match ends one byte past the opening bracket; keep it.
            return &text[m.end() - 1..];
        }
    }
    text
}
