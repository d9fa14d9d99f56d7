//! HAR log reader.
//!
//! Maps `log.entries[]` of an HTTP Archive capture onto [`Transaction`]s.
//! The reader is deliberately forgiving about per-entry shape (missing
//! requests, bodiless responses) but a file that cannot be read or whose
//! top level is not valid HAR JSON is fatal for the whole run.

use std::path::Path;

use serde::Deserialize;
use url::Url;

use crate::error::HarvestError;
use crate::models::Transaction;

/// Query parameter carrying the RPC framework's session identifier.
const SESSION_HINT_PARAM: &str = "f.sid";

#[derive(Debug, Deserialize)]
struct HarFile {
    log: HarLog,
}

#[derive(Debug, Deserialize, Default)]
struct HarLog {
    #[serde(default)]
    entries: Vec<HarEntry>,
}

#[derive(Debug, Deserialize, Default)]
struct HarEntry {
    #[serde(default)]
    request: HarRequest,
    #[serde(default)]
    response: HarResponse,
}

#[derive(Debug, Deserialize, Default)]
struct HarRequest {
    #[serde(default)]
    url: String,
}

#[derive(Debug, Deserialize, Default)]
struct HarResponse {
    #[serde(default)]
    content: HarContent,
}

#[derive(Debug, Deserialize, Default)]
struct HarContent {
    #[serde(rename = "mimeType", default)]
    mime_type: String,
    text: Option<String>,
    encoding: Option<String>,
}

/// Load every entry of the HAR file at `path` as a [`Transaction`],
/// preserving capture order.
pub fn load_transactions(path: &Path) -> Result<Vec<Transaction>, HarvestError> {
    let text = std::fs::read_to_string(path)?;
    parse_har(&text)
}

/// Parse HAR JSON text into transactions.
pub fn parse_har(text: &str) -> Result<Vec<Transaction>, HarvestError> {
    let har: HarFile = serde_json::from_str(text).map_err(HarvestError::Har)?;

    let transactions = har
        .log
        .entries
        .into_iter()
        .map(|entry| {
            let session_hint = session_hint_from_url(&entry.request.url);
            Transaction {
                url: entry.request.url,
                content_kind: entry.response.content.mime_type,
                body: entry.response.content.text,
                encoding: entry.response.content.encoding,
                session_hint,
            }
        })
        .collect::<Vec<_>>();

    tracing::info!("Loaded {} HAR entries", transactions.len());
    Ok(transactions)
}

fn session_hint_from_url(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == SESSION_HINT_PARAM)
        .map(|(_, value)| value.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn har_with_entries(entries: &str) -> String {
        format!(r#"{{"log": {{"version": "1.2", "entries": [{}]}}}}"#, entries)
    }

    #[test]
    fn test_parses_entry_fields() {
        let text = har_with_entries(
            r#"{
                "request": {"url": "https://gemini.google.com/app"},
                "response": {"content": {"mimeType": "application/json", "text": "[]"}}
            }"#,
        );

        let transactions = parse_har(&text).unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].url, "https://gemini.google.com/app");
        assert_eq!(transactions[0].content_kind, "application/json");
        assert_eq!(transactions[0].body.as_deref(), Some("[]"));
        assert!(transactions[0].encoding.is_none());
    }

    #[test]
    fn test_session_hint_from_query_parameter() {
        let text = har_with_entries(
            r#"{
                "request": {"url": "https://example.com/batchexecute?rpcids=abc&f.sid=-12345&bl=xyz"},
                "response": {"content": {"mimeType": "application/json"}}
            }"#,
        );

        let transactions = parse_har(&text).unwrap();
        assert_eq!(transactions[0].session_hint.as_deref(), Some("-12345"));
    }

    #[test]
    fn test_entry_without_body_or_url() {
        let text = har_with_entries(r#"{"request": {}, "response": {}}"#);

        let transactions = parse_har(&text).unwrap();
        assert_eq!(transactions.len(), 1);
        assert!(transactions[0].body.is_none());
        assert!(transactions[0].session_hint.is_none());
    }

    #[test]
    fn test_invalid_har_is_fatal() {
        let err = parse_har("{not valid json").unwrap_err();
        assert!(matches!(err, HarvestError::Har(_)));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let err = load_transactions(Path::new("/nonexistent/capture.har")).unwrap_err();
        assert!(matches!(err, HarvestError::Io(_)));
    }
}
