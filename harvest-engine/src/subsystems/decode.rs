//! Transaction decoder: raw HAR body -> payload text.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use harvest_core::Transaction;

/// Resolve the transport encoding of a transaction body.
///
/// Returns `None` when the body is absent or empty, when the declared
/// encoding cannot be reversed, or when an unknown encoding is declared.
/// A bad body never aborts the run; the caller just moves on.
pub fn decode_body(transaction: &Transaction) -> Option<String> {
    let body = transaction.body.as_deref()?;
    if body.is_empty() {
        return None;
    }

    match transaction.encoding.as_deref() {
        None => Some(body.to_string()),
        Some("base64") => match STANDARD.decode(body.trim()) {
            Ok(bytes) => {
                let text = String::from_utf8_lossy(&bytes).into_owned();
                if text.is_empty() {
                    None
                } else {
                    Some(text)
                }
            }
            Err(e) => {
                tracing::warn!("Skipping body with corrupt base64 transport encoding: {}", e);
                None
            }
        },
        Some(other) => {
            tracing::warn!("Skipping body with unknown transport encoding '{}'", other);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transaction(body: Option<&str>, encoding: Option<&str>) -> Transaction {
        Transaction {
            url: "https://example.com/".to_string(),
            content_kind: "application/json".to_string(),
            body: body.map(str::to_string),
            encoding: encoding.map(str::to_string),
            session_hint: None,
        }
    }

    #[test]
    fn test_plain_body_passes_through() {
        let tx = transaction(Some("[1, 2, 3]"), None);
        assert_eq!(decode_body(&tx).as_deref(), Some("[1, 2, 3]"));
    }

    #[test]
    fn test_base64_body_is_decoded() {
        // "[\"hi\"]" in base64
        let tx = transaction(Some("WyJoaSJd"), Some("base64"));
        assert_eq!(decode_body(&tx).as_deref(), Some(r#"["hi"]"#));
    }

    #[test]
    fn test_corrupt_base64_yields_no_payload() {
        let tx = transaction(Some("!!!not base64!!!"), Some("base64"));
        assert!(decode_body(&tx).is_none());
    }

    #[test]
    fn test_absent_and_empty_bodies() {
        assert!(decode_body(&transaction(None, None)).is_none());
        assert!(decode_body(&transaction(Some(""), None)).is_none());
    }

    #[test]
    fn test_unknown_encoding_yields_no_payload() {
        let tx = transaction(Some("abc"), Some("snappy"));
        assert!(decode_body(&tx).is_none());
    }
}
