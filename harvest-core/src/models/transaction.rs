use serde::{Deserialize, Serialize};

/// One captured network exchange, as read from the HAR log.
///
/// The body is carried exactly as the capture recorded it; reversing the
/// declared transport encoding is the transaction decoder's job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub url: String,
    /// Declared MIME type of the response body.
    pub content_kind: String,
    /// Raw response body text, possibly still base64-encoded.
    pub body: Option<String>,
    /// Declared transport encoding of `body` (`"base64"` in practice).
    pub encoding: Option<String>,
    /// Session hint pulled from the request URL's `f.sid` query parameter.
    pub session_hint: Option<String>,
}
