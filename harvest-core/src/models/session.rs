use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::ChatTurn;

/// A contiguous run of chat turns separated by no more than the
/// configured inactivity gap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub session_id: String,
    pub start_time: NaiveDateTime,
    pub message_count: usize,
    pub messages: Vec<ChatTurn>,
}
