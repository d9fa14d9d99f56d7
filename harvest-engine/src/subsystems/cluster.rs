//! Session clusterer: partitions the recovered turns at inactivity gaps.

use chrono::Duration;
use harvest_core::{ChatSession, ChatTurn};

/// Sort turns chronologically and split into sessions wherever the gap
/// between consecutive turns is strictly greater than `gap`. A gap
/// exactly equal to the threshold extends the current session.
///
/// Sessions partition the sorted sequence exactly: every turn lands in
/// one session, and boundaries exist only at over-threshold gaps.
pub fn cluster_sessions(mut turns: Vec<ChatTurn>, gap: Duration) -> Vec<ChatSession> {
    if turns.is_empty() {
        return Vec::new();
    }

    // Stable sort: equal timestamps keep insertion (transaction) order.
    turns.sort_by_key(|turn| turn.timestamp);

    let mut sessions = Vec::new();
    let mut current: Vec<ChatTurn> = Vec::new();

    for turn in turns {
        if let Some(previous) = current.last() {
            if turn.timestamp - previous.timestamp > gap {
                let ordinal = sessions.len() + 1;
                sessions.push(seal(current, ordinal));
                current = Vec::new();
            }
        }
        current.push(turn);
    }

    let ordinal = sessions.len() + 1;
    sessions.push(seal(current, ordinal));
    sessions
}

fn seal(messages: Vec<ChatTurn>, ordinal: usize) -> ChatSession {
    ChatSession {
        session_id: format!("session-{:03}", ordinal),
        start_time: messages[0].timestamp,
        message_count: messages.len(),
        messages,
    }
}
