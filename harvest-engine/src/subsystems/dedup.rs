//! Deduplicating accumulator for recovered turns.
//!
//! The same turn routinely surfaces through several traversal paths (the
//! RPC fragment and a re-encountered nested copy, or two transactions
//! replaying the same activity page), so identity is the value pair
//! (timestamp, prompt), never the discovery path.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use harvest_core::ChatTurn;

#[derive(Debug, Default)]
pub struct TurnAccumulator {
    seen: HashSet<(NaiveDateTime, String)>,
    turns: Vec<ChatTurn>,
}

impl TurnAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `turn` unless an equal (timestamp, prompt) pair was already
    /// accumulated. Returns whether the turn was kept. Kept turns stay in
    /// insertion order, which follows transaction order and keeps output
    /// deterministic.
    pub fn insert(&mut self, turn: ChatTurn) -> bool {
        let key = (turn.timestamp, turn.prompt.clone());
        if self.seen.insert(key) {
            self.turns.push(turn);
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn into_turns(self) -> Vec<ChatTurn> {
        self.turns
    }
}
