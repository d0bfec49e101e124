//! Bounded per-session conversation history

use std::collections::VecDeque;

use dashmap::DashMap;

/// One exchanged (query, answer) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationTurn {
    /// The user's query
    pub query: String,
    /// The generated answer
    pub answer: String,
}

/// Conversation histories keyed by (user_id, session_id)
///
/// Each history is bounded at `max_history` turns with FIFO eviction. The
/// sharded map means sessions do not contend with each other; mutations of a
/// single session are serialized by its entry guard.
pub struct SessionStore {
    sessions: DashMap<(String, String), VecDeque<ConversationTurn>>,
    max_history: usize,
}

impl SessionStore {
    /// Create a store keeping at most `max_history` turns per session
    pub fn new(max_history: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            max_history,
        }
    }

    /// Append a turn, evicting the oldest when the session is full
    pub fn append(&self, user_id: &str, session_id: &str, query: &str, answer: &str) {
        let key = (user_id.to_string(), session_id.to_string());
        let mut history = self.sessions.entry(key).or_default();

        history.push_back(ConversationTurn {
            query: query.to_string(),
            answer: answer.to_string(),
        });

        while history.len() > self.max_history {
            history.pop_front();
        }
    }

    /// Snapshot of the history for one session, oldest turn first
    pub fn history(&self, user_id: &str, session_id: &str) -> Vec<ConversationTurn> {
        let key = (user_id.to_string(), session_id.to_string());
        self.sessions
            .get(&key)
            .map(|history| history.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Remove a session's history; clearing an absent session is a no-op
    pub fn clear(&self, user_id: &str, session_id: &str) {
        let key = (user_id.to_string(), session_id.to_string());
        self.sessions.remove(&key);
    }
}
