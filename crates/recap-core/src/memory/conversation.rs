//! Conversation memory threaded through summarization calls.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::types::Message;

/// One user request and the assistant reply it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    pub user: String,
    pub assistant: String,
}

/// Ordered record of prior exchanges in one logical conversation.
///
/// Exchanges are appended as a whole, so the replayed history always
/// alternates user and assistant turns. When a bound is set the oldest
/// exchanges are evicted first. Callers sharing an instance across tasks
/// must serialize access themselves.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationMemory {
    exchanges: VecDeque<Exchange>,
    max_exchanges: Option<usize>,
}

impl ConversationMemory {
    /// Create an unbounded memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a memory holding at most `max_exchanges` exchanges.
    pub fn with_max_exchanges(max_exchanges: usize) -> Self {
        Self {
            exchanges: VecDeque::new(),
            max_exchanges: Some(max_exchanges),
        }
    }

    pub fn max_exchanges(&self) -> Option<usize> {
        self.max_exchanges
    }

    /// Exchanges in the order they were recorded.
    pub fn exchanges(&self) -> impl Iterator<Item = &Exchange> {
        self.exchanges.iter()
    }

    /// Replay the history as alternating user/assistant messages.
    pub fn messages(&self) -> Vec<Message> {
        self.exchanges
            .iter()
            .flat_map(|e| [Message::user(&e.user), Message::assistant(&e.assistant)])
            .collect()
    }

    /// Number of recorded exchanges.
    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    /// Append a user turn and its reply together.
    pub fn record_exchange(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        if self.max_exchanges == Some(0) {
            return;
        }

        self.exchanges.push_back(Exchange {
            user: user.into(),
            assistant: assistant.into(),
        });

        if let Some(max) = self.max_exchanges {
            while self.exchanges.len() > max {
                self.exchanges.pop_front();
            }
        }
    }

    pub fn clear(&mut self) {
        self.exchanges.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MessageRole;

    #[test]
    fn test_replay_alternates_roles() {
        let mut memory = ConversationMemory::new();
        memory.record_exchange("first question", "first answer");
        memory.record_exchange("second question", "second answer");

        let messages = memory.messages();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0], Message::user("first question"));
        assert_eq!(messages[1], Message::assistant("first answer"));
        assert_eq!(messages[2].role, MessageRole::User);
        assert_eq!(messages[3].content, "second answer");
    }

    #[test]
    fn test_bound_evicts_oldest_exchange() {
        let mut memory = ConversationMemory::with_max_exchanges(2);
        memory.record_exchange("q1", "a1");
        memory.record_exchange("q2", "a2");
        memory.record_exchange("q3", "a3");

        assert_eq!(memory.len(), 2);
        let users: Vec<_> = memory.exchanges().map(|e| e.user.as_str()).collect();
        assert_eq!(users, vec!["q2", "q3"]);
        assert_eq!(memory.messages()[0], Message::user("q2"));
    }

    #[test]
    fn test_zero_bound_keeps_nothing() {
        let mut memory = ConversationMemory::with_max_exchanges(0);
        memory.record_exchange("q", "a");
        assert!(memory.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut memory = ConversationMemory::new();
        memory.record_exchange("q", "a");
        memory.clear();
        assert!(memory.is_empty());
        assert!(memory.messages().is_empty());
    }
}
