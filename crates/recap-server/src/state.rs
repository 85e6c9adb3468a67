//! Server state management.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use recap_core::config::MemoryConfig;
use recap_core::{ContentIngester, ConversationMemory, QuizSummarizer, SummaryStore};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

/// Session used when a request carries no `x-session-id` header.
pub const DEFAULT_SESSION: &str = "default";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    ingester: ContentIngester,
    quiz: QuizSummarizer,
    store: SummaryStore,
    memory_config: MemoryConfig,
    sessions: RwLock<HashMap<String, Session>>,
    /// Monotonic counter stamped on a session each time it is handed out.
    clock: AtomicU64,
}

struct Session {
    memory: Arc<Mutex<ConversationMemory>>,
    last_used: AtomicU64,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        ingester: ContentIngester,
        quiz: QuizSummarizer,
        store: SummaryStore,
        memory_config: MemoryConfig,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                ingester,
                quiz,
                store,
                memory_config,
                sessions: RwLock::new(HashMap::new()),
                clock: AtomicU64::new(0),
            }),
        }
    }

    pub fn ingester(&self) -> &ContentIngester {
        &self.inner.ingester
    }

    pub fn quiz(&self) -> &QuizSummarizer {
        &self.inner.quiz
    }

    pub fn store(&self) -> &SummaryStore {
        &self.inner.store
    }

    /// Conversation memory for `session_id`, created on first use.
    ///
    /// Callers hold the returned lock for the whole summarize call so requests
    /// in the same session are applied one at a time. At most
    /// `max_sessions` conversations are kept; creating one more drops the
    /// least recently used.
    pub async fn session(&self, session_id: &str) -> Arc<Mutex<ConversationMemory>> {
        let now = self.inner.clock.fetch_add(1, Ordering::Relaxed);

        if let Some(session) = self.inner.sessions.read().await.get(session_id) {
            session.last_used.store(now, Ordering::Relaxed);
            return session.memory.clone();
        }

        let mut sessions = self.inner.sessions.write().await;
        if let Some(session) = sessions.get(session_id) {
            session.last_used.store(now, Ordering::Relaxed);
            return session.memory.clone();
        }

        let capacity = self.inner.memory_config.max_sessions.max(1);
        while sessions.len() >= capacity {
            let Some(oldest) = sessions
                .iter()
                .min_by_key(|(_, session)| session.last_used.load(Ordering::Relaxed))
                .map(|(id, _)| id.clone())
            else {
                break;
            };
            sessions.remove(&oldest);
            debug!(session_id = %oldest, "Evicted least recently used session");
        }

        debug!(session_id, "Creating conversation session");
        let memory = match self.inner.memory_config.max_exchanges {
            Some(max) => ConversationMemory::with_max_exchanges(max),
            None => ConversationMemory::new(),
        };
        let memory = Arc::new(Mutex::new(memory));
        sessions.insert(
            session_id.to_string(),
            Session {
                memory: memory.clone(),
                last_used: AtomicU64::new(now),
            },
        );
        memory
    }

    /// Number of live sessions.
    pub async fn session_count(&self) -> usize {
        self.inner.sessions.read().await.len()
    }
}
