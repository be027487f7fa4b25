//! Submission flow: user text in, companion reply out.
//!
//! A session owns one conversation. `send` takes `&mut self`, so at most one
//! reply is ever in flight and appends land in decision order. Dropping the
//! `send` future during the thinking delay discards the pending reply.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use kindred_core::config::KindredConfig;
use kindred_core::types::Message;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::engine::ReplyEngine;
use crate::error::ChatError;
use crate::persistence::{load_history, save_history, FileHistoryStore, HistoryStore};
use crate::store::ConversationStore;
use crate::timing;

/// Shared "companion is typing" flag for the render surface.
#[derive(Debug, Clone, Default)]
pub struct PendingIndicator(Arc<AtomicBool>);

impl PendingIndicator {
    pub fn is_pending(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn set(&self, value: bool) {
        self.0.store(value, Ordering::Release);
    }
}

/// Raises the indicator for its lifetime, lowering it even on cancellation.
struct TypingGuard(PendingIndicator);

impl TypingGuard {
    fn raise(indicator: &PendingIndicator) -> Self {
        indicator.set(true);
        Self(indicator.clone())
    }
}

impl Drop for TypingGuard {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// One persisted conversation with the companion.
pub struct ChatSession<S: HistoryStore, R: Rng = StdRng> {
    history: ConversationStore,
    engine: ReplyEngine,
    backend: S,
    key: String,
    greeting: String,
    rng: R,
    pending: PendingIndicator,
}

impl<S: HistoryStore> ChatSession<S, StdRng> {
    /// Open the conversation saved in `backend`, seeding randomness from the OS.
    pub fn open(config: &KindredConfig, backend: S) -> Self {
        Self::with_rng(config, backend, StdRng::from_os_rng())
    }
}

impl ChatSession<FileHistoryStore, StdRng> {
    /// Open the conversation kept under `[general] data_dir`.
    pub fn open_on_disk(config: &KindredConfig) -> Result<Self, ChatError> {
        let backend = FileHistoryStore::from_config(&config.general)?;
        Ok(Self::open(config, backend))
    }
}

impl<S: HistoryStore, R: Rng> ChatSession<S, R> {
    /// Open the conversation saved in `backend` with an explicit random source.
    pub fn with_rng(config: &KindredConfig, backend: S, rng: R) -> Self {
        let key = config.companion.history_key.clone();
        let greeting = config.companion.greeting.clone();
        let history = load_history(&backend, &key, &greeting);
        tracing::info!(key = %key, messages = history.len(), "Chat session opened");
        Self {
            history,
            engine: ReplyEngine::new(config.engine.clone()),
            backend,
            key,
            greeting,
            rng,
            pending: PendingIndicator::default(),
        }
    }

    /// Submit user text and wait for the companion's reply.
    ///
    /// Blank input is ignored and returns `None` without touching the
    /// history. Otherwise the trimmed text is appended, the engine decides,
    /// the pending indicator is raised for the thinking delay, and the reply
    /// is appended and returned. Both appends are persisted.
    pub async fn send(&mut self, text: &str) -> Option<Message> {
        let utterance = text.trim();
        if utterance.is_empty() {
            tracing::debug!("Ignoring blank submission");
            return None;
        }

        if let Err(e) = self.history.append(Message::user(utterance)) {
            tracing::warn!(error = %e, "User message rejected");
            return None;
        }
        self.persist();

        let decision = self
            .engine
            .decide(self.history.messages(), utterance, &mut self.rng);

        {
            let _typing = TypingGuard::raise(&self.pending);
            timing::wait(decision.delay).await;
        }

        let reply = Message::companion(decision.reply);
        if let Err(e) = self.history.append(reply.clone()) {
            tracing::warn!(error = %e, "Companion reply rejected");
            return None;
        }
        self.persist();
        tracing::debug!(source = ?decision.source, "Reply delivered");
        Some(reply)
    }

    /// Start over with only the greeting.
    pub fn clear(&mut self) {
        self.history = ConversationStore::seeded(&self.greeting);
        self.persist();
        tracing::info!(key = %self.key, "Conversation cleared");
    }

    pub fn history(&self) -> &ConversationStore {
        &self.history
    }

    /// Handle for rendering the typing affordance.
    pub fn pending(&self) -> PendingIndicator {
        self.pending.clone()
    }

    pub fn engine(&self) -> &ReplyEngine {
        &self.engine
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    fn persist(&self) {
        if let Err(e) = save_history(&self.backend, &self.key, &self.history) {
            tracing::warn!(key = %self.key, error = %e, "Failed to persist history");
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
