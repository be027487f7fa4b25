//! Conversational core for Kindred.
//!
//! Holds the append-only conversation history, the trigger-word reply engine
//! with its context heuristics and simulated thinking delay, history
//! persistence, and the session type that wires them together.

pub mod context;
pub mod engine;
pub mod error;
pub mod persistence;
pub mod rules;
pub mod session;
pub mod store;
pub mod timing;

pub use context::ContextFlags;
pub use engine::{Decision, ReplyEngine, ReplySource};
pub use error::ChatError;
pub use persistence::{FileHistoryStore, HistoryStore, MemoryHistoryStore};
pub use rules::{Rule, Theme, DEFAULT_REPLIES, RULES};
pub use session::{ChatSession, PendingIndicator};
pub use store::ConversationStore;
pub use timing::ThinkingDelay;
