//! Reply engine: picks the companion's next line and how long to "think".
//!
//! The engine is a pure function of the history, the new utterance, and an
//! injected random source. It never fails; the generic defaults are always
//! available as a floor.

use std::time::Duration;

use kindred_core::config::EngineConfig;
use kindred_core::types::Message;
use rand::Rng;

use crate::context::{contextual_replies, ContextFlags};
use crate::rules::{match_rule, Theme, DEFAULT_REPLIES};
use crate::timing::ThinkingDelay;

/// Where a reply came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    /// A trigger in the utterance matched this rule.
    Rule(Theme),
    /// No trigger matched; `contextual` follow-ups joined the defaults.
    Fallback { contextual: usize },
}

/// Outcome of one reply decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub delay: Duration,
    pub reply: String,
    pub source: ReplySource,
}

/// Stateless reply selector.
#[derive(Debug, Clone, Default)]
pub struct ReplyEngine {
    config: EngineConfig,
    delay: ThinkingDelay,
}

impl ReplyEngine {
    pub fn new(config: EngineConfig) -> Self {
        let delay = ThinkingDelay::from_config(&config);
        Self { config, delay }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Decide the next reply.
    ///
    /// `history` is the conversation including the utterance being answered.
    pub fn decide<R: Rng + ?Sized>(
        &self,
        history: &[Message],
        utterance: &str,
        rng: &mut R,
    ) -> Decision {
        let delay = self.delay.sample(rng);

        if let Some(rule) = match_rule(utterance) {
            let reply = pick(rule.replies, rng);
            tracing::debug!(theme = %rule.theme, delay_ms = delay.as_millis() as u64, "Direct trigger matched");
            return Decision {
                delay,
                reply: reply.to_string(),
                source: ReplySource::Rule(rule.theme),
            };
        }

        let pool = self.candidate_pool(history, utterance);
        let contextual = pool.len() - DEFAULT_REPLIES.len();
        let reply = pick(&pool, rng);
        tracing::debug!(
            pool = pool.len(),
            contextual,
            delay_ms = delay.as_millis() as u64,
            "Fallback reply chosen"
        );
        Decision {
            delay,
            reply: reply.to_string(),
            source: ReplySource::Fallback { contextual },
        }
    }

    /// Replies eligible when no trigger matches.
    ///
    /// Always the defaults; follow-ups for recent themes join once the
    /// history is longer than `context_min_history`.
    pub fn candidate_pool(&self, history: &[Message], utterance: &str) -> Vec<&'static str> {
        let mut pool: Vec<&'static str> = DEFAULT_REPLIES.to_vec();
        if history.len() > self.config.context_min_history {
            let flags = ContextFlags::from_history(history, self.config.context_window);
            pool.extend(contextual_replies(&flags, &utterance.to_lowercase()));
        }
        pool
    }
}

/// Uniform pick. Callers guarantee a non-empty slice.
fn pick<'a, R: Rng + ?Sized>(candidates: &[&'a str], rng: &mut R) -> &'a str {
    candidates[rng.random_range(0..candidates.len())]
}

// =============================================================================
// Tests
// =============================================================================
