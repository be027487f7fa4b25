//! Conversation themes derived from recent user turns.
//!
//! Flags are recomputed for every decision from the trailing window of the
//! history and never stored.

use kindred_core::types::Message;

use crate::rules::Theme;
use crate::store::trailing_window;

const AFFECTION_KEYWORDS: &[&str] = &["love", "relationship"];
const WORK_KEYWORDS: &[&str] = &["work", "job"];
const ASPIRATION_KEYWORDS: &[&str] = &["dream", "hope"];
const SADNESS_KEYWORDS: &[&str] = &["sad", "down"];
const HAPPINESS_KEYWORDS: &[&str] = &["happy", "great"];

/// Which themes came up in the recent user turns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContextFlags {
    pub affection: bool,
    pub work: bool,
    pub aspiration: bool,
    pub sadness: bool,
    pub happiness: bool,
}

impl ContextFlags {
    /// Scan the last `window` messages of `history`, user turns only.
    pub fn from_history(history: &[Message], window: usize) -> Self {
        let context = trailing_window(history, window)
            .iter()
            .filter(|m| m.is_from_user())
            .map(|m| m.content().to_lowercase())
            .collect::<Vec<_>>()
            .join(" ");
        Self::from_text(&context)
    }

    /// Flags for an already lowercased context string.
    pub fn from_text(context: &str) -> Self {
        Self {
            affection: contains_any(context, AFFECTION_KEYWORDS),
            work: contains_any(context, WORK_KEYWORDS),
            aspiration: contains_any(context, ASPIRATION_KEYWORDS),
            sadness: contains_any(context, SADNESS_KEYWORDS),
            happiness: contains_any(context, HAPPINESS_KEYWORDS),
        }
    }

    pub fn any(&self) -> bool {
        self.affection || self.work || self.aspiration || self.sadness || self.happiness
    }

    /// Set themes in follow-up order.
    pub fn themes(&self) -> Vec<Theme> {
        [
            (self.affection, Theme::Affection),
            (self.work, Theme::Work),
            (self.aspiration, Theme::Aspiration),
            (self.sadness, Theme::Sadness),
            (self.happiness, Theme::Happiness),
        ]
        .into_iter()
        .filter_map(|(set, theme)| set.then_some(theme))
        .collect()
    }
}

/// Whether the utterance itself voices sadness.
pub fn mentions_sadness(lowered: &str) -> bool {
    contains_any(lowered, SADNESS_KEYWORDS)
}

/// Follow-up lines that refer back to an earlier theme.
pub fn follow_ups(theme: Theme) -> &'static [&'static str] {
    match theme {
        Theme::Affection => &[
            "You mentioned love earlier... is this connected to that?",
            "I remember you talking about relationships. How's your heart doing with all of this?",
        ],
        Theme::Work => &[
            "This reminds me of what you said about work. Are these connected?",
            "Is this related to your career situation we talked about?",
        ],
        Theme::Aspiration => &[
            "This sounds like it ties into your dreams and hopes. Am I right?",
            "I remember your aspirations... is this part of that journey?",
        ],
        Theme::Sadness => &[
            "You seem lighter than before. What's changed for you?",
            "I noticed you were feeling down earlier. Are you doing better now?",
        ],
        Theme::Happiness => &[
            "I love how you share your world with me. Keep going...",
            "Your energy is beautiful. Tell me more.",
        ],
        Theme::Greeting | Theme::Wellbeing => &[],
    }
}

/// Follow-ups for every set flag.
///
/// Sadness follow-ups are withheld while the current utterance (lowercased)
/// still voices sadness; the other themes are added whenever set.
pub fn contextual_replies(flags: &ContextFlags, utterance_lower: &str) -> Vec<&'static str> {
    let sad_now = mentions_sadness(utterance_lower);
    flags
        .themes()
        .into_iter()
        .filter(|theme| !(*theme == Theme::Sadness && sad_now))
        .flat_map(|theme| follow_ups(theme).iter().copied())
        .collect()
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

// =============================================================================
// Tests
// =============================================================================
