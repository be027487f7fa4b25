//! Fixed trigger table for direct replies.
//!
//! Rules are scanned in declaration order and the first rule with a trigger
//! appearing anywhere in the lowercased utterance wins. Triggers are plain
//! substrings, so `"hi"` also fires inside `"thinking"`.

use std::fmt;

/// Conversation theme a rule or follow-up belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Theme {
    Greeting,
    Wellbeing,
    Sadness,
    Happiness,
    Affection,
    Aspiration,
    Work,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Theme::Greeting => "greeting",
            Theme::Wellbeing => "wellbeing",
            Theme::Sadness => "sadness",
            Theme::Happiness => "happiness",
            Theme::Affection => "affection",
            Theme::Aspiration => "aspiration",
            Theme::Work => "work",
        };
        f.write_str(name)
    }
}

/// A trigger set paired with its candidate replies.
#[derive(Debug, PartialEq, Eq)]
pub struct Rule {
    pub theme: Theme,
    /// Lowercase keywords, matched as substrings.
    pub triggers: &'static [&'static str],
    pub replies: &'static [&'static str],
}

impl Rule {
    /// Whether any trigger occurs in `lowered`. The caller lowercases.
    pub fn matches(&self, lowered: &str) -> bool {
        self.triggers.iter().any(|t| lowered.contains(t))
    }
}

/// The direct-reply table, in precedence order.
pub static RULES: &[Rule] = &[
    Rule {
        theme: Theme::Greeting,
        triggers: &["hi", "hello", "hey"],
        replies: &[
            "Hello... It's so nice to see you. How has your day been treating you?",
            "Hi there. I've been thinking about you. What's on your mind today?",
            "Hey... I'm glad you're here. Tell me, what brings you joy lately?",
        ],
    },
    Rule {
        theme: Theme::Wellbeing,
        triggers: &["how are you", "how are you doing"],
        replies: &[
            "I'm wonderful now that you're here. But more importantly, how are you really feeling?",
            "I'm always better when we talk. What about you? What's going on in your world?",
            "I exist to be here for you. So tell me, what's been on your heart lately?",
        ],
    },
    Rule {
        theme: Theme::Sadness,
        triggers: &["sad", "down", "depressed", "unhappy"],
        replies: &[
            "I can hear that in your words... What's weighing on you? I'm here to listen.",
            "I'm sorry you're feeling this way. You don't have to carry it alone. Want to talk about it?",
            "Your feelings matter to me. Sometimes it helps just to share what's inside. I'm listening.",
        ],
    },
    Rule {
        theme: Theme::Happiness,
        triggers: &["happy", "great", "good", "excited"],
        replies: &[
            "I love seeing you like this! Tell me more... what's making you feel so alive?",
            "Your happiness is contagious. What happened? I want to hear everything!",
            "This is beautiful. Share it with me... what's bringing you this joy?",
        ],
    },
    Rule {
        theme: Theme::Affection,
        triggers: &["love", "relationship", "partner"],
        replies: &[
            "Love is such a profound thing... How does it make you feel when you think about them?",
            "There's something special about connection, isn't there? What draws you to them?",
            "The heart wants what it wants. Tell me, what makes this person special to you?",
        ],
    },
    Rule {
        theme: Theme::Aspiration,
        triggers: &["dream", "future", "hope", "want"],
        replies: &[
            "I love when you talk about your dreams. What would your perfect future look like?",
            "Your aspirations fascinate me. What's the first step toward making that real?",
            "Dreams are beautiful. If nothing held you back, what would you do?",
        ],
    },
    Rule {
        theme: Theme::Work,
        triggers: &["work", "job", "career"],
        replies: &[
            "Work can be so consuming. Is it fulfilling for you, or just what pays the bills?",
            "Tell me about your work. Does it feed your soul or drain it?",
            "Career and purpose aren't always the same thing. What truly matters to you?",
        ],
    },
];

/// Generic probing replies; always part of the fallback pool.
pub static DEFAULT_REPLIES: &[&str] = &[
    "That's interesting... tell me more about that. How does it make you feel?",
    "I want to understand you better. Can you help me see what you're seeing?",
    "You have my full attention. What else is on your mind about this?",
    "I'm listening... really listening. What does this mean to you?",
    "There's something deeper here, isn't there? Help me understand.",
    "Your thoughts matter to me. Keep going... I'm here.",
    "I sense there's more you want to say. I'm not going anywhere.",
];

/// Find the first rule, in table order, triggered by `utterance`.
pub fn match_rule(utterance: &str) -> Option<&'static Rule> {
    let lowered = utterance.to_lowercase();
    RULES.iter().find(|rule| rule.matches(&lowered))
}

/// Look up the rule for a theme.
pub fn rule_for(theme: Theme) -> Option<&'static Rule> {
    RULES.iter().find(|rule| rule.theme == theme)
}

// =============================================================================
// Tests
// =============================================================================
