//! Keyword-triggered canned responses
//!
//! Used when no corpus entry matches and the generative backend is
//! unavailable. Rules are evaluated in order and the first match wins, so the
//! order of [`INTENT_RULES`] is part of the observable behavior.

/// A canned response and the keywords that trigger it
///
/// `triggers` is a conjunction of keyword groups: the rule fires when every
/// group has at least one keyword contained in the lowercased input.
#[derive(Debug, Clone, Copy)]
pub struct IntentRule {
    /// Short identifier used in logs
    pub name: &'static str,
    /// Keyword groups; every group must hit
    pub triggers: &'static [&'static [&'static str]],
    /// Response returned when the rule fires
    pub response: &'static str,
}

impl IntentRule {
    /// Whether this rule fires for already-lowercased text
    pub fn matches(&self, lowered: &str) -> bool {
        self.triggers
            .iter()
            .all(|group| group.iter().any(|keyword| lowered.contains(keyword)))
    }
}

/// Response when no rule fires
pub const DEFAULT_RESPONSE: &str =
    "Happy to help! Ask me about housing, food, transportation, campus facilities, or wellness resources.";

/// Built-in rules in evaluation order
///
/// Matching is by substring, so short keywords such as "tim", "eat" and "ion"
/// also fire inside longer words. The `slc_food` rule is shadowed by `food`
/// (every input it accepts, `food` accepts first) and is kept to preserve
/// the rule order.
pub const INTENT_RULES: &[IntentRule] = &[
    IntentRule {
        name: "study",
        triggers: &[&["study", "library"]],
        response: "Try Davis Centre Library, Dana Porter Library, and SLC study areas.",
    },
    IntentRule {
        name: "events",
        triggers: &[&["event"]],
        response: "See WUSA Events and the UWaterloo events calendar for what's on this week.",
    },
    IntentRule {
        name: "housing",
        triggers: &[&["housing", "rent"]],
        response: "Check the Off-Campus Housing Office site for listings, leases, and tenant rights.",
    },
    IntentRule {
        name: "food",
        triggers: &[&["food", "meal", "eat"]],
        response: "🍕 Campus is full of food options! Check out:\n\n\
            • **SLC**: Tim Hortons, Pizza Pizza, Subway, Booster Juice\n\
            • **DC & MC**: Tim Hortons locations\n\
            • **South Campus Hall**: Food court with diverse options\n\
            • **Dining Halls**: Village 1, REV for all-you-can-eat\n\
            • **WUSA Food Support**: Free hampers at SLC Turnkey\n\n\
            Use your WatCard everywhere! Perfect for off-campus students.",
    },
    IntentRule {
        name: "coffee",
        triggers: &[&["tim", "tim hortons", "coffee"]],
        response: "☕ Tim Hortons locations on campus:\n\n\
            • **SLC** - Busiest, open late\n\
            • **DC** (Davis Centre) - Between classes\n\
            • **MC** (Math & Computer) - Quick runs\n\
            • **South Campus Hall** - Near food court\n\n\
            All accept WatCard! Great for coffee, breakfast, and study snacks.",
    },
    IntentRule {
        name: "slc_food",
        triggers: &[&["slc"], &["food", "eat"]],
        response: "🎉 SLC Food Court has everything:\n\n\
            • Tim Hortons - Coffee & breakfast\n\
            • Pizza Pizza - Slices & whole pizzas\n\
            • Subway - Subs & salads\n\
            • Booster Juice - Smoothies\n\
            • Teriyaki Experience - Asian bowls\n\n\
            Open late, WatCard accepted everywhere!",
    },
    IntentRule {
        name: "transport",
        triggers: &[&["transport", "bus", "ion", "grt"]],
        response: "Your WatCard is your U-Pass for GRT/ION. Tap on entry. Might take 2–4 business days to activate if new.",
    },
];

/// First-match-wins lookup over an ordered rule list
#[derive(Debug, Clone, Copy)]
pub struct StaticIntentFallback {
    rules: &'static [IntentRule],
    default_response: &'static str,
}

impl Default for StaticIntentFallback {
    fn default() -> Self {
        Self::new(INTENT_RULES, DEFAULT_RESPONSE)
    }
}

impl StaticIntentFallback {
    /// Create a fallback over custom rules
    pub fn new(rules: &'static [IntentRule], default_response: &'static str) -> Self {
        Self {
            rules,
            default_response,
        }
    }

    /// The first rule matching `text`, if any
    pub fn matching_rule(&self, text: &str) -> Option<&'static IntentRule> {
        let lowered = text.to_lowercase();
        self.rules.iter().find(|rule| rule.matches(&lowered))
    }

    /// Canned response for `text`
    pub fn respond(&self, text: &str) -> &'static str {
        self.matching_rule(text)
            .map(|rule| rule.response)
            .unwrap_or(self.default_response)
    }
}
