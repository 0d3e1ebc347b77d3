//! Intent detection types.
//!
//! The detector compares a player utterance against a fixed trigger-phrase
//! list by embedding cosine similarity; the kind is a keyword heuristic
//! applied only when the similarity clears the threshold.

use serde::{Deserialize, Serialize};

/// Default similarity threshold above which the DM should respond.
pub const DEFAULT_INTENT_THRESHOLD: f32 = 0.75;

/// Coarse classification of what the player is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    Question,
    CombatAction,
    SpellCast,
    Action,
    Unknown,
}

impl std::fmt::Display for IntentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            IntentKind::Question => "question",
            IntentKind::CombatAction => "combat_action",
            IntentKind::SpellCast => "spell_cast",
            IntentKind::Action => "action",
            IntentKind::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Outcome of intent detection for one utterance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentDecision {
    pub should_respond: bool,
    /// Max cosine similarity against the trigger phrases.
    pub confidence: f32,
    pub intent_type: IntentKind,
}

impl IntentDecision {
    /// Decision for empty input: nothing to respond to.
    pub fn silent() -> Self {
        Self {
            should_respond: false,
            confidence: 0.0,
            intent_type: IntentKind::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_kind_serializes_snake_case() {
        let json = serde_json::to_string(&IntentKind::CombatAction).unwrap();
        assert_eq!(json, "\"combat_action\"");
        assert_eq!(IntentKind::SpellCast.to_string(), "spell_cast");
    }

    #[test]
    fn silent_decision() {
        let d = IntentDecision::silent();
        assert!(!d.should_respond);
        assert_eq!(d.confidence, 0.0);
        assert_eq!(d.intent_type, IntentKind::Unknown);
    }
}
