//! Intent detection over a fixed trigger-phrase list.
//!
//! A player utterance warrants a DM response when its embedding lands close
//! (cosine) to any of the trigger phrases below. The phrase embeddings are
//! computed once per process and cached; only the query is embedded per
//! request.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::debug;

use dmvoice_types::error::EngineError;
use dmvoice_types::intent::{IntentDecision, IntentKind};

use crate::embed::{cosine_similarity, Embedder};

/// Phrases that should prompt a DM response.
pub const TRIGGER_PHRASES: [&str; 20] = [
    "What do I see?",
    "I want to roll",
    "I attack",
    "I search the room",
    "What happens?",
    "Can I do",
    "I try to",
    "I cast a spell",
    "I move to",
    "Is there anything",
    "Do I notice",
    "I want to talk to",
    "What does the NPC say?",
    "I open the door",
    "I pick up",
    "I examine",
    "Tell me about",
    "Describe the",
    "I ask the",
    "What's in",
];

/// Keyword heuristic for the intent kind, applied only when the similarity
/// clears the threshold.
pub fn classify_kind(text: &str) -> IntentKind {
    let lower = text.to_lowercase();

    let is_question = lower.contains('?')
        || ["what", "where", "who", "how", "why", "when"]
            .iter()
            .any(|q| lower.contains(q));
    if is_question {
        return IntentKind::Question;
    }

    if ["attack", "hit", "strike", "fight"]
        .iter()
        .any(|a| lower.contains(a))
    {
        return IntentKind::CombatAction;
    }

    if ["cast", "spell", "magic"].iter().any(|s| lower.contains(s)) {
        return IntentKind::SpellCast;
    }

    IntentKind::Action
}

/// Detects whether an utterance requires a DM response.
///
/// Generic over the embedding engine; the trigger-phrase embeddings are
/// lazily computed on first use and shared across requests.
pub struct IntentDetector<E: Embedder> {
    embedder: Arc<E>,
    trigger_embeddings: OnceCell<Vec<Vec<f32>>>,
}

impl<E: Embedder> IntentDetector<E> {
    pub fn new(embedder: Arc<E>) -> Self {
        Self {
            embedder,
            trigger_embeddings: OnceCell::new(),
        }
    }

    /// Run detection for one utterance.
    ///
    /// Empty (or whitespace-only) text short-circuits to a silent decision
    /// without touching the embedding model.
    pub async fn detect(&self, text: &str, threshold: f32) -> Result<IntentDecision, EngineError> {
        if text.trim().is_empty() {
            return Ok(IntentDecision::silent());
        }

        let triggers = self
            .trigger_embeddings
            .get_or_try_init(|| async {
                let phrases: Vec<String> =
                    TRIGGER_PHRASES.iter().map(|p| p.to_string()).collect();
                debug!(count = phrases.len(), "embedding trigger phrases");
                self.embedder.embed(&phrases).await
            })
            .await?;

        let query = self
            .embedder
            .embed(std::slice::from_ref(&text.to_string()))
            .await?;
        let query = query
            .first()
            .ok_or_else(|| EngineError::Inference("embedder returned no vectors".to_string()))?;

        let confidence = triggers
            .iter()
            .map(|t| cosine_similarity(query, t))
            .fold(0.0f32, f32::max);

        let should_respond = confidence > threshold;
        let intent_type = if should_respond {
            classify_kind(text)
        } else {
            IntentKind::Unknown
        };

        Ok(IntentDecision {
            should_respond,
            confidence,
            intent_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Embedder that maps combat-flavored text to one axis and everything
    /// else to an orthogonal one, so similarities are fully predictable.
    struct KeywordEmbedder;

    impl Embedder for KeywordEmbedder {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EngineError> {
            Ok(texts
                .iter()
                .map(|t| {
                    if t.to_lowercase().contains("attack") {
                        vec![1.0, 0.0]
                    } else {
                        vec![0.0, 1.0]
                    }
                })
                .collect())
        }

        fn model_name(&self) -> &str {
            "keyword-test"
        }

        fn dimension(&self) -> usize {
            2
        }
    }

    #[test]
    fn classify_question() {
        assert_eq!(classify_kind("What do I see in the room?"), IntentKind::Question);
        assert_eq!(classify_kind("where is the door"), IntentKind::Question);
    }

    #[test]
    fn classify_combat() {
        assert_eq!(classify_kind("I attack the goblin"), IntentKind::CombatAction);
        assert_eq!(classify_kind("I strike first"), IntentKind::CombatAction);
    }

    #[test]
    fn classify_spell() {
        assert_eq!(classify_kind("I cast fireball"), IntentKind::SpellCast);
    }

    #[test]
    fn classify_plain_action() {
        assert_eq!(classify_kind("I sneak past the guard"), IntentKind::Action);
        // Declarative phrasing with no interrogative keyword and no "?" is
        // an action, even when it reads like a question aloud
        assert_eq!(classify_kind("is there a door"), IntentKind::Action);
    }

    #[test]
    fn question_takes_priority_over_combat_keywords() {
        // "Can I attack?" reads as a question first, matching the original
        // heuristic ordering.
        assert_eq!(classify_kind("Can I attack him?"), IntentKind::Question);
    }

    #[tokio::test]
    async fn empty_text_is_silent_without_embedding() {
        let detector = IntentDetector::new(Arc::new(KeywordEmbedder));
        let decision = detector.detect("   ", 0.75).await.unwrap();
        assert!(!decision.should_respond);
        assert_eq!(decision.confidence, 0.0);
    }

    #[tokio::test]
    async fn matching_utterance_triggers_response() {
        let detector = IntentDetector::new(Arc::new(KeywordEmbedder));
        // "I attack the orc" maps onto the same axis as the "I attack"
        // trigger phrase, so similarity is 1.0.
        let decision = detector.detect("I attack the orc", 0.75).await.unwrap();
        assert!(decision.should_respond);
        assert!((decision.confidence - 1.0).abs() < 1e-6);
        assert_eq!(decision.intent_type, IntentKind::CombatAction);
    }

    #[tokio::test]
    async fn below_threshold_is_unknown() {
        let detector = IntentDetector::new(Arc::new(KeywordEmbedder));
        // Non-combat text still matches the non-combat trigger axis with
        // similarity 1.0, so use a threshold above it to force a miss.
        let decision = detector.detect("I attack", 1.5).await.unwrap();
        assert!(!decision.should_respond);
        assert_eq!(decision.intent_type, IntentKind::Unknown);
    }
}
