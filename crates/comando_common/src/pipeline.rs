//! Pipeline Orchestrator
//!
//! normalize -> tokenize -> stopwords -> classify -> intent -> confidence

use chrono::Utc;
use std::time::Instant;
use tracing::debug;

use crate::category_store::CategoryStore;
use crate::classifier::Classifier;
use crate::config::ComandoConfig;
use crate::discovery::{DiscoveryResolver, PromptResolver, UnknownTokenResolver};
use crate::intent::{calculate_confidence, extract_intent};
use crate::stopwords::StopwordSet;
use crate::text::{normalize, tokenize};
use crate::types::{CommandMetadata, TokenizedCommand};

/// Tag recorded in every result's metadata
pub const CLASSIFICATION_METHOD: &str = "exact_match";

/// Owns the stopwords and the classifier (with its category store) for the
/// lifetime of a session. Utterances are processed one at a time.
pub struct Autotokenizer<'a> {
    stopwords: StopwordSet,
    classifier: Classifier<'a>,
}

impl<'a> Autotokenizer<'a> {
    pub fn new(stopwords: StopwordSet, classifier: Classifier<'a>) -> Self {
        Self {
            stopwords,
            classifier,
        }
    }

    /// Load stopwords and categories from the configured paths and wire the
    /// configured discovery probes in front of the operator prompt.
    pub fn from_config(config: &ComandoConfig, operator: impl UnknownTokenResolver + 'a) -> Self {
        let stopwords = StopwordSet::load(&config.paths.stopwords_file);
        let store = CategoryStore::load(&config.paths.data_dir);
        let discovery = DiscoveryResolver::from_config(&config.discovery, operator);
        Self::new(stopwords, Classifier::new(store, discovery))
    }

    pub fn store(&self) -> &CategoryStore {
        self.classifier.store()
    }

    /// Interpret one utterance
    pub fn autotokenize(&mut self, text: &str) -> TokenizedCommand {
        let start = Instant::now();

        let normalized = normalize(text);
        let tokens = tokenize(&normalized);
        let (filtered, removed) = self.stopwords.partition(&tokens);
        let classified = self.classifier.classify_tokens(&filtered);
        let intent = extract_intent(&classified);
        let confidence = calculate_confidence(&classified, filtered.len());

        let metadata = CommandMetadata {
            processing_time_ms: start.elapsed().as_millis() as u64,
            tokens_removed: removed,
            classification_method: CLASSIFICATION_METHOD.to_string(),
            discoveries: self.classifier.take_discoveries(),
            processed_at: Utc::now(),
        };
        debug!(
            "'{}' -> action={:?} target={:?} context={:?} confidence={:.2}",
            normalized, intent.action, intent.target, intent.context, confidence
        );

        TokenizedCommand {
            original_text: text.to_string(),
            normalized_text: normalized,
            tokens: filtered,
            classified_tokens: classified,
            action: intent.action,
            target: intent.target,
            context: intent.context,
            confidence,
            metadata,
        }
    }
}

/// One-shot interpretation with the default configuration, asking on the
/// terminal when discovery needs the operator.
pub fn autotokenize(text: &str) -> TokenizedCommand {
    Autotokenizer::from_config(&ComandoConfig::default(), PromptResolver::stdio()).autotokenize(text)
}
