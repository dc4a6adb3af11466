//! Intent extraction and confidence scoring

use crate::types::{ClassifiedToken, Domain};

const ACTION_WEIGHT: f64 = 0.4;
const TARGET_WEIGHT: f64 = 0.4;
const CONTEXT_WEIGHT: f64 = 0.1;
/// Subtracted per significant token left without a label
const UNCLASSIFIED_PENALTY: f64 = 0.2;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Intent {
    pub action: Option<String>,
    pub target: Option<String>,
    pub context: Option<String>,
}

/// First hit per domain, in token order.
///
/// The action is the category name of its label; target and context are the
/// tokens themselves.
pub fn extract_intent(classified: &[ClassifiedToken]) -> Intent {
    let mut intent = Intent::default();
    for ct in classified {
        match ct.label.domain {
            Domain::Action if intent.action.is_none() => {
                intent.action = Some(ct.label.name.clone());
            }
            Domain::Target if intent.target.is_none() => {
                intent.target = Some(ct.token.clone());
            }
            Domain::Context if intent.context.is_none() => {
                intent.context = Some(ct.token.clone());
            }
            _ => {}
        }
    }
    intent
}

/// Heuristic completeness score in [0.0, 1.0]
pub fn calculate_confidence(classified: &[ClassifiedToken], total_tokens: usize) -> f64 {
    let has = |domain: Domain| classified.iter().any(|ct| ct.label.is(domain));

    let mut score = 0.0;
    if has(Domain::Action) {
        score += ACTION_WEIGHT;
    }
    if has(Domain::Target) {
        score += TARGET_WEIGHT;
    }
    if has(Domain::Context) {
        score += CONTEXT_WEIGHT;
    }
    let unclassified = total_tokens.saturating_sub(classified.len());
    score -= UNCLASSIFIED_PENALTY * unclassified as f64;

    score.clamp(0.0, 1.0)
}
