//! Token Classifier
//!
//! Static lookup in the [`CategoryStore`] first; on a miss the token goes to
//! discovery and the answer is learned, so the next lookup hits statically.

use std::mem;
use tracing::{debug, warn};

use crate::category_store::CategoryStore;
use crate::discovery::DiscoveryResolver;
use crate::types::{ClassifiedToken, DiscoveryRecord, Label};

pub struct Classifier<'a> {
    store: CategoryStore,
    discovery: Option<DiscoveryResolver<'a>>,
    discoveries: Vec<DiscoveryRecord>,
}

impl<'a> Classifier<'a> {
    pub fn new(store: CategoryStore, discovery: DiscoveryResolver<'a>) -> Self {
        Self {
            store,
            discovery: Some(discovery),
            discoveries: Vec::new(),
        }
    }

    /// Classifier that never probes; unknown tokens stay unlabeled
    pub fn static_only(store: CategoryStore) -> Self {
        Self {
            store,
            discovery: None,
            discoveries: Vec::new(),
        }
    }

    pub fn store(&self) -> &CategoryStore {
        &self.store
    }

    /// Label for one token: ACTION, TARGET, CONTEXT lookup, then discovery
    pub fn classify_token(&mut self, token: &str) -> Option<Label> {
        if let Some(label) = self.store.lookup(token) {
            debug!("'{}' -> {} (category lookup)", token, label);
            return Some(label);
        }

        let resolution = self.discovery.as_mut()?.resolve(token);
        let category = resolution.outcome.category();
        let persisted = match self.store.learn_target(token, category) {
            Ok(written) => written,
            Err(e) => {
                warn!("Could not persist '{}' under {}: {}", token, category, e);
                false
            }
        };

        let label = resolution.outcome.label();
        debug!("'{}' -> {} (discovered via {:?})", token, label, resolution.source);
        self.discoveries.push(DiscoveryRecord {
            token: token.to_string(),
            outcome: resolution.outcome,
            source: resolution.source,
            evidence: resolution.evidence,
            persisted,
        });
        Some(label)
    }

    /// Classify every token in order, keeping only the labeled ones
    pub fn classify_tokens(&mut self, tokens: &[String]) -> Vec<ClassifiedToken> {
        tokens
            .iter()
            .filter_map(|t| {
                self.classify_token(t)
                    .map(|label| ClassifiedToken::new(t.clone(), label))
            })
            .collect()
    }

    /// Discoveries made since the last call
    pub fn take_discoveries(&mut self) -> Vec<DiscoveryRecord> {
        mem::take(&mut self.discoveries)
    }
}
