//! Stopword filtering
//!
//! Stopwords come from a JSON document `{"all": [...]}`. A missing or broken
//! file falls back to a built-in list of Portuguese function words.

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::Result;

/// Used when the stopword file cannot be read
pub const DEFAULT_STOPWORDS: &[&str] = &[
    "o", "a", "os", "as", "de", "do", "da", "no", "na", "por", "para", "em", "com", "e", "ou",
    "um", "uma", "favor",
];

#[derive(Debug, Deserialize)]
struct StopwordFile {
    #[serde(default)]
    all: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopwordSet {
    words: HashSet<String>,
}

impl Default for StopwordSet {
    fn default() -> Self {
        Self::from_words(DEFAULT_STOPWORDS.iter().copied())
    }
}

impl StopwordSet {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Load the stopword file, degrading to [`DEFAULT_STOPWORDS`]
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(set) => {
                debug!("Loaded {} stopwords from {}", set.len(), path.display());
                set
            }
            Err(e) => {
                warn!(
                    "Stopword file {} unavailable ({}), using built-in list",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    fn try_load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let file: StopwordFile = serde_json::from_str(&contents)?;
        Ok(Self::from_words(file.all))
    }

    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Split tokens into (significant, removed), both in input order
    pub fn partition(&self, tokens: &[String]) -> (Vec<String>, Vec<String>) {
        tokens.iter().cloned().partition(|t| !self.contains(t))
    }
}
