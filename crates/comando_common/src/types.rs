//! Core types shared by the pipeline stages

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Classification axis of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Domain {
    Action,
    Target,
    Context,
}

impl Domain {
    /// Lookup order of the classification cascade
    pub const CASCADE: [Domain; 3] = [Domain::Action, Domain::Target, Domain::Context];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Action => "ACTION",
            Domain::Target => "TARGET",
            Domain::Context => "CONTEXT",
        }
    }

    /// Label prefix, e.g. `ACTION_`
    pub fn prefix(&self) -> String {
        format!("{}_", self.as_str())
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain-prefixed category identifier attached to a token.
///
/// Renders as `<DOMAIN>_<name>`. For TARGET labels the name has its trailing
/// `S` characters removed (`WEBSITES` -> `TARGET_WEBSITE`), which also turns
/// `ADDRESS` into `TARGET_ADDRE`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Label {
    pub domain: Domain,
    pub name: String,
}

impl Label {
    pub fn new(domain: Domain, name: impl Into<String>) -> Self {
        Self {
            domain,
            name: name.into(),
        }
    }

    /// Build the label for a category hit in the given domain
    pub fn for_category(domain: Domain, category: &str) -> Self {
        match domain {
            Domain::Target => Self::new(domain, category.trim_end_matches('S')),
            _ => Self::new(domain, category),
        }
    }

    pub fn is(&self, domain: Domain) -> bool {
        self.domain == domain
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.domain.prefix(), self.name)
    }
}

impl Serialize for Label {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A significant token together with the label it resolved to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedToken {
    pub token: String,
    pub label: Label,
}

impl ClassifiedToken {
    pub fn new(token: impl Into<String>, label: Label) -> Self {
        Self {
            token: token.into(),
            label,
        }
    }
}

/// How an unknown token ended up classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryOutcome {
    Website,
    Application,
}

impl DiscoveryOutcome {
    /// TARGET category the learned token is stored under
    pub fn category(&self) -> &'static str {
        match self {
            DiscoveryOutcome::Website => "WEBSITES",
            DiscoveryOutcome::Application => "APPLICATIONS",
        }
    }

    pub fn label(&self) -> Label {
        Label::for_category(Domain::Target, self.category())
    }
}

/// Which discovery step produced the answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoverySource {
    WebsiteProbe,
    LocalApp,
    Operator,
}

/// One token learned during a pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveryRecord {
    pub token: String,
    pub outcome: DiscoveryOutcome,
    pub source: DiscoverySource,
    /// Canonical URL, matching file name, or the operator's answer
    pub evidence: String,
    /// False when the category file could not be rewritten
    pub persisted: bool,
}

/// Diagnostics attached to every result
#[derive(Debug, Clone, Serialize)]
pub struct CommandMetadata {
    pub processing_time_ms: u64,
    pub tokens_removed: Vec<String>,
    pub classification_method: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub discoveries: Vec<DiscoveryRecord>,
    pub processed_at: DateTime<Utc>,
}

/// Structured intent produced for one utterance
#[derive(Debug, Clone, Serialize)]
pub struct TokenizedCommand {
    pub original_text: String,
    pub normalized_text: String,
    pub tokens: Vec<String>,
    pub classified_tokens: Vec<ClassifiedToken>,
    pub action: Option<String>,
    pub target: Option<String>,
    pub context: Option<String>,
    pub confidence: f64,
    pub metadata: CommandMetadata,
}
