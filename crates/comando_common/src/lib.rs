//! Comando Common - command interpretation core
//!
//! Turns a free-form utterance ("abrir o YouTube no Chrome") into an
//! action/target/context intent with a confidence score. Unknown tokens are
//! discovered by probing the web, the local PATH, or asking the operator,
//! and the answer is written back to the category files.

pub mod category_store;
pub mod classifier;
pub mod config;
pub mod discovery;
pub mod error;
pub mod intent;
pub mod pipeline;
pub mod stopwords;
pub mod text;
pub mod types;

pub use category_store::CategoryStore;
pub use classifier::Classifier;
pub use config::ComandoConfig;
pub use discovery::{
    probe_website_with, DiscoveryResolver, HttpWebsiteProbe, LineReader, LocalAppFinder,
    PathAppFinder, ProbeOutcome, PromptResolver, ScriptedResolver, UnknownTokenResolver,
    WebsiteProbe,
};
pub use error::{ComandoError, Result};
pub use pipeline::{autotokenize, Autotokenizer};
pub use stopwords::StopwordSet;
pub use types::*;
