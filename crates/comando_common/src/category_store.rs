//! Category Store - known tokens per domain
//!
//! Each domain (ACTION, TARGET, CONTEXT) is a JSON object on disk mapping a
//! category name to an array of tokens:
//!
//! ```json
//! { "WEBSITES": ["youtube", "github"], "APPLICATIONS": ["chrome"] }
//! ```
//!
//! Files are read once when the store is built. Only the TARGET file is
//! ever written: each learned token triggers a read-modify-write of the whole
//! document. That cycle is not atomic, so two processes learning at the same
//! time can lose one of the updates. Callers sharing a data directory across
//! processes must serialize access themselves.

use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{ComandoError, Result};
use crate::types::{Domain, Label};

pub const ACTION_FILE: &str = "action_categories.json";
pub const TARGET_FILE: &str = "target_categories.json";
pub const CONTEXT_FILE: &str = "context_categories.json";

/// File name holding the categories of a domain
pub fn file_name(domain: Domain) -> &'static str {
    match domain {
        Domain::Action => ACTION_FILE,
        Domain::Target => TARGET_FILE,
        Domain::Context => CONTEXT_FILE,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub tokens: Vec<String>,
}

/// Categories of one domain, kept in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryTable {
    categories: Vec<Category>,
}

impl CategoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from (category, tokens) pairs, keeping their order
    pub fn from_pairs<N, T>(pairs: impl IntoIterator<Item = (N, Vec<T>)>) -> Self
    where
        N: Into<String>,
        T: Into<String>,
    {
        let mut table = Self::new();
        for (name, tokens) in pairs {
            let name = name.into();
            for token in tokens {
                let token: String = token.into();
                table.insert(&name, &token);
            }
            if table.get(&name).is_none() {
                table.categories.push(Category {
                    name,
                    tokens: Vec::new(),
                });
            }
        }
        table
    }

    fn from_json(map: Map<String, Value>) -> Self {
        let mut table = Self::new();
        for (name, value) in map {
            let tokens = match serde_json::from_value::<Vec<String>>(value) {
                Ok(tokens) => tokens,
                Err(e) => {
                    warn!("Category {} is not a list of strings ({}), ignoring its tokens", name, e);
                    Vec::new()
                }
            };
            table.categories.push(Category { name, tokens });
        }
        table
    }

    /// First category (in load order) containing the token
    pub fn find(&self, token: &str) -> Option<&Category> {
        self.categories
            .iter()
            .find(|c| c.tokens.iter().any(|t| t == token))
    }

    pub fn get(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Add a token to a category, creating the category at the end if needed.
    /// Returns false when the token was already there.
    pub fn insert(&mut self, name: &str, token: &str) -> bool {
        let category = match self.categories.iter().position(|c| c.name == name) {
            Some(idx) => &mut self.categories[idx],
            None => {
                self.categories.push(Category {
                    name: name.to_string(),
                    tokens: Vec::new(),
                });
                let last = self.categories.len() - 1;
                &mut self.categories[last]
            }
        };
        if category.tokens.iter().any(|t| t == token) {
            return false;
        }
        category.tokens.push(token.to_string());
        true
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// The three domain tables plus where learned tokens get written
#[derive(Debug, Clone, Default)]
pub struct CategoryStore {
    action: CategoryTable,
    target: CategoryTable,
    context: CategoryTable,
    /// TARGET file to rewrite on learning; `None` keeps the store in memory
    target_path: Option<PathBuf>,
}

impl CategoryStore {
    /// Store with no backing files
    pub fn in_memory(action: CategoryTable, target: CategoryTable, context: CategoryTable) -> Self {
        Self {
            action,
            target,
            context,
            target_path: None,
        }
    }

    /// Read all three domain files from a data directory.
    ///
    /// A missing or unparsable file leaves that domain empty.
    pub fn load(data_dir: &Path) -> Self {
        let store = Self {
            action: load_table(&data_dir.join(file_name(Domain::Action))),
            target: load_table(&data_dir.join(file_name(Domain::Target))),
            context: load_table(&data_dir.join(file_name(Domain::Context))),
            target_path: Some(data_dir.join(file_name(Domain::Target))),
        };
        debug!(
            "Category store loaded from {}: {} action, {} target, {} context categories",
            data_dir.display(),
            store.action.categories.len(),
            store.target.categories.len(),
            store.context.categories.len()
        );
        store
    }

    pub fn table(&self, domain: Domain) -> &CategoryTable {
        match domain {
            Domain::Action => &self.action,
            Domain::Target => &self.target,
            Domain::Context => &self.context,
        }
    }

    /// Static cascade: ACTION, then TARGET, then CONTEXT; first hit wins
    pub fn lookup(&self, token: &str) -> Option<Label> {
        Domain::CASCADE.iter().find_map(|&domain| {
            self.table(domain)
                .find(token)
                .map(|category| Label::for_category(domain, &category.name))
        })
    }

    /// Record a learned TARGET token in memory and in the TARGET file.
    ///
    /// The in-memory table is updated even if writing the file fails, so the
    /// rest of the run sees the token. Returns whether the file was written;
    /// an in-memory store never writes.
    pub fn learn_target(&mut self, token: &str, category: &str) -> Result<bool> {
        if self.target.insert(category, token) {
            info!("Learned '{}' as {}", token, category);
        }
        match &self.target_path {
            Some(path) => append_to_category_file(path, category, token).map(|()| true),
            None => Ok(false),
        }
    }
}

/// Load one domain file, degrading to an empty table
pub fn load_table(path: &Path) -> CategoryTable {
    match try_load_table(path) {
        Ok(table) => table,
        Err(ComandoError::Io(e)) if e.kind() == ErrorKind::NotFound => {
            debug!("Category file {} not found, domain is empty", path.display());
            CategoryTable::new()
        }
        Err(e) => {
            warn!("Failed to load category file {}: {}", path.display(), e);
            CategoryTable::new()
        }
    }
}

fn try_load_table(path: &Path) -> Result<CategoryTable> {
    let map = read_object(path)?;
    Ok(CategoryTable::from_json(map))
}

fn read_object(path: &Path) -> Result<Map<String, Value>> {
    let contents = fs::read_to_string(path)?;
    match serde_json::from_str::<Value>(&contents)? {
        Value::Object(map) => Ok(map),
        _ => Err(ComandoError::NotAnObject {
            path: path.display().to_string(),
        }),
    }
}

/// Re-read a category file, append the token to the category and rewrite the
/// whole document. A missing file is created; an unparsable one, or one whose
/// category is not a list, is left alone.
pub fn append_to_category_file(path: &Path, category: &str, token: &str) -> Result<()> {
    let mut map = match read_object(path) {
        Ok(map) => map,
        Err(ComandoError::Io(e)) if e.kind() == ErrorKind::NotFound => Map::new(),
        Err(e) => return Err(e),
    };

    let entry = map
        .entry(category.to_string())
        .or_insert_with(|| Value::Array(Vec::new()));
    let tokens = match entry {
        Value::Array(tokens) => tokens,
        _ => {
            return Err(ComandoError::NotAnArray {
                path: path.display().to_string(),
                category: category.to_string(),
            })
        }
    };
    if !tokens.iter().any(|t| t.as_str() == Some(token)) {
        tokens.push(Value::String(token.to_string()));
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(&Value::Object(map))?;
    fs::write(path, json)?;
    debug!("Rewrote {} with '{}' under {}", path.display(), token, category);
    Ok(())
}
