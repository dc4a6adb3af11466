//! Error types for Comando.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComandoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Category file {path} is not a JSON object")]
    NotAnObject { path: String },

    #[error("Category {category} in {path} is not a list")]
    NotAnArray { path: String, category: String },

    #[error("HTTP error: {0}")]
    Http(String),
}

pub type Result<T> = std::result::Result<T, ComandoError>;
