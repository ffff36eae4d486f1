//! Error types for model loading and form rendering

use thiserror::Error;

/// Errors that can occur while loading a model or rendering a form
#[derive(Debug, Error)]
pub enum FormError {
    /// Abstract type with no concrete, non-system subtype
    #[error("No concrete subclasses found for abstract type '{type_name}'")]
    NoConcreteType { type_name: String },

    /// A computed path does not resolve against the data instance
    #[error("Path '{path}' does not resolve against the data instance")]
    Addressing { path: String },

    /// Referenced type is not declared in any loaded model
    #[error("Type not found: {0}")]
    TypeNotFound(String),

    /// Two declarations share a fully-qualified name
    #[error("Duplicate declaration: {0}")]
    DuplicateDeclaration(String),

    /// Model is structurally invalid
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    /// Instance factory cannot create the requested type
    #[error("Cannot instantiate: {0}")]
    Instantiation(String),

    /// Options failed validation
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// Options could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem error while reading a model
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network error while fetching a model
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// HTML template error
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),
}

impl FormError {
    /// Whether the error was raised by the traversal rather than by model loading
    pub fn is_render_error(&self) -> bool {
        matches!(
            self,
            Self::NoConcreteType { .. } | Self::Addressing { .. } | Self::Template(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, FormError>;
