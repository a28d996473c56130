//! Error types for schema operations.
//!
//! Coercion never fails: bad input degrades to a fallback value. Errors are
//! reserved for structural problems, such as a nested attribute with no way to
//! construct its instances, or a shared model that is already borrowed.

/// Main error type for schema operations.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// A `model` or `collection` attribute has neither a constructor nor a source
    #[error("Attribute '{attribute}' has no {kind} constructor and no source collection")]
    MissingConstructor { attribute: String, kind: String },

    /// A shared model or collection is already mutably borrowed
    #[error("Instance '{cid}' is already in use and cannot be modified re-entrantly")]
    Reentrant { cid: String },

    /// A model or collection factory refused to build an instance
    #[error("Failed to construct '{kind}': {message}")]
    Construction { kind: String, message: String },

    /// Attribute definition could not be interpreted
    #[error("Invalid definition for attribute '{attribute}': {message}")]
    InvalidDefinition { attribute: String, message: String },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SchemaError {
    /// Create a construction error for the given model or collection kind.
    pub fn construction(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Construction {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Create a definition error for the given attribute.
    pub fn invalid_definition(attribute: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDefinition {
            attribute: attribute.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;
