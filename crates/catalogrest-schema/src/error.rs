use catalogrest_request::{RequestError, RequestKind};

/// Errors that can occur during schema loading or validation.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The schema file could not be loaded.
    #[error("failed to load schema: {0}")]
    LoadFailed(String),

    /// The schema could not be compiled.
    #[error("failed to compile schema: {0}")]
    CompileFailed(String),

    /// The body failed schema validation.
    #[error("{kind} body failed validation: {message}")]
    ValidationFailed { kind: RequestKind, message: String },

    /// The raw body is larger than `RegistryConfig::max_body_size`.
    #[error("{kind} body is {size} bytes, max {max}")]
    BodyTooLarge {
        kind: RequestKind,
        size: usize,
        max: usize,
    },

    /// The body is not valid JSON.
    #[error("body is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// No schema registered for the given kind.
    #[error("no schema registered for {0}")]
    NoSchema(RequestKind),

    /// The request could not be encoded for validation.
    #[error(transparent)]
    Request(#[from] RequestError),
}

pub type Result<T> = std::result::Result<T, SchemaError>;
