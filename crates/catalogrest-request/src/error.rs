/// Errors that can occur while building or classifying a request.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// A field is empty, malformed, or conflicts with another field.
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    /// The value does not have the shape of any known request.
    #[error("not a catalog request: {0}")]
    TypeMismatch(String),

    /// The request body is not valid JSON.
    #[error("request body is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl RequestError {
    pub(crate) fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// The offending field for validation failures.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RequestError>;
