use std::fmt;
use std::io;

use catalogrest_request::RequestError;
use catalogrest_schema::SchemaError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => USAGE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn request_error(context: &str, err: RequestError) -> CliError {
    // Every request error is about the caller's data; none is retryable.
    CliError::new(DATA_INVALID, format!("{context}: {err}"))
}

pub fn schema_error(context: &str, err: SchemaError) -> CliError {
    match err {
        SchemaError::ValidationFailed { .. }
        | SchemaError::BodyTooLarge { .. }
        | SchemaError::InvalidJson(_) => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        SchemaError::Request(err) => request_error(context, err),
        SchemaError::NoSchema(_) => CliError::new(USAGE, format!("{context}: {err}")),
        SchemaError::LoadFailed(_) | SchemaError::CompileFailed(_) => {
            CliError::new(FAILURE, format!("{context}: {err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use catalogrest_request::{Identifier, RequestKind};

    use super::*;

    #[test]
    fn validation_errors_are_data_invalid() {
        let err = Identifier::new("", "t").unwrap_err();
        let cli = request_error("invalid identifier", err);
        assert_eq!(cli.code, DATA_INVALID);
        assert!(cli.message.contains("database_name"));
    }

    #[test]
    fn schema_errors_map_by_cause() {
        assert_eq!(
            schema_error("x", SchemaError::NoSchema(RequestKind::RenameTable)).code,
            USAGE
        );
        assert_eq!(
            schema_error("x", SchemaError::LoadFailed("gone".into())).code,
            FAILURE
        );
        let too_large = SchemaError::BodyTooLarge {
            kind: RequestKind::CreateDatabase,
            size: 2048,
            max: 1024,
        };
        assert_eq!(schema_error("x", too_large).code, DATA_INVALID);
    }

    #[test]
    fn io_errors_map_by_kind() {
        let err = io::Error::new(io::ErrorKind::NotFound, "missing");
        assert_eq!(io_error("read", err).code, USAGE);
        let err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(io_error("read", err).code, PERMISSION_DENIED);
    }
}
