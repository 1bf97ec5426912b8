use catalogrest_request::RequestKind;
use jsonschema::Validator;
use serde_json::Value;

use crate::error::{Result, SchemaError};

/// Extra errors reported after the first one.
const MAX_EXTRA_ERRORS: usize = 3;

pub(crate) fn validate_payload(
    kind: RequestKind,
    payload: &[u8],
    validator: &Validator,
) -> Result<()> {
    let value: Value = serde_json::from_slice(payload)?;
    validate_value(kind, &value, validator)
}

pub(crate) fn validate_value(kind: RequestKind, value: &Value, validator: &Validator) -> Result<()> {
    let mut errors = validator.iter_errors(value);
    if let Some(first) = errors.next() {
        let mut message = first.to_string();
        for err in errors.take(MAX_EXTRA_ERRORS) {
            message.push_str("; ");
            message.push_str(&err.to_string());
        }
        return Err(SchemaError::ValidationFailed { kind, message });
    }

    Ok(())
}
