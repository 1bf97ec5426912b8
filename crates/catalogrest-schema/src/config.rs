//! Limits and policy for checking request bodies.

/// Largest request body [`SchemaRegistry::validate`] will parse.
///
/// [`SchemaRegistry::validate`]: crate::SchemaRegistry::validate
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

/// How a [`SchemaRegistry`](crate::SchemaRegistry) treats request bodies and
/// the schema files it loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Close every object schema, so a body carrying a field its request
    /// kind does not declare is rejected.
    pub strict_mode: bool,
    /// Return `SchemaError::NoSchema` for a request kind with no contract
    /// instead of letting the body through.
    pub fail_on_missing_schema: bool,
    /// Raw bodies longer than this are refused before they are parsed.
    pub max_body_size: usize,
    /// One file per request kind is expected, so directories holding more
    /// than this are refused.
    pub max_schemas_from_directory: usize,
    pub max_schema_file_size: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            strict_mode: false,
            fail_on_missing_schema: false,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            max_schemas_from_directory: 32,
            max_schema_file_size: 64 * 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_permissive_with_bounded_bodies() {
        let config = RegistryConfig::default();
        assert!(!config.strict_mode);
        assert!(!config.fail_on_missing_schema);
        assert_eq!(config.max_body_size, DEFAULT_MAX_BODY_SIZE);
        assert!(config.max_schema_file_size < config.max_body_size);
    }
}
