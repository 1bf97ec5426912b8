use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use catalogrest_request::{RequestKind, RestRequest};
use jsonschema::Validator;
use serde_json::{Map, Value};
use tracing::debug;

use crate::builtin::builtin_schema;
use crate::config::RegistryConfig;
use crate::error::{Result, SchemaError};
use crate::validator::{validate_payload, validate_value};

const SCHEMA_SUFFIX: &str = ".schema.json";

/// Kind-keyed registry of compiled JSON Schema validators.
pub struct SchemaRegistry {
    validators: HashMap<RequestKind, Validator>,
    config: RegistryConfig,
}

impl SchemaRegistry {
    /// Create an empty registry with default config.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create an empty registry with explicit config.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            validators: HashMap::new(),
            config,
        }
    }

    /// Registry holding the built-in schema of every request kind.
    pub fn builtin() -> Result<Self> {
        Self::builtin_with_config(RegistryConfig::default())
    }

    pub fn builtin_with_config(config: RegistryConfig) -> Result<Self> {
        let mut registry = Self::with_config(config);
        for kind in RequestKind::ALL {
            registry.register(kind, builtin_schema(kind))?;
        }
        Ok(registry)
    }

    /// Register a schema for a kind from a JSON string.
    pub fn register(&mut self, kind: RequestKind, schema_json: &str) -> Result<()> {
        let schema: Value = serde_json::from_str(schema_json)?;
        self.register_value(kind, &schema)
    }

    /// Register a schema for a kind from a JSON value, replacing any previous one.
    pub fn register_value(&mut self, kind: RequestKind, schema: &Value) -> Result<()> {
        let mut schema_to_compile = schema.clone();
        if self.config.strict_mode {
            apply_strict_mode(&mut schema_to_compile);
        }

        let compiled = jsonschema::validator_for(&schema_to_compile)
            .map_err(|err| SchemaError::CompileFailed(format!("{kind}: {err}")))?;

        debug!(%kind, strict = self.config.strict_mode, "registered schema");
        self.validators.insert(kind, compiled);
        Ok(())
    }

    /// Load `<kind>.schema.json` files from a directory.
    pub fn from_directory(path: &Path) -> Result<Self> {
        Self::from_directory_with_config(path, RegistryConfig::default())
    }

    /// Load schemas from a directory with explicit config.
    ///
    /// Files not ending in `.schema.json` are ignored. Schema files that are
    /// symlinks, name no known kind, or exceed the configured limits fail
    /// the whole load.
    pub fn from_directory_with_config(path: &Path, config: RegistryConfig) -> Result<Self> {
        let mut registry = Self::with_config(config);
        let mut loaded = 0usize;

        let entries = std::fs::read_dir(path)
            .map_err(|err| SchemaError::LoadFailed(format!("{}: {err}", path.display())))?;

        for entry in entries {
            let entry = entry.map_err(|err| SchemaError::LoadFailed(err.to_string()))?;
            let file_name = entry.file_name();
            let file_name = file_name.to_string_lossy();
            let Some(stem) = file_name.strip_suffix(SCHEMA_SUFFIX) else {
                continue;
            };

            let entry_path = entry.path();
            let path_metadata = std::fs::symlink_metadata(&entry_path)
                .map_err(|err| SchemaError::LoadFailed(err.to_string()))?;
            let file_type = path_metadata.file_type();
            if file_type.is_symlink() {
                return Err(SchemaError::LoadFailed(format!(
                    "refusing to load schema symlink: {file_name}"
                )));
            }
            if !file_type.is_file() {
                continue;
            }

            let kind: RequestKind = stem.parse().map_err(|_| {
                SchemaError::LoadFailed(format!("unrecognized schema filename: {file_name}"))
            })?;

            loaded = loaded.saturating_add(1);
            if loaded > registry.config.max_schemas_from_directory {
                return Err(SchemaError::LoadFailed(format!(
                    "schema count exceeds configured max ({}): {loaded}",
                    registry.config.max_schemas_from_directory
                )));
            }

            let content = read_limited(
                &entry_path,
                &path_metadata,
                registry.config.max_schema_file_size,
            )?;
            registry.register(kind, &content)?;
            debug!(%kind, path = %entry_path.display(), "loaded schema file");
        }

        Ok(registry)
    }

    /// Validate a raw body against the schema for `kind`.
    pub fn validate(&self, kind: RequestKind, payload: &[u8]) -> Result<()> {
        if payload.len() > self.config.max_body_size {
            return Err(SchemaError::BodyTooLarge {
                kind,
                size: payload.len(),
                max: self.config.max_body_size,
            });
        }
        match self.validators.get(&kind) {
            Some(validator) => validate_payload(kind, payload, validator),
            None => self.missing(kind),
        }
    }

    /// Validate an already parsed body against the schema for `kind`.
    pub fn validate_value(&self, kind: RequestKind, value: &Value) -> Result<()> {
        match self.validators.get(&kind) {
            Some(validator) => validate_value(kind, value, validator),
            None => self.missing(kind),
        }
    }

    /// Validate the encoded body of a built request.
    pub fn validate_request(&self, request: &RestRequest) -> Result<()> {
        let body = request.to_body()?;
        self.validate_value(request.kind(), &body)
    }

    /// Check if a kind has a registered schema.
    pub fn has_schema(&self, kind: RequestKind) -> bool {
        self.validators.contains_key(&kind)
    }

    /// Kinds that have registered schemas, in declaration order.
    pub fn kinds(&self) -> Vec<RequestKind> {
        let mut kinds: Vec<RequestKind> = self.validators.keys().copied().collect();
        kinds.sort_unstable();
        kinds
    }

    /// Get registry configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    fn missing(&self, kind: RequestKind) -> Result<()> {
        if self.config.fail_on_missing_schema {
            Err(SchemaError::NoSchema(kind))
        } else {
            Ok(())
        }
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a schema file that was stat'd as `path_metadata`, refusing it if the
/// path now names a different file.
#[cfg_attr(not(unix), allow(unused_variables))]
fn read_limited(path: &Path, path_metadata: &std::fs::Metadata, max_bytes: usize) -> Result<String> {
    let file = std::fs::File::open(path).map_err(|err| {
        SchemaError::LoadFailed(format!("failed opening schema {}: {err}", path.display()))
    })?;

    #[cfg(unix)]
    {
        let opened_metadata = file.metadata().map_err(|err| {
            SchemaError::LoadFailed(format!("failed inspecting schema {}: {err}", path.display()))
        })?;
        if !same_file_identity(path_metadata, &opened_metadata) {
            return Err(SchemaError::LoadFailed(format!(
                "schema file changed during load: {}",
                path.display()
            )));
        }
    }

    let read_limit = u64::try_from(max_bytes.saturating_add(1)).unwrap_or(u64::MAX);
    let mut content = String::new();
    file.take(read_limit)
        .read_to_string(&mut content)
        .map_err(|err| {
            SchemaError::LoadFailed(format!("failed reading schema {}: {err}", path.display()))
        })?;

    if content.len() > max_bytes {
        return Err(SchemaError::LoadFailed(format!(
            "schema file too large (max {max_bytes} bytes): {}",
            path.display()
        )));
    }
    Ok(content)
}

#[cfg(unix)]
fn same_file_identity(path_metadata: &std::fs::Metadata, opened_metadata: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;
    path_metadata.dev() == opened_metadata.dev() && path_metadata.ino() == opened_metadata.ino()
}

fn apply_strict_mode(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if is_object_schema(map) && !map.contains_key("additionalProperties") {
                map.insert("additionalProperties".to_string(), Value::Bool(false));
            }

            for key in ["properties", "$defs", "definitions"] {
                if let Some(Value::Object(children)) = map.get_mut(key) {
                    children.values_mut().for_each(apply_strict_mode);
                }
            }
            for key in ["items", "additionalProperties", "not"] {
                if let Some(child) = map.get_mut(key) {
                    apply_strict_mode(child);
                }
            }
            for key in ["prefixItems", "allOf", "anyOf", "oneOf"] {
                if let Some(Value::Array(children)) = map.get_mut(key) {
                    children.iter_mut().for_each(apply_strict_mode);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(apply_strict_mode),
        _ => {}
    }
}

fn is_object_schema(map: &Map<String, Value>) -> bool {
    match map.get("type") {
        Some(Value::String(kind)) => kind == "object",
        Some(Value::Array(items)) => items
            .iter()
            .any(|item| matches!(item, Value::String(kind) if kind == "object")),
        _ => ["properties", "required", "propertyNames"]
            .iter()
            .any(|keyword| map.contains_key(*keyword)),
    }
}
