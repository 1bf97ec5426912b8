use crate::check::non_empty;
use crate::error::{RequestError, Result};

/// Naming rules applied to database names.
///
/// The default accepts any non-empty name; catalogs with stricter rules
/// configure them here instead of in each request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamingRules {
    /// Maximum name length in characters.
    pub max_name_length: Option<usize>,
    /// Characters that may not appear in a name.
    pub forbidden_chars: Vec<char>,
}

impl NamingRules {
    /// Check `name` for `field`, reporting the first rule it breaks.
    pub fn check(&self, field: &str, name: &str) -> Result<()> {
        non_empty(field, name)?;

        if let Some(max) = self.max_name_length {
            let len = name.chars().count();
            if len > max {
                return Err(RequestError::validation(
                    field,
                    format!("name is {len} characters, max {max}"),
                ));
            }
        }

        if let Some(c) = name.chars().find(|c| self.forbidden_chars.contains(c)) {
            return Err(RequestError::validation(
                field,
                format!("name contains forbidden character {c:?}"),
            ));
        }

        Ok(())
    }
}
