//! Canonical form of one entry in the model listing.
//!
//! Listing entries do not have a stable shape: the capability list appears as
//! `supportedGenerationMethods`, `supportedMethods`, `methods`, or a snake_case
//! variant, and items are not always strings. Every entry is normalized here,
//! once, before any selection logic looks at it.

use serde::Serialize;
use serde_json::Value;

const NAME_KEYS: &[&str] = &["name", "model", "id"];
const CAPABILITY_KEYS: &[&str] = &[
    "supportedGenerationMethods",
    "supported_generation_methods",
    "supportedMethods",
    "supported_methods",
    "methods",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelRecord {
    pub name: String,
    pub capabilities: Vec<String>,
}

impl ModelRecord {
    #[cfg(test)]
    pub fn new(name: impl Into<String>, capabilities: &[&str]) -> Self {
        Self {
            name: name.into(),
            capabilities: capabilities.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Normalizes a raw listing entry. A bare string is taken as a name with no
    /// capabilities; anything else that is not an object yields `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(name) => Some(Self {
                name: name.clone(),
                capabilities: Vec::new(),
            }),
            Value::Object(map) => {
                let name = NAME_KEYS
                    .iter()
                    .find_map(|k| map.get(*k).and_then(Value::as_str))
                    .unwrap_or_default()
                    .to_string();
                // First non-empty capability list wins.
                let capabilities = CAPABILITY_KEYS
                    .iter()
                    .filter_map(|k| map.get(*k))
                    .map(stringify_capabilities)
                    .find(|caps| !caps.is_empty())
                    .unwrap_or_default();
                Some(Self { name, capabilities })
            }
            _ => None,
        }
    }

    /// True if any capability contains "generate", case-insensitively.
    pub fn supports_generation(&self) -> bool {
        self.capabilities
            .iter()
            .any(|c| c.to_lowercase().contains("generate"))
    }

    /// Name without the `models/` resource prefix.
    pub fn short_name(&self) -> &str {
        self.name.strip_prefix("models/").unwrap_or(&self.name)
    }
}

fn stringify_capabilities(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        Value::String(s) => vec![s.clone()],
        _ => Vec::new(),
    }
}
