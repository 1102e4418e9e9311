//! Rules file loading.

use std::fs;
use std::path::Path;

use cslint_engine::RuleSet;
use jsonc_parser::ParseOptions;
use serde_json::Value;
use tracing::debug;

use crate::ConfigError;

/// Reads a rules file: a JSON object, `//` and `/* */` comments allowed.
///
/// Read and parse failures are returned as they come.
pub fn load_rules(path: impl AsRef<Path>) -> Result<RuleSet, ConfigError> {
    let real_path = fs::canonicalize(path.as_ref())?;
    let content = fs::read_to_string(&real_path)?;

    let value = jsonc_parser::parse_to_serde_value(&content, &ParseOptions::default())
        .map_err(|e| ConfigError::parse(e.to_string()))?;

    match value {
        Some(Value::Object(rules)) => {
            debug!("Loaded {} rules from {}", rules.len(), real_path.display());
            Ok(rules)
        }
        Some(other) => Err(ConfigError::NotAnObject(json_type(&other))),
        None => Err(ConfigError::Empty(real_path)),
    }
}

/// Inline rules overridden, rule by rule, by the rules loaded from file.
pub fn merge_rules(inline: &RuleSet, loaded: RuleSet) -> RuleSet {
    let mut merged = inline.clone();
    merged.extend(loaded);
    merged
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
