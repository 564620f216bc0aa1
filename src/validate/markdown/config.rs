use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// markdownlint-style rule configuration (`.markdownlint.json`).
///
/// ```json
/// { "default": true, "MD013": { "line_length": 120 }, "first-line-heading": false }
/// ```
///
/// Rules are addressed by id (`MD013`) or alias (`line-length`), case
/// insensitively. `true` enables a rule, `false` disables it and a mapping
/// enables it with options. Unlisted rules follow `default`.
#[derive(Debug, Clone, PartialEq)]
pub struct LintConfig {
    default_enabled: bool,
    rules: Map<String, Value>,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            default_enabled: true,
            rules: Map::new(),
        }
    }
}

impl LintConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::store_read(path, e))?;
        let value: Value = serde_json::from_str(&text)
            .map_err(|e| Error::Lint(format!("invalid config {}: {}", path.display(), e)))?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self> {
        let Some(map) = value.as_object() else {
            return Err(Error::Lint("lint config must be a JSON object".to_string()));
        };

        let mut config = Self::default();
        for (key, value) in map {
            if key == "default" {
                config.default_enabled = value.as_bool().unwrap_or(true);
            } else if !key.starts_with('$') {
                config.rules.insert(key.to_ascii_lowercase(), value.clone());
            }
        }
        Ok(config)
    }

    fn setting(&self, names: &[&str]) -> Option<&Value> {
        names
            .iter()
            .find_map(|name| self.rules.get(&name.to_ascii_lowercase()))
    }

    pub fn is_enabled(&self, names: &[&str]) -> bool {
        match self.setting(names) {
            Some(Value::Bool(enabled)) => *enabled,
            Some(Value::Object(_)) => true,
            _ => self.default_enabled,
        }
    }

    /// Options object for a rule, if configured with one.
    pub fn options(&self, names: &[&str]) -> Option<&Map<String, Value>> {
        self.setting(names).and_then(Value::as_object)
    }
}
