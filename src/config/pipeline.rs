//! Pipeline configuration files.

use crate::config::params::Parameters;
use crate::core::error::{ConfigError, ConfigResult, OpchainResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// An ordered list of operator steps.
///
/// Steps run top to bottom: the first listed step sees the input matrix.
///
/// ```toml
/// name = "binarize"
///
/// [[steps]]
/// operator = "box_blur"
/// params = { radius = 2 }
///
/// [[steps]]
/// operator = "threshold"
/// params = { level = 100 }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Optional pipeline name, used in logs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Steps in execution order.
    #[serde(default)]
    pub steps: Vec<StepConfig>,
}

/// One operator step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepConfig {
    /// Registered operator id.
    pub operator: String,
    /// Operator parameters.
    #[serde(default, skip_serializing_if = "Parameters::is_empty")]
    pub params: Parameters,
}

impl PipelineConfig {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style step append.
    pub fn step(mut self, step: StepConfig) -> Self {
        self.steps.push(step);
        self
    }

    /// Parse a TOML document.
    pub fn from_toml_str(s: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Parse a JSON document.
    pub fn from_json_str(s: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a file. `.json` files are parsed as JSON, anything else as TOML.
    pub fn from_path(path: impl AsRef<Path>) -> OpchainResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        log::debug!("Loading pipeline from {}", path.display());
        let config = if is_json {
            Self::from_json_str(&text)?
        } else {
            Self::from_toml_str(&text)?
        };
        Ok(config)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether there are no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl StepConfig {
    /// Create a step with no parameters.
    pub fn new(operator: impl Into<String>) -> Self {
        Self {
            operator: operator.into(),
            params: Parameters::new(),
        }
    }

    /// Builder-style parameter insert.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key, value);
        self
    }

    /// Parse the `id:key=value,key=value` shorthand.
    ///
    /// Values that parse as JSON scalars keep their type, everything else is
    /// taken as a string: `threshold:level=90,model=parallel`.
    pub fn parse(text: &str) -> ConfigResult<Self> {
        let (id, rest) = match text.split_once(':') {
            Some((id, rest)) => (id.trim(), Some(rest)),
            None => (text.trim(), None),
        };
        if id.is_empty() {
            return Err(ConfigError::InvalidStep(text.to_string()));
        }

        let mut step = Self::new(id);
        for pair in rest.into_iter().flat_map(|r| r.split(',')) {
            let pair = pair.trim();
            if pair.is_empty() {
                continue;
            }
            let (key, raw) = pair
                .split_once('=')
                .ok_or_else(|| ConfigError::InvalidStep(text.to_string()))?;
            let (key, raw) = (key.trim(), raw.trim());
            if key.is_empty() {
                return Err(ConfigError::InvalidStep(text.to_string()));
            }
            let value = match serde_json::from_str::<Value>(raw) {
                Ok(v @ (Value::Number(_) | Value::Bool(_))) => v,
                _ => Value::String(raw.to_string()),
            };
            step.params.insert(key, value);
        }
        Ok(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TOML: &str = r#"
name = "binarize"

[[steps]]
operator = "box_blur"
params = { radius = 2 }

[[steps]]
operator = "threshold"
params = { level = 100, model = "parallel" }

[[steps]]
operator = "invert"
"#;

    #[test]
    fn test_from_toml() {
        let config = PipelineConfig::from_toml_str(TOML).unwrap();
        assert_eq!(config.name.as_deref(), Some("binarize"));
        assert_eq!(config.len(), 3);
        assert_eq!(config.steps[0].operator, "box_blur");
        assert_eq!(config.steps[1].params.u8_or("threshold", "level", 0).unwrap(), 100);
        assert!(config.steps[2].params.is_empty());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = PipelineConfig::new()
            .step(StepConfig::new("resize").param("rows", 8).param("cols", 4))
            .step(StepConfig::new("grayscale"));

        let json = config.to_json().unwrap();
        assert!(!json.contains("\"name\""));
        assert_eq!(PipelineConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();

        let toml_path = dir.path().join("pipeline.toml");
        std::fs::write(&toml_path, TOML).unwrap();
        assert_eq!(PipelineConfig::from_path(&toml_path).unwrap().len(), 3);

        let json_path = dir.path().join("pipeline.json");
        let mut file = std::fs::File::create(&json_path).unwrap();
        write!(file, r#"{{"steps": [{{"operator": "invert"}}]}}"#).unwrap();
        drop(file);
        assert_eq!(PipelineConfig::from_path(&json_path).unwrap().steps[0].operator, "invert");
    }

    #[test]
    fn test_invalid_toml() {
        let err = PipelineConfig::from_toml_str("steps = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_parse_step() {
        let step = StepConfig::parse("threshold:level=90, model=parallel,flag=true").unwrap();
        assert_eq!(step.operator, "threshold");
        assert_eq!(step.params.get("level"), Some(&Value::from(90)));
        assert_eq!(step.params.get("model"), Some(&Value::from("parallel")));
        assert_eq!(step.params.get("flag"), Some(&Value::Bool(true)));

        let bare = StepConfig::parse("invert").unwrap();
        assert_eq!(bare, StepConfig::new("invert"));
    }

    #[test]
    fn test_parse_step_errors() {
        assert!(matches!(StepConfig::parse(""), Err(ConfigError::InvalidStep(_))));
        assert!(matches!(StepConfig::parse(":a=1"), Err(ConfigError::InvalidStep(_))));
        assert!(matches!(StepConfig::parse("resize:rows"), Err(ConfigError::InvalidStep(_))));
    }
}
