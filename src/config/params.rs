//! Typed access to operator parameters.

use crate::core::error::{ConfigError, ConfigResult};
use crate::core::types::ExecutionModel;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Parameters for one pipeline step, keyed by name.
///
/// Stored as a JSON object so that TOML and JSON configs share one
/// representation. Getters take the operator id only to name it in errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters(Map<String, Value>);

impl Parameters {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Get a raw value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Iterate over parameter names.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no parameters are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get a `u8`, or `default` if absent.
    pub fn u8_or(&self, operator: &str, key: &str, default: u8) -> ConfigResult<u8> {
        self.lookup(
            operator,
            key,
            |v| v.as_u64().and_then(|n| u8::try_from(n).ok()),
            "an integer in 0..=255",
        )
        .map(|v| v.unwrap_or(default))
    }

    /// Get a `usize`, or `default` if absent.
    pub fn usize_or(&self, operator: &str, key: &str, default: usize) -> ConfigResult<usize> {
        self.optional_usize(operator, key)
            .map(|v| v.unwrap_or(default))
    }

    /// Get an `f64`, or `default` if absent.
    pub fn f64_or(&self, operator: &str, key: &str, default: f64) -> ConfigResult<f64> {
        self.lookup(operator, key, Value::as_f64, "a number")
            .map(|v| v.unwrap_or(default))
    }

    /// Get an execution model, or `default` if absent.
    pub fn model_or(
        &self,
        operator: &str,
        key: &str,
        default: ExecutionModel,
    ) -> ConfigResult<ExecutionModel> {
        match self.0.get(key) {
            None => Ok(default),
            Some(Value::String(s)) => s
                .parse()
                .map_err(|reason| invalid(operator, key, reason)),
            Some(other) => Err(invalid(
                operator,
                key,
                format!("expected \"sequential\" or \"parallel\", got {}", other),
            )),
        }
    }

    /// Get a required `usize`.
    pub fn require_usize(&self, operator: &str, key: &str) -> ConfigResult<usize> {
        self.optional_usize(operator, key)?
            .ok_or_else(|| missing(operator, key))
    }

    /// Get a required `u8`.
    pub fn require_u8(&self, operator: &str, key: &str) -> ConfigResult<u8> {
        if !self.0.contains_key(key) {
            return Err(missing(operator, key));
        }
        self.u8_or(operator, key, 0)
    }

    fn optional_usize(&self, operator: &str, key: &str) -> ConfigResult<Option<usize>> {
        self.lookup(
            operator,
            key,
            |v| v.as_u64().and_then(|n| usize::try_from(n).ok()),
            "a non-negative integer",
        )
    }

    fn lookup<T>(
        &self,
        operator: &str,
        key: &str,
        convert: impl Fn(&Value) -> Option<T>,
        expected: &str,
    ) -> ConfigResult<Option<T>> {
        match self.0.get(key) {
            None => Ok(None),
            Some(value) => convert(value)
                .map(Some)
                .ok_or_else(|| invalid(operator, key, format!("expected {}, got {}", expected, value))),
        }
    }
}

impl From<Map<String, Value>> for Parameters {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn invalid(operator: &str, key: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidParameter {
        operator: operator.to_string(),
        parameter: key.to_string(),
        reason: reason.into(),
    }
}

fn missing(operator: &str, key: &str) -> ConfigError {
    ConfigError::MissingParameter {
        operator: operator.to_string(),
        parameter: key.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_absent() {
        let params = Parameters::new();
        assert_eq!(params.u8_or("t", "level", 7).unwrap(), 7);
        assert_eq!(params.usize_or("t", "radius", 2).unwrap(), 2);
        assert_eq!(params.f64_or("t", "sigma", 1.5).unwrap(), 1.5);
        assert_eq!(
            params.model_or("t", "model", ExecutionModel::Sequential).unwrap(),
            ExecutionModel::Sequential
        );
    }

    #[test]
    fn test_typed_values() {
        let params = Parameters::new()
            .with("level", 200)
            .with("radius", 3)
            .with("sigma", 0.5)
            .with("model", "parallel");

        assert_eq!(params.u8_or("t", "level", 0).unwrap(), 200);
        assert_eq!(params.require_usize("t", "radius").unwrap(), 3);
        assert_eq!(params.f64_or("t", "sigma", 0.0).unwrap(), 0.5);
        assert!(params
            .model_or("t", "model", ExecutionModel::Sequential)
            .unwrap()
            .is_parallel());
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn test_out_of_range_u8() {
        let params = Parameters::new().with("level", 300);
        let err = params.u8_or("threshold", "level", 0).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter { ref operator, ref parameter, .. }
                if operator == "threshold" && parameter == "level"
        ));
    }

    #[test]
    fn test_wrong_type() {
        let params = Parameters::new().with("radius", "wide").with("model", 1);
        assert!(params.usize_or("box_blur", "radius", 1).is_err());
        assert!(params.model_or("t", "model", ExecutionModel::Parallel).is_err());
    }

    #[test]
    fn test_missing_required() {
        let params = Parameters::new().with("rows", 4);
        let err = params.require_usize("resize", "cols").unwrap_err();
        assert!(matches!(err, ConfigError::MissingParameter { .. }));
        assert!(params.require_u8("t", "level").is_err());
    }
}
