//! Render options passed through to formatters.
//!
//! Rows and cells never look inside a [`RenderSpecs`]; they only hand it to
//! whichever formatter a cell resolves to. The one typed field, `precision`,
//! is read by the built-in plain renderer. Everything else lives in a free-form
//! option map so formatter implementations can define their own keys.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Result;

/// Bundle of rendering options forwarded verbatim to formatters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderSpecs {
    /// Number of digits after the decimal point for floating point values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<usize>,
    /// Formatter-defined options
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl RenderSpecs {
    /// Empty specs: no precision, no extra options
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse specs from a JSON object, e.g. `{"precision": 3, "column": "Fidelity"}`
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Builder: set float precision
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Builder: set a formatter-defined option
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Raw option value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// Option value as a string slice
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Option value as an unsigned integer
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(Value::as_u64)
    }

    /// Option value as a boolean
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }
}
