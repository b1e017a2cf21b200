//! Normalized values for report cells.
//!
//! Every value placed in a row is first turned into a [`ReportableQty`]: a plain
//! payload ([`QtyValue`]) plus an optional error bar. Formatters only ever see
//! this one type, whatever the caller originally handed over.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ReportError;

/// Displayable payload of a quantity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QtyValue {
    /// No value
    #[default]
    Empty,
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Free text
    Text(String),
    /// Vector of floats (e.g. a spectrum or per-qubit values)
    Vector(Vec<f64>),
}

impl QtyValue {
    /// Numeric view of the payload, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            QtyValue::Int(v) => Some(*v as f64),
            QtyValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Render the payload, applying `precision` to floating point parts
    pub fn to_string_with_precision(&self, precision: Option<usize>) -> String {
        let float = |v: f64| match precision {
            Some(p) => format!("{:.*}", p, v),
            None => v.to_string(),
        };
        match self {
            QtyValue::Empty => "--".to_string(),
            QtyValue::Int(v) => v.to_string(),
            QtyValue::Float(v) => float(*v),
            QtyValue::Text(s) => s.clone(),
            QtyValue::Vector(values) => {
                let parts: Vec<String> = values.iter().map(|v| float(*v)).collect();
                format!("[{}]", parts.join(", "))
            }
        }
    }
}

impl std::fmt::Display for QtyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_string_with_precision(f.precision()))
    }
}

/// A value ready for uniform formatting, optionally carrying an error bar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportableQty {
    value: QtyValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    errbar: Option<QtyValue>,
}

impl ReportableQty {
    /// Create a quantity without an error bar
    pub fn new(value: QtyValue) -> Self {
        Self {
            value,
            errbar: None,
        }
    }

    /// Normalize anything convertible into a quantity.
    ///
    /// Passing a `ReportableQty` returns it unchanged.
    pub fn from_val(value: impl Into<ReportableQty>) -> Self {
        value.into()
    }

    /// Builder: attach an error bar
    pub fn with_errbar(mut self, errbar: impl Into<QtyValue>) -> Self {
        self.errbar = Some(errbar.into());
        self
    }

    pub fn value(&self) -> &QtyValue {
        &self.value
    }

    pub fn errbar(&self) -> Option<&QtyValue> {
        self.errbar.as_ref()
    }

    pub fn has_errbar(&self) -> bool {
        self.errbar.is_some()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.value, QtyValue::Empty)
    }

    /// Replace the stored value, keeping the error bar
    pub fn set_value(&mut self, value: impl Into<QtyValue>) {
        self.value = value.into();
    }
}

impl std::fmt::Display for ReportableQty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let precision = f.precision();
        let value = self.value.to_string_with_precision(precision);
        match &self.errbar {
            Some(err) => write!(
                f,
                "{} +/- {}",
                value,
                err.to_string_with_precision(precision)
            ),
            None => f.write_str(&value),
        }
    }
}

macro_rules! qty_value_from {
    ($($ty:ty => $variant:ident($target:ty)),* $(,)?) => {
        $(
            impl From<$ty> for QtyValue {
                fn from(v: $ty) -> Self {
                    QtyValue::$variant(<$target>::from(v))
                }
            }

            impl From<$ty> for ReportableQty {
                fn from(v: $ty) -> Self {
                    ReportableQty::new(QtyValue::from(v))
                }
            }
        )*
    };
}

qty_value_from! {
    f64 => Float(f64),
    f32 => Float(f64),
    i64 => Int(i64),
    i32 => Int(i64),
    u32 => Int(i64),
}

impl From<usize> for QtyValue {
    fn from(v: usize) -> Self {
        match i64::try_from(v) {
            Ok(v) => QtyValue::Int(v),
            Err(_) => QtyValue::Float(v as f64),
        }
    }
}

impl From<usize> for ReportableQty {
    fn from(v: usize) -> Self {
        ReportableQty::new(v.into())
    }
}

impl From<&str> for QtyValue {
    fn from(v: &str) -> Self {
        QtyValue::Text(v.to_string())
    }
}

impl From<&str> for ReportableQty {
    fn from(v: &str) -> Self {
        ReportableQty::new(v.into())
    }
}

impl From<String> for QtyValue {
    fn from(v: String) -> Self {
        QtyValue::Text(v)
    }
}

impl From<String> for ReportableQty {
    fn from(v: String) -> Self {
        ReportableQty::new(v.into())
    }
}

impl From<Vec<f64>> for QtyValue {
    fn from(v: Vec<f64>) -> Self {
        QtyValue::Vector(v)
    }
}

impl From<Vec<f64>> for ReportableQty {
    fn from(v: Vec<f64>) -> Self {
        ReportableQty::new(v.into())
    }
}

impl From<QtyValue> for ReportableQty {
    fn from(v: QtyValue) -> Self {
        ReportableQty::new(v)
    }
}

/// `(value, errbar)`
impl From<(f64, f64)> for ReportableQty {
    fn from((value, errbar): (f64, f64)) -> Self {
        ReportableQty::new(QtyValue::Float(value)).with_errbar(errbar)
    }
}

impl<T: Into<ReportableQty>> From<Option<T>> for ReportableQty {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or_default()
    }
}

fn normalization_error(value: &Value, reason: &str) -> ReportError {
    ReportError::Normalization {
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn qty_value_from_json(value: &Value) -> Result<QtyValue, ReportError> {
    match value {
        Value::Null => Ok(QtyValue::Empty),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(QtyValue::Int(i)),
            None => n
                .as_f64()
                .map(QtyValue::Float)
                .ok_or_else(|| normalization_error(value, "number out of range")),
        },
        Value::String(s) => Ok(QtyValue::Text(s.clone())),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_f64()
                    .ok_or_else(|| normalization_error(value, "arrays must contain only numbers"))
            })
            .collect::<Result<Vec<f64>, _>>()
            .map(QtyValue::Vector),
        Value::Bool(_) => Err(normalization_error(value, "booleans are not reportable")),
        Value::Object(_) => Err(normalization_error(value, "nested objects are not reportable")),
    }
}

/// Fallible normalization of loosely typed input.
///
/// Objects are read as `{"value": ..., "errbar": ...}`, with `errbar` optional.
impl TryFrom<Value> for ReportableQty {
    type Error = ReportError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match &value {
            Value::Object(map) => {
                let inner = map
                    .get("value")
                    .ok_or_else(|| normalization_error(&value, "object has no 'value' key"))?;
                let mut qty = ReportableQty::new(qty_value_from_json(inner)?);
                if let Some(err) = map.get("errbar").filter(|e| !e.is_null()) {
                    qty.errbar = Some(qty_value_from_json(err)?);
                }
                Ok(qty)
            }
            other => Ok(ReportableQty::new(qty_value_from_json(other)?)),
        }
    }
}
