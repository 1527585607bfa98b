//! Numeric coercion of raw request values
//!
//! Scenario parameters arrive as an unchecked JSON mapping: numbers, numeric
//! strings typed into a form, empty strings, `null`, or nothing at all. The
//! helpers here turn one raw value into a number and never fail. Callers pick
//! between the default-returning forms (`coerce_*`) and the failure-marker
//! forms (`try_*`) depending on whether absence is acceptable.
//!
//! | raw value        | float          | int                         |
//! |------------------|----------------|-----------------------------|
//! | absent / `null`  | default        | default                     |
//! | `12`, `12.7`     | 12.0, 12.7     | 12, 12 (truncated)          |
//! | `" 8 "`          | 8.0            | 8                           |
//! | `"8.5"`          | 8.5            | default (not an integer)    |
//! | `""`, `"abc"`    | default        | default                     |
//! | `true` / `false` | 1.0 / 0.0      | 1 / 0                       |
//! | `"inf"`, `"NaN"` | default        | default                     |
//! | arrays, objects  | default        | default                     |
//!
//! ## Example
//!
//! ```rust
//! use rfcalc_core::coerce::{coerce_float, coerce_int, Params};
//! use serde_json::json;
//!
//! assert_eq!(coerce_float(Some(&json!("2.5")), 0.0), 2.5);
//! assert_eq!(coerce_int(Some(&json!("x")), 7), 7);
//!
//! let data = json!({"bandwidth": "100", "quantBits": 8});
//! let params = Params::new(data.as_object().unwrap());
//! assert_eq!(params.float("bandwidth", 0.0), 100.0);
//! assert_eq!(params.int("quantBits", 0), 8);
//! assert_eq!(params.float("missing", 1.5), 1.5);
//! ```

use serde_json::{Map, Value};

/// Interpret `value` as a finite float, or `None` if impossible.
pub fn try_float(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }?;
    parsed.is_finite().then_some(parsed)
}

/// Interpret `value` as an integer, or `None` if impossible.
///
/// Fractional JSON numbers truncate toward zero; fractional strings are
/// rejected.
pub fn try_int(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Float interpretation of `value`, or `default`.
pub fn coerce_float(value: Option<&Value>, default: f64) -> f64 {
    try_float(value).unwrap_or(default)
}

/// Integer interpretation of `value`, or `default`.
pub fn coerce_int(value: Option<&Value>, default: i64) -> i64 {
    try_int(value).unwrap_or(default)
}

/// Text rendering of `value`, or `default` for absent/`null`/compound values.
///
/// Numbers render the way serde_json prints them (`16` stays `"16"`).
pub fn coerce_text(value: Option<&Value>, default: &str) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => default.to_string(),
    }
}

/// Read-only view over a flat scenario parameter mapping.
#[derive(Debug, Clone, Copy)]
pub struct Params<'a> {
    data: &'a Map<String, Value>,
}

impl<'a> Params<'a> {
    pub fn new(data: &'a Map<String, Value>) -> Self {
        Self { data }
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.data.get(key)
    }

    /// Whether `key` carries a usable (non-null, non-blank) value
    pub fn is_set(&self, key: &str) -> bool {
        match self.data.get(key) {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.trim().is_empty(),
            Some(_) => true,
        }
    }

    pub fn float(&self, key: &str, default: f64) -> f64 {
        coerce_float(self.get(key), default)
    }

    pub fn int(&self, key: &str, default: i64) -> i64 {
        coerce_int(self.get(key), default)
    }

    pub fn try_float(&self, key: &str) -> Option<f64> {
        try_float(self.get(key))
    }

    pub fn try_int(&self, key: &str) -> Option<i64> {
        try_int(self.get(key))
    }

    pub fn text(&self, key: &str, default: &str) -> String {
        coerce_text(self.get(key), default)
    }

    pub fn raw(&self) -> &'a Map<String, Value> {
        self.data
    }
}
