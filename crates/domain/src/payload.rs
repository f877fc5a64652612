//! Key-value payload carried by requests, responses and events.
//!
//! Requests arrive with arbitrary JSON values. Each accessor below states
//! what it returns when the key is missing, so callers pick the policy
//! explicitly instead of relying on implicit conversions.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// A JSON object with typed accessors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(Map<String, Value>);

impl Payload {
    /// An empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the payload has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw access to a field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Read a number, substituting `default` when the key is missing.
    ///
    /// A present key holding something other than a number reads as `0.0`.
    #[must_use]
    pub fn f32_or(&self, key: &str, default: f32) -> f32 {
        self.0.get(key).map_or(default, value_as_f32)
    }

    /// Read a number without a presence check.
    ///
    /// Missing keys and non-numeric values both read as `0.0`, the value a
    /// null converts to.
    #[must_use]
    pub fn f32_lenient(&self, key: &str) -> f32 {
        self.0.get(key).map_or(0.0, value_as_f32)
    }

    /// Read a string, substituting `default` when the key is missing or does
    /// not hold a string.
    #[must_use]
    pub fn str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.0.get(key).and_then(Value::as_str).unwrap_or(default)
    }

    /// Insert a raw value, replacing any previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Insert a number using its shortest decimal form.
    pub fn insert_f32(&mut self, key: impl Into<String>, value: f32) {
        self.insert(key, number(value));
    }

    /// Insert a string.
    pub fn insert_str(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.insert(key, Value::String(value.into()));
    }
}

impl From<Payload> for Value {
    fn from(payload: Payload) -> Self {
        Value::Object(payload.0)
    }
}

/// Convert an `f32` into a JSON number without widening noise.
///
/// `21.4_f32` widened to `f64` is `21.399999618530273`; going through the
/// shortest decimal form keeps `21.4` on the wire. Non-finite values become
/// `null`.
#[must_use]
pub fn number(value: f32) -> Value {
    value
        .to_string()
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map_or(Value::Null, Value::Number)
}

#[allow(clippy::cast_possible_truncation)]
fn value_as_f32(value: &Value) -> f32 {
    value.as_f64().map_or(0.0, |v| v as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> Payload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn should_read_number_when_key_present() {
        let p = payload(json!({"temperature": 22.5}));
        assert!((p.f32_or("temperature", 1.0) - 22.5).abs() < f32::EPSILON);
    }

    #[test]
    fn should_substitute_default_when_key_missing() {
        let p = Payload::new();
        assert!((p.f32_or("temperature", 1.0) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn should_read_zero_when_present_value_is_not_a_number() {
        let p = payload(json!({"temperature": "warm"}));
        assert!(p.f32_or("temperature", 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn should_read_zero_leniently_when_key_missing() {
        let p = Payload::new();
        assert!(p.f32_lenient("temperature").abs() < f32::EPSILON);
    }

    #[test]
    fn should_read_integer_as_number() {
        let p = payload(json!({"temperature": -2}));
        assert!((p.f32_lenient("temperature") + 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn should_substitute_default_string_when_not_a_string() {
        let p = payload(json!({"thermostatMode": 3}));
        assert_eq!(p.str_or("thermostatMode", ""), "");
        assert_eq!(Payload::new().str_or("thermostatMode", "AUTO"), "AUTO");
    }

    #[test]
    fn should_insert_f32_without_widening_noise() {
        let mut p = Payload::new();
        p.insert_f32("temperature", 21.4);
        assert_eq!(p.get("temperature"), Some(&json!(21.4)));
        assert_eq!(serde_json::to_string(&p).unwrap(), r#"{"temperature":21.4}"#);
    }

    #[test]
    fn should_map_non_finite_to_null() {
        assert_eq!(number(f32::NAN), Value::Null);
        assert_eq!(number(f32::INFINITY), Value::Null);
    }

    #[test]
    fn should_serialize_as_plain_object() {
        let mut p = Payload::new();
        p.insert_str("thermostatMode", "COOL");
        let value: Value = p.into();
        assert_eq!(value, json!({"thermostatMode": "COOL"}));
    }
}
