use arbiter_core::{ArbiterError, ResponseFormat};
use serde_json::{Map, Value};

/// Canonical description of the JSON a judge model must return.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDescription {
    pub name: String,
    pub schema: Value,
}

impl SchemaDescription {
    pub fn new(name: impl Into<String>, schema: Value) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }

    /// Provider-side hint. Not strict: the local validator is authoritative.
    pub fn to_response_format(&self) -> ResponseFormat {
        ResponseFormat::JsonSchema {
            name: self.name.clone(),
            schema: self.schema.clone(),
            strict: false,
        }
    }

    /// Schema rendered for inclusion in a prompt.
    pub fn to_prompt_text(&self) -> String {
        serde_json::to_string_pretty(&self.schema).unwrap_or_else(|_| self.schema.to_string())
    }
}

/// Returns text telling a model what output shape is expected.
pub trait FormatInstructions {
    fn get_format_instructions(&self) -> String;
}

/// The structured output contract of one evaluation strategy: a schema to
/// steer the provider, and a local validator that does not trust it.
pub trait OutputContract: Send + Sync {
    type Output: Send;

    fn describe(&self) -> SchemaDescription;

    fn validate(&self, reply: &Value) -> Result<Self::Output, ArbiterError>;
}

impl<C: OutputContract> FormatInstructions for C {
    fn get_format_instructions(&self) -> String {
        format!(
            "Respond only with a JSON object that conforms to this JSON Schema:\n{}",
            self.describe().to_prompt_text()
        )
    }
}

// ---------------------------------------------------------------------------
// Field helpers shared by the validators
// ---------------------------------------------------------------------------

pub(crate) fn as_object<'a>(
    value: &'a Value,
    path: &str,
) -> Result<&'a Map<String, Value>, ArbiterError> {
    value
        .as_object()
        .ok_or_else(|| ArbiterError::schema_violation(path, "expected an object"))
}

pub(crate) fn array_field<'a>(
    object: &'a Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<&'a Vec<Value>, ArbiterError> {
    let field = join(path, key);
    match object.get(key) {
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(ArbiterError::schema_violation(field, "expected an array")),
        None => Err(ArbiterError::schema_violation(field, "missing")),
    }
}

/// A required string with at least one non-whitespace character.
pub(crate) fn text_field(
    object: &Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<String, ArbiterError> {
    let field = join(path, key);
    match object.get(key) {
        Some(Value::String(text)) if !text.trim().is_empty() => Ok(text.trim().to_string()),
        Some(Value::String(_)) => Err(ArbiterError::schema_violation(field, "must not be empty")),
        Some(_) => Err(ArbiterError::schema_violation(field, "expected a string")),
        None => Err(ArbiterError::schema_violation(field, "missing")),
    }
}

/// A required integer score in `[0, 100]`. Integral floats such as `85.0`
/// are accepted; fractions, strings and out-of-range values are not.
pub(crate) fn score_field(
    object: &Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<u8, ArbiterError> {
    let field = join(path, key);
    let value = object
        .get(key)
        .ok_or_else(|| ArbiterError::schema_violation(&field, "missing"))?;
    let number = match value {
        Value::Number(n) => n,
        _ => return Err(ArbiterError::schema_violation(field, "expected an integer")),
    };
    let score = if let Some(i) = number.as_i64() {
        i
    } else {
        match number.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() <= i64::MAX as f64 => f as i64,
            _ => return Err(ArbiterError::schema_violation(field, "expected an integer")),
        }
    };
    if !(0..=100).contains(&score) {
        return Err(ArbiterError::schema_violation(
            field,
            format!("{score} is outside [0, 100]"),
        ));
    }
    Ok(score as u8)
}

pub(crate) fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn score_accepts_integral_numbers() {
        let o = obj(json!({"a": 0, "b": 100, "c": 85.0}));
        assert_eq!(score_field(&o, "a", "").unwrap(), 0);
        assert_eq!(score_field(&o, "b", "").unwrap(), 100);
        assert_eq!(score_field(&o, "c", "").unwrap(), 85);
    }

    #[test]
    fn score_rejects_out_of_range_fractional_and_strings() {
        let o = obj(json!({"neg": -1, "big": 101, "frac": 72.5, "text": "90"}));
        for key in ["neg", "big", "frac", "text"] {
            let err = score_field(&o, key, "x").unwrap_err();
            assert!(matches!(err, ArbiterError::SchemaViolation { ref field, .. } if field == &format!("x.{key}")));
        }
    }

    #[test]
    fn text_rejects_blank() {
        let o = obj(json!({"reason": "   "}));
        assert!(text_field(&o, "reason", "").is_err());
    }
}
