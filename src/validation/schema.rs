//! Declarative input schemas and the generic validator.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Number, Value};

use crate::error::ValidationError;

/// Loose RFC 5322 address check: local part, `@`, dotted domain.
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
    )
    .expect("valid regex")
});

/// Constraint applied to a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Non-empty string with optional length bounds (in characters).
    Text {
        /// Minimum length.
        min: Option<usize>,
        /// Maximum length.
        max: Option<usize>,
    },
    /// Non-empty string shaped like an email address.
    Email,
    /// Whole number with optional inclusive bounds. Numeric strings are coerced.
    Integer {
        /// Minimum value.
        min: Option<i64>,
        /// Maximum value.
        max: Option<i64>,
    },
    /// JSON object with any content.
    Object,
    /// String from a fixed whitelist.
    OneOf(&'static [&'static str]),
}

impl Constraint {
    /// Check `value` for field `field`, returning the coerced value.
    pub fn check(&self, field: &str, value: &Value) -> Result<Value, ValidationError> {
        match self {
            Constraint::Text { min, max } => {
                let text = expect_text(field, value)?;
                let len = text.chars().count();
                if let Some(min) = min {
                    if len < *min {
                        return Err(violation(
                            field,
                            format!("length must be at least {} characters long", min),
                        ));
                    }
                }
                if let Some(max) = max {
                    if len > *max {
                        return Err(violation(
                            field,
                            format!("length must be less than or equal to {} characters long", max),
                        ));
                    }
                }
                Ok(value.clone())
            }
            Constraint::Email => {
                let text = expect_text(field, value)?;
                if !EMAIL_PATTERN.is_match(text) {
                    return Err(violation(field, "must be a valid email"));
                }
                Ok(value.clone())
            }
            Constraint::Integer { min, max } => {
                let number = expect_number(field, value)?;
                if number.fract() != 0.0 {
                    return Err(violation(field, "must be an integer"));
                }
                if let Some(min) = min {
                    if number < *min as f64 {
                        return Err(violation(
                            field,
                            format!("must be greater than or equal to {}", min),
                        ));
                    }
                }
                if let Some(max) = max {
                    if number > *max as f64 {
                        return Err(violation(field, format!("must be less than or equal to {}", max)));
                    }
                }
                if number < i64::MIN as f64 || number > i64::MAX as f64 {
                    return Err(violation(field, "must be a safe number"));
                }
                Ok(Value::Number(Number::from(number as i64)))
            }
            Constraint::Object => {
                if value.is_object() {
                    Ok(value.clone())
                } else {
                    Err(violation(field, "must be of type object"))
                }
            }
            Constraint::OneOf(allowed) => match value.as_str() {
                Some(text) if allowed.contains(&text) => Ok(value.clone()),
                _ => Err(violation(
                    field,
                    format!("must be one of [{}]", allowed.join(", ")),
                )),
            },
        }
    }
}

fn violation(field: &str, detail: impl AsRef<str>) -> ValidationError {
    ValidationError::new(field, format!("\"{}\" {}", field, detail.as_ref()))
}

fn expect_text<'a>(field: &str, value: &'a Value) -> Result<&'a str, ValidationError> {
    match value.as_str() {
        Some("") => Err(violation(field, "is not allowed to be empty")),
        Some(text) => Ok(text),
        None => Err(violation(field, "must be a string")),
    }
}

fn expect_number(field: &str, value: &Value) -> Result<f64, ValidationError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(n) if n.is_finite() => Ok(n),
        _ => Err(violation(field, "must be a number")),
    }
}

/// One field of a [`Schema`].
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRule {
    /// Key in the input object.
    pub name: &'static str,
    /// Constraint applied when the key is present.
    pub constraint: Constraint,
    /// Whether the key must be present.
    pub required: bool,
}

/// What to do with keys the schema does not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownKeys {
    /// Fail with `"<key>" is not allowed`.
    #[default]
    Reject,
    /// Copy them through unchecked.
    Allow,
}

/// Declarative description of an input object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: Vec<FieldRule>,
    unknown: UnknownKeys,
}

impl Schema {
    /// Empty strict schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an optional field.
    pub fn optional(mut self, name: &'static str, constraint: Constraint) -> Self {
        self.fields.push(FieldRule {
            name,
            constraint,
            required: false,
        });
        self
    }

    /// Add a required field.
    pub fn required(mut self, name: &'static str, constraint: Constraint) -> Self {
        self.fields.push(FieldRule {
            name,
            constraint,
            required: true,
        });
        self
    }

    /// Let undeclared keys through.
    pub fn allow_unknown(mut self) -> Self {
        self.unknown = UnknownKeys::Allow;
        self
    }

    /// Look up a declared field.
    pub fn field(&self, name: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|rule| rule.name == name)
    }

    /// Validate `input` and return the coerced object.
    ///
    /// Declared fields are checked in schema order, then undeclared keys.
    /// The first violation is returned. Key order of the input is kept.
    pub fn validate(&self, input: &Value) -> Result<Map<String, Value>, ValidationError> {
        let object = input
            .as_object()
            .ok_or_else(|| violation("value", "must be of type object"))?;

        let mut output = object.clone();

        for rule in &self.fields {
            match object.get(rule.name) {
                Some(value) => {
                    let coerced = rule.constraint.check(rule.name, value)?;
                    output.insert(rule.name.to_string(), coerced);
                }
                None if rule.required => return Err(violation(rule.name, "is required")),
                None => {}
            }
        }

        if self.unknown == UnknownKeys::Reject {
            if let Some(key) = object.keys().find(|key| self.field(key).is_none()) {
                return Err(violation(key, "is not allowed"));
            }
        }

        Ok(output)
    }
}
