//! Parameter - Typed Configuration Parameters
//!
//! Structured rows of the upload form and their coercion into JSON values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Declared type of a parameter row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    #[default]
    String,
    Number,
    Boolean,
    Object,
    Array,
}

impl ParameterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterType::String => "string",
            ParameterType::Number => "number",
            ParameterType::Boolean => "boolean",
            ParameterType::Object => "object",
            ParameterType::Array => "array",
        }
    }
}

impl FromStr for ParameterType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "string" | "str" => Ok(ParameterType::String),
            "number" | "num" => Ok(ParameterType::Number),
            "boolean" | "bool" => Ok(ParameterType::Boolean),
            "object" => Ok(ParameterType::Object),
            "array" => Ok(ParameterType::Array),
            other => Err(Error::validation(format!("Unknown parameter type: {other}"))),
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do when an object/array value is not valid JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectParsePolicy {
    /// Store the raw text as a string (legacy behavior)
    #[default]
    KeepRaw,
    /// Refuse the submission
    Reject,
}

/// One `(name, type, value)` row of the structured editor
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParameterRow {
    pub name: String,
    pub kind: ParameterType,
    pub value: String,
}

impl ParameterRow {
    pub fn new(name: impl Into<String>, kind: ParameterType, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            value: value.into(),
        }
    }
}

impl FromStr for ParameterRow {
    type Err = Error;

    /// Parse `name:type:value`; the value may itself contain colons
    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.splitn(3, ':');
        let name = parts.next().unwrap_or_default().trim();
        let kind = parts.next();
        let value = parts.next();
        match (kind, value) {
            (Some(kind), Some(value)) if !name.is_empty() => {
                Ok(ParameterRow::new(name, kind.parse()?, value))
            }
            _ => Err(Error::validation(format!(
                "Parameter must look like name:type:value, got '{s}'"
            ))),
        }
    }
}

/// Coerce a raw text value according to its declared type
pub fn coerce_value(row: &ParameterRow, policy: ObjectParsePolicy) -> Result<Value> {
    let raw = row.value.as_str();
    match row.kind {
        ParameterType::String => Ok(Value::String(raw.to_string())),
        ParameterType::Number => Ok(parse_number(raw)),
        ParameterType::Boolean => Ok(Value::Bool(raw.trim() == "true")),
        ParameterType::Object | ParameterType::Array => {
            let text = if raw.trim().is_empty() {
                if row.kind == ParameterType::Object { "{}" } else { "[]" }
            } else {
                raw
            };
            match serde_json::from_str::<Value>(text) {
                Ok(value) => Ok(value),
                Err(e) => match policy {
                    ObjectParsePolicy::KeepRaw => Ok(Value::String(raw.to_string())),
                    ObjectParsePolicy::Reject => Err(Error::validation(format!(
                        "Parameter '{}' is not a valid {}: {e}",
                        row.name, row.kind
                    ))),
                },
            }
        }
    }
}

/// Leading-float parse, 0 when nothing numeric can be read
fn parse_number(raw: &str) -> Value {
    let trimmed = raw.trim();
    let end = trimmed
        .char_indices()
        .take_while(|(i, c)| {
            c.is_ascii_digit() || *c == '.' || *c == 'e' || *c == 'E' || ((*c == '-' || *c == '+') && *i == 0)
        })
        .map(|(i, c)| i + c.len_utf8())
        .last()
        .unwrap_or(0);

    // Shrink until the prefix parses, "1.5e" -> "1.5"
    let mut prefix = &trimmed[..end];
    let number = loop {
        if prefix.is_empty() {
            break 0.0;
        }
        if let Ok(n) = prefix.parse::<f64>() {
            break n;
        }
        prefix = &prefix[..prefix.len() - 1];
    };

    if !number.is_finite() {
        return Value::from(0);
    }
    if number.fract() == 0.0 && number.abs() < i64::MAX as f64 {
        Value::from(number as i64)
    } else {
        serde_json::Number::from_f64(number)
            .map(Value::Number)
            .unwrap_or_else(|| Value::from(0))
    }
}

/// Build the parameters map; rows with an empty name are skipped
pub fn rows_to_map(rows: &[ParameterRow], policy: ObjectParsePolicy) -> Result<Map<String, Value>> {
    let mut map = Map::new();
    for row in rows {
        let name = row.name.trim();
        if name.is_empty() {
            continue;
        }
        map.insert(name.to_string(), coerce_value(row, policy)?);
    }
    Ok(map)
}
