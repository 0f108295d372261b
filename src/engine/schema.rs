//! Field schemas for the reference engine.

use crate::value::Value;

/// Primitive type a field holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
}

/// A single check with the message reported when it fails.
#[derive(Clone, Debug, PartialEq)]
pub enum Rule {
    /// String length, in characters, of at least `len`.
    MinLength { len: usize, message: String },
    /// Number of at least `value`.
    Min { value: f64, message: String },
}

impl Rule {
    fn check(&self, value: &Value) -> Option<&str> {
        let passed = match (self, value) {
            (Rule::MinLength { len, .. }, Value::String(s)) => s.chars().count() >= *len,
            (Rule::Min { value: min, .. }, Value::Number(n)) => n >= min,
            // Kind mismatches are reported before rules run
            _ => true,
        };
        if passed {
            None
        } else {
            Some(self.message())
        }
    }

    fn message(&self) -> &str {
        match self {
            Rule::MinLength { message, .. } | Rule::Min { message, .. } => message,
        }
    }
}

/// Schema for one field.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldSchema {
    pub kind: FieldKind,
    pub optional: bool,
    pub rules: Vec<Rule>,
}

impl FieldSchema {
    pub fn string() -> Self {
        Self {
            kind: FieldKind::String,
            optional: false,
            rules: Vec::new(),
        }
    }

    pub fn number() -> Self {
        Self {
            kind: FieldKind::Number,
            optional: false,
            rules: Vec::new(),
        }
    }

    pub fn min_length(mut self, len: usize, message: impl Into<String>) -> Self {
        self.rules.push(Rule::MinLength {
            len,
            message: message.into(),
        });
        self
    }

    pub fn min(mut self, value: f64, message: impl Into<String>) -> Self {
        self.rules.push(Rule::Min {
            value,
            message: message.into(),
        });
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Value a field starts with when no initial data is given.
    pub fn default_value(&self) -> Value {
        match (self.optional, self.kind) {
            (true, _) => Value::Null,
            (false, FieldKind::String) => Value::from(""),
            (false, FieldKind::Number) => Value::from(0),
        }
    }

    /// First error for `value`, if any.
    pub fn check(&self, value: &Value) -> Option<String> {
        if value.is_null() && self.optional {
            return None;
        }

        let kind_ok = match self.kind {
            FieldKind::String => value.as_str().is_some(),
            FieldKind::Number => value.as_f64().is_some(),
        };
        if !kind_ok {
            return Some(match self.kind {
                FieldKind::String => "Expected string".to_string(),
                FieldKind::Number => "Expected number".to_string(),
            });
        }

        self.rules
            .iter()
            .find_map(|rule| rule.check(value))
            .map(str::to_string)
    }
}

/// Ordered set of named fields.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Schema {
    fields: Vec<(String, FieldSchema)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, replacing any earlier field of the same name.
    pub fn field(mut self, name: impl Into<String>, field: FieldSchema) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = field,
            None => self.fields.push((name, field)),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, f)| f)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldSchema)> {
        self.fields.iter().map(|(n, f)| (n.as_str(), f))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
