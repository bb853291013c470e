//! Input contracts for tools.
//!
//! An [`InputContract`] is the ordered list of named, typed fields a tool
//! accepts. The dispatch engine validates every raw argument record against
//! the contract before the tool's handler is allowed to run, so handlers only
//! ever see well-typed input.

use std::fmt;
use std::sync::Arc;

use rmcp::model::JsonObject;
use serde_json::{Value, json};

/// Primitive type accepted by a contract field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Number,
    Integer,
    String,
    Boolean,
}

impl FieldKind {
    /// JSON Schema type name for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Integer => "integer",
            Self::String => "string",
            Self::Boolean => "boolean",
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::Number => value.is_number(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::String => value.is_string(),
            Self::Boolean => value.is_boolean(),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single named field of an input contract.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub description: &'static str,
}

/// Ordered mapping from field name to type descriptor.
///
/// Contracts are built once when a tool is registered and never change
/// afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputContract {
    fields: Vec<FieldSpec>,
}

impl InputContract {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required number field.
    pub fn number(self, name: &'static str, description: &'static str) -> Self {
        self.field(name, FieldKind::Number, true, description)
    }

    /// Add a required integer field.
    pub fn integer(self, name: &'static str, description: &'static str) -> Self {
        self.field(name, FieldKind::Integer, true, description)
    }

    /// Add a required string field.
    pub fn string(self, name: &'static str, description: &'static str) -> Self {
        self.field(name, FieldKind::String, true, description)
    }

    /// Add an optional string field.
    pub fn optional_string(self, name: &'static str, description: &'static str) -> Self {
        self.field(name, FieldKind::String, false, description)
    }

    /// Add a required boolean field.
    pub fn boolean(self, name: &'static str, description: &'static str) -> Self {
        self.field(name, FieldKind::Boolean, true, description)
    }

    fn field(
        mut self,
        name: &'static str,
        kind: FieldKind,
        required: bool,
        description: &'static str,
    ) -> Self {
        self.fields.push(FieldSpec {
            name,
            kind,
            required,
            description,
        });
        self
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Validate a raw argument record against this contract.
    ///
    /// Every violation is collected; fields that are not part of the contract
    /// are ignored.
    pub fn validate(&self, arguments: &JsonObject) -> Result<(), ValidationReport> {
        let violations: Vec<FieldViolation> = self
            .fields
            .iter()
            .filter_map(|spec| check_field(spec, arguments.get(spec.name)))
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationReport { violations })
        }
    }

    /// Render the contract as a JSON Schema object for `tools/list`.
    pub fn to_json_schema(&self) -> Arc<JsonObject> {
        let mut properties = JsonObject::new();
        let mut required = Vec::new();

        for spec in &self.fields {
            properties.insert(
                spec.name.to_string(),
                json!({
                    "type": spec.kind.as_str(),
                    "description": spec.description,
                }),
            );
            if spec.required {
                required.push(Value::String(spec.name.to_string()));
            }
        }

        let mut schema = JsonObject::new();
        schema.insert("type".to_string(), json!("object"));
        schema.insert("properties".to_string(), Value::Object(properties));
        if !required.is_empty() {
            schema.insert("required".to_string(), Value::Array(required));
        }
        Arc::new(schema)
    }
}

fn check_field(spec: &FieldSpec, value: Option<&Value>) -> Option<FieldViolation> {
    let problem = match value {
        None | Some(Value::Null) if !spec.required => return None,
        None => ViolationProblem::Missing,
        Some(value) if spec.kind.accepts(value) => return None,
        Some(value) => ViolationProblem::WrongType {
            found: json_type_name(value),
        },
    };

    Some(FieldViolation {
        field: spec.name.to_string(),
        expected: spec.kind,
        problem,
    })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// What was wrong with a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationProblem {
    Missing,
    WrongType { found: &'static str },
}

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub expected: FieldKind,
    pub problem: ViolationProblem,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.problem {
            ViolationProblem::Missing => {
                write!(f, "'{}' is required (expected {})", self.field, self.expected)
            }
            ViolationProblem::WrongType { found } => write!(
                f,
                "'{}' expected {}, received {}",
                self.field, self.expected, found
            ),
        }
    }
}

/// Field-level detail for a rejected argument record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub violations: Vec<FieldViolation>,
}

impl ValidationReport {
    /// Names of the offending fields, in contract order.
    pub fn fields(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.field.as_str()).collect()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.violations.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join("; "))
    }
}
