//! Registration record and its validation rules.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use validator::Validate;

lazy_static! {
    /// Exactly nine ASCII digits, nothing else.
    pub static ref PHONE_NUMBER_REGEX: Regex = Regex::new(r"^[0-9]{9}$").unwrap();

    /// Domain part with at least one dot and an alphabetic top-level label,
    /// or a bracketed IPv4 literal.
    pub static ref EMAIL_DOMAIN_REGEX: Regex = Regex::new(
        r"@(\[[0-9]{1,3}(\.[0-9]{1,3}){3}\]|([A-Za-z0-9-]+\.)+[A-Za-z]{2,})$"
    )
    .unwrap();
}

/// Wire names of the record fields, in the order errors are reported.
pub const FIELD_ORDER: [&str; 4] = ["name", "surname", "email", "phoneNumber"];

/// A user registration that passed validation.
///
/// Serializes with the wire field names, which are also the column names
/// of the `users` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRecord {
    #[validate(length(min = 3, message = "Name must be at least 3 characters"))]
    pub name: String,

    #[validate(length(min = 3, message = "Surname must be at least 3 characters"))]
    pub surname: String,

    #[validate(
        email(message = "Email must be in right format"),
        regex(path = *EMAIL_DOMAIN_REGEX, message = "Email must be in right format")
    )]
    pub email: String,

    #[validate(regex(
        path = *PHONE_NUMBER_REGEX,
        message = "Phone number must be 9 digit string"
    ))]
    pub phone_number: String,
}

/// One rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// All violations found in a payload, ordered by field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub errors: Vec<FieldError>,
}

impl ValidationFailure {
    /// Message of the first violation.
    pub fn first_message(&self) -> &str {
        self.errors
            .first()
            .map(|e| e.message.as_str())
            .unwrap_or("Invalid input")
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.first_message())
    }
}

impl std::error::Error for ValidationFailure {}

/// Check a decoded request body against the registration rules.
///
/// Every field is checked; errors come back in `FIELD_ORDER`.
pub fn validate_registration(payload: &Value) -> Result<RegistrationRecord, ValidationFailure> {
    let Value::Object(fields) = payload else {
        return Err(ValidationFailure {
            errors: vec![FieldError::new(
                "body",
                format!("Expected object, received {}", json_type(payload)),
            )],
        });
    };

    let mut errors = Vec::new();
    let mut present = [false; 4];
    let mut values: [String; 4] = Default::default();

    for (i, field) in FIELD_ORDER.iter().enumerate() {
        match string_field(fields, field) {
            Ok(value) => {
                present[i] = true;
                values[i] = value;
            }
            Err(e) => errors.push(e),
        }
    }

    let [name, surname, email, phone_number] = values;
    let record = RegistrationRecord {
        name,
        surname,
        email,
        phone_number,
    };

    if let Err(rule_errors) = record.validate() {
        for (rust_name, field_errors) in rule_errors.field_errors() {
            let Some(i) = field_index(&rust_name) else {
                continue;
            };
            // Rules on absent fields only restate the missing-field error
            if !present[i] {
                continue;
            }
            for err in field_errors.iter() {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                errors.push(FieldError::new(FIELD_ORDER[i], message));
            }
        }
    }

    if errors.is_empty() {
        return Ok(record);
    }

    errors.sort_by_key(|e| FIELD_ORDER.iter().position(|f| *f == e.field));
    // Email syntax and domain rules share one message
    errors.dedup();
    Err(ValidationFailure { errors })
}

fn string_field(fields: &Map<String, Value>, field: &str) -> Result<String, FieldError> {
    match fields.get(field) {
        None => Err(FieldError::new(field, "Required")),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(FieldError::new(
            field,
            format!("Expected string, received {}", json_type(other)),
        )),
    }
}

/// Type name used in type-mismatch messages.
fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Position in `FIELD_ORDER` of a Rust field name.
fn field_index(rust_name: &str) -> Option<usize> {
    match rust_name {
        "name" => Some(0),
        "surname" => Some(1),
        "email" => Some(2),
        "phone_number" => Some(3),
        _ => None,
    }
}
