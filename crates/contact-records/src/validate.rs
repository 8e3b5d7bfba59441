use std::sync::LazyLock;

use contact_types::models::RawInput;
use regex::Regex;
use serde_json::Value as JsonValue;

use crate::error::ValidationError;
use crate::schema::SchemaEntry;
use crate::value::is_truthy;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern compiles"));

/// Basic `local@domain.tld` shape check, nothing more.
pub fn is_email(candidate: &str) -> bool {
    EMAIL.is_match(candidate)
}

/// Check required fields and, when one is supplied, the email shape.
pub fn validate(schema: &SchemaEntry, raw: &RawInput) -> Result<(), ValidationError> {
    for &field in schema.required {
        let missing = match raw.get(field) {
            None | Some(JsonValue::Null) => true,
            Some(JsonValue::String(s)) => s.trim().is_empty(),
            Some(_) => false,
        };
        if missing {
            return Err(ValidationError::MissingField(field.to_string()));
        }
    }

    let email = raw.get("email");
    if is_truthy(email) {
        let valid = matches!(email, Some(JsonValue::String(s)) if is_email(s));
        if !valid {
            return Err(ValidationError::InvalidEmail);
        }
    }

    Ok(())
}
