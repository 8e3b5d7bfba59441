use contact_types::models::RawInput;
use rusqlite::types::Value;
use serde_json::Value as JsonValue;

use crate::error::{RecordError, ValidationError};
use crate::password::{MIN_PASSWORD_LEN, hash_password};
use crate::schema::{NormalizedRecord, SchemaEntry};
use crate::value::{is_truthy, to_sql};

/// Turn validated raw input into the record `schema` stores.
/// For users this hashes the password, so call it off the async runtime.
pub fn transform(schema: &SchemaEntry, raw: &RawInput) -> Result<NormalizedRecord, RecordError> {
    (schema.transform)(raw)
}

pub fn transform_message(raw: &RawInput) -> Result<NormalizedRecord, RecordError> {
    let phone = raw.get("phone");
    let phone = if is_truthy(phone) {
        phone.map_or(Value::Null, to_sql)
    } else {
        Value::Null
    };

    let mut record = NormalizedRecord::new();
    record.insert("name", field(raw, "name"));
    record.insert("email", field(raw, "email"));
    record.insert("phone", phone);
    record.insert("message", field(raw, "message"));
    record.insert(
        "terms_accepted",
        Value::Integer(i64::from(is_truthy(raw.get("accepted_terms")))),
    );
    Ok(record)
}

pub fn transform_user(raw: &RawInput) -> Result<NormalizedRecord, RecordError> {
    let password = match raw.get("password") {
        Some(JsonValue::String(p)) if p.chars().count() >= MIN_PASSWORD_LEN => p,
        _ => return Err(ValidationError::PasswordTooShort.into()),
    };

    let hashed = hash_password(password)
        .map_err(|e| RecordError::Internal(format!("password hashing failed: {}", e)))?;

    let mut record = NormalizedRecord::new();
    record.insert("name", field(raw, "name"));
    record.insert("email", field(raw, "email"));
    record.insert("password", Value::Text(hashed));
    Ok(record)
}

fn field(raw: &RawInput, name: &str) -> Value {
    raw.get(name).map_or(Value::Null, to_sql)
}
