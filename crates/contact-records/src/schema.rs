use std::collections::BTreeMap;

use contact_types::models::{RawInput, RecordKind};
use rusqlite::types::Value;

use crate::error::RecordError;
use crate::transform::{transform_message, transform_user};

/// Column name to storable value, produced by a kind's transform.
pub type NormalizedRecord = BTreeMap<&'static str, Value>;

pub type TransformFn = fn(&RawInput) -> Result<NormalizedRecord, RecordError>;
pub type ValuesFn = fn(&NormalizedRecord) -> Vec<Value>;

/// How one record kind is validated, normalized and stored.
///
/// `values_from` must yield exactly one value per placeholder of
/// `insert_statement`, in placeholder order.
#[derive(Debug)]
pub struct SchemaEntry {
    pub kind: RecordKind,
    pub required: &'static [&'static str],
    pub transform: TransformFn,
    pub values_from: ValuesFn,
    pub insert_statement: &'static str,
}

static MESSAGES: SchemaEntry = SchemaEntry {
    kind: RecordKind::Message,
    required: &["name", "email", "message"],
    transform: transform_message,
    values_from: message_values,
    insert_statement: "INSERT INTO messages (name, email, phone, message, terms_accepted) VALUES (?, ?, ?, ?, ?)",
};

static USERS: SchemaEntry = SchemaEntry {
    kind: RecordKind::User,
    required: &["name", "email", "password"],
    transform: transform_user,
    values_from: user_values,
    insert_statement: "INSERT INTO users (name, email, password) VALUES (?, ?, ?)",
};

pub fn schema_for(kind: RecordKind) -> &'static SchemaEntry {
    match kind {
        RecordKind::Message => &MESSAGES,
        RecordKind::User => &USERS,
    }
}

/// Resolve a kind by name, failing with a config error when none is registered.
pub fn lookup(name: &str) -> Result<&'static SchemaEntry, RecordError> {
    RecordKind::from_name(name)
        .map(schema_for)
        .ok_or_else(|| RecordError::Config(name.to_string()))
}

fn message_values(record: &NormalizedRecord) -> Vec<Value> {
    columns(record, &["name", "email", "phone", "message", "terms_accepted"])
}

fn user_values(record: &NormalizedRecord) -> Vec<Value> {
    columns(record, &["name", "email", "password"])
}

/// Absent columns bind as NULL so the count always matches the statement.
fn columns(record: &NormalizedRecord, names: &[&str]) -> Vec<Value> {
    names
        .iter()
        .map(|name| record.get(*name).cloned().unwrap_or(Value::Null))
        .collect()
}
