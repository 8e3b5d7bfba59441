use contact_db::Database;

use crate::error::RecordError;
use crate::schema::{NormalizedRecord, SchemaEntry};

/// Store one normalized record with the schema's fixed statement and
/// return the id SQLite generated for it. Blocks on the database.
pub fn execute(
    db: &Database,
    schema: &SchemaEntry,
    record: &NormalizedRecord,
) -> Result<i64, RecordError> {
    let values = (schema.values_from)(record);
    db.insert_row(schema.insert_statement, &values)
        .map_err(RecordError::storage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::schema_for;
    use contact_types::models::RecordKind;
    use rusqlite::types::Value;

    fn user(email: &str) -> NormalizedRecord {
        let mut record = NormalizedRecord::new();
        record.insert("name", Value::Text("Ana".into()));
        record.insert("email", Value::Text(email.into()));
        record.insert("password", Value::Text("$argon2id$stub".into()));
        record
    }

    #[test]
    fn returns_generated_id() {
        let db = Database::open_in_memory().unwrap();
        let schema = schema_for(RecordKind::User);

        let id = execute(&db, schema, &user("a@b.com")).unwrap();
        assert!(id > 0);
        assert_eq!(db.get_user(id).unwrap().unwrap().name, "Ana");
    }

    #[test]
    fn duplicate_surfaces_as_storage_conflict() {
        let db = Database::open_in_memory().unwrap();
        let schema = schema_for(RecordKind::User);
        execute(&db, schema, &user("a@b.com")).unwrap();

        match execute(&db, schema, &user("a@b.com")).unwrap_err() {
            RecordError::Storage { message, conflict } => {
                assert!(conflict);
                assert!(message.contains("users.email"), "{message}");
            }
            other => panic!("expected storage error, got {other:?}"),
        }
    }

    #[test]
    fn not_null_violation_is_reported() {
        let db = Database::open_in_memory().unwrap();
        let err = execute(&db, schema_for(RecordKind::Message), &NormalizedRecord::new())
            .unwrap_err();
        assert!(matches!(err, RecordError::Storage { .. }));
    }
}
