use std::sync::Arc;

use contact_db::Database;
use contact_types::models::RawInput;
use tracing::{debug, error};

use crate::error::RecordError;
use crate::insert::execute;
use crate::schema::lookup;
use crate::transform::transform;
use crate::validate::validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertOutcome {
    pub insert_id: i64,
}

/// Runs validate, transform and insert for one record.
///
/// Holds the only shared state the pipeline needs: the storage pool.
/// Clones are cheap and share that pool.
#[derive(Clone)]
pub struct Dispatcher {
    db: Arc<Database>,
}

impl Dispatcher {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Arc<Database> {
        &self.db
    }

    /// Insert `raw` as a record of kind `kind` and return its generated id.
    ///
    /// Stops at the first failing step; nothing is retried. Hashing and the
    /// insert run on the blocking pool so the runtime threads stay free.
    pub async fn insert_record(
        &self,
        kind: &str,
        raw: RawInput,
    ) -> Result<InsertOutcome, RecordError> {
        let schema = lookup(kind)?;
        validate(schema, &raw)?;

        let db = self.db.clone();
        let insert_id = tokio::task::spawn_blocking(move || {
            let record = transform(schema, &raw)?;
            execute(&db, schema, &record)
        })
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            RecordError::Internal(e.to_string())
        })??;

        debug!(kind = %schema.kind, insert_id, "record inserted");
        Ok(InsertOutcome { insert_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::password::verify_password;
    use serde_json::{Value as JsonValue, json};

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(Arc::new(Database::open_in_memory().unwrap()))
    }

    fn raw(value: JsonValue) -> RawInput {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn unknown_kind_is_config_error() {
        let err = dispatcher()
            .insert_record("orders", raw(json!({ "name": "A" })))
            .await
            .unwrap_err();
        assert!(matches!(err, RecordError::Config(_)));
    }

    #[tokio::test]
    async fn each_missing_field_is_named() {
        let d = dispatcher();
        let full = json!({ "name": "A", "email": "a@b.com", "message": "hi" });

        for field in ["name", "email", "message"] {
            let mut input = raw(full.clone());
            input.insert(field.to_string(), json!(""));
            let err = d.insert_record("message", input).await.unwrap_err();
            assert_eq!(err.to_string(), format!("missing field: {field}"));
        }
    }

    #[tokio::test]
    async fn message_insert_records_terms_flag() {
        let d = dispatcher();

        let without = d
            .insert_record(
                "message",
                raw(json!({ "name": "A", "email": "a@b.com", "message": "hi" })),
            )
            .await
            .unwrap();
        assert!(without.insert_id > 0);

        let with = d
            .insert_record(
                "messages",
                raw(json!({
                    "name": "A",
                    "email": "a@b.com",
                    "message": "hi",
                    "accepted_terms": true,
                })),
            )
            .await
            .unwrap();

        let db = d.db();
        let row = db.get_message(without.insert_id).unwrap().unwrap();
        assert_eq!(row.terms_accepted, 0);
        assert_eq!(row.phone, None);
        assert_eq!(row.message, "hi");
        assert_eq!(db.get_message(with.insert_id).unwrap().unwrap().terms_accepted, 1);
    }

    #[tokio::test]
    async fn short_password_rejected() {
        let err = dispatcher()
            .insert_record(
                "user",
                raw(json!({ "name": "A", "email": "a@b.com", "password": "abc" })),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RecordError::Validation(ValidationError::PasswordTooShort)
        ));
    }

    #[tokio::test]
    async fn stored_password_is_a_salted_hash() {
        let d = dispatcher();
        let first = d
            .insert_record(
                "user",
                raw(json!({ "name": "A", "email": "a@b.com", "password": "longenough" })),
            )
            .await
            .unwrap();
        let second = d
            .insert_record(
                "user",
                raw(json!({ "name": "B", "email": "b@b.com", "password": "longenough" })),
            )
            .await
            .unwrap();

        let a = d.db().get_user(first.insert_id).unwrap().unwrap();
        let b = d.db().get_user(second.insert_id).unwrap().unwrap();
        assert_ne!(a.password, "longenough");
        assert_ne!(a.password, b.password);
        assert!(verify_password("longenough", &a.password));
    }

    #[tokio::test]
    async fn invalid_email_fails_before_storage() {
        let d = dispatcher();
        for kind in ["message", "user"] {
            let err = d
                .insert_record(
                    kind,
                    raw(json!({
                        "name": "A",
                        "email": "not-an-email",
                        "message": "hi",
                        "password": "longenough",
                    })),
                )
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                RecordError::Validation(ValidationError::InvalidEmail)
            ));
        }
        assert!(d.db().get_message(1).unwrap().is_none());
        assert!(d.db().get_user(1).unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_user_email_is_storage_conflict() {
        let d = dispatcher();
        let input = json!({ "name": "A", "email": "a@b.com", "password": "longenough" });
        d.insert_record("user", raw(input.clone())).await.unwrap();

        let err = d.insert_record("user", raw(input)).await.unwrap_err();
        assert!(matches!(err, RecordError::Storage { conflict: true, .. }));
    }

    #[tokio::test]
    async fn concurrent_inserts_get_distinct_ids() {
        let d = dispatcher();
        let mut handles = Vec::new();
        for i in 0..8 {
            let d = d.clone();
            handles.push(tokio::spawn(async move {
                d.insert_record(
                    "message",
                    raw(json!({ "name": format!("n{i}"), "email": "a@b.com", "message": "hi" })),
                )
                .await
                .unwrap()
                .insert_id
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 8);
    }
}
