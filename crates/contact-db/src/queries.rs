use crate::Database;
use crate::models::{MessageRow, UserRow};
use anyhow::Result;
use rusqlite::types::Value;
use rusqlite::{Connection, ErrorCode, OptionalExtension};

impl Database {
    // -- Inserts --

    /// Run one parameterized INSERT and return the generated row id.
    /// Values are only ever bound, never spliced into `sql`.
    pub fn insert_row(&self, sql: &str, values: &[Value]) -> Result<i64> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(sql)?;
            stmt.execute(rusqlite::params_from_iter(values))?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Number of bind parameters `sql` declares.
    pub fn parameter_count(&self, sql: &str) -> Result<usize> {
        self.with_conn(|conn| Ok(conn.prepare_cached(sql)?.parameter_count()))
    }

    // -- Messages --

    pub fn get_message(&self, id: i64) -> Result<Option<MessageRow>> {
        self.with_conn(|conn| query_message(conn, id))
    }

    // -- Users --

    pub fn get_user(&self, id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            query_user(
                conn,
                "SELECT id, name, email, password, created_at FROM users WHERE id = ?1",
                &Value::Integer(id),
            )
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            query_user(
                conn,
                "SELECT id, name, email, password, created_at FROM users WHERE email = ?1",
                &Value::Text(email.to_string()),
            )
        })
    }
}

/// True when `err` came from SQLite rejecting a UNIQUE/NOT NULL/CHECK constraint.
pub fn is_constraint_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<rusqlite::Error>()
        .and_then(|e| e.sqlite_error_code())
        == Some(ErrorCode::ConstraintViolation)
}

fn query_message(conn: &Connection, id: i64) -> Result<Option<MessageRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, email, phone, message, terms_accepted, created_at
         FROM messages WHERE id = ?1",
    )?;

    let row = stmt
        .query_row([id], |row| {
            Ok(MessageRow {
                id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
                phone: row.get(3)?,
                message: row.get(4)?,
                terms_accepted: row.get(5)?,
                created_at: row.get(6)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_user(conn: &Connection, sql: &str, key: &Value) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(sql)?;

    let row = stmt
        .query_row([key], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
                password: row.get(3)?,
                created_at: row.get(4)?,
            })
        })
        .optional()?;

    Ok(row)
}
