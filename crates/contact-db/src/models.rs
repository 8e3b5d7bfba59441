//! Database row types. These map directly to SQLite rows.

#[derive(Debug, Clone)]
pub struct MessageRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub terms_accepted: i64,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password: String,
    pub created_at: String,
}
