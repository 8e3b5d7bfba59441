use thiserror::Error;

/// Input that cannot be stored as given. The caller has to fix it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing field: {0}")]
    MissingField(String),

    #[error("invalid email")]
    InvalidEmail,

    #[error("password too short")]
    PasswordTooShort,
}

#[derive(Debug, Error)]
pub enum RecordError {
    /// The requested kind has no schema entry.
    #[error("unknown kind: {0}")]
    Config(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The backend rejected the insert or could not be reached.
    /// `conflict` is set for constraint violations such as a duplicate email.
    #[error("{message}")]
    Storage { message: String, conflict: bool },

    /// Password hashing or the blocking worker failed.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RecordError {
    pub fn storage(err: anyhow::Error) -> Self {
        Self::Storage {
            conflict: contact_db::is_constraint_violation(&err),
            message: err.to_string(),
        }
    }
}
