use std::fmt;

/// Raw request body as supplied by a client, keyed by field name.
pub type RawInput = serde_json::Map<String, serde_json::Value>;

/// The categories of record the backend knows how to insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Message,
    User,
}

impl RecordKind {
    pub const ALL: [RecordKind; 2] = [RecordKind::Message, RecordKind::User];

    /// Accepts both the kind name and its table name (`message` / `messages`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "message" | "messages" => Some(Self::Message),
            "user" | "users" => Some(Self::User),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::User => "user",
        }
    }

    pub fn table(self) -> &'static str {
        match self {
            Self::Message => "messages",
            Self::User => "users",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
