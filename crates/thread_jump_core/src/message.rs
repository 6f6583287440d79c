use std::fmt;

/// Opaque message identifier taken from the host page. Unique per message node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MessageId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for MessageId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Badge shown in front of a row's snippet.
    pub fn badge(self) -> &'static str {
        match self {
            Role::User => "[You]",
            Role::Assistant => "[AI]",
        }
    }
}

/// A message as the panel sees it: no reference back into the host page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEntry {
    pub id: MessageId,
    pub role: Role,
    /// Lowercased full text, used for matching.
    pub normalized_text: String,
    /// Truncated display text.
    pub snippet: String,
}
