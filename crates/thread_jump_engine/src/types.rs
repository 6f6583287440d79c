use std::fmt;

/// Non-owning handle to a node of a parsed [`crate::ConversationPage`].
///
/// Only meaningful against the document it was taken from; a reload invalidates it.
pub type NodeHandle = ego_tree::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Parses a role attribute value. Blank or unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("user") {
            Some(Role::User)
        } else if value.eq_ignore_ascii_case("assistant") {
            Some(Role::Assistant)
        } else {
            None
        }
    }

    /// Last-resort guess: conversations usually alternate, starting with the user.
    pub fn by_position(index: usize) -> Self {
        if index % 2 == 0 {
            Role::User
        } else {
            Role::Assistant
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// How a message's role was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleSource {
    Attribute,
    Markup,
    /// Alternating guess by ordinal position. Best-effort only.
    Position,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedMessage {
    pub id: String,
    pub role: Role,
    pub role_source: RoleSource,
    /// Visible text with chrome removed and whitespace collapsed.
    pub raw_text: String,
    pub normalized_text: String,
    pub snippet: String,
    pub node: NodeHandle,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("message element has a blank id")]
    MissingId,
    #[error("message id {0:?} already extracted in this pass")]
    DuplicateId(String),
    #[error("unsupported role attribute value {0:?}")]
    UnsupportedRole(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid selector {selector:?}: {message}")]
    InvalidSelector { selector: String, message: String },
    #[error("failed to parse extractor config: {0}")]
    Parse(String),
}
