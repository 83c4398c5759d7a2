//! Conversation log entries

use std::time::{SystemTime, UNIX_EPOCH};

/// Author of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The person asking questions
    User,
    /// The chat backend
    Bot,
}

impl Role {
    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Bot => "bot",
        }
    }
}

/// One message in the in-memory conversation log
///
/// The log is advisory only; nothing reads it back to make decisions.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationTurn {
    /// Who wrote the message
    pub role: Role,
    /// Message text
    pub content: String,
    /// Creation time in milliseconds since the Unix epoch
    pub timestamp_ms: u64,
}

impl ConversationTurn {
    /// Create a turn stamped with the current time
    pub fn now(role: Role, content: impl Into<String>) -> Self {
        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self {
            role,
            content: content.into(),
            timestamp_ms,
        }
    }

    /// Create a user turn
    pub fn user(content: impl Into<String>) -> Self {
        Self::now(Role::User, content)
    }

    /// Create a bot turn
    pub fn bot(content: impl Into<String>) -> Self {
        Self::now(Role::Bot, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_constructors() {
        let turn = ConversationTurn::user("hello");
        assert_eq!(turn.role, Role::User);
        assert_eq!(turn.content, "hello");
        assert!(turn.timestamp_ms > 0);

        assert_eq!(ConversationTurn::bot("hi").role.as_str(), "bot");
    }
}
