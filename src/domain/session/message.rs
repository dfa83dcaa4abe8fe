//! Conversation message value object.
//!
//! Messages are immutable user/assistant exchange records stored inside a
//! game session. Unlike entities they carry no identity of their own: a
//! message is fully described by its role, content, and timestamp. System
//! prompts are composed at provider-call time and never stored here.

use crate::domain::foundation::{Timestamp, ValidationError};
use serde::{Deserialize, Serialize};

/// Role of a stored conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    /// Visitor input.
    User,
    /// Assistant reply.
    Assistant,
}

impl MessageRole {
    /// Returns the wire name (matches the JSON representation).
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An immutable message within a session conversation.
///
/// # Invariants
///
/// - `content` is non-empty (validated at construction)
/// - `timestamp` is set at construction and never changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    /// Who produced the message.
    role: MessageRole,

    /// The message text.
    content: String,

    /// When the message was recorded.
    timestamp: Timestamp,
}

impl ConversationMessage {
    /// Creates a new message with the given role, content, and timestamp.
    ///
    /// The timestamp is caller-supplied so that a user message and the
    /// assistant reply recorded together share the same instant.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if content is empty or whitespace-only
    pub fn new(
        role: MessageRole,
        content: impl Into<String>,
        timestamp: Timestamp,
    ) -> Result<Self, ValidationError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(ValidationError::empty_field("content"));
        }

        Ok(Self {
            role,
            content,
            timestamp,
        })
    }

    /// Creates a user message.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if content is empty or whitespace-only
    pub fn user(content: impl Into<String>, timestamp: Timestamp) -> Result<Self, ValidationError> {
        Self::new(MessageRole::User, content, timestamp)
    }

    /// Creates an assistant message.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if content is empty or whitespace-only
    pub fn assistant(
        content: impl Into<String>,
        timestamp: Timestamp,
    ) -> Result<Self, ValidationError> {
        Self::new(MessageRole::Assistant, content, timestamp)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the role.
    pub fn role(&self) -> MessageRole {
        self.role
    }

    /// Returns the content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns when the message was recorded.
    pub fn timestamp(&self) -> &Timestamp {
        &self.timestamp
    }

    /// Returns true if this message is from the user.
    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }

    /// Returns true if this message is from the assistant.
    pub fn is_assistant(&self) -> bool {
        self.role == MessageRole::Assistant
    }
}
