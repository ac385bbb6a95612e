use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::types::ParticipantId;
use crate::utils::{Error, Result};

#[derive(Debug, Clone, Serialize)]
pub struct Attachment {
    pub filename: String,
    pub size_bytes: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub sender: ParticipantId,
    pub sender_name: String,
    pub text: String,
    pub attachment: Option<Attachment>,
    pub sent_at: DateTime<Utc>,
}

/// In-session chat transcript. Lives and dies with the session; persistence
/// is the REST collaborator's concern, not ours.
#[derive(Debug, Default)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    pub fn post(
        &mut self,
        sender: ParticipantId,
        sender_name: &str,
        text: &str,
        attachment: Option<Attachment>,
    ) -> Result<Uuid> {
        let text = text.trim();
        if text.is_empty() && attachment.is_none() {
            return Err(Error::InvalidState("empty chat message".to_string()));
        }
        let message = ChatMessage {
            id: Uuid::new_v4(),
            sender,
            sender_name: sender_name.to_string(),
            text: text.to_string(),
            attachment,
            sent_at: Utc::now(),
        };
        let id = message.id;
        self.messages.push(message);
        Ok(id)
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
