use chrono::{DateTime, Utc};
use uuid::Uuid;
use crate::models::{DomainError, Message, SkillMatch};

/// Ordered chat history of one match
///
/// Messages are kept sorted by creation timestamp; messages with the same
/// timestamp keep their insertion order.
#[derive(Debug, Clone)]
pub struct MessageThread {
    match_id: Uuid,
    participants: [String; 2],
    messages: Vec<Message>,
    next_sequence: u64,
}

impl MessageThread {
    pub fn new(skill_match: &SkillMatch) -> Self {
        Self {
            match_id: skill_match.id,
            participants: [skill_match.user_a.clone(), skill_match.user_b.clone()],
            messages: Vec::new(),
            next_sequence: 0,
        }
    }

    pub fn match_id(&self) -> Uuid {
        self.match_id
    }

    /// Append a message sent by one of the participants
    pub fn post(
        &mut self,
        sender_id: &str,
        content: &str,
        created_at: DateTime<Utc>,
    ) -> Result<&Message, DomainError> {
        if !self.participants.iter().any(|p| p == sender_id) {
            return Err(DomainError::NotParticipant(sender_id.to_string()));
        }
        let content = content.trim();
        if content.is_empty() {
            return Err(DomainError::EmptyMessage);
        }

        let message = Message {
            id: Uuid::new_v4(),
            match_id: self.match_id,
            sender_id: sender_id.to_string(),
            content: content.to_string(),
            created_at,
            sequence: self.next_sequence,
        };
        self.next_sequence += 1;

        // Sequence only grows, so inserting after every equal-or-earlier
        // timestamp keeps the (created_at, sequence) order.
        let index = self
            .messages
            .partition_point(|m| m.created_at <= message.created_at);
        self.messages.insert(index, message);

        Ok(&self.messages[index])
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Sort messages by creation timestamp, breaking ties by insertion sequence
pub fn sort_messages(messages: &mut [Message]) {
    messages.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.sequence.cmp(&b.sequence))
    });
}
