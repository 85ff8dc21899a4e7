use crate::models::QuickReply;
use crate::storage::Repository;
use std::sync::Arc;

const DEFAULT_REPLIES: [(&str, &str); 4] = [
    ("default-available", "Hi, is this room still available?"),
    ("default-viewing", "Hi, could I arrange a viewing this week?"),
    ("default-deposit", "Hi, how much is the deposit and when is it due?"),
    ("default-utilities", "Hi, are water and electricity included in the rent?"),
];

/// Canned messages a renter can send to a landlord
pub struct QuickReplies {
    repo: Arc<Repository>,
}

impl QuickReplies {
    pub fn new(repo: Arc<Repository>) -> Self {
        Self { repo }
    }

    pub fn defaults() -> Vec<QuickReply> {
        DEFAULT_REPLIES
            .iter()
            .map(|(id, text)| QuickReply {
                id: id.to_string(),
                text: text.to_string(),
            })
            .collect()
    }

    /// Stored templates, or the defaults while nothing has been customized.
    /// A stored empty list means the user removed every template.
    pub fn get_quick_replies(&self) -> Vec<QuickReply> {
        self.repo
            .load_list_opt(&self.repo.keys().quick_replies)
            .unwrap_or_else(Self::defaults)
    }

    pub fn add_quick_reply(&self, text: &str) -> Option<QuickReply> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let reply = QuickReply {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.to_string(),
        };
        let mut replies = self.get_quick_replies();
        replies.push(reply.clone());
        self.repo
            .save(&self.repo.keys().quick_replies, &replies)
            .then_some(reply)
    }

    pub fn remove_quick_reply(&self, id: &str) {
        let mut replies = self.get_quick_replies();
        let before = replies.len();
        replies.retain(|r| r.id != id);
        if replies.len() != before {
            self.repo.save(&self.repo.keys().quick_replies, &replies);
        }
    }

    pub fn reset_quick_replies(&self) {
        self.repo.remove(&self.repo.keys().quick_replies);
    }
}
