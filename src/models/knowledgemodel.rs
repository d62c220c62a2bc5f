use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ticketmodel::TicketCategory, usermodel::UserRef};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeItem {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: TicketCategory,
    pub created_at: DateTime<Utc>,
    pub created_by: UserRef,
    pub tags: Vec<String>,
}

impl KnowledgeItem {
    /// Case-insensitive substring match against title, content or any tag.
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.content.to_lowercase().contains(needle)
            || self.tags.iter().any(|tag| tag.to_lowercase().contains(needle))
    }
}
