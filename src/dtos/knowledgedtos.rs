use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::ticketmodel::TicketCategory;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateKnowledgeItemDto {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    pub category: TicketCategory,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CreateKnowledgeItemDto {
    /// Trimmed tags with blanks dropped.
    pub fn normalized_tags(&self) -> Vec<String> {
        self.tags
            .iter()
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect()
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct KnowledgeQueryDto {
    pub search: Option<String>,
    pub category: Option<TicketCategory>,
}
