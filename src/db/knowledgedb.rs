// src/db/knowledgedb.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::db::DBClient;
use crate::models::{
    knowledgemodel::KnowledgeItem,
    ticketmodel::TicketCategory,
    usermodel::UserRef,
};

#[async_trait]
pub trait KnowledgeExt {
    async fn get_knowledge_items(&self) -> Vec<KnowledgeItem>;

    async fn get_knowledge_item(&self, item_id: &str) -> Option<KnowledgeItem>;

    async fn save_knowledge_item(
        &self,
        title: String,
        content: String,
        category: TicketCategory,
        tags: Vec<String>,
        created_by: UserRef,
        now: DateTime<Utc>,
    ) -> KnowledgeItem;

    async fn search_knowledge_items(
        &self,
        search: &str,
        category: Option<TicketCategory>,
    ) -> Vec<KnowledgeItem>;
}

#[async_trait]
impl KnowledgeExt for DBClient {
    async fn get_knowledge_items(&self) -> Vec<KnowledgeItem> {
        self.knowledge.read().await.clone()
    }

    async fn get_knowledge_item(&self, item_id: &str) -> Option<KnowledgeItem> {
        self.knowledge
            .read()
            .await
            .iter()
            .find(|item| item.id == item_id)
            .cloned()
    }

    async fn save_knowledge_item(
        &self,
        title: String,
        content: String,
        category: TicketCategory,
        tags: Vec<String>,
        created_by: UserRef,
        now: DateTime<Utc>,
    ) -> KnowledgeItem {
        let mut knowledge = self.knowledge.write().await;

        let item = KnowledgeItem {
            id: format!("kb-{}", knowledge.len() + 1),
            title,
            content,
            category,
            created_at: now,
            created_by,
            tags,
        };
        knowledge.push(item.clone());

        item
    }

    async fn search_knowledge_items(
        &self,
        search: &str,
        category: Option<TicketCategory>,
    ) -> Vec<KnowledgeItem> {
        let needle = search.to_lowercase();

        self.knowledge
            .read()
            .await
            .iter()
            .filter(|item| category.map_or(true, |c| item.category == c))
            .filter(|item| item.matches(&needle))
            .cloned()
            .collect()
    }
}
