// db/db.rs
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::fixtures;
use crate::models::{knowledgemodel::KnowledgeItem, ticketmodel::Ticket, usermodel::User};

/// In-memory backing store for the user roster, tickets and knowledge base.
/// Every read hands out clones; nothing outside this struct holds a
/// reference into the collections.
#[derive(Default)]
pub struct DBClient {
    pub(super) users: RwLock<Vec<User>>,
    pub(super) tickets: RwLock<Vec<Ticket>>,
    pub(super) knowledge: RwLock<Vec<KnowledgeItem>>,
}

impl std::fmt::Debug for DBClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DBClient")
            .field("users", &"RwLock<Vec<User>>")
            .field("tickets", &"RwLock<Vec<Ticket>>")
            .field("knowledge", &"RwLock<Vec<KnowledgeItem>>")
            .finish()
    }
}

impl DBClient {
    /// Create a client loaded with the demo roster, tickets and articles,
    /// timestamped relative to `now`.
    pub fn seeded(now: DateTime<Utc>) -> Self {
        DBClient {
            users: RwLock::new(fixtures::users()),
            tickets: RwLock::new(fixtures::tickets(now)),
            knowledge: RwLock::new(fixtures::knowledge_base(now)),
        }
    }

    pub async fn stats(&self) -> (usize, usize, usize) {
        (
            self.users.read().await.len(),
            self.tickets.read().await.len(),
            self.knowledge.read().await.len(),
        )
    }
}
