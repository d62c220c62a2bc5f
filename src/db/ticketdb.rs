// src/db/ticketdb.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::db::DBClient;
use crate::models::{ticketmodel::*, usermodel::UserRef};

#[async_trait]
pub trait TicketExt {
    async fn get_tickets(&self) -> Vec<Ticket>;

    async fn get_ticket(&self, ticket_id: &str) -> Option<Ticket>;

    async fn save_ticket(
        &self,
        title: String,
        description: String,
        category: TicketCategory,
        priority: TicketPriority,
        created_by: UserRef,
        now: DateTime<Utc>,
    ) -> Ticket;

    /// Apply `update` to a copy of the ticket and swap it in.
    async fn update_ticket<F>(&self, ticket_id: &str, update: F) -> Option<Ticket>
    where
        F: FnOnce(&mut Ticket) + Send;

    async fn filter_tickets(
        &self,
        statuses: &[TicketStatus],
        priorities: &[TicketPriority],
        search: Option<&str>,
    ) -> Vec<Ticket>;
}

#[async_trait]
impl TicketExt for DBClient {
    async fn get_tickets(&self) -> Vec<Ticket> {
        self.tickets.read().await.clone()
    }

    async fn get_ticket(&self, ticket_id: &str) -> Option<Ticket> {
        self.tickets
            .read()
            .await
            .iter()
            .find(|t| t.id == ticket_id)
            .cloned()
    }

    async fn save_ticket(
        &self,
        title: String,
        description: String,
        category: TicketCategory,
        priority: TicketPriority,
        created_by: UserRef,
        now: DateTime<Utc>,
    ) -> Ticket {
        let mut tickets = self.tickets.write().await;

        let ticket = Ticket {
            id: (tickets.len() + 1).to_string(),
            title,
            description,
            category,
            priority,
            status: TicketStatus::Open,
            created_at: now,
            updated_at: now,
            created_by,
            assigned_to: None,
            comments: Vec::new(),
            resolution: None,
            attachments: Vec::new(),
        };
        tickets.push(ticket.clone());

        ticket
    }

    async fn update_ticket<F>(&self, ticket_id: &str, update: F) -> Option<Ticket>
    where
        F: FnOnce(&mut Ticket) + Send,
    {
        let mut tickets = self.tickets.write().await;
        let slot = tickets.iter_mut().find(|t| t.id == ticket_id)?;

        let mut updated = slot.clone();
        update(&mut updated);
        *slot = updated.clone();

        Some(updated)
    }

    async fn filter_tickets(
        &self,
        statuses: &[TicketStatus],
        priorities: &[TicketPriority],
        search: Option<&str>,
    ) -> Vec<Ticket> {
        let needle = search
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        self.tickets
            .read()
            .await
            .iter()
            .filter(|t| statuses.is_empty() || statuses.contains(&t.status))
            .filter(|t| priorities.is_empty() || priorities.contains(&t.priority))
            .filter(|t| match &needle {
                Some(needle) => {
                    t.title.to_lowercase().contains(needle)
                        || t.description.to_lowercase().contains(needle)
                }
                None => true,
            })
            .cloned()
            .collect()
    }
}
