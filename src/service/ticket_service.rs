// service/ticket_service.rs
use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    db::{db::DBClient, knowledgedb::KnowledgeExt, ticketdb::TicketExt, userdb::UserExt},
    models::{
        knowledgemodel::KnowledgeItem,
        ticketmodel::*,
        usermodel::{User, UserRef},
    },
    service::error::ServiceError,
};

/// Ticket and knowledge-base operations. Every mutation waits out the
/// configured latency before touching the collections.
#[derive(Debug, Clone)]
pub struct TicketService {
    db_client: Arc<DBClient>,
    latency: Duration,
}

impl TicketService {
    pub fn new(db_client: Arc<DBClient>, latency: Duration) -> Self {
        Self { db_client, latency }
    }

    async fn simulate_latency(&self) {
        tokio::time::sleep(self.latency).await;
    }

    pub async fn list_tickets(&self) -> Vec<Ticket> {
        self.db_client.get_tickets().await
    }

    pub async fn get_ticket_by_id(&self, ticket_id: &str) -> Option<Ticket> {
        self.db_client.get_ticket(ticket_id).await
    }

    pub async fn create_ticket(
        &self,
        user: Option<&User>,
        title: String,
        description: String,
        category: TicketCategory,
        priority: TicketPriority,
    ) -> Result<Ticket, ServiceError> {
        self.simulate_latency().await;

        let user = user.ok_or(ServiceError::NotAuthenticated)?;

        let ticket = self
            .db_client
            .save_ticket(
                title,
                description,
                category,
                priority,
                UserRef::from(user),
                Utc::now(),
            )
            .await;

        tracing::info!("Ticket {} created by {}", ticket.id, user.id);
        Ok(ticket)
    }

    pub async fn update_ticket_status(
        &self,
        ticket_id: &str,
        status: TicketStatus,
    ) -> Result<Ticket, ServiceError> {
        self.simulate_latency().await;

        let now = Utc::now();
        let ticket = self
            .db_client
            .update_ticket(ticket_id, |ticket| {
                ticket.status = status;
                ticket.updated_at = now;
            })
            .await
            .ok_or_else(|| ServiceError::TicketNotFound(ticket_id.to_string()))?;

        tracing::info!("Ticket {} moved to {}", ticket.id, status.to_str());
        Ok(ticket)
    }

    /// Open tickets move to in-progress once someone owns them.
    pub async fn assign_ticket(
        &self,
        ticket_id: &str,
        agent_id: &str,
        agent_name: &str,
    ) -> Result<Ticket, ServiceError> {
        self.simulate_latency().await;

        let now = Utc::now();
        let assignee = UserRef {
            id: agent_id.to_string(),
            name: agent_name.to_string(),
        };

        let ticket = self
            .db_client
            .update_ticket(ticket_id, |ticket| {
                ticket.assigned_to = Some(assignee);
                if ticket.status == TicketStatus::Open {
                    ticket.status = TicketStatus::InProgress;
                }
                ticket.updated_at = now;
            })
            .await
            .ok_or_else(|| ServiceError::TicketNotFound(ticket_id.to_string()))?;

        tracing::info!("Ticket {} assigned to {}", ticket.id, agent_id);
        Ok(ticket)
    }

    pub async fn add_comment(
        &self,
        user: Option<&User>,
        ticket_id: &str,
        content: String,
    ) -> Result<Comment, ServiceError> {
        self.simulate_latency().await;

        let user = user.ok_or(ServiceError::NotAuthenticated)?;

        let now = Utc::now();
        let comment = Comment {
            id: Uuid::new_v4().to_string(),
            user_id: user.id.clone(),
            user_name: user.name.clone(),
            user_avatar: user.avatar.clone(),
            content,
            created_at: now,
        };

        let appended = comment.clone();
        self.db_client
            .update_ticket(ticket_id, |ticket| {
                ticket.comments.push(appended);
                ticket.updated_at = now;
            })
            .await
            .ok_or_else(|| ServiceError::TicketNotFound(ticket_id.to_string()))?;

        tracing::info!("Comment {} added to ticket {}", comment.id, ticket_id);
        Ok(comment)
    }

    /// Absent or empty filters match everything.
    pub async fn filter_tickets(
        &self,
        statuses: Option<&[TicketStatus]>,
        priorities: Option<&[TicketPriority]>,
        search: Option<&str>,
    ) -> Vec<Ticket> {
        self.db_client
            .filter_tickets(
                statuses.unwrap_or_default(),
                priorities.unwrap_or_default(),
                search,
            )
            .await
    }

    pub async fn get_agents(&self) -> Vec<User> {
        self.db_client
            .get_users(None, None)
            .await
            .into_iter()
            .filter(|u| u.role.is_staff())
            .collect()
    }

    pub async fn update_resolution(
        &self,
        ticket_id: &str,
        stage: ResolutionStage,
        notes: String,
    ) -> Result<Ticket, ServiceError> {
        self.simulate_latency().await;

        let now = Utc::now();
        let ticket = self
            .db_client
            .update_ticket(ticket_id, |ticket| {
                let previous = ticket.resolution.take();
                ticket.resolution = Some(next_resolution(previous, stage, notes, now));
                if stage == ResolutionStage::Completed {
                    ticket.status = TicketStatus::Resolved;
                }
                ticket.updated_at = now;
            })
            .await
            .ok_or_else(|| ServiceError::TicketNotFound(ticket_id.to_string()))?;

        tracing::info!("Ticket {} resolution at {}", ticket.id, stage.to_str());
        Ok(ticket)
    }

    pub async fn add_solution_to_knowledge_base(
        &self,
        user: Option<&User>,
        title: String,
        content: String,
        category: TicketCategory,
        tags: Vec<String>,
    ) -> Result<KnowledgeItem, ServiceError> {
        self.simulate_latency().await;

        let user = user.ok_or(ServiceError::NotAuthenticated)?;

        let item = self
            .db_client
            .save_knowledge_item(
                title,
                content,
                category,
                tags,
                UserRef::from(user),
                Utc::now(),
            )
            .await;

        tracing::info!("Knowledge item {} added by {}", item.id, user.id);
        Ok(item)
    }

    pub async fn list_knowledge_base(&self) -> Vec<KnowledgeItem> {
        self.db_client.get_knowledge_items().await
    }

    pub async fn search_knowledge_base(
        &self,
        search: &str,
        category: Option<TicketCategory>,
    ) -> Vec<KnowledgeItem> {
        self.db_client.search_knowledge_items(search, category).await
    }

    pub async fn link_solution_to_ticket(
        &self,
        ticket_id: &str,
        solution_id: &str,
    ) -> Result<Ticket, ServiceError> {
        self.simulate_latency().await;

        if self.db_client.get_ticket(ticket_id).await.is_none() {
            return Err(ServiceError::TicketNotFound(ticket_id.to_string()));
        }
        if self.db_client.get_knowledge_item(solution_id).await.is_none() {
            return Err(ServiceError::SolutionNotFound(solution_id.to_string()));
        }

        let now = Utc::now();
        let ticket = self
            .db_client
            .update_ticket(ticket_id, |ticket| {
                let mut resolution = ticket.resolution.take().unwrap_or_else(|| Resolution {
                    stage: ResolutionStage::Investigation,
                    notes: "Investigation started".to_string(),
                    started_at: now,
                    completed_at: None,
                    time_spent: None,
                    solution_id: None,
                });
                resolution.solution_id = Some(solution_id.to_string());
                ticket.resolution = Some(resolution);
                ticket.updated_at = now;
            })
            .await
            .ok_or_else(|| ServiceError::TicketNotFound(ticket_id.to_string()))?;

        tracing::info!("Solution {} linked to ticket {}", solution_id, ticket.id);
        Ok(ticket)
    }
}

/// `started_at` and `solution_id` carry over; `time_spent` is only
/// recomputed when the stage actually changes.
fn next_resolution(
    previous: Option<Resolution>,
    stage: ResolutionStage,
    notes: String,
    now: DateTime<Utc>,
) -> Resolution {
    let started_at = previous.as_ref().map_or(now, |p| p.started_at);

    let time_spent = previous.as_ref().and_then(|p| {
        if p.stage != stage {
            Some(elapsed_minutes(p.started_at, now))
        } else {
            p.time_spent
        }
    });

    Resolution {
        stage,
        notes,
        started_at,
        completed_at: (stage == ResolutionStage::Completed).then_some(now),
        time_spent,
        solution_id: previous.and_then(|p| p.solution_id),
    }
}

fn elapsed_minutes(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    ((to - from).num_milliseconds() as f64 / 60_000.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::usermodel::UserRole;
    use chrono::Duration as ChronoDuration;

    fn service() -> (TicketService, Arc<DBClient>) {
        let db = Arc::new(DBClient::seeded(Utc::now()));
        (TicketService::new(db.clone(), Duration::ZERO), db)
    }

    async fn roster_user(db: &DBClient, email: &str) -> User {
        db.get_user(None, Some(email)).await.unwrap()
    }

    #[tokio::test]
    async fn created_tickets_start_open_without_comments() {
        let (tickets, db) = service();
        let customer = roster_user(&db, "customer@example.com").await;

        let ticket = tickets
            .create_ticket(
                Some(&customer),
                "A".into(),
                "Something broke".into(),
                TicketCategory::General,
                TicketPriority::Low,
            )
            .await
            .unwrap();

        assert_eq!(ticket.status, TicketStatus::Open);
        assert!(ticket.comments.is_empty());
        assert!(ticket.updated_at >= ticket.created_at);

        let stored = tickets.get_ticket_by_id(&ticket.id).await.unwrap();
        assert_eq!(stored.created_by.name, "Customer");
        assert_eq!(stored.status, TicketStatus::Open);
    }

    #[tokio::test]
    async fn mutations_need_a_user() {
        let (tickets, _) = service();

        let err = tickets
            .create_ticket(None, "A".into(), "B".into(), TicketCategory::General, TicketPriority::Low)
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::NotAuthenticated);

        let err = tickets.add_comment(None, "1", "hi".into()).await.unwrap_err();
        assert_eq!(err, ServiceError::NotAuthenticated);

        let err = tickets
            .add_solution_to_knowledge_base(None, "t".into(), "c".into(), TicketCategory::General, vec![])
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::NotAuthenticated);
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let (tickets, db) = service();
        let agent = roster_user(&db, "agent@example.com").await;

        assert_eq!(
            tickets.update_ticket_status("99", TicketStatus::Resolved).await.unwrap_err(),
            ServiceError::TicketNotFound("99".into())
        );
        assert!(matches!(
            tickets.add_comment(Some(&agent), "99", "hello".into()).await,
            Err(ServiceError::TicketNotFound(_))
        ));
        assert!(matches!(
            tickets.link_solution_to_ticket("1", "kb-404").await,
            Err(ServiceError::SolutionNotFound(_))
        ));
        assert!(matches!(
            tickets.link_solution_to_ticket("99", "1").await,
            Err(ServiceError::TicketNotFound(_))
        ));
    }

    #[tokio::test]
    async fn status_transitions_are_unconstrained() {
        let (tickets, _) = service();

        let reopened = tickets.update_ticket_status("4", TicketStatus::Open).await.unwrap();
        assert_eq!(reopened.status, TicketStatus::Open);
        assert!(reopened.updated_at > reopened.created_at);
    }

    #[tokio::test]
    async fn assigning_promotes_only_open_tickets() {
        let (tickets, _) = service();

        let promoted = tickets.assign_ticket("1", "5", "Sarah Johnson").await.unwrap();
        assert_eq!(promoted.status, TicketStatus::InProgress);
        assert_eq!(promoted.assigned_to.as_ref().map(|a| a.id.as_str()), Some("5"));

        let untouched = tickets.assign_ticket("4", "5", "Sarah Johnson").await.unwrap();
        assert_eq!(untouched.status, TicketStatus::Resolved);
    }

    #[tokio::test]
    async fn comments_are_appended_with_author() {
        let (tickets, db) = service();
        let agent = roster_user(&db, "agent@example.com").await;

        let comment = tickets
            .add_comment(Some(&agent), "4", "Closing the loop".into())
            .await
            .unwrap();
        assert_eq!(comment.user_name, "Support Agent");
        assert_eq!(comment.user_avatar, agent.avatar);

        let ticket = tickets.get_ticket_by_id("4").await.unwrap();
        assert_eq!(ticket.comments.len(), 3);
        assert_eq!(ticket.comments.last(), Some(&comment));
    }

    #[tokio::test]
    async fn filter_passes_through_absent_filters() {
        let (tickets, _) = service();

        let all = tickets.filter_tickets(None, None, None).await;
        assert_eq!(all, tickets.list_tickets().await);

        let open = tickets
            .filter_tickets(Some(&[TicketStatus::Open][..]), Some(&[][..]), None)
            .await;
        assert_eq!(open.len(), 2);
    }

    #[tokio::test]
    async fn agents_are_staff_only() {
        let (tickets, _) = service();

        let agents = tickets.get_agents().await;
        let names: Vec<_> = agents.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Admin User", "Support Agent", "Sarah Johnson"]);
        assert!(agents.iter().all(|a| a.role != UserRole::Customer));
    }

    #[tokio::test]
    async fn first_resolution_has_no_time_spent() {
        let (tickets, _) = service();

        let ticket = tickets
            .update_resolution("1", ResolutionStage::Investigation, "Looking".into())
            .await
            .unwrap();
        let resolution = ticket.resolution.unwrap();
        assert_eq!(resolution.time_spent, None);
        assert_eq!(resolution.completed_at, None);
        assert_eq!(ticket.status, TicketStatus::Open);
    }

    #[tokio::test]
    async fn same_stage_keeps_time_spent() {
        let (tickets, db) = service();

        tickets
            .update_resolution("1", ResolutionStage::Investigation, "Looking".into())
            .await
            .unwrap();
        db.update_ticket("1", |t| {
            t.resolution.as_mut().unwrap().started_at = Utc::now() - ChronoDuration::minutes(90);
        })
        .await
        .unwrap();

        let moved = tickets
            .update_resolution("1", ResolutionStage::Implementation, "Fixing".into())
            .await
            .unwrap();
        assert_eq!(moved.resolution.as_ref().unwrap().time_spent, Some(90));

        // Push the start further back: a recompute would now give 200.
        db.update_ticket("1", |t| {
            t.resolution.as_mut().unwrap().started_at = Utc::now() - ChronoDuration::minutes(200);
        })
        .await
        .unwrap();

        let stayed = tickets
            .update_resolution("1", ResolutionStage::Implementation, "Still fixing".into())
            .await
            .unwrap();
        let resolution = stayed.resolution.unwrap();
        assert_eq!(resolution.time_spent, Some(90));
        assert_eq!(resolution.notes, "Still fixing");
    }

    #[tokio::test]
    async fn completing_resolves_the_ticket() {
        let (tickets, _) = service();

        let started = tickets
            .update_resolution("2", ResolutionStage::Verification, "Checking".into())
            .await
            .unwrap();
        let started_at = started.resolution.unwrap().started_at;

        let done = tickets
            .update_resolution("2", ResolutionStage::Completed, "Refund issued".into())
            .await
            .unwrap();
        assert_eq!(done.status, TicketStatus::Resolved);

        let resolution = done.resolution.unwrap();
        assert!(resolution.completed_at.is_some());
        assert_eq!(resolution.started_at, started_at);
        assert_eq!(resolution.time_spent, Some(0));
    }

    #[tokio::test]
    async fn linking_creates_an_investigation_and_survives_updates() {
        let (tickets, _) = service();

        let linked = tickets.link_solution_to_ticket("3", "1").await.unwrap();
        let resolution = linked.resolution.unwrap();
        assert_eq!(resolution.stage, ResolutionStage::Investigation);
        assert_eq!(resolution.notes, "Investigation started");
        assert_eq!(resolution.solution_id.as_deref(), Some("1"));

        let updated = tickets
            .update_resolution("3", ResolutionStage::Implementation, "Shipping it".into())
            .await
            .unwrap();
        assert_eq!(
            updated.resolution.unwrap().solution_id.as_deref(),
            Some("1")
        );
    }

    #[tokio::test]
    async fn knowledge_base_grows_and_searches() {
        let (tickets, db) = service();
        let agent = roster_user(&db, "sarah@example.com").await;

        let item = tickets
            .add_solution_to_knowledge_base(
                Some(&agent),
                "Enabling dark mode".into(),
                "Toggle it under Settings > Appearance.".into(),
                TicketCategory::FeatureRequest,
                vec!["theme".into(), "appearance".into()],
            )
            .await
            .unwrap();
        assert_eq!(item.id, "kb-4");
        assert_eq!(item.created_by.name, "Sarah Johnson");

        let hits = tickets.search_knowledge_base("THEME", None).await;
        assert_eq!(hits, vec![item.clone()]);

        let linked = tickets.link_solution_to_ticket("3", "kb-4").await.unwrap();
        assert_eq!(
            linked.resolution.unwrap().solution_id.as_deref(),
            Some("kb-4")
        );

        assert_eq!(tickets.list_knowledge_base().await.len(), 4);
        let cors = tickets.search_knowledge_base("cors", None).await;
        assert_eq!(cors.len(), 1);
        assert_eq!(cors[0].title, "Troubleshooting API integration issues");
    }

    #[test]
    fn elapsed_minutes_rounds() {
        let start = Utc::now();
        assert_eq!(elapsed_minutes(start, start + ChronoDuration::seconds(89)), 1);
        assert_eq!(elapsed_minutes(start, start + ChronoDuration::seconds(91)), 2);
        assert_eq!(elapsed_minutes(start, start), 0);
    }
}
