// service/analytics.rs
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{
    ticketmodel::{Ticket, TicketCategory, TicketPriority, TicketStatus},
    usermodel::{User, UserRole},
};

const RECENT_TICKETS: usize = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "7days")]
    SevenDays,
    #[default]
    #[serde(rename = "30days")]
    ThirtyDays,
    #[serde(rename = "90days")]
    NinetyDays,
    #[serde(rename = "all")]
    All,
}

impl TimeRange {
    pub fn days(&self) -> Option<i64> {
        match self {
            TimeRange::SevenDays => Some(7),
            TimeRange::ThirtyDays => Some(30),
            TimeRange::NinetyDays => Some(90),
            TimeRange::All => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total: usize,
    pub open: usize,
    pub in_progress: usize,
    pub resolved: usize,
    pub recent_tickets: Vec<Ticket>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Count<K> {
    pub name: K,
    pub value: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResolveTime {
    pub name: TicketCategory,
    /// Average days from creation to last update, one decimal place.
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub range: TimeRange,
    pub ticket_count: usize,
    pub by_status: Vec<Count<TicketStatus>>,
    pub by_priority: Vec<Count<TicketPriority>>,
    pub by_category: Vec<Count<TicketCategory>>,
    pub average_resolve_days: Vec<ResolveTime>,
}

/// `tickets` should already be narrowed to what the viewer may see.
pub fn dashboard(tickets: &[Ticket]) -> DashboardSummary {
    let count = |status: TicketStatus| tickets.iter().filter(|t| t.status == status).count();

    let mut recent = tickets.to_vec();
    recent.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    recent.truncate(RECENT_TICKETS);

    DashboardSummary {
        total: tickets.len(),
        open: count(TicketStatus::Open),
        in_progress: count(TicketStatus::InProgress),
        resolved: count(TicketStatus::Resolved),
        recent_tickets: recent,
    }
}

/// Sidebar counter: open queue for admins, own assignments for agents,
/// own submissions for customers.
pub fn navigation_badge(user: &User, tickets: &[Ticket]) -> usize {
    match user.role {
        UserRole::Admin => tickets
            .iter()
            .filter(|t| t.status == TicketStatus::Open)
            .count(),
        UserRole::Agent => tickets
            .iter()
            .filter(|t| t.assigned_to.as_ref().is_some_and(|a| a.id == user.id))
            .count(),
        UserRole::Customer => tickets
            .iter()
            .filter(|t| t.created_by.id == user.id)
            .count(),
    }
}

pub fn analytics(tickets: &[Ticket], range: TimeRange, now: DateTime<Utc>) -> AnalyticsReport {
    let in_range: Vec<&Ticket> = match range.days() {
        Some(days) => {
            let threshold = now - Duration::days(days);
            tickets.iter().filter(|t| t.created_at >= threshold).collect()
        }
        None => tickets.iter().collect(),
    };

    let by_status = TicketStatus::ALL
        .into_iter()
        .map(|status| Count {
            name: status,
            value: in_range.iter().filter(|t| t.status == status).count(),
        })
        .collect();

    let by_priority = TicketPriority::ALL
        .into_iter()
        .map(|priority| Count {
            name: priority,
            value: in_range.iter().filter(|t| t.priority == priority).count(),
        })
        .collect();

    let by_category = TicketCategory::ALL
        .into_iter()
        .map(|category| Count {
            name: category,
            value: in_range.iter().filter(|t| t.category == category).count(),
        })
        .collect();

    let average_resolve_days = TicketCategory::ALL
        .into_iter()
        .filter_map(|category| {
            let days: Vec<f64> = in_range
                .iter()
                .filter(|t| t.status == TicketStatus::Resolved && t.category == category)
                .map(|t| (t.updated_at - t.created_at).num_milliseconds() as f64 / 86_400_000.0)
                .collect();

            if days.is_empty() {
                return None;
            }
            let average = days.iter().sum::<f64>() / days.len() as f64;
            Some(ResolveTime {
                name: category,
                value: (average * 10.0).round() / 10.0,
            })
        })
        .collect();

    AnalyticsReport {
        range,
        ticket_count: in_range.len(),
        by_status,
        by_priority,
        by_category,
        average_resolve_days,
    }
}
