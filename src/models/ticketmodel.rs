// src/models/ticketmodel.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::usermodel::UserRef;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 3] = [
        TicketStatus::Open,
        TicketStatus::InProgress,
        TicketStatus::Resolved,
    ];

    pub fn to_str(&self) -> &str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in-progress",
            TicketStatus::Resolved => "resolved",
        }
    }
}

impl std::str::FromStr for TicketStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TicketStatus::ALL
            .into_iter()
            .find(|status| status.to_str() == s)
            .ok_or_else(|| format!("unknown ticket status '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum TicketPriority {
    Low,
    Medium,
    High,
}

impl TicketPriority {
    pub const ALL: [TicketPriority; 3] = [
        TicketPriority::High,
        TicketPriority::Medium,
        TicketPriority::Low,
    ];

    pub fn to_str(&self) -> &str {
        match self {
            TicketPriority::Low => "low",
            TicketPriority::Medium => "medium",
            TicketPriority::High => "high",
        }
    }
}

impl std::str::FromStr for TicketPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TicketPriority::ALL
            .into_iter()
            .find(|priority| priority.to_str() == s)
            .ok_or_else(|| format!("unknown ticket priority '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum TicketCategory {
    Technical,
    Billing,
    General,
    FeatureRequest,
}

impl TicketCategory {
    pub const ALL: [TicketCategory; 4] = [
        TicketCategory::Technical,
        TicketCategory::Billing,
        TicketCategory::General,
        TicketCategory::FeatureRequest,
    ];

    pub fn to_str(&self) -> &str {
        match self {
            TicketCategory::Technical => "technical",
            TicketCategory::Billing => "billing",
            TicketCategory::General => "general",
            TicketCategory::FeatureRequest => "feature-request",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionStage {
    Investigation,
    Implementation,
    Verification,
    Completed,
}

impl ResolutionStage {
    pub fn to_str(&self) -> &str {
        match self {
            ResolutionStage::Investigation => "investigation",
            ResolutionStage::Implementation => "implementation",
            ResolutionStage::Verification => "verification",
            ResolutionStage::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_avatar: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub stage: ResolutionStage,
    pub notes: String,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Minutes between `started_at` and the last stage change.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_spent: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attachment {
    pub id: String,
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: TicketCategory,
    pub priority: TicketPriority,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: UserRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<UserRef>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<Resolution>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}
