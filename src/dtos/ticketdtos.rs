// src/dtos/ticketdtos.rs
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::ticketmodel::*;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTicketDto {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1-200 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 5000, message = "Description must be between 1-5000 characters"))]
    pub description: String,
    pub category: TicketCategory,
    pub priority: TicketPriority,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentDto {
    #[validate(length(min = 1, max = 2000, message = "Comment must be between 1-2000 characters"))]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTicketStatusDto {
    pub status: TicketStatus,
}

/// Without `agent_id` the caller assigns the ticket to themselves.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignTicketDto {
    pub agent_id: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateResolutionDto {
    pub stage: ResolutionStage,
    #[validate(length(max = 5000))]
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LinkSolutionDto {
    #[validate(length(min = 1, message = "Solution id is required"))]
    pub solution_id: String,
}

/// `status` and `priority` are comma separated lists, e.g. `?status=open,in-progress`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TicketQueryDto {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub search: Option<String>,
}

impl TicketQueryDto {
    pub fn statuses(&self) -> Result<Vec<TicketStatus>, String> {
        parse_list(self.status.as_deref())
    }

    pub fn priorities(&self) -> Result<Vec<TicketPriority>, String> {
        parse_list(self.priority.as_deref())
    }
}

fn parse_list<T>(raw: Option<&str>) -> Result<Vec<T>, String>
where
    T: FromStr<Err = String>,
{
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(T::from_str)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_lists_parse() {
        let query = TicketQueryDto {
            status: Some("open, in-progress".into()),
            priority: None,
            search: None,
        };
        assert_eq!(
            query.statuses().unwrap(),
            vec![TicketStatus::Open, TicketStatus::InProgress]
        );
        assert!(query.priorities().unwrap().is_empty());

        let bad = TicketQueryDto {
            status: None,
            priority: Some("urgent".into()),
            search: None,
        };
        assert!(bad.priorities().is_err());
    }

    #[test]
    fn ticket_body_uses_wire_names() {
        let dto: CreateTicketDto = serde_json::from_str(
            r#"{"title":"Export","description":"CSV export please","category":"feature-request","priority":"low"}"#,
        )
        .unwrap();
        assert_eq!(dto.category, TicketCategory::FeatureRequest);
        assert!(dto.validate().is_ok());

        let empty = CreateTicketDto { title: String::new(), ..dto };
        assert!(empty.validate().is_err());
    }
}
