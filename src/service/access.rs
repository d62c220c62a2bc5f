// service/access.rs
use crate::{
    models::{
        ticketmodel::Ticket,
        usermodel::{User, UserRole},
    },
    service::error::ServiceError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Ticket,
    Comment,
    Resolution,
    KnowledgeBase,
    Analytics,
    Users,
    Agents,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    View,
    Create,
    Update,
    Assign,
}

/// The single role/resource/action table every handler consults.
pub fn can(role: UserRole, resource: Resource, action: Action) -> bool {
    match (resource, action) {
        (Resource::Ticket | Resource::Comment | Resource::KnowledgeBase, Action::View | Action::Create) => true,

        // Customers may still move their own tickets; see `can_update_status`.
        (Resource::Ticket, Action::Update | Action::Assign) => role.is_staff(),
        (Resource::Resolution, Action::View | Action::Update) => role.is_staff(),
        (Resource::Analytics | Resource::Agents, Action::View) => role.is_staff(),

        (Resource::Users, Action::View) => role == UserRole::Admin,

        _ => false,
    }
}

pub fn require(user: &User, resource: Resource, action: Action) -> Result<(), ServiceError> {
    if can(user.role, resource, action) {
        Ok(())
    } else {
        Err(ServiceError::PermissionDenied(format!(
            "{} cannot {:?} {:?}",
            user.role.to_str(),
            action,
            resource
        )))
    }
}

/// Customers only see what they raised.
pub fn can_view_ticket(user: &User, ticket: &Ticket) -> bool {
    user.role.is_staff() || ticket.created_by.id == user.id
}

pub fn visible_tickets(user: &User, tickets: Vec<Ticket>) -> Vec<Ticket> {
    tickets
        .into_iter()
        .filter(|ticket| can_view_ticket(user, ticket))
        .collect()
}

pub fn can_update_status(user: &User, ticket: &Ticket) -> bool {
    can(user.role, Resource::Ticket, Action::Update) || ticket.created_by.id == user.id
}

/// Admins hand tickets to anyone; agents can only take them.
pub fn can_assign_to(user: &User, agent_id: &str) -> bool {
    match user.role {
        UserRole::Admin => true,
        UserRole::Agent => agent_id == user.id,
        UserRole::Customer => false,
    }
}
