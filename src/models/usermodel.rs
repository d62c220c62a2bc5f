//1
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Agent,
    Customer,
}

impl UserRole {
    pub fn to_str(&self) -> &str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Agent => "agent",
            UserRole::Customer => "customer",
        }
    }

    /// Admins and agents work tickets; customers only raise them.
    pub fn is_staff(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Agent)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// The `{id, name}` pair tickets and articles carry for their author/assignee.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct UserRef {
    pub id: String,
    pub name: String,
}

impl From<&User> for UserRef {
    fn from(user: &User) -> Self {
        UserRef {
            id: user.id.clone(),
            name: user.name.clone(),
        }
    }
}
