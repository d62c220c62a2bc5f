// src/db/userdb.rs
use async_trait::async_trait;

use super::db::DBClient;
use crate::{
    models::usermodel::{User, UserRole},
    service::error::ServiceError,
};

#[async_trait]
pub trait UserExt {
    async fn get_user(
        &self,
        user_id: Option<&str>,
        email: Option<&str>,
    ) -> Option<User>;

    async fn get_users(
        &self,
        search: Option<&str>,
        role: Option<UserRole>,
    ) -> Vec<User>;

    /// Fails with `EmailInUse` if the email is already on the roster.
    async fn save_user(
        &self,
        name: String,
        email: String,
        role: UserRole,
        avatar: Option<String>,
    ) -> Result<User, ServiceError>;
}

#[async_trait]
impl UserExt for DBClient {
    async fn get_user(
        &self,
        user_id: Option<&str>,
        email: Option<&str>,
    ) -> Option<User> {
        let users = self.users.read().await;

        if let Some(user_id) = user_id {
            return users.iter().find(|u| u.id == user_id).cloned();
        }
        if let Some(email) = email {
            return users.iter().find(|u| u.email == email).cloned();
        }
        None
    }

    async fn get_users(
        &self,
        search: Option<&str>,
        role: Option<UserRole>,
    ) -> Vec<User> {
        let needle = search.map(str::to_lowercase).unwrap_or_default();

        self.users
            .read()
            .await
            .iter()
            .filter(|u| {
                u.name.to_lowercase().contains(&needle)
                    || u.email.to_lowercase().contains(&needle)
            })
            .filter(|u| role.map_or(true, |role| u.role == role))
            .cloned()
            .collect()
    }

    async fn save_user(
        &self,
        name: String,
        email: String,
        role: UserRole,
        avatar: Option<String>,
    ) -> Result<User, ServiceError> {
        let mut users = self.users.write().await;

        if users.iter().any(|u| u.email == email) {
            return Err(ServiceError::EmailInUse(email));
        }

        let user = User {
            id: (users.len() + 1).to_string(),
            name,
            email,
            role,
            avatar,
        };
        users.push(user.clone());

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn directory_search_matches_name_or_email() {
        let db = DBClient::seeded(Utc::now());

        let hits = db.get_users(Some("JOHN"), None).await;
        let names: Vec<_> = hits.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["John Doe", "Sarah Johnson"]);

        let agents = db.get_users(None, Some(UserRole::Agent)).await;
        assert_eq!(agents.len(), 2);

        let everyone = db.get_users(Some(""), None).await;
        assert_eq!(everyone.len(), 7);
    }

    #[tokio::test]
    async fn email_lookup_is_exact() {
        let db = DBClient::seeded(Utc::now());

        assert!(db.get_user(None, Some("agent@example.com")).await.is_some());
        assert!(db.get_user(None, Some("Agent@example.com")).await.is_none());
        assert_eq!(
            db.get_user(Some("5"), None).await.map(|u| u.name),
            Some("Sarah Johnson".to_string())
        );
    }

    #[tokio::test]
    async fn save_user_rejects_taken_email() {
        let db = DBClient::seeded(Utc::now());

        let err = db
            .save_user("Dup".into(), "john@example.com".into(), UserRole::Customer, None)
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::EmailInUse("john@example.com".into()));

        let user = db
            .save_user("Nina".into(), "nina@example.com".into(), UserRole::Customer, None)
            .await
            .unwrap();
        assert_eq!(user.id, "8");
        assert_eq!(db.get_users(None, None).await.len(), 8);
    }
}
