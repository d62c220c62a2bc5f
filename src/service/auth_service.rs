// service/auth_service.rs
use std::{sync::Arc, time::Duration};

use tokio::sync::RwLock;

use crate::{
    db::{db::DBClient, session::SessionStorage, userdb::UserExt},
    models::usermodel::{User, UserRole},
    service::error::ServiceError,
};

/// Storage key holding the serialised session user.
pub const SESSION_USER_KEY: &str = "user";

/// Owns the signed-in user. The session survives restarts through
/// `SessionStorage`; there is no expiry or refresh.
pub struct AuthService {
    db_client: Arc<DBClient>,
    storage: Arc<dyn SessionStorage>,
    session: RwLock<Option<User>>,
    latency: Duration,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("latency", &self.latency)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    pub fn new(
        db_client: Arc<DBClient>,
        storage: Arc<dyn SessionStorage>,
        latency: Duration,
    ) -> Self {
        Self {
            db_client,
            storage,
            session: RwLock::new(None),
            latency,
        }
    }

    /// Restore the session persisted by a previous run. An unreadable
    /// record is dropped and the service starts signed out.
    pub async fn rehydrate(&self) -> Option<User> {
        let stored = match self.storage.get_item(SESSION_USER_KEY).await {
            Ok(stored) => stored?,
            Err(e) => {
                tracing::warn!("Could not read stored session: {}", e);
                return None;
            }
        };

        match serde_json::from_str::<User>(&stored) {
            Ok(user) => {
                tracing::info!("Restored session for {}", user.email);
                *self.session.write().await = Some(user.clone());
                Some(user)
            }
            Err(e) => {
                tracing::warn!("Discarding malformed stored session: {}", e);
                if let Err(e) = self.storage.remove_item(SESSION_USER_KEY).await {
                    tracing::warn!("Could not clear stored session: {}", e);
                }
                None
            }
        }
    }

    pub async fn current_user(&self) -> Option<User> {
        self.session.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.is_some()
    }

    /// The password is accepted as-is; only the email is looked up.
    pub async fn login(&self, email: &str, _password: &str) -> Result<User, ServiceError> {
        let user = self
            .db_client
            .get_user(None, Some(email))
            .await
            .ok_or_else(|| {
                tracing::warn!("Login rejected for unknown email {}", email);
                ServiceError::InvalidCredentials
            })?;

        tokio::time::sleep(self.latency).await;

        self.start_session(&user).await?;
        tracing::info!("User {} logged in as {}", user.email, user.role.to_str());

        Ok(user)
    }

    pub async fn register(
        &self,
        name: String,
        email: String,
        _password: String,
        role: UserRole,
    ) -> Result<User, ServiceError> {
        if self.db_client.get_user(None, Some(&email)).await.is_some() {
            tracing::warn!("Registration rejected, {} already in use", email);
            return Err(ServiceError::EmailInUse(email));
        }

        tokio::time::sleep(self.latency).await;

        let avatar = Some(format!("https://i.pravatar.cc/150?u={}", email));
        // The roster may have changed while we slept.
        let user = self
            .db_client
            .save_user(name, email, role, avatar)
            .await
            .map_err(|e| {
                tracing::warn!("Registration rejected: {}", e);
                e
            })?;

        self.start_session(&user).await?;
        tracing::info!("Registered new user {} ({})", user.email, user.id);

        Ok(user)
    }

    pub async fn logout(&self) -> Result<(), ServiceError> {
        let previous = self.session.write().await.take();
        self.storage.remove_item(SESSION_USER_KEY).await?;

        if let Some(user) = previous {
            tracing::info!("User {} logged out", user.email);
        }
        Ok(())
    }

    async fn start_session(&self, user: &User) -> Result<(), ServiceError> {
        let record = serde_json::to_string(user)?;
        self.storage.set_item(SESSION_USER_KEY, record).await?;
        *self.session.write().await = Some(user.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::session::{FileSessionStorage, MemorySessionStorage};
    use chrono::Utc;

    fn service_with(storage: Arc<dyn SessionStorage>) -> AuthService {
        AuthService::new(
            Arc::new(DBClient::seeded(Utc::now())),
            storage,
            Duration::ZERO,
        )
    }

    #[tokio::test]
    async fn login_persists_the_session() {
        let storage: Arc<dyn SessionStorage> = Arc::new(MemorySessionStorage::new());
        let auth = service_with(storage.clone());

        let user = auth.login("customer@example.com", "whatever").await.unwrap();
        assert_eq!(user.name, "Customer");
        assert!(auth.is_authenticated().await);

        let stored = storage.get_item(SESSION_USER_KEY).await.unwrap().unwrap();
        let stored: User = serde_json::from_str(&stored).unwrap();
        assert_eq!(stored, user);
    }

    #[tokio::test]
    async fn unknown_email_is_rejected() {
        let auth = service_with(Arc::new(MemorySessionStorage::new()));

        let err = auth.login("nobody@example.com", "secret").await.unwrap_err();
        assert_eq!(err, ServiceError::InvalidCredentials);
        assert!(!auth.is_authenticated().await);
    }

    #[tokio::test]
    async fn register_signs_in_and_blocks_duplicates() {
        let auth = service_with(Arc::new(MemorySessionStorage::new()));

        let err = auth
            .register("Dup".into(), "agent@example.com".into(), "secret".into(), UserRole::Agent)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::EmailInUse(_)));

        let user = auth
            .register("Nina".into(), "nina@example.com".into(), "secret".into(), UserRole::Customer)
            .await
            .unwrap();
        assert_eq!(user.id, "8");
        assert_eq!(user.avatar.as_deref(), Some("https://i.pravatar.cc/150?u=nina@example.com"));
        assert_eq!(auth.current_user().await, Some(user.clone()));

        auth.logout().await.unwrap();
        let again = auth.login("nina@example.com", "secret").await.unwrap();
        assert_eq!(again, user);
    }

    #[tokio::test]
    async fn logout_clears_memory_and_storage() {
        let storage: Arc<dyn SessionStorage> = Arc::new(MemorySessionStorage::new());
        let auth = service_with(storage.clone());

        auth.login("admin@example.com", "pw").await.unwrap();
        auth.logout().await.unwrap();

        assert!(auth.current_user().await.is_none());
        assert_eq!(storage.get_item(SESSION_USER_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn rehydrate_restores_or_discards() {
        let storage: Arc<dyn SessionStorage> = Arc::new(MemorySessionStorage::new());

        let first = service_with(storage.clone());
        let user = first.login("agent@example.com", "pw").await.unwrap();

        let restarted = service_with(storage.clone());
        assert!(!restarted.is_authenticated().await);
        assert_eq!(restarted.rehydrate().await, Some(user));
        assert!(restarted.is_authenticated().await);

        storage
            .set_item(SESSION_USER_KEY, "{broken".into())
            .await
            .unwrap();
        let corrupted = service_with(storage.clone());
        assert_eq!(corrupted.rehydrate().await, None);
        assert_eq!(storage.get_item(SESSION_USER_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn concurrent_registrations_keep_emails_unique() {
        let auth = AuthService::new(
            Arc::new(DBClient::seeded(Utc::now())),
            Arc::new(MemorySessionStorage::new()),
            Duration::from_millis(50),
        );

        let (a, b) = tokio::join!(
            auth.register("Dup A".into(), "dup@example.com".into(), "secret".into(), UserRole::Customer),
            auth.register("Dup B".into(), "dup@example.com".into(), "secret".into(), UserRole::Customer),
        );

        assert_eq!([&a, &b].iter().filter(|r| r.is_ok()).count(), 1);
        assert!(matches!(a.err().or(b.err()), Some(ServiceError::EmailInUse(_))));

        let roster = auth.db_client.get_users(Some("dup@example.com"), None).await;
        assert_eq!(roster.len(), 1);
    }

    #[tokio::test]
    async fn corrupt_session_file_does_not_block_login() {
        let dir = std::env::temp_dir().join(format!("supportflow-auth-{}", uuid::Uuid::new_v4()));
        let path = dir.join("session.json");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(&path, b"{truncated").unwrap();

        let auth = service_with(Arc::new(FileSessionStorage::new(&path)));
        assert_eq!(auth.rehydrate().await, None);

        let user = auth.login("customer@example.com", "pw").await.unwrap();
        assert_eq!(user.name, "Customer");

        let reopened = service_with(Arc::new(FileSessionStorage::new(&path)));
        assert_eq!(reopened.rehydrate().await, Some(user));

        reopened.logout().await.unwrap();
        assert!(!reopened.is_authenticated().await);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
