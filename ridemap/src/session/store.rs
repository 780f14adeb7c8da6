//! Key-value storage for the session token.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, info};

use super::login::{LoginClient, LoginRequest, LoginResponse};
use super::SessionError;
use crate::engine::BoxFuture;

/// Storage key of the bearer token.
pub const TOKEN_KEY: &str = "userToken";

/// Storage key of the user id.
pub const USER_ID_KEY: &str = "userId";

/// Async string key-value storage.
///
/// Mirrors the device storage the app persists its session in. Dyn-compatible
/// so platform stores can be swapped in behind `Arc<dyn KeyValueStore>`.
pub trait KeyValueStore: Send + Sync {
    /// Read a value.
    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<String>, SessionError>>;

    /// Write a value, replacing any existing one.
    fn set(&self, key: &str, value: String) -> BoxFuture<'_, Result<(), SessionError>>;

    /// Delete a value. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> BoxFuture<'_, Result<(), SessionError>>;
}

/// In-process store backed by a concurrent map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<String>, SessionError>> {
        let value = self.entries.get(key).map(|v| v.value().clone());
        Box::pin(async move { Ok(value) })
    }

    fn set(&self, key: &str, value: String) -> BoxFuture<'_, Result<(), SessionError>> {
        self.entries.insert(key.to_string(), value);
        Box::pin(async { Ok(()) })
    }

    fn remove(&self, key: &str) -> BoxFuture<'_, Result<(), SessionError>> {
        self.entries.remove(key);
        Box::pin(async { Ok(()) })
    }
}

/// An authenticated user as stored on the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user_id: Option<String>,
}

impl Session {
    /// Value for an `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Reads and writes the session through a [`KeyValueStore`].
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The stored session, if a token is present.
    pub async fn current(&self) -> Result<Option<Session>, SessionError> {
        let Some(token) = self.store.get(TOKEN_KEY).await? else {
            return Ok(None);
        };
        let user_id = self.store.get(USER_ID_KEY).await?;
        Ok(Some(Session { token, user_id }))
    }

    /// Persist the result of a successful login.
    pub async fn save(&self, response: &LoginResponse) -> Result<Session, SessionError> {
        self.store.set(TOKEN_KEY, response.token.clone()).await?;
        self.store
            .set(USER_ID_KEY, response.user_id.clone())
            .await?;
        debug!(user_id = %response.user_id, "Session saved");
        Ok(Session {
            token: response.token.clone(),
            user_id: Some(response.user_id.clone()),
        })
    }

    /// Log in with `client` and persist the session.
    pub async fn login(
        &self,
        client: &dyn LoginClient,
        request: LoginRequest,
    ) -> Result<(Session, LoginResponse), SessionError> {
        let response = client.login(&request).await?;
        let session = self.save(&response).await?;
        info!(
            user_id = %response.user_id,
            onboarded = response.is_onboarded,
            "Logged in"
        );
        Ok((session, response))
    }

    /// Forget the session.
    pub async fn logout(&self) -> Result<(), SessionError> {
        self.store.remove(TOKEN_KEY).await?;
        self.store.remove(USER_ID_KEY).await?;
        info!("Logged out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockLoginClient {
        response: LoginResponse,
    }

    impl LoginClient for MockLoginClient {
        fn login<'a>(
            &'a self,
            _request: &'a LoginRequest,
        ) -> BoxFuture<'a, Result<LoginResponse, SessionError>> {
            let response = self.response.clone();
            Box::pin(async move { Ok(response) })
        }
    }

    struct RejectingClient;

    impl LoginClient for RejectingClient {
        fn login<'a>(
            &'a self,
            _request: &'a LoginRequest,
        ) -> BoxFuture<'a, Result<LoginResponse, SessionError>> {
            Box::pin(async {
                Err(SessionError::Rejected {
                    status: 401,
                    body: "bad credentials".to_string(),
                })
            })
        }
    }

    fn response() -> LoginResponse {
        LoginResponse {
            token: "abc123".to_string(),
            user_id: "u-42".to_string(),
            username: Some("priya".to_string()),
            is_onboarded: true,
        }
    }

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").await.unwrap(), None);

        store.set("k", "v".to_string()).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some("v".to_string()));

        store.remove("k").await.unwrap();
        store.remove("k").await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_login_persists_session() {
        let backing = Arc::new(MemoryStore::new());
        let sessions = SessionStore::new(backing.clone());
        assert!(sessions.current().await.unwrap().is_none());

        let client = MockLoginClient {
            response: response(),
        };
        let (session, resp) = sessions
            .login(&client, LoginRequest::new("priya@example.com", "pw"))
            .await
            .unwrap();

        assert_eq!(session.bearer(), "Bearer abc123");
        assert!(resp.is_onboarded);
        assert_eq!(
            backing.get(TOKEN_KEY).await.unwrap(),
            Some("abc123".to_string())
        );
        assert_eq!(sessions.current().await.unwrap(), Some(session));
    }

    #[tokio::test]
    async fn test_rejected_login_stores_nothing() {
        let backing = Arc::new(MemoryStore::new());
        let sessions = SessionStore::new(backing.clone());

        let err = sessions
            .login(&RejectingClient, LoginRequest::new("x@example.com", "bad"))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Rejected { status: 401, .. }));
        assert!(backing.is_empty());
    }

    #[tokio::test]
    async fn test_logout_clears_keys() {
        let backing = Arc::new(MemoryStore::new());
        let sessions = SessionStore::new(backing.clone());
        sessions.save(&response()).await.unwrap();
        assert_eq!(backing.len(), 2);

        sessions.logout().await.unwrap();
        assert!(sessions.current().await.unwrap().is_none());
    }
}
