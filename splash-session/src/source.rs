//! Identity-session capability.
//!
//! The identity provider's "current user" lookup is ambient state in most
//! mobile SDKs. Here it is an injected trait so the probe can be driven by
//! fakes in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Error types for identity-session lookups.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SessionError {
    /// Identity provider could not be reached
    #[error("Identity provider unavailable: {0}")]
    Unavailable(String),

    /// Cached session could not be decoded or was rejected
    #[error("Session rejected: {0}")]
    Rejected(String),
}

/// An active identity session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentitySession {
    /// Provider-assigned user id
    pub user_id: String,
    /// Phone number the session was established with, if any
    pub phone_number: Option<String>,
}

impl IdentitySession {
    /// Create a session for a user id.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            phone_number: None,
        }
    }

    /// Attach the phone number used to sign in.
    pub fn with_phone_number(mut self, phone: impl Into<String>) -> Self {
        self.phone_number = Some(phone.into());
        self
    }
}

/// Source of the current identity session.
#[async_trait]
pub trait SessionSource: Send + Sync {
    /// Get the current session, or `None` when signed out.
    async fn current_session(&self) -> Result<Option<IdentitySession>, SessionError>;
}

/// Session source backed by process memory.
///
/// Cloning shares the underlying session, so a login flow and the probe can
/// hold the same source.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionSource {
    session: Arc<RwLock<Option<IdentitySession>>>,
}

impl InMemorySessionSource {
    /// Create a signed-out source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source that already holds a session.
    pub fn signed_in(session: IdentitySession) -> Self {
        Self {
            session: Arc::new(RwLock::new(Some(session))),
        }
    }

    /// Replace the current session.
    pub async fn sign_in(&self, session: IdentitySession) {
        info!(user_id = %session.user_id, "Identity session established");
        *self.session.write().await = Some(session);
    }

    /// Drop the current session.
    pub async fn sign_out(&self) {
        if let Some(previous) = self.session.write().await.take() {
            info!(user_id = %previous.user_id, "Identity session cleared");
        }
    }
}

#[async_trait]
impl SessionSource for InMemorySessionSource {
    async fn current_session(&self) -> Result<Option<IdentitySession>, SessionError> {
        Ok(self.session.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_in_and_out() {
        let source = InMemorySessionSource::new();
        assert_eq!(source.current_session().await.unwrap(), None);

        let session = IdentitySession::new("uid-1").with_phone_number("+15550100");
        source.sign_in(session.clone()).await;
        assert_eq!(source.current_session().await.unwrap(), Some(session));

        source.sign_out().await;
        assert_eq!(source.current_session().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clones_share_session() {
        let source = InMemorySessionSource::new();
        let probe_view = source.clone();

        source.sign_in(IdentitySession::new("uid-2")).await;

        let seen = probe_view.current_session().await.unwrap();
        assert_eq!(seen.map(|s| s.user_id), Some("uid-2".to_string()));
    }
}
