//! Mock credential sources for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::source::{IdentitySession, SessionError, SessionSource};
use crate::store::{PhoneLoginStore, StoreError};

/// Mock identity-session source.
///
/// Either answers with a fixed session or fails every lookup.
pub struct MockSessionSource {
    session: Option<IdentitySession>,
    failure: Option<String>,
    call_count: AtomicU32,
}

impl MockSessionSource {
    /// Source with no session.
    pub fn signed_out() -> Self {
        Self {
            session: None,
            failure: None,
            call_count: AtomicU32::new(0),
        }
    }

    /// Source holding the given session.
    pub fn signed_in(session: IdentitySession) -> Self {
        Self {
            session: Some(session),
            ..Self::signed_out()
        }
    }

    /// Source whose every lookup fails.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Self::signed_out()
        }
    }

    /// Get the number of lookups made.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionSource for MockSessionSource {
    async fn current_session(&self) -> Result<Option<IdentitySession>, SessionError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        if let Some(reason) = &self.failure {
            return Err(SessionError::Unavailable(reason.clone()));
        }
        Ok(self.session.clone())
    }
}

/// Mock phone-login store.
pub struct MockPhoneLoginStore {
    logged_in: bool,
    failure: Option<String>,
    call_count: AtomicU32,
}

impl MockPhoneLoginStore {
    /// Store answering with a fixed flag.
    pub fn new(logged_in: bool) -> Self {
        Self {
            logged_in,
            failure: None,
            call_count: AtomicU32::new(0),
        }
    }

    /// Store whose every read fails.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Self::new(false)
        }
    }

    /// Get the number of reads made.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PhoneLoginStore for MockPhoneLoginStore {
    async fn is_phone_logged_in(&self) -> Result<bool, StoreError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        if let Some(reason) = &self.failure {
            return Err(StoreError::Unavailable(reason.clone()));
        }
        Ok(self.logged_in)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_store_counts_and_fails() {
        let store = MockPhoneLoginStore::failing("locked");
        assert!(store.is_phone_logged_in().await.is_err());
        assert!(store.is_phone_logged_in().await.is_err());
        assert_eq!(store.call_count(), 2);
    }

    #[test]
    fn test_mock_store_answers_flag() {
        let store = MockPhoneLoginStore::new(true);
        assert!(tokio_test::block_on(store.is_phone_logged_in()).unwrap());
    }

    #[test]
    fn test_mock_session_signed_in() {
        let source = MockSessionSource::signed_in(IdentitySession::new("uid"));

        let session = tokio_test::block_on(source.current_session()).unwrap();
        assert_eq!(session.map(|s| s.user_id), Some("uid".to_string()));
        assert_eq!(source.call_count(), 1);
    }
}
