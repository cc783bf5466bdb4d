//! SessionProbe - reduces both credential sources to one "is logged in".
//!
//! Each source is read once per probe. A failing source counts as "not
//! logged in" for that source only; the other source still decides.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::source::SessionSource;
use crate::store::PhoneLoginStore;

/// Error types surfaced by a [`LoginProbe`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProbeError {
    /// Probe did not answer in time
    #[error("Login probe timed out after {0:?}")]
    Timeout(Duration),

    /// Probe failed outright
    #[error("Login probe failed: {0}")]
    Failed(String),
}

/// Anything that can answer "is the user logged in".
///
/// This is the seam the navigation gate depends on.
#[async_trait]
pub trait LoginProbe: Send + Sync {
    /// Resolve the current login state.
    async fn check_logged_in(&self) -> Result<bool, ProbeError>;
}

/// What a single credential source said.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceReading {
    /// Source confirmed a login
    Confirmed,
    /// Source answered: no login
    Absent,
    /// Source failed to answer
    Failed,
}

impl SourceReading {
    fn confirms(self) -> bool {
        matches!(self, SourceReading::Confirmed)
    }
}

/// Result of one probe pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionReport {
    /// Identity-session source
    pub identity: SourceReading,
    /// Persisted phone-login flag
    pub phone_login: SourceReading,
}

impl SessionReport {
    /// Logged in if either source confirmed.
    pub fn is_logged_in(&self) -> bool {
        self.identity.confirms() || self.phone_login.confirms()
    }

    /// Whether any source had to be degraded.
    pub fn degraded(&self) -> bool {
        self.identity == SourceReading::Failed || self.phone_login == SourceReading::Failed
    }
}

/// Queries the identity session and the persisted phone-login flag.
#[derive(Clone)]
pub struct SessionProbe {
    sessions: Arc<dyn SessionSource>,
    phone_login: Arc<dyn PhoneLoginStore>,
}

impl SessionProbe {
    /// Create a probe over both credential sources.
    pub fn new(sessions: Arc<dyn SessionSource>, phone_login: Arc<dyn PhoneLoginStore>) -> Self {
        Self {
            sessions,
            phone_login,
        }
    }

    /// Read both sources concurrently and report what each said.
    pub async fn check(&self) -> SessionReport {
        let (identity, phone_login) = tokio::join!(self.read_identity(), self.read_phone_login());

        let report = SessionReport {
            identity,
            phone_login,
        };
        debug!(
            identity = ?report.identity,
            phone_login = ?report.phone_login,
            logged_in = report.is_logged_in(),
            "Session probe finished"
        );
        report
    }

    /// `true` iff an identity session exists or the phone-login flag is set.
    pub async fn is_logged_in(&self) -> bool {
        self.check().await.is_logged_in()
    }

    async fn read_identity(&self) -> SourceReading {
        match self.sessions.current_session().await {
            Ok(Some(_)) => SourceReading::Confirmed,
            Ok(None) => SourceReading::Absent,
            Err(e) => {
                warn!(error = %e, "Identity session lookup failed, treating as signed out");
                SourceReading::Failed
            }
        }
    }

    async fn read_phone_login(&self) -> SourceReading {
        match self.phone_login.is_phone_logged_in().await {
            Ok(true) => SourceReading::Confirmed,
            Ok(false) => SourceReading::Absent,
            Err(e) => {
                warn!(error = %e, "Phone login flag unreadable, treating as not set");
                SourceReading::Failed
            }
        }
    }
}

#[async_trait]
impl LoginProbe for SessionProbe {
    async fn check_logged_in(&self) -> Result<bool, ProbeError> {
        Ok(self.is_logged_in().await)
    }
}
