//! Splash Session - login-state probe for the launch screen
//!
//! Answers one question at launch: does the user hold a login?
//!
//! - Identity session from an injected [`SessionSource`]
//! - Persisted phone-login flag from a [`PhoneLoginStore`]
//! - [`SessionProbe`] reduces both to a single boolean, degrading failures
//!   to "not logged in" per source
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────┐
//! │          SessionProbe            │
//! │  (implements LoginProbe)         │
//! └───────────────┬──────────────────┘
//!                 │
//!      ┌──────────┴──────────┐
//!      ▼                     ▼
//! ┌──────────────┐    ┌───────────────┐
//! │ SessionSource│    │PhoneLoginStore│
//! │ (identity)   │    │ (device file) │
//! └──────────────┘    └───────────────┘
//! ```

pub mod mock;
pub mod probe;
pub mod source;
pub mod store;

// Re-export main types for convenience
pub use probe::{LoginProbe, ProbeError, SessionProbe, SessionReport, SourceReading};
pub use source::{IdentitySession, InMemorySessionSource, SessionError, SessionSource};
pub use store::{FilePhoneLoginStore, PhoneLoginStore, StoreError, PHONE_LOGIN_KEY};
