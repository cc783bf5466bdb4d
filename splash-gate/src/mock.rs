//! Mock collaborators for testing the gate.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use splash_session::{LoginProbe, ProbeError};

use crate::destination::Destination;
use crate::notification::{NavigationContext, NotificationHook};

#[derive(Debug, Clone)]
enum ProbeBehavior {
    Answer(bool),
    Fail(String),
    Panic,
}

/// Mock login probe.
///
/// Answers with a fixed login state, fails, or panics, optionally after a
/// delay on the runtime clock.
#[derive(Debug)]
pub struct MockLoginProbe {
    behavior: ProbeBehavior,
    delay: Option<Duration>,
    call_count: AtomicU32,
}

impl MockLoginProbe {
    fn with_behavior(behavior: ProbeBehavior) -> Self {
        Self {
            behavior,
            delay: None,
            call_count: AtomicU32::new(0),
        }
    }

    /// Probe reporting a login.
    pub fn logged_in() -> Self {
        Self::with_behavior(ProbeBehavior::Answer(true))
    }

    /// Probe reporting no login.
    pub fn logged_out() -> Self {
        Self::with_behavior(ProbeBehavior::Answer(false))
    }

    /// Probe returning an error.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self::with_behavior(ProbeBehavior::Fail(reason.into()))
    }

    /// Probe that panics mid-check.
    pub fn panicking() -> Self {
        Self::with_behavior(ProbeBehavior::Panic)
    }

    /// Delay every answer.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Get the number of checks made.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LoginProbe for MockLoginProbe {
    async fn check_logged_in(&self) -> Result<bool, ProbeError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.behavior {
            ProbeBehavior::Answer(logged_in) => Ok(*logged_in),
            ProbeBehavior::Fail(reason) => Err(ProbeError::Failed(reason.clone())),
            ProbeBehavior::Panic => panic!("mock login probe panicked"),
        }
    }
}

/// Notification hook that records each registration.
#[derive(Debug, Default)]
pub struct RecordingNotificationHook {
    call_count: AtomicU32,
    destinations: Mutex<Vec<Destination>>,
}

impl RecordingNotificationHook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of registrations.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Destination passed to the most recent registration.
    pub fn last_destination(&self) -> Option<Destination> {
        self.destinations.lock().ok()?.last().copied()
    }
}

impl NotificationHook for RecordingNotificationHook {
    fn register_listeners(&self, context: &NavigationContext) {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut destinations) = self.destinations.lock() {
            destinations.push(context.destination);
        }
    }
}
