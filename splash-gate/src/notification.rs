//! Push-notification listener registration.
//!
//! Listeners need a way to navigate when a notification is tapped, so they
//! receive the same presenter the splash hands off with.

use std::sync::Arc;
use tracing::debug;

use crate::destination::Destination;
use crate::transition::TransitionPresenter;

/// What a notification hook gets to work with.
#[derive(Clone)]
pub struct NavigationContext {
    /// Destination the splash screen is handing off to
    pub destination: Destination,
    /// Presenter for screens opened from notifications
    pub presenter: Arc<dyn TransitionPresenter>,
}

/// Registers push-notification listeners.
///
/// Called exactly once per splash screen, just before the transition is
/// requested. Fire-and-forget: any asynchronous setup is the hook's business.
pub trait NotificationHook: Send + Sync {
    fn register_listeners(&self, context: &NavigationContext);
}

/// Hook that registers nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotificationHook;

impl NotificationHook for NoopNotificationHook {
    fn register_listeners(&self, context: &NavigationContext) {
        debug!(destination = %context.destination, "No notification listeners to register");
    }
}
