//! NavigationGate - single-trigger arbiter for the splash handoff.
//!
//! Turns "animation finished" plus "minimum display elapsed" into exactly
//! one navigation, however many times the terminal event arrives.
//!
//! ```text
//!  Idle ──(finished ∧ ready, latch won)──▶ Navigating ──(transition requested)──▶ Done
//!   │
//!   └──(finished ∧ ¬ready)──▶ Idle   (no navigation this pass)
//! ```

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use splash_session::{LoginProbe, ProbeError};

use crate::config::{GateConfig, LateReadinessPolicy};
use crate::destination::{Destination, DestinationRoutes};
use crate::notification::{NavigationContext, NoopNotificationHook, NotificationHook};
use crate::readiness::ReadinessFlag;
use crate::transition::{SlideTransition, TransitionPresenter};

/// Lifecycle of the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum GateState {
    /// Waiting for the first eligible terminal event
    Idle = 0,
    /// Latch taken, resolving the destination
    Navigating = 1,
    /// Transition requested; accepts nothing further
    Done = 2,
}

impl GateState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => GateState::Idle,
            1 => GateState::Navigating,
            _ => GateState::Done,
        }
    }
}

/// What happened to one terminal event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateOutcome {
    /// This event triggered the navigation
    Navigated(Destination),
    /// Readiness flag was unset; nothing happened
    NotReady,
    /// Navigation already taken by an earlier event
    AlreadyTriggered,
}

/// Single-trigger navigation gate.
pub struct NavigationGate {
    state: AtomicU8,
    state_tx: watch::Sender<GateState>,
    readiness: ReadinessFlag,
    probe: Arc<dyn LoginProbe>,
    presenter: Arc<dyn TransitionPresenter>,
    notifications: Arc<dyn NotificationHook>,
    routes: DestinationRoutes,
    transition: SlideTransition,
    config: GateConfig,
}

impl NavigationGate {
    /// Create a gate in the `Idle` state.
    pub fn new(
        readiness: ReadinessFlag,
        probe: Arc<dyn LoginProbe>,
        presenter: Arc<dyn TransitionPresenter>,
        routes: DestinationRoutes,
    ) -> Self {
        let (state_tx, _) = watch::channel(GateState::Idle);

        Self {
            state: AtomicU8::new(GateState::Idle as u8),
            state_tx,
            readiness,
            probe,
            presenter,
            notifications: Arc::new(NoopNotificationHook),
            routes,
            transition: SlideTransition::default(),
            config: GateConfig::default(),
        }
    }

    /// Set the notification hook.
    pub fn with_notification_hook(mut self, hook: Arc<dyn NotificationHook>) -> Self {
        self.notifications = hook;
        self
    }

    /// Set the handoff transition.
    pub fn with_transition(mut self, transition: SlideTransition) -> Self {
        self.transition = transition;
        self
    }

    /// Set the gate configuration.
    pub fn with_config(mut self, config: GateConfig) -> Self {
        self.config = config;
        self
    }

    /// Current state.
    pub fn state(&self) -> GateState {
        GateState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// Whether navigation has been taken.
    pub fn has_navigated(&self) -> bool {
        self.state() != GateState::Idle
    }

    /// Observe state changes.
    pub fn subscribe(&self) -> watch::Receiver<GateState> {
        self.state_tx.subscribe()
    }

    /// Handle one terminal event from the animation.
    ///
    /// The first call that finds the readiness flag set navigates; every
    /// other call is a no-op. Never fails: probe problems route to login.
    pub async fn on_animation_finished(&self) -> GateOutcome {
        if self.has_navigated() {
            debug!(state = ?self.state(), "Duplicate terminal event ignored");
            return GateOutcome::AlreadyTriggered;
        }

        if !self.readiness.is_ready() {
            match self.config.late_readiness {
                LateReadinessPolicy::Drop => {
                    debug!("Animation finished before minimum display time, not navigating");
                    return GateOutcome::NotReady;
                }
                LateReadinessPolicy::WaitForReadiness => {
                    debug!("Animation finished early, holding until minimum display time");
                    if !self.readiness.wait_ready().await {
                        warn!("Readiness provider gone before minimum display time");
                        return GateOutcome::NotReady;
                    }
                }
            }
        }

        // Latch before any suspension point
        if !self.try_latch() {
            debug!("Terminal event lost the navigation latch");
            return GateOutcome::AlreadyTriggered;
        }

        let logged_in = self.resolve_login().await;
        let destination = Destination::for_session(logged_in);
        let screen = self.routes.resolve(destination);

        let context = NavigationContext {
            destination,
            presenter: Arc::clone(&self.presenter),
        };
        self.notifications.register_listeners(&context);

        self.presenter.present(screen, &self.transition);
        self.set_state(GateState::Done);

        info!(%destination, logged_in, "Splash navigation requested");
        GateOutcome::Navigated(destination)
    }

    fn try_latch(&self) -> bool {
        let won = self
            .state
            .compare_exchange(
                GateState::Idle as u8,
                GateState::Navigating as u8,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_ok();

        if won {
            self.state_tx.send_replace(GateState::Navigating);
        }
        won
    }

    fn set_state(&self, state: GateState) {
        self.state.store(state as u8, Ordering::SeqCst);
        self.state_tx.send_replace(state);
    }

    /// Ask the probe, absorbing failures, panics and timeouts as "not logged in".
    async fn resolve_login(&self) -> bool {
        let probe = Arc::clone(&self.probe);
        let task = tokio::spawn(async move { probe.check_logged_in().await });
        let abort = task.abort_handle();

        let joined = match self.config.probe_timeout() {
            Some(limit) => match tokio::time::timeout(limit, task).await {
                Ok(joined) => joined,
                Err(_) => {
                    abort.abort();
                    warn!(error = %ProbeError::Timeout(limit), "Routing to login");
                    return false;
                }
            },
            None => task.await,
        };

        match joined {
            Ok(Ok(logged_in)) => logged_in,
            Ok(Err(e)) => {
                warn!(error = %e, "Login probe failed, routing to login");
                false
            }
            Err(e) => {
                error!(error = %e, "Login probe crashed, routing to login");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::destination::Screen;
    use crate::mock::{MockLoginProbe, RecordingNotificationHook};
    use crate::transition::NavigationStack;
    use std::time::Duration;

    struct Harness {
        gate: Arc<NavigationGate>,
        stack: Arc<NavigationStack>,
        hook: Arc<RecordingNotificationHook>,
        probe: Arc<MockLoginProbe>,
    }

    fn harness(readiness: ReadinessFlag, probe: MockLoginProbe, config: GateConfig) -> Harness {
        let stack = Arc::new(NavigationStack::new(Screen::new("/splash")));
        let hook = Arc::new(RecordingNotificationHook::new());
        let probe = Arc::new(probe);

        let gate = NavigationGate::new(
            readiness,
            probe.clone(),
            stack.clone(),
            DestinationRoutes::named("/home", "/login"),
        )
        .with_notification_hook(hook.clone())
        .with_config(config);

        Harness {
            gate: Arc::new(gate),
            stack,
            hook,
            probe,
        }
    }

    #[tokio::test]
    async fn test_starts_idle() {
        let h = harness(ReadinessFlag::ready(), MockLoginProbe::logged_in(), GateConfig::default());
        assert_eq!(h.gate.state(), GateState::Idle);
        assert!(!h.gate.has_navigated());
    }

    #[tokio::test]
    async fn test_navigates_and_finishes_done() {
        let h = harness(ReadinessFlag::ready(), MockLoginProbe::logged_in(), GateConfig::default());
        let mut states = h.gate.subscribe();

        let outcome = h.gate.on_animation_finished().await;

        assert_eq!(outcome, GateOutcome::Navigated(Destination::Home));
        assert_eq!(h.gate.state(), GateState::Done);
        assert_eq!(*states.borrow_and_update(), GateState::Done);
        assert_eq!(h.stack.current(), Some(Screen::new("/home")));
        assert_eq!(h.hook.call_count(), 1);
        assert_eq!(h.hook.last_destination(), Some(Destination::Home));
    }

    #[tokio::test]
    async fn test_not_ready_leaves_latch_unset() {
        let (handle, flag) = ReadinessFlag::pending();
        let h = harness(flag, MockLoginProbe::logged_in(), GateConfig::default());

        assert_eq!(h.gate.on_animation_finished().await, GateOutcome::NotReady);
        assert_eq!(h.gate.state(), GateState::Idle);
        assert_eq!(h.probe.call_count(), 0);

        // A later terminal event after readiness still navigates
        handle.mark_ready();
        assert_eq!(
            h.gate.on_animation_finished().await,
            GateOutcome::Navigated(Destination::Home)
        );
    }

    #[tokio::test]
    async fn test_probe_error_routes_to_login() {
        let h = harness(
            ReadinessFlag::ready(),
            MockLoginProbe::failing("store exploded"),
            GateConfig::default(),
        );

        assert_eq!(
            h.gate.on_animation_finished().await,
            GateOutcome::Navigated(Destination::Login)
        );
        assert_eq!(h.gate.state(), GateState::Done);
        assert_eq!(
            h.gate.on_animation_finished().await,
            GateOutcome::AlreadyTriggered
        );
        assert_eq!(h.stack.transitions().len(), 1);
    }

    #[tokio::test]
    async fn test_probe_panic_routes_to_login() {
        let h = harness(ReadinessFlag::ready(), MockLoginProbe::panicking(), GateConfig::default());

        assert_eq!(
            h.gate.on_animation_finished().await,
            GateOutcome::Navigated(Destination::Login)
        );
        assert_eq!(h.gate.state(), GateState::Done);
    }

    #[tokio::test(start_paused = true)]
    async fn test_probe_timeout_routes_to_login() {
        let config = GateConfig {
            probe_timeout_ms: Some(100),
            ..Default::default()
        };
        let probe = MockLoginProbe::logged_in().with_delay(Duration::from_secs(10));
        let h = harness(ReadinessFlag::ready(), probe, config);

        assert_eq!(
            h.gate.on_animation_finished().await,
            GateOutcome::Navigated(Destination::Login)
        );
    }

    #[tokio::test]
    async fn test_concurrent_events_navigate_once() {
        let probe = MockLoginProbe::logged_in().with_delay(Duration::from_millis(20));
        let h = harness(ReadinessFlag::ready(), probe, GateConfig::default());

        let (first, second) = tokio::join!(
            h.gate.on_animation_finished(),
            h.gate.on_animation_finished()
        );

        assert_eq!(first, GateOutcome::Navigated(Destination::Home));
        assert_eq!(second, GateOutcome::AlreadyTriggered);
        assert_eq!(h.probe.call_count(), 1);
        assert_eq!(h.hook.call_count(), 1);
        assert_eq!(h.stack.transitions().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_readiness_policy() {
        let (handle, flag) = ReadinessFlag::pending();
        let config = GateConfig {
            late_readiness: LateReadinessPolicy::WaitForReadiness,
            ..Default::default()
        };
        let h = harness(flag, MockLoginProbe::logged_out(), config);

        let gate = h.gate.clone();
        let pending = tokio::spawn(async move { gate.on_animation_finished().await });

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(h.gate.state(), GateState::Idle);

        handle.mark_ready();
        assert_eq!(
            pending.await.unwrap(),
            GateOutcome::Navigated(Destination::Login)
        );
    }
}
