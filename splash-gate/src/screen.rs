//! SplashScreen - wires the timer, the animation and the gate together.
//!
//! Everything here lives exactly as long as one mounted splash screen.
//! Rebuilding the hosting view must not touch it: the player and the timer
//! are started once in [`SplashScreen::mount`].

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use splash_session::LoginProbe;

use crate::animation::{self, AnimationError, AnimationSignal, FramePlayer};
use crate::config::{ConfigError, SplashConfig};
use crate::destination::DestinationRoutes;
use crate::gate::{GateOutcome, NavigationGate};
use crate::notification::{NoopNotificationHook, NotificationHook};
use crate::readiness::ReadinessTimer;
use crate::transition::TransitionPresenter;

/// External collaborators a splash screen hands off to.
#[derive(Clone)]
pub struct SplashCollaborators {
    pub probe: Arc<dyn LoginProbe>,
    pub presenter: Arc<dyn TransitionPresenter>,
    pub routes: DestinationRoutes,
    pub notifications: Arc<dyn NotificationHook>,
}

impl SplashCollaborators {
    /// Collaborators with default routes and no notification listeners.
    pub fn new(probe: Arc<dyn LoginProbe>, presenter: Arc<dyn TransitionPresenter>) -> Self {
        Self {
            probe,
            presenter,
            routes: DestinationRoutes::default(),
            notifications: Arc::new(NoopNotificationHook),
        }
    }

    pub fn with_routes(mut self, routes: DestinationRoutes) -> Self {
        self.routes = routes;
        self
    }

    pub fn with_notification_hook(mut self, hook: Arc<dyn NotificationHook>) -> Self {
        self.notifications = hook;
        self
    }
}

/// A mounted splash screen.
pub struct SplashScreen {
    gate: Arc<NavigationGate>,
    signal: Option<AnimationSignal>,
    player: JoinHandle<()>,
    _timer: ReadinessTimer,
}

impl SplashScreen {
    /// Mount the screen: start the readiness timer and the animation.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn mount(
        config: &SplashConfig,
        collaborators: SplashCollaborators,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let player = FramePlayer::new(config.animation.clone())
            .map_err(|e| ConfigError::Invalid(format!("animation: {}", e)))?;
        let timer = ReadinessTimer::start(config.readiness.min_display());

        let gate = NavigationGate::new(
            timer.flag(),
            collaborators.probe,
            collaborators.presenter,
            collaborators.routes,
        )
        .with_notification_hook(collaborators.notifications)
        .with_transition(config.transition.slide())
        .with_config(config.gate.clone());

        let (notifier, signal) = animation::channel();
        let player = player.spawn(notifier);

        info!(
            frames = config.animation.frame_count(),
            fps = config.animation.fps,
            min_display_ms = config.readiness.min_display_ms,
            "Splash screen mounted"
        );

        Ok(Self {
            gate: Arc::new(gate),
            signal: Some(signal),
            player,
            _timer: timer,
        })
    }

    /// The gate, for observing state from the presentation layer.
    pub fn gate(&self) -> &Arc<NavigationGate> {
        &self.gate
    }

    /// Wait for the terminal event and pass it to the gate.
    pub async fn run(&mut self) -> Result<GateOutcome, AnimationError> {
        let signal = self.signal.take().ok_or(AnimationError::Consumed)?;

        if let Err(e) = signal.finished().await {
            warn!(error = %e, "Splash animation ended without a terminal event");
            return Err(e);
        }

        Ok(self.gate.on_animation_finished().await)
    }
}

impl Drop for SplashScreen {
    fn drop(&mut self) {
        self.player.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::destination::{Destination, Screen};
    use crate::mock::MockLoginProbe;
    use crate::transition::NavigationStack;

    fn collaborators(stack: &Arc<NavigationStack>) -> SplashCollaborators {
        SplashCollaborators::new(Arc::new(MockLoginProbe::logged_in()), stack.clone())
            .with_routes(DestinationRoutes::named("/home", "/login"))
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_shorter_than_animation_navigates() {
        let stack = Arc::new(NavigationStack::new(Screen::new("/splash")));
        let mut screen =
            SplashScreen::mount(&SplashConfig::default(), collaborators(&stack)).unwrap();

        let outcome = screen.run().await.unwrap();

        assert_eq!(outcome, GateOutcome::Navigated(Destination::Home));
        assert_eq!(stack.current(), Some(Screen::new("/home")));
        assert!(matches!(screen.run().await, Err(AnimationError::Consumed)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_longer_than_animation_drops_event() {
        let stack = Arc::new(NavigationStack::new(Screen::new("/splash")));
        let mut config = SplashConfig::default();
        config.readiness.min_display_ms = 5000;

        let mut screen = SplashScreen::mount(&config, collaborators(&stack)).unwrap();

        assert_eq!(screen.run().await.unwrap(), GateOutcome::NotReady);
        assert_eq!(stack.current(), Some(Screen::new("/splash")));
        assert!(stack.transitions().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_config_refuses_to_mount() {
        let stack = Arc::new(NavigationStack::new(Screen::new("/splash")));
        let mut config = SplashConfig::default();
        config.animation.fps = 0;

        assert!(SplashScreen::mount(&config, collaborators(&stack)).is_err());
    }
}
