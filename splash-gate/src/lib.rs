//! Splash Gate - single-trigger navigation for the launch screen
//!
//! Coordinates three independent signals into one handoff:
//! - Terminal event of the frame-sequence animation
//! - Minimum-display readiness flag
//! - Login state from the session probe
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────┐   finished   ┌──────────────────┐  present  ┌─────────────────────┐
//! │ FramePlayer   │─────────────▶│  NavigationGate  │──────────▶│ TransitionPresenter │
//! └───────────────┘              │  Idle→Navigating │           └─────────────────────┘
//! ┌───────────────┐   is_ready   │      →Done       │  register ┌─────────────────────┐
//! │ReadinessTimer │─────────────▶│                  │──────────▶│  NotificationHook   │
//! └───────────────┘              └────────┬─────────┘           └─────────────────────┘
//!                                         │ check_logged_in
//!                                         ▼
//!                                 ┌───────────────┐
//!                                 │  LoginProbe   │
//!                                 └───────────────┘
//! ```

pub mod animation;
pub mod config;
pub mod destination;
pub mod gate;
pub mod mock;
pub mod notification;
pub mod readiness;
pub mod screen;
pub mod transition;

// Re-export main types for convenience
pub use animation::{AnimationError, AnimationSignal, FinishNotifier, FramePlayer, FrameSequence};
pub use config::{ConfigError, GateConfig, LateReadinessPolicy, SplashConfig};
pub use destination::{Destination, DestinationRoutes, Screen, ScreenFactory};
pub use gate::{GateOutcome, GateState, NavigationGate};
pub use notification::{NavigationContext, NoopNotificationHook, NotificationHook};
pub use readiness::{ReadinessFlag, ReadinessHandle, ReadinessTimer};
pub use screen::{SplashCollaborators, SplashScreen};
pub use transition::{Curve, NavigationStack, Offset, SlideTransition, TransitionPresenter};
