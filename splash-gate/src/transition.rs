//! Slide transition and the navigation stack it is applied to.
//!
//! The gate only requests a transition; rendering the slide is the host
//! toolkit's job. What matters here is the contract: the destination
//! *replaces* the splash screen, so back navigation cannot return to it.

use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::info;

use crate::destination::Screen;

/// Position in screen-size units, `(1.0, 0.0)` being one full width to the right.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub dx: f32,
    pub dy: f32,
}

impl Offset {
    /// On-screen position.
    pub const ZERO: Offset = Offset { dx: 0.0, dy: 0.0 };

    /// Create an offset.
    pub const fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    fn lerp(self, other: Offset, t: f32) -> Offset {
        Offset {
            dx: self.dx + (other.dx - self.dx) * t,
            dy: self.dy + (other.dy - self.dy) * t,
        }
    }
}

/// Easing curve applied to transition progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Curve {
    #[default]
    Linear,
    /// Cubic ease-out
    EaseOut,
    /// Cubic ease-in-out
    EaseInOut,
}

impl Curve {
    /// Map linear progress in `[0, 1]` to eased progress.
    pub fn transform(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Curve::Linear => t,
            Curve::EaseOut => 1.0 - (1.0 - t).powi(3),
            Curve::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// One-directional slide of the incoming screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlideTransition {
    /// Where the incoming screen starts
    pub begin: Offset,
    /// Where it comes to rest
    pub end: Offset,
    /// How long the slide takes
    pub duration: Duration,
    /// Easing
    pub curve: Curve,
}

impl Default for SlideTransition {
    /// Slide in from the right over 1.5 seconds.
    fn default() -> Self {
        Self {
            begin: Offset::new(1.0, 0.0),
            end: Offset::ZERO,
            duration: Duration::from_millis(1500),
            curve: Curve::Linear,
        }
    }
}

impl SlideTransition {
    /// Offset of the incoming screen at linear progress `t` in `[0, 1]`.
    pub fn offset_at(&self, t: f32) -> Offset {
        self.begin.lerp(self.end, self.curve.transform(t))
    }

    /// Offset of the incoming screen `elapsed` into the transition.
    pub fn offset_after(&self, elapsed: Duration) -> Offset {
        if self.duration.is_zero() {
            return self.end;
        }
        self.offset_at(elapsed.as_secs_f32() / self.duration.as_secs_f32())
    }
}

/// Performs the replace-transition to a destination screen.
pub trait TransitionPresenter: Send + Sync {
    /// Replace the current screen with `screen` using `transition`.
    ///
    /// Requesting the transition is enough; it need not have finished
    /// rendering when this returns.
    fn present(&self, screen: Screen, transition: &SlideTransition);
}

/// A transition recorded by [`NavigationStack`].
#[derive(Debug, Clone, PartialEq)]
pub struct PresentedTransition {
    /// Screen that was removed
    pub replaced: Option<Screen>,
    /// Screen that took its place
    pub screen: Screen,
    pub transition: SlideTransition,
}

#[derive(Debug, Default)]
struct StackInner {
    screens: Vec<Screen>,
    history: Vec<PresentedTransition>,
}

/// In-process navigation stack with replace semantics.
#[derive(Debug, Default)]
pub struct NavigationStack {
    inner: Mutex<StackInner>,
}

impl NavigationStack {
    /// Create a stack whose only entry is `root`.
    pub fn new(root: Screen) -> Self {
        Self {
            inner: Mutex::new(StackInner {
                screens: vec![root],
                history: Vec::new(),
            }),
        }
    }

    // Updates never panic midway, so a poisoned stack is still consistent
    fn lock(&self) -> MutexGuard<'_, StackInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Screen on top of the stack.
    pub fn current(&self) -> Option<Screen> {
        self.lock().screens.last().cloned()
    }

    /// Number of screens on the stack.
    pub fn depth(&self) -> usize {
        self.lock().screens.len()
    }

    /// Whether back navigation has somewhere to go.
    pub fn can_pop(&self) -> bool {
        self.depth() > 1
    }

    /// Transitions presented so far, oldest first.
    pub fn transitions(&self) -> Vec<PresentedTransition> {
        self.lock().history.clone()
    }
}

impl TransitionPresenter for NavigationStack {
    fn present(&self, screen: Screen, transition: &SlideTransition) {
        assert!(
            !screen.route().is_empty(),
            "transition requested to a screen without a route"
        );

        let mut inner = self.lock();
        let replaced = inner.screens.pop();
        inner.screens.push(screen.clone());

        info!(
            from = replaced.as_ref().map(Screen::route).unwrap_or("<none>"),
            to = %screen.route(),
            duration_ms = transition.duration.as_millis() as u64,
            "Replacing screen"
        );

        inner.history.push(PresentedTransition {
            replaced,
            screen,
            transition: *transition,
        });
    }
}
