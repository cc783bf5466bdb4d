//! Navigation destinations and the screens behind them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Where the splash screen hands off to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    Home,
    Login,
}

impl Destination {
    /// Home when logged in, login otherwise.
    pub fn for_session(logged_in: bool) -> Self {
        if logged_in {
            Destination::Home
        } else {
            Destination::Login
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Destination::Home => "home",
            Destination::Login => "login",
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque reference to a screen, identified by its route.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Screen {
    route: String,
}

impl Screen {
    pub fn new(route: impl Into<String>) -> Self {
        Self {
            route: route.into(),
        }
    }

    pub fn route(&self) -> &str {
        &self.route
    }
}

/// Builds the screen for a destination.
pub trait ScreenFactory: Send + Sync {
    fn build(&self) -> Screen;
}

impl ScreenFactory for Screen {
    fn build(&self) -> Screen {
        self.clone()
    }
}

/// Screen factories for both destinations.
#[derive(Clone)]
pub struct DestinationRoutes {
    home: Arc<dyn ScreenFactory>,
    login: Arc<dyn ScreenFactory>,
}

impl DestinationRoutes {
    /// Routes backed by external screen factories.
    pub fn new(home: Arc<dyn ScreenFactory>, login: Arc<dyn ScreenFactory>) -> Self {
        Self { home, login }
    }

    /// Routes that always resolve to fixed screens.
    pub fn named(home: impl Into<String>, login: impl Into<String>) -> Self {
        Self::new(Arc::new(Screen::new(home)), Arc::new(Screen::new(login)))
    }

    /// Build the screen for `destination`.
    pub fn resolve(&self, destination: Destination) -> Screen {
        match destination {
            Destination::Home => self.home.build(),
            Destination::Login => self.login.build(),
        }
    }
}

impl Default for DestinationRoutes {
    fn default() -> Self {
        Self::named("/home", "/login/phone")
    }
}

impl fmt::Debug for DestinationRoutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DestinationRoutes")
            .field("home", &self.home.build().route())
            .field("login", &self.login.build().route())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_is_pure_function_of_session() {
        assert_eq!(Destination::for_session(true), Destination::Home);
        assert_eq!(Destination::for_session(false), Destination::Login);
    }

    #[test]
    fn test_routes_resolve() {
        let routes = DestinationRoutes::named("/home", "/login");
        assert_eq!(routes.resolve(Destination::Home).route(), "/home");
        assert_eq!(routes.resolve(Destination::Login).route(), "/login");
    }

    #[test]
    fn test_display() {
        assert_eq!(Destination::Home.to_string(), "home");
        assert_eq!(Destination::Login.to_string(), "login");
    }
}
