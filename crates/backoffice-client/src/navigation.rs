//! # Routes and Navigation
//!
//! ```text
//!   "/"       ──► Route::Root    ──► login page
//!   "/login"  ──► Route::Login   ──► login page
//!   anything  ──► Route::NotFound(path)
//! ```
//!
//! Clients never render anything themselves. When a service rejects the
//! session they hand `Route::Login` to a [`Navigator`], and the shell
//! decides what to show.

use std::fmt;
use std::sync::Mutex;

use tracing::debug;

/// Path of the login entry point.
pub const LOGIN_PATH: &str = "/login";

/// A resolved application route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Root,
    Login,
    NotFound(String),
}

impl Route {
    /// Resolves a path. Trailing slashes are ignored.
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim();
        let normalized = trimmed.trim_end_matches('/');
        match normalized {
            "" => Route::Root,
            LOGIN_PATH => Route::Login,
            _ => Route::NotFound(trimmed.to_string()),
        }
    }

    /// Path that resolves to this route.
    pub fn path(&self) -> &str {
        match self {
            Route::Root => "/",
            Route::Login => LOGIN_PATH,
            Route::NotFound(path) => path,
        }
    }

    /// Both `/` and `/login` show the login entry point.
    pub fn shows_login(&self) -> bool {
        matches!(self, Route::Root | Route::Login)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

// =============================================================================
// Navigator
// =============================================================================

/// Receives navigations forced by the client layer.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator that only logs. For headless callers.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpNavigator;

impl Navigator for NoOpNavigator {
    fn navigate(&self, route: Route) {
        debug!(%route, "Navigation ignored (no shell attached)");
    }
}

/// Remembers the current route for a shell.
#[derive(Debug)]
pub struct RouteState {
    current: Mutex<Route>,
    forced: Mutex<bool>,
}

impl RouteState {
    pub fn new(initial: Route) -> Self {
        RouteState {
            current: Mutex::new(initial),
            forced: Mutex::new(false),
        }
    }

    /// Current route. A poisoned lock reads as the login route.
    pub fn current(&self) -> Route {
        self.current
            .lock()
            .map(|route| route.clone())
            .unwrap_or(Route::Login)
    }

    /// Sets the route as the user's own choice.
    pub fn open(&self, route: Route) {
        if let Ok(mut current) = self.current.lock() {
            *current = route;
        }
    }

    /// True once the client layer forced a navigation.
    pub fn was_forced(&self) -> bool {
        self.forced.lock().map(|forced| *forced).unwrap_or(false)
    }
}

impl Default for RouteState {
    fn default() -> Self {
        RouteState::new(Route::Root)
    }
}

impl Navigator for RouteState {
    fn navigate(&self, route: Route) {
        debug!(%route, "Forced navigation");
        self.open(route);
        if let Ok(mut forced) = self.forced.lock() {
            *forced = true;
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
