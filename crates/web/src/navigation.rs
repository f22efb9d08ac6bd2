//! Navigation decisions: route table + access guard.

use std::time::Duration;

use tokio::sync::watch;

use stockgate_auth::{AccessDenial, GuardDecision, Session, evaluate};
use stockgate_infra::AppConfig;

use crate::routes::Route;

/// What the view layer must do for one navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Session not resolved yet; show the loading indicator.
    Pending,
    /// Mount the route's view.
    Mount(Route),
    /// Replace the location with another route immediately.
    Redirect(Route),
    /// Show the denial explanation, then go to `redirect_to` after `after`.
    Deny {
        denial: AccessDenial,
        redirect_to: Route,
        after: Duration,
    },
    /// Path not in the route table.
    NotFound,
}

/// Stateless navigation policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    denial_redirect_delay: Duration,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl Navigator {
    pub fn new(denial_redirect_delay: Duration) -> Self {
        Self {
            denial_redirect_delay,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.denial_redirect_delay)
    }

    pub fn denial_redirect_delay(&self) -> Duration {
        self.denial_redirect_delay
    }

    /// Decide a navigation to `path`.
    ///
    /// Nothing is decided before the session resolves, unknown paths included.
    pub fn resolve(&self, path: &str, session: &Session) -> Navigation {
        if session.is_initializing() {
            return Navigation::Pending;
        }
        match Route::from_path(path) {
            Some(route) => self.resolve_route(route, session),
            None => {
                tracing::debug!(path, "no route for path");
                Navigation::NotFound
            }
        }
    }

    /// Decide a navigation to a known route.
    pub fn resolve_route(&self, route: Route, session: &Session) -> Navigation {
        let decision = evaluate(session, route.requirement());
        tracing::debug!(route = route.path(), decision = decision.as_str(), "route evaluated");

        match decision {
            GuardDecision::Pending => Navigation::Pending,
            GuardDecision::RedirectToLogin => Navigation::Redirect(Route::Login),
            GuardDecision::Deny(denial) => {
                tracing::info!(
                    route = route.path(),
                    actual_role = denial.actual_role.as_str(),
                    required_role = denial.required_role.as_str(),
                    "access denied"
                );
                Navigation::Deny {
                    denial,
                    redirect_to: Route::Home,
                    after: self.denial_redirect_delay,
                }
            }
            GuardDecision::Render => Navigation::Mount(route),
        }
    }

    /// Where the login/register views go once the provider accepts the user.
    pub fn after_sign_in(&self) -> Route {
        Route::Home
    }

    /// Where the layout goes after a sign-out request succeeds.
    pub fn after_sign_out(&self) -> Route {
        Route::Login
    }
}

/// A mounted route, re-evaluated on every session change.
///
/// Lets a protected view react live (e.g. to a sign-out elsewhere) instead of
/// only on the next navigation.
#[derive(Debug)]
pub struct RouteWatch {
    route: Route,
    navigator: Navigator,
    sessions: watch::Receiver<Session>,
}

impl RouteWatch {
    pub fn new(route: Route, navigator: Navigator, mut sessions: watch::Receiver<Session>) -> Self {
        // Only changes after mounting matter.
        let _ = sessions.borrow_and_update();
        Self {
            route,
            navigator,
            sessions,
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn current(&self) -> Navigation {
        let session = self.sessions.borrow();
        self.navigator.resolve_route(self.route, &session)
    }

    /// Wait for the next session change and return the new decision.
    ///
    /// `None` once the session publisher is gone.
    pub async fn changed(&mut self) -> Option<Navigation> {
        self.sessions.changed().await.ok()?;
        let session = self.sessions.borrow_and_update().clone();
        Some(self.navigator.resolve_route(self.route, &session))
    }
}
