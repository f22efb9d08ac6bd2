//! Static route table.

use serde::Serialize;

use stockgate_auth::AccessRequirement;

/// A screen of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Login,
    Register,
    /// Dashboard.
    Home,
    AddItem,
    Admin,
}

impl Route {
    pub const ALL: [Route; 5] = [
        Route::Login,
        Route::Register,
        Route::Home,
        Route::AddItem,
        Route::Admin,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Home => "/",
            Route::AddItem => "/add-item",
            Route::Admin => "/admin",
        }
    }

    pub fn requirement(self) -> AccessRequirement {
        match self {
            Route::Login | Route::Register => AccessRequirement::Public,
            Route::Home | Route::AddItem => AccessRequirement::Authenticated,
            Route::Admin => AccessRequirement::Admin,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::Register => "Register",
            Route::Home => "Dashboard",
            Route::AddItem => "Add Item",
            Route::Admin => "Admin Panel",
        }
    }

    /// Match a location path. Query string, fragment and a trailing slash are
    /// ignored; anything else must match exactly.
    pub fn from_path(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };

        Route::ALL.into_iter().find(|route| route.path() == normalized)
    }
}

impl core::fmt::Display for Route {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.path())
    }
}

/// One row of the route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteEntry {
    pub route: Route,
    pub requirement: AccessRequirement,
}

/// Resolve a path to its view and access requirement.
pub fn lookup(path: &str) -> Option<RouteEntry> {
    Route::from_path(path).map(|route| RouteEntry {
        route,
        requirement: route.requirement(),
    })
}
