//! Sidebar navigation model.

use serde::Serialize;

use stockgate_auth::{GuardDecision, Session, evaluate};

use crate::routes::Route;

/// One sidebar entry. `route` is `None` for entries without a screen yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub label: &'static str,
    pub route: Option<Route>,
    pub active: bool,
}

impl NavItem {
    /// Link target; placeholder entries point nowhere.
    pub fn href(&self) -> &'static str {
        self.route.map(Route::path).unwrap_or("#")
    }
}

const ENTRIES: [(&str, Option<Route>); 4] = [
    ("Dashboard", Some(Route::Home)),
    ("Inventory List", None),
    ("Add Item", Some(Route::AddItem)),
    ("Admin Panel", Some(Route::Admin)),
];

/// Sidebar entries for `session`, with `active` highlighted.
///
/// Entries whose route the guard would not render for this session are
/// left out (the admin panel for non-admins).
pub fn menu(session: &Session, active: Option<Route>) -> Vec<NavItem> {
    ENTRIES
        .into_iter()
        .filter(|(_, route)| match route {
            Some(route) => evaluate(session, route.requirement()) == GuardDecision::Render,
            None => true,
        })
        .map(|(label, route)| NavItem {
            label,
            route,
            active: route.is_some() && route == active,
        })
        .collect()
}
