//! Route guard component.

use std::time::Duration;

use leptos::*;
use leptos_router::*;

use stockgate_auth::AccessDenial;

use crate::frontend::session::SessionContext;
use crate::navigation::Navigation;
use crate::routes::Route as AppRoute;

/// Render `children` only when the guard allows `route` for the current
/// session; re-evaluated on every session change.
#[component]
pub fn Guarded(route: AppRoute, children: ChildrenFn) -> impl IntoView {
    let ctx = expect_context::<SessionContext>();
    let session = ctx.session;
    let navigator = ctx.navigator.clone();

    let decision = create_memo(move |_| session.with(|s| navigator.resolve_route(route, s)));

    move || match decision.get() {
        Navigation::Pending => view! { <Loading/> }.into_view(),
        Navigation::Redirect(target) => view! { <Redirect path=target.path()/> }.into_view(),
        Navigation::Deny {
            denial,
            redirect_to,
            after,
        } => view! { <AccessDenied denial=denial redirect_to=redirect_to after=after/> }
            .into_view(),
        Navigation::Mount(_) => children().into_view(),
        Navigation::NotFound => view! { <NotFound/> }.into_view(),
    }
}

/// Neutral loading indicator.
#[component]
pub fn Loading() -> impl IntoView {
    view! {
        <div class="loading">
            <div class="spinner"></div>
            <p>"Loading..."</p>
        </div>
    }
}

/// Fallback for paths outside the route table; waits for the session like
/// every guarded route does.
#[component]
pub fn Unmatched() -> impl IntoView {
    let session = expect_context::<SessionContext>().session;
    let initializing = create_memo(move |_| session.with(|s| s.is_initializing()));

    move || {
        if initializing.get() {
            view! { <Loading/> }.into_view()
        } else {
            view! { <NotFound/> }.into_view()
        }
    }
}

#[component]
pub fn NotFound() -> impl IntoView {
    view! {
        <div class="not-found">
            <h2>"Page not found"</h2>
            <A href=AppRoute::Home.path()>"Back to dashboard"</A>
        </div>
    }
}

/// Denial explanation; navigates to `redirect_to` once `after` has elapsed.
#[component]
fn AccessDenied(denial: AccessDenial, redirect_to: AppRoute, after: Duration) -> impl IntoView {
    let navigate = use_navigate();
    match set_timeout_with_handle(
        move || navigate(redirect_to.path(), Default::default()),
        after,
    ) {
        Ok(handle) => on_cleanup(move || handle.clear()),
        Err(err) => tracing::warn!(error = ?err, "could not schedule denial redirect"),
    }

    view! {
        <div class="access-denied">
            <h2>"Access Denied"</h2>
            <p>
                "You don't have permission to access this page. "
                "This area is restricted to administrators only."
            </p>
            <p class="role">{denial.actual_role_line()}</p>
            <p class="role">{denial.required_role_line()}</p>
            <p class="redirect">{format!("Redirecting to {}...", redirect_to.title().to_lowercase())}</p>
        </div>
    }
}
