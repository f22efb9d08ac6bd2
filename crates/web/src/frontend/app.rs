//! Leptos application with routing.

use leptos::*;
use leptos_router::*;

use crate::frontend::guard::{Guarded, Unmatched};
use crate::frontend::session::SessionContext;
use crate::menu::menu;
use crate::routes::Route as AppRoute;

/// Main application component.
#[component]
pub fn App() -> impl IntoView {
    view! {
        <Router>
            <Routes>
                <Route path=AppRoute::Login.path() view=|| view! {
                    <Guarded route=AppRoute::Login><LoginPage/></Guarded>
                }/>
                <Route path=AppRoute::Register.path() view=|| view! {
                    <Guarded route=AppRoute::Register><RegisterPage/></Guarded>
                }/>
                <Route path=AppRoute::Home.path() view=|| view! {
                    <Guarded route=AppRoute::Home><DashboardPage/></Guarded>
                }/>
                <Route path=AppRoute::AddItem.path() view=|| view! {
                    <Guarded route=AppRoute::AddItem><AddItemPage/></Guarded>
                }/>
                <Route path=AppRoute::Admin.path() view=|| view! {
                    <Guarded route=AppRoute::Admin><AdminPage/></Guarded>
                }/>
                <Route path="/*any" view=Unmatched/>
            </Routes>
        </Router>
    }
}

/// Sidebar + content shell for signed-in screens.
#[component]
fn Layout(active: AppRoute, children: Children) -> impl IntoView {
    let ctx = expect_context::<SessionContext>();
    let session = ctx.session;
    let navigate = use_navigate();
    let login_path = ctx.navigator.after_sign_out().path();
    let actions = ctx.actions.clone();

    let logout = move |_| {
        let actions = actions.clone();
        let navigate = navigate.clone();
        spawn_local(async move {
            match actions.sign_out().await {
                Ok(()) => navigate(login_path, Default::default()),
                Err(err) => tracing::error!(error = %err, "sign-out failed"),
            }
        });
    };

    view! {
        <div class="layout">
            <aside class="sidebar">
                <div class="brand">
                    <h1>"Inventory System"</h1>
                </div>
                <nav>
                    <ul>
                        {move || {
                            session.with(|s| menu(s, Some(active)))
                                .into_iter()
                                .map(|item| view! {
                                    <li class:active=item.active>
                                        <A href=item.href()>{item.label}</A>
                                    </li>
                                })
                                .collect_view()
                        }}
                    </ul>
                </nav>
                <div class="account">
                    {move || session.with(|s| s.profile().map(|p| view! {
                        <p class="name">{p.display_name}</p>
                        <p class="role">{p.role.to_string()}</p>
                    }))}
                </div>
                <button class="logout" on:click=logout>"Logout"</button>
            </aside>
            <main>
                <header>
                    <h2>{active.title()}</h2>
                </header>
                <div class="content">{children()}</div>
            </main>
        </div>
    }
}

/// Login page component.
#[component]
fn LoginPage() -> impl IntoView {
    let ctx = expect_context::<SessionContext>();
    let navigate = use_navigate();
    let home_path = ctx.navigator.after_sign_in().path();

    let email = create_rw_signal(String::new());
    let password = create_rw_signal(String::new());
    let error = create_rw_signal(None::<&'static str>);
    let is_submitting = create_rw_signal(false);

    let submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        if is_submitting.get() {
            return;
        }

        is_submitting.set(true);
        error.set(None);
        let actions = ctx.actions.clone();
        let navigate = navigate.clone();
        let (email, password) = (email.get(), password.get());

        spawn_local(async move {
            match actions.sign_in(&email, &password).await {
                Ok(_) => navigate(home_path, Default::default()),
                Err(failure) => {
                    tracing::warn!(error = %failure, "sign-in refused");
                    error.set(Some(failure.message()));
                }
            }
            is_submitting.set(false);
        });
    };

    view! {
        <div class="auth-card">
            <h2>"Login"</h2>
            {move || error.get().map(|msg| view! { <p class="error">{msg}</p> })}
            <form on:submit=submit>
                <label for="email">"Email"</label>
                <input
                    type="email"
                    id="email"
                    prop:value=move || email.get()
                    on:input=move |ev| { email.set(event_target_value(&ev)); error.set(None); }
                />
                <label for="password">"Password"</label>
                <input
                    type="password"
                    id="password"
                    prop:value=move || password.get()
                    on:input=move |ev| { password.set(event_target_value(&ev)); error.set(None); }
                />
                <button type="submit" disabled=move || is_submitting.get()>
                    {move || if is_submitting.get() { "Signing in..." } else { "Login" }}
                </button>
            </form>
            <A href=AppRoute::Register.path()>"Create an account"</A>
        </div>
    }
}

/// Registration page component.
#[component]
fn RegisterPage() -> impl IntoView {
    let ctx = expect_context::<SessionContext>();
    let navigate = use_navigate();
    let home_path = ctx.navigator.after_sign_in().path();

    let display_name = create_rw_signal(String::new());
    let email = create_rw_signal(String::new());
    let password = create_rw_signal(String::new());
    let error = create_rw_signal(None::<&'static str>);

    let submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let actions = ctx.actions.clone();
        let navigate = navigate.clone();
        let (name, email, password) = (display_name.get(), email.get(), password.get());

        spawn_local(async move {
            match actions.register(&email, &password, &name).await {
                Ok(_) => navigate(home_path, Default::default()),
                Err(failure) => error.set(Some(failure.message())),
            }
        });
    };

    view! {
        <div class="auth-card">
            <h2>"Register"</h2>
            {move || error.get().map(|msg| view! { <p class="error">{msg}</p> })}
            <form on:submit=submit>
                <label for="name">"Name"</label>
                <input id="name" prop:value=move || display_name.get()
                    on:input=move |ev| display_name.set(event_target_value(&ev))/>
                <label for="email">"Email"</label>
                <input type="email" id="email" prop:value=move || email.get()
                    on:input=move |ev| email.set(event_target_value(&ev))/>
                <label for="password">"Password"</label>
                <input type="password" id="password" prop:value=move || password.get()
                    on:input=move |ev| password.set(event_target_value(&ev))/>
                <button type="submit">"Register"</button>
            </form>
            <A href=AppRoute::Login.path()>"Back to login"</A>
        </div>
    }
}

#[component]
fn DashboardPage() -> impl IntoView {
    let session = expect_context::<SessionContext>().session;

    view! {
        <Layout active=AppRoute::Home>
            {move || session.with(|s| s.profile().map(|p| view! {
                <p>{format!("Welcome, {}.", p.display_name)}</p>
                <p>{p.branch_name.map(|b| format!("Branch: {b}")).unwrap_or_default()}</p>
            }))}
        </Layout>
    }
}

#[component]
fn AddItemPage() -> impl IntoView {
    view! {
        <Layout active=AppRoute::AddItem>
            <p>"Register a new inventory item for your branch."</p>
        </Layout>
    }
}

#[component]
fn AdminPage() -> impl IntoView {
    let session = expect_context::<SessionContext>().session;

    view! {
        <Layout active=AppRoute::Admin>
            {move || session.with(|s| s.profile().map(|p| view! {
                <p>{format!("Welcome, {}. You have full access to system management.", p.display_name)}</p>
            }))}
        </Layout>
    }
}
