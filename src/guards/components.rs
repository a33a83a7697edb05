//! Leptos guard components.
//!
//! Both guards read the session from context, render a placeholder until the
//! first evaluation lands, then either render their children or navigate
//! away exactly once.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use super::machine::{GuardPhase, GuardPolicy, RouteGuard};
use crate::context::{SessionContext, use_session};

/// Shown while the session is still loading.
#[component]
pub fn LoadingPlaceholder() -> impl IntoView {
    view! {
        <div class="session-gate__loading" aria-busy="true">
            <p>"Loading..."</p>
        </div>
    }
}

/// Renders `children` for any signed-in user; otherwise redirects to
/// `redirect_to` (the configured login path by default).
#[component]
pub fn AuthGuard(#[prop(optional, into)] redirect_to: Option<String>, children: ChildrenFn) -> impl IntoView {
    let session = use_session();
    let redirect_to = redirect_to.unwrap_or_else(|| session.config().login_path);
    guarded(session, GuardPolicy::authenticated_to(redirect_to), children)
}

/// Renders `children` for signed-in admins. Signed-out visitors go to the
/// login path, everyone else to `access_denied_path`.
#[component]
pub fn AdminGuard(
    #[prop(optional, into)] access_denied_path: Option<String>,
    children: ChildrenFn,
) -> impl IntoView {
    let session = use_session();
    let config = session.config();
    let policy = GuardPolicy::Admin {
        login_path: config.login_path,
        access_denied_path: access_denied_path.unwrap_or(config.access_denied_path),
        admin_role: config.admin_role,
    };
    guarded(session, policy, children)
}

fn guarded(session: SessionContext, policy: GuardPolicy, children: ChildrenFn) -> impl IntoView {
    let guard = StoredValue::new(RouteGuard::new(policy));
    let phase = RwSignal::new(GuardPhase::Loading);
    let navigate = use_navigate();
    let state = session.state;

    Effect::new(move || {
        let snapshot = state.get();
        let mut redirect = None;
        guard.update_value(|guard| redirect = guard.observe(&snapshot));

        let next = guard.with_value(RouteGuard::phase);
        if phase.get_untracked() != next {
            phase.set(next);
        }
        if let Some(path) = redirect {
            log::debug!("guard: redirecting to {path}");
            navigate(&path, NavigateOptions::default());
        }
    });

    move || match phase.get() {
        GuardPhase::Loading => view! { <LoadingPlaceholder/> }.into_any(),
        GuardPhase::Authorized => children().into_any(),
        GuardPhase::Redirecting => ().into_any(),
    }
}
