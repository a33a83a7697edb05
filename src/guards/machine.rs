//! Guard state machine.
//!
//! ```text
//! LOADING ──allow──▶ AUTHORIZED
//!    │                   │
//!   deny               deny (session lapsed)
//!    ▼                   ▼
//!  REDIRECTING ◀─────────┘   (absorbing; one navigation per instance)
//! ```
//!
//! A guard never returns to LOADING; a fresh guard is built when the view
//! remounts. Unauthenticated is always checked before the role, so a signed
//! out visitor goes to login even on admin routes.

#[cfg(test)]
#[path = "machine_test.rs"]
mod machine_test;

use crate::auth::session::{ADMIN_ROLE, SessionState};
use crate::config::{DEFAULT_ACCESS_DENIED_PATH, DEFAULT_LOGIN_PATH, SessionConfig};

/// Navigation collaborator (`navigate(path)`).
pub trait Navigator {
    fn navigate(&self, path: &str);
}

impl<F> Navigator for F
where
    F: Fn(&str),
{
    fn navigate(&self, path: &str) {
        self(path);
    }
}

/// Who may see the guarded view, and where everyone else goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardPolicy {
    /// Any signed-in user.
    Authenticated { redirect_to: String },
    /// Signed-in users holding `admin_role`.
    Admin { login_path: String, access_denied_path: String, admin_role: String },
}

impl GuardPolicy {
    #[must_use]
    pub fn authenticated() -> Self {
        Self::authenticated_to(DEFAULT_LOGIN_PATH)
    }

    #[must_use]
    pub fn authenticated_to(redirect_to: impl Into<String>) -> Self {
        Self::Authenticated { redirect_to: redirect_to.into() }
    }

    #[must_use]
    pub fn admin() -> Self {
        Self::Admin {
            login_path: DEFAULT_LOGIN_PATH.to_owned(),
            access_denied_path: DEFAULT_ACCESS_DENIED_PATH.to_owned(),
            admin_role: ADMIN_ROLE.to_owned(),
        }
    }

    /// Admin policy using the configured paths and role.
    #[must_use]
    pub fn admin_from(config: &SessionConfig) -> Self {
        Self::Admin {
            login_path: config.login_path.clone(),
            access_denied_path: config.access_denied_path.clone(),
            admin_role: config.admin_role.clone(),
        }
    }

    fn verdict(&self, state: &SessionState) -> Verdict<'_> {
        if state.loading {
            return Verdict::Pending;
        }
        match self {
            Self::Authenticated { redirect_to } => {
                if state.authenticated {
                    Verdict::Allow
                } else {
                    Verdict::Deny(redirect_to)
                }
            }
            Self::Admin { login_path, access_denied_path, admin_role } => {
                if !state.authenticated {
                    Verdict::Deny(login_path)
                } else if state.has_role(admin_role) {
                    Verdict::Allow
                } else {
                    Verdict::Deny(access_denied_path)
                }
            }
        }
    }
}

enum Verdict<'a> {
    Pending,
    Allow,
    Deny(&'a str),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardPhase {
    Loading,
    Authorized,
    Redirecting,
}

/// What the guarded slot should render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardView {
    Placeholder,
    Children,
    Nothing,
}

/// One guard instance. Feed it every published [`SessionState`].
#[derive(Clone, Debug)]
pub struct RouteGuard {
    policy: GuardPolicy,
    phase: GuardPhase,
}

impl RouteGuard {
    #[must_use]
    pub fn new(policy: GuardPolicy) -> Self {
        Self { policy, phase: GuardPhase::Loading }
    }

    #[must_use]
    pub fn policy(&self) -> &GuardPolicy {
        &self.policy
    }

    #[must_use]
    pub fn phase(&self) -> GuardPhase {
        self.phase
    }

    #[must_use]
    pub fn view(&self) -> GuardView {
        match self.phase {
            GuardPhase::Loading => GuardView::Placeholder,
            GuardPhase::Authorized => GuardView::Children,
            GuardPhase::Redirecting => GuardView::Nothing,
        }
    }

    /// Advance on a new snapshot. Returns the path to navigate to when this
    /// snapshot moves the guard into REDIRECTING, `None` otherwise.
    pub fn observe(&mut self, state: &SessionState) -> Option<String> {
        if self.phase == GuardPhase::Redirecting {
            return None;
        }
        match self.policy.verdict(state) {
            Verdict::Pending => None,
            Verdict::Allow => {
                self.phase = GuardPhase::Authorized;
                None
            }
            Verdict::Deny(path) => {
                let path = path.to_owned();
                self.phase = GuardPhase::Redirecting;
                Some(path)
            }
        }
    }

    /// [`observe`](Self::observe), performing the redirect through `navigator`.
    pub fn drive<N: Navigator + ?Sized>(&mut self, state: &SessionState, navigator: &N) -> GuardView {
        if let Some(path) = self.observe(state) {
            log::debug!("guard: redirecting to {path}");
            navigator.navigate(&path);
        }
        self.view()
    }
}
