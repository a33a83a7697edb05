//! Session snapshot derived from the stored token.
//!
//! ARCHITECTURE
//! ============
//! Every evaluation rebuilds [`SessionState`] from scratch: read the token,
//! decode it, compare `exp` against the clock. Nothing is carried over from a
//! previous evaluation, so a logout or an expiry can never leave stale claims
//! behind.
//!
//! ERROR HANDLING
//! ==============
//! Store failures, undecodable tokens and expired tokens all produce the
//! signed-out snapshot. Only confirmed expiry deletes the token; a token that
//! fails to decode is left alone.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use super::claims::{self, Claims};
use super::clock::Clock;
use super::store::TokenStore;
use crate::config::SessionConfig;

/// Role tag granted access by the admin guard.
pub const ADMIN_ROLE: &str = "admin";

/// Authentication snapshot for the current browser user.
///
/// `authenticated` implies `claims` is present and unexpired at the time of
/// evaluation. `loading` is only set before the first evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionState {
    pub authenticated: bool,
    pub role: Option<String>,
    pub claims: Option<Claims>,
    pub loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::loading()
    }
}

impl SessionState {
    /// Placeholder published before the first evaluation completes.
    #[must_use]
    pub fn loading() -> Self {
        Self { authenticated: false, role: None, claims: None, loading: true }
    }

    #[must_use]
    pub fn signed_out() -> Self {
        Self { authenticated: false, role: None, claims: None, loading: false }
    }

    #[must_use]
    pub fn signed_in(claims: Claims) -> Self {
        Self { authenticated: true, role: Some(claims.role.clone()), claims: Some(claims), loading: false }
    }

    /// Exact role match. Roles do not imply one another.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.authenticated && self.role.as_deref() == Some(role)
    }

    /// Whether the current role is one of `roles`.
    pub fn has_any_role<I, R>(&self, roles: I) -> bool
    where
        I: IntoIterator<Item = R>,
        R: AsRef<str>,
    {
        roles.into_iter().any(|role| self.has_role(role.as_ref()))
    }

    /// Whether the user holds the admin role `config` names. Matches the
    /// check [`AdminGuard`](crate::guards::components::AdminGuard) makes.
    #[must_use]
    pub fn is_admin(&self, config: &SessionConfig) -> bool {
        self.has_role(&config.admin_role)
    }

    #[must_use]
    pub fn subject_id(&self) -> Option<&str> {
        self.claims.as_ref().map(|c| c.subject_id.as_str())
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.claims.as_ref().map(|c| c.email.as_str())
    }
}

/// Reads the token store and turns its content into a [`SessionState`].
#[derive(Debug)]
pub struct SessionEvaluator<S, C> {
    store: S,
    clock: C,
}

impl<S: TokenStore, C: Clock> SessionEvaluator<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Build a fresh snapshot from the current token.
    ///
    /// Side effect: a token whose `exp` has passed is removed from the store.
    pub fn evaluate(&self) -> SessionState {
        let token = match self.store.get() {
            Ok(Some(token)) => token,
            Ok(None) => return SessionState::signed_out(),
            Err(e) => {
                log::warn!("session: reading token failed, treating as signed out: {e}");
                return SessionState::signed_out();
            }
        };

        let claims = match claims::decode(&token) {
            Ok(claims) => claims,
            Err(e) => {
                log::debug!("session: ignoring undecodable token: {e}");
                return SessionState::signed_out();
            }
        };

        if claims.is_expired_at(self.clock.now()) {
            log::debug!("session: token for {} expired at {}, clearing", claims.subject_id, claims.expires_at);
            if let Err(e) = self.store.remove() {
                log::warn!("session: clearing expired token failed: {e}");
            }
            return SessionState::signed_out();
        }

        SessionState::signed_in(claims)
    }
}
