//! Leptos context carrying the live session.
//!
//! SYSTEM CONTEXT
//! ==============
//! `provide_session` is called once near the root of the app. Guards and
//! identity-aware components read `SessionContext::state`; login and logout
//! handlers call `sign_in` / `sign_out` so the change shows up immediately
//! instead of on the next poll.
//!
//! TRADE-OFFS
//! ==========
//! The observer starts from an effect, i.e. after hydration. Server-rendered
//! markup and the first client render both show the loading placeholder, so
//! hydration never sees a mismatch; the real state lands a tick later.

#[cfg(test)]
#[path = "context_test.rs"]
mod context_test;

use leptos::prelude::*;

use crate::auth::session::SessionState;
use crate::auth::store::{CookieTokenStore, StoreError, TokenStore};
use crate::config::SessionConfig;

/// Handle to the session signal and its re-check trigger.
#[derive(Clone, Copy)]
pub struct SessionContext {
    /// Latest published snapshot; `loading` until the observer's first pass.
    pub state: RwSignal<SessionState>,
    recheck: RwSignal<u64>,
    config: StoredValue<SessionConfig>,
}

impl SessionContext {
    #[must_use]
    pub fn config(&self) -> SessionConfig {
        self.config.get_value()
    }

    /// Ask the observer to re-evaluate now rather than on the next poll.
    pub fn recheck(&self) {
        self.recheck.update(|nonce| *nonce = nonce.wrapping_add(1));
    }

    /// Persist a freshly issued token and re-evaluate.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the cookie cannot be written.
    pub fn sign_in(&self, token: &str) -> Result<(), StoreError> {
        let config = self.config();
        store_token(&CookieTokenStore::new(config.cookie_name), token, config.ttl_days)?;
        self.recheck();
        Ok(())
    }

    /// Drop the stored token and re-evaluate, which sends guarded views to
    /// the login page.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the cookie cannot be cleared.
    pub fn sign_out(&self) -> Result<(), StoreError> {
        CookieTokenStore::new(self.config().cookie_name).remove()?;
        self.recheck();
        Ok(())
    }
}

/// Write `token` with `ttl_days` retention.
///
/// # Errors
///
/// Propagates the store's write failure.
pub fn store_token<S: TokenStore + ?Sized>(store: &S, token: &str, ttl_days: u32) -> Result<(), StoreError> {
    store.set(token.trim(), ttl_days)
}

/// Create the session context, provide it to descendants and, in the
/// browser, start observing the token cookie.
///
/// Under `ssr` the state stays `loading` so the server renders the same
/// placeholder the client hydrates against. A build with neither `hydrate`
/// nor `ssr` has no cookie to read and resolves straight to signed out.
pub fn provide_session(config: SessionConfig) -> SessionContext {
    let config = match config.validate() {
        Ok(()) => config,
        Err(e) => {
            log::warn!("session: invalid config ({e}), using defaults");
            SessionConfig::default()
        }
    };

    let ctx = SessionContext {
        state: RwSignal::new(SessionState::loading()),
        recheck: RwSignal::new(0),
        config: StoredValue::new(config),
    };
    provide_context(ctx);

    #[cfg(feature = "hydrate")]
    observe_cookie(ctx);
    #[cfg(not(any(feature = "hydrate", feature = "ssr")))]
    {
        log::debug!("session: no browser, resolving to signed out");
        ctx.state.set(SessionState::signed_out());
    }

    ctx
}

/// The session provided by an ancestor's [`provide_session`].
///
/// # Panics
///
/// Panics when no ancestor called [`provide_session`].
pub fn use_session() -> SessionContext {
    expect_context::<SessionContext>()
}

#[cfg(feature = "hydrate")]
type BrowserObserver = crate::auth::observer::SessionObserver<
    CookieTokenStore,
    crate::auth::clock::SystemClock,
    crate::auth::scheduler::IntervalScheduler,
>;

#[cfg(feature = "hydrate")]
fn observe_cookie(ctx: SessionContext) {
    use crate::auth::clock::SystemClock;
    use crate::auth::observer::Subscription;
    use crate::auth::scheduler::IntervalScheduler;
    use crate::auth::session::SessionEvaluator;

    let live = StoredValue::new_local(None::<(BrowserObserver, Subscription)>);
    let state = ctx.state;
    let recheck = ctx.recheck;

    Effect::new(move |previous: Option<u64>| {
        let nonce = recheck.get();
        if previous.is_none() {
            let config = ctx.config();
            let evaluator = SessionEvaluator::new(CookieTokenStore::new(config.cookie_name.clone()), SystemClock);
            let observer = BrowserObserver::new(evaluator, IntervalScheduler, config.poll_interval());
            let subscription = observer.subscribe(move |snapshot: &SessionState| state.set(snapshot.clone()));
            live.set_value(Some((observer, subscription)));
        } else {
            live.with_value(|live| {
                if let Some((observer, _)) = live {
                    observer.refresh();
                }
            });
        }
        nonce
    });
}
