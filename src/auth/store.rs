//! Persisted credential access.
//!
//! SYSTEM CONTEXT
//! ==============
//! The token is written at login (outside this crate) and read on every
//! session evaluation. The only write this crate performs on its own is the
//! removal of a token it has confirmed to be expired.
//!
//! TRADE-OFFS
//! ==========
//! The cookie store is browser-only. Under SSR every call reports
//! [`StoreError::Unavailable`], which callers collapse into "signed out" so the
//! server renders the loading placeholder instead of guessing.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::cell::RefCell;
use std::rc::Rc;

/// Retention applied when a login stores a fresh token.
pub const DEFAULT_TTL_DAYS: u32 = 7;

/// Cookie name used when the host does not configure one.
pub const DEFAULT_COOKIE_NAME: &str = "token";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("token store unavailable: {0}")]
    Unavailable(String),
    #[error("token store write failed: {0}")]
    Write(String),
}

/// Key/value slot holding the bearer token.
pub trait TokenStore {
    /// Read the stored token, `None` when nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backing storage cannot be reached.
    fn get(&self) -> Result<Option<String>, StoreError>;

    /// Persist `token` for `ttl_days`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backing storage rejects the write.
    fn set(&self, token: &str, ttl_days: u32) -> Result<(), StoreError>;

    /// Delete the stored token. Removing an absent token is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backing storage rejects the write.
    fn remove(&self) -> Result<(), StoreError>;
}

impl<T: TokenStore + ?Sized> TokenStore for Rc<T> {
    fn get(&self) -> Result<Option<String>, StoreError> {
        (**self).get()
    }

    fn set(&self, token: &str, ttl_days: u32) -> Result<(), StoreError> {
        (**self).set(token, ttl_days)
    }

    fn remove(&self) -> Result<(), StoreError> {
        (**self).remove()
    }
}

// =============================================================================
// IN-MEMORY STORE
// =============================================================================

/// Process-local store for SSR, native hosts and tests.
///
/// Retention is recorded but not enforced; expiry is decided from the token's
/// own `exp` claim.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: RefCell<Option<(String, u32)>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `token` at the default retention.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self { slot: RefCell::new(Some((token.into(), DEFAULT_TTL_DAYS))) }
    }

    /// Retention requested by the last `set`, if a token is stored.
    #[must_use]
    pub fn ttl_days(&self) -> Option<u32> {
        self.slot.borrow().as_ref().map(|(_, ttl)| *ttl)
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Result<Option<String>, StoreError> {
        Ok(self.slot.borrow().as_ref().map(|(token, _)| token.clone()))
    }

    fn set(&self, token: &str, ttl_days: u32) -> Result<(), StoreError> {
        *self.slot.borrow_mut() = Some((token.to_owned(), ttl_days));
        Ok(())
    }

    fn remove(&self) -> Result<(), StoreError> {
        self.slot.borrow_mut().take();
        Ok(())
    }
}

// =============================================================================
// COOKIE STORE
// =============================================================================

/// Token kept in a `document.cookie` entry.
#[derive(Debug, Clone)]
pub struct CookieTokenStore {
    name: String,
}

impl Default for CookieTokenStore {
    fn default() -> Self {
        Self::new(DEFAULT_COOKIE_NAME)
    }
}

impl CookieTokenStore {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[cfg(feature = "hydrate")]
    fn document(&self) -> Result<web_sys::HtmlDocument, StoreError> {
        use wasm_bindgen::JsCast;

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return Err(StoreError::Unavailable("no browser document".to_owned()));
        };
        document
            .dyn_into::<web_sys::HtmlDocument>()
            .map_err(|_| StoreError::Unavailable("document is not an HTML document".to_owned()))
    }

    #[cfg(feature = "hydrate")]
    fn write_cookie(&self, value: &str) -> Result<(), StoreError> {
        self.document()?
            .set_cookie(value)
            .map_err(|e| StoreError::Write(format!("{e:?}")))
    }
}

impl TokenStore for CookieTokenStore {
    fn get(&self) -> Result<Option<String>, StoreError> {
        #[cfg(feature = "hydrate")]
        {
            let header = self
                .document()?
                .cookie()
                .map_err(|e| StoreError::Unavailable(format!("{e:?}")))?;
            Ok(cookie_value(&header, &self.name))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(StoreError::Unavailable(format!("cookie `{}` needs a browser", self.name)))
        }
    }

    fn set(&self, token: &str, ttl_days: u32) -> Result<(), StoreError> {
        let cookie = set_cookie_string(&self.name, token, ttl_days);
        #[cfg(feature = "hydrate")]
        {
            self.write_cookie(&cookie)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(StoreError::Unavailable(format!("cannot write `{cookie}` without a browser")))
        }
    }

    fn remove(&self) -> Result<(), StoreError> {
        let cookie = expire_cookie_string(&self.name);
        #[cfg(feature = "hydrate")]
        {
            self.write_cookie(&cookie)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(StoreError::Unavailable(format!("cannot write `{cookie}` without a browser")))
        }
    }
}

/// Find `name` in a `document.cookie` style header (`a=1; b=2`).
///
/// Empty values count as absent; browsers keep an empty entry around briefly
/// after some removals.
#[must_use]
pub fn cookie_value(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

/// `Set-Cookie` style assignment that keeps `token` for `ttl_days`.
#[must_use]
pub fn set_cookie_string(name: &str, token: &str, ttl_days: u32) -> String {
    let max_age = u64::from(ttl_days) * 24 * 60 * 60;
    format!("{name}={token}; Max-Age={max_age}; Path=/; SameSite=Lax")
}

/// Assignment that makes the browser drop the cookie immediately.
#[must_use]
pub fn expire_cookie_string(name: &str) -> String {
    format!("{name}=; Max-Age=0; Path=/; SameSite=Lax")
}
