//! # session-gate
//!
//! Client-side session layer for Leptos frontends that authenticate with a
//! bearer token kept in a browser cookie.
//!
//! The crate decodes the token's claims, turns them into a [`SessionState`]
//! snapshot, keeps that snapshot fresh through a shared polling observer, and
//! gates protected routes with [`AuthGuard`] and [`AdminGuard`].
//!
//! TRUST BOUNDARY
//! ==============
//! Tokens are decoded, never verified. Everything here drives UX (what to
//! render, where to redirect). The backend must re-validate the credential on
//! every request it serves.
//!
//! [`SessionState`]: auth::session::SessionState
//! [`AuthGuard`]: guards::components::AuthGuard
//! [`AdminGuard`]: guards::components::AdminGuard

pub mod auth;
pub mod config;
pub mod context;
pub mod guards;
pub mod util;

pub use auth::claims::{Claims, DecodeError, decode};
pub use auth::observer::{SessionObserver, Subscription};
pub use auth::session::{SessionEvaluator, SessionState};
pub use auth::store::{StoreError, TokenStore};
pub use config::SessionConfig;
pub use context::{SessionContext, provide_session, use_session};
pub use guards::machine::{GuardPhase, GuardPolicy, GuardView, Navigator, RouteGuard};
