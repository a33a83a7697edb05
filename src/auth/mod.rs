//! Token-to-session pipeline.
//!
//! DESIGN
//! ======
//! Leaf-first: `store` and `clock` are the external collaborators, `claims`
//! decodes, `session` evaluates, `scheduler` + `observer` keep the evaluation
//! fresh. Nothing in here knows about Leptos; the reactive glue lives in
//! `crate::context` and `crate::guards::components`.

pub mod claims;
pub mod clock;
pub mod observer;
pub mod scheduler;
pub mod session;
pub mod store;
