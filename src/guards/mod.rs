//! Route guards for protected views.
//!
//! DESIGN
//! ======
//! `machine` holds the framework-free decision logic; `components` wires it to
//! the Leptos session context and router.

pub mod components;
pub mod machine;
