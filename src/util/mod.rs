//! Utility helpers shared across the crate.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser/environment concerns from session and
//! guard logic.

pub mod logging;
