//! Logging bootstrap.
//!
//! In the browser this routes the `log` facade to the devtools console and
//! installs the panic hook. Native and SSR hosts bring their own logger; here
//! only the level cap is applied.

#[cfg(test)]
#[path = "logging_test.rs"]
mod logging_test;

use crate::config::{ConfigError, SessionConfig};

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("logger already installed: {0}")]
    AlreadyInstalled(#[from] log::SetLoggerError),
}

/// Install logging at the configured `log_level`.
///
/// # Errors
///
/// Returns [`LoggingError`] for an unknown level or when another logger is
/// already installed.
pub fn init(config: &SessionConfig) -> Result<(), LoggingError> {
    let level = config.level_filter()?;

    #[cfg(feature = "hydrate")]
    {
        console_error_panic_hook::set_once();
        match level.to_level() {
            Some(level) => console_log::init_with_level(level)?,
            None => log::set_max_level(level),
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        log::set_max_level(level);
    }

    Ok(())
}
