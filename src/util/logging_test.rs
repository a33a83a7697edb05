#![cfg(not(feature = "hydrate"))]

use super::*;

#[test]
fn init_applies_configured_level() {
    let config = SessionConfig { log_level: "warn".to_owned(), ..SessionConfig::default() };
    init(&config).unwrap();
    assert_eq!(log::max_level(), log::LevelFilter::Warn);
}

#[test]
fn init_rejects_unknown_level() {
    let config = SessionConfig { log_level: "loud".to_owned(), ..SessionConfig::default() };
    assert!(matches!(init(&config), Err(LoggingError::Config(ConfigError::LogLevel(_)))));
}

struct Silent;

impl log::Log for Silent {
    fn enabled(&self, _: &log::Metadata<'_>) -> bool {
        false
    }

    fn log(&self, _: &log::Record<'_>) {}

    fn flush(&self) {}
}

static SILENT: Silent = Silent;

#[test]
fn second_logger_surfaces_as_already_installed() {
    // The first install may or may not win depending on test order.
    let _ = log::set_logger(&SILENT);
    let err = LoggingError::from(log::set_logger(&SILENT).unwrap_err());

    assert!(matches!(err, LoggingError::AlreadyInstalled(_)));
    assert!(err.to_string().starts_with("logger already installed"));
    assert!(std::error::Error::source(&err).is_some());
}
