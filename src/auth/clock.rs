//! Wall-clock source for expiry checks, in seconds since the Unix epoch.

#[cfg(test)]
#[path = "clock_test.rs"]
mod clock_test;

/// Current time in whole seconds since the Unix epoch.
pub trait Clock {
    fn now(&self) -> i64;
}

impl<F> Clock for F
where
    F: Fn() -> i64,
{
    fn now(&self) -> i64 {
        self()
    }
}

/// Browser `Date.now()` under `hydrate`, `SystemTime` elsewhere.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[allow(clippy::cast_possible_truncation)]
    fn now(&self) -> i64 {
        #[cfg(feature = "hydrate")]
        {
            (js_sys::Date::now() / 1000.0).floor() as i64
        }
        #[cfg(not(feature = "hydrate"))]
        {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map_or(0, |elapsed| i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX))
        }
    }
}
