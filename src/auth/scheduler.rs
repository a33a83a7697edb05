//! Re-evaluation cadence for the session observer.
//!
//! DESIGN
//! ======
//! The credential store has no change notification, so the observer polls.
//! The cadence is a [`Scheduler`] strategy: a host with a storage-change event
//! can plug in a scheduler that ticks on that event instead of a timer.
//! Stopping is dropping the handle returned by [`Scheduler::start`].

#[cfg(test)]
#[path = "scheduler_test.rs"]
mod scheduler_test;

use std::time::Duration;

/// Starts a repeating tick.
pub trait Scheduler {
    /// Live timer; dropping it must cancel further ticks.
    type Handle: 'static;

    /// Call `tick` every `period` until the returned handle is dropped.
    ///
    /// Implementations must not call `tick` from inside `start`.
    fn start(&self, period: Duration, tick: Box<dyn FnMut()>) -> Self::Handle;
}

/// Browser interval timer (`setInterval`) under `hydrate`; inert elsewhere.
#[derive(Clone, Copy, Debug, Default)]
pub struct IntervalScheduler;

/// Running [`IntervalScheduler`] timer.
pub struct IntervalHandle {
    #[cfg(feature = "hydrate")]
    interval: Option<gloo_timers::callback::Interval>,
}

impl Scheduler for IntervalScheduler {
    type Handle = IntervalHandle;

    fn start(&self, period: Duration, tick: Box<dyn FnMut()>) -> Self::Handle {
        #[cfg(feature = "hydrate")]
        {
            let millis = u32::try_from(period.as_millis()).unwrap_or(u32::MAX);
            let mut tick = tick;
            IntervalHandle { interval: Some(gloo_timers::callback::Interval::new(millis, move || tick())) }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            log::debug!("session: no timer outside the browser, ignoring {}ms poll", period.as_millis());
            drop(tick);
            IntervalHandle {}
        }
    }
}

#[cfg(feature = "hydrate")]
impl Drop for IntervalHandle {
    fn drop(&mut self) {
        // The last unsubscribe can happen inside this interval's own callback;
        // stop it now but release the closure on a later turn of the event loop.
        if let Some(interval) = self.interval.take() {
            let closure = interval.cancel();
            gloo_timers::callback::Timeout::new(0, move || drop(closure)).forget();
        }
    }
}

/// Scheduler that never ticks. Sessions then refresh only on explicit
/// re-checks.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopScheduler;

impl Scheduler for NoopScheduler {
    type Handle = ();

    fn start(&self, _period: Duration, _tick: Box<dyn FnMut()>) -> Self::Handle {}
}
