//! Shared session observer.
//!
//! ARCHITECTURE
//! ============
//! One observer owns one evaluator and at most one running timer. Subscribers
//! are reference-counted: the first subscription starts the timer, dropping
//! the last one stops it. Every publish hands each subscriber the full
//! snapshot.
//!
//! CONCURRENCY
//! ===========
//! Single-threaded (`Rc`/`RefCell`). Evaluations never overlap: a re-check
//! requested while subscribers are being notified is queued and runs right
//! after the current pass. The `RefCell` is never borrowed while a subscriber
//! callback or the scheduler runs, so callbacks may subscribe, unsubscribe or
//! request a re-check.

#[cfg(test)]
#[path = "observer_test.rs"]
mod observer_test;

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use super::clock::Clock;
use super::scheduler::Scheduler;
use super::session::{SessionEvaluator, SessionState};
use super::store::TokenStore;

/// Polling cadence used when the host does not configure one.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(crate::config::DEFAULT_POLL_INTERVAL_MS);

type Callback = Rc<dyn Fn(&SessionState)>;

struct Registry<H> {
    subscribers: Vec<(u64, Callback)>,
    next_id: u64,
    current: SessionState,
    timer: Option<H>,
    evaluating: bool,
    rerun: bool,
}

struct Shared<S, C, P: Scheduler> {
    evaluator: SessionEvaluator<S, C>,
    scheduler: P,
    period: Duration,
    registry: RefCell<Registry<P::Handle>>,
}

/// Lets a [`Subscription`] detach without knowing the observer's type
/// parameters.
trait Detach {
    fn detach(&self, id: u64);
}

impl<S, C, P> Shared<S, C, P>
where
    S: TokenStore,
    C: Clock,
    P: Scheduler,
{
    fn is_subscribed(&self, id: u64) -> bool {
        self.registry.borrow().subscribers.iter().any(|(sid, _)| *sid == id)
    }

    fn refresh(&self) {
        {
            let mut registry = self.registry.borrow_mut();
            if registry.subscribers.is_empty() {
                return;
            }
            if registry.evaluating {
                registry.rerun = true;
                return;
            }
            registry.evaluating = true;
        }

        loop {
            let state = self.evaluator.evaluate();
            let subscribers: Vec<(u64, Callback)> = {
                let mut registry = self.registry.borrow_mut();
                registry.current = state.clone();
                registry.subscribers.iter().map(|(id, cb)| (*id, Rc::clone(cb))).collect()
            };

            for (id, callback) in subscribers {
                // An earlier callback in this pass may have unsubscribed it.
                if self.is_subscribed(id) {
                    callback(&state);
                }
            }

            let mut registry = self.registry.borrow_mut();
            if registry.rerun && !registry.subscribers.is_empty() {
                registry.rerun = false;
            } else {
                registry.rerun = false;
                registry.evaluating = false;
                break;
            }
        }
    }
}

impl<S, C, P: Scheduler> Detach for Shared<S, C, P> {
    fn detach(&self, id: u64) {
        let timer = {
            let mut registry = self.registry.borrow_mut();
            registry.subscribers.retain(|(sid, _)| *sid != id);
            if registry.subscribers.is_empty() { registry.timer.take() } else { None }
        };
        if timer.is_some() {
            log::debug!("session: last subscriber left, polling stopped");
        }
        drop(timer);
    }
}

/// Publishes [`SessionState`] snapshots to subscribers, re-evaluating on a
/// shared timer and on explicit [`refresh`](Self::refresh) calls.
pub struct SessionObserver<S, C, P: Scheduler> {
    shared: Rc<Shared<S, C, P>>,
}

impl<S, C, P: Scheduler> Clone for SessionObserver<S, C, P> {
    fn clone(&self) -> Self {
        Self { shared: Rc::clone(&self.shared) }
    }
}

impl<S, C, P> SessionObserver<S, C, P>
where
    S: TokenStore + 'static,
    C: Clock + 'static,
    P: Scheduler + 'static,
{
    pub fn new(evaluator: SessionEvaluator<S, C>, scheduler: P, period: Duration) -> Self {
        let registry = Registry {
            subscribers: Vec::new(),
            next_id: 0,
            current: SessionState::loading(),
            timer: None,
            evaluating: false,
            rerun: false,
        };
        Self { shared: Rc::new(Shared { evaluator, scheduler, period, registry: RefCell::new(registry) }) }
    }

    /// Register `callback`, then evaluate and publish immediately.
    ///
    /// The first subscriber starts the shared timer. Dropping (or calling
    /// [`Subscription::unsubscribe`] on) the returned handle stops delivery.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&SessionState) + 'static,
    {
        let (id, needs_timer) = {
            let mut registry = self.shared.registry.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.subscribers.push((id, Rc::new(callback)));
            (id, registry.timer.is_none())
        };

        if needs_timer {
            self.start_polling();
        }

        let shared: Rc<dyn Detach> = self.shared.clone();
        let subscription = Subscription { observer: Rc::downgrade(&shared), id: Some(id) };
        self.shared.refresh();
        subscription
    }

    /// Re-evaluate now and publish, e.g. right after a login or logout.
    ///
    /// Does nothing while there are no subscribers.
    pub fn refresh(&self) {
        self.shared.refresh();
    }

    /// Last published snapshot; `loading` until the first evaluation.
    #[must_use]
    pub fn current(&self) -> SessionState {
        self.shared.registry.borrow().current.clone()
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.shared.registry.borrow().subscribers.len()
    }

    #[must_use]
    pub fn is_polling(&self) -> bool {
        self.shared.registry.borrow().timer.is_some()
    }

    pub fn evaluator(&self) -> &SessionEvaluator<S, C> {
        &self.shared.evaluator
    }

    fn start_polling(&self) {
        let weak = Rc::downgrade(&self.shared);
        let tick = Box::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared.refresh();
            }
        });
        let handle = self.shared.scheduler.start(self.shared.period, tick);
        log::debug!("session: polling every {}ms", self.shared.period.as_millis());
        self.shared.registry.borrow_mut().timer = Some(handle);
    }
}

/// Live subscription. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    observer: Weak<dyn Detach>,
    id: Option<u64>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        self.detach();
    }

    fn detach(&mut self) {
        if let (Some(id), Some(observer)) = (self.id.take(), self.observer.upgrade()) {
            observer.detach(id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach();
    }
}
