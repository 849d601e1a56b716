//! Reactor: polled event sources
//!
//! A [`Reactor`] owns a set of [`Source`]s. On every iteration it asks each
//! source whether it is ready (`prepare`, then `check` for the ones that were
//! not), dispatches the ready ones and reports how long the caller may wait
//! before iterating again. Nothing in here blocks waiting for a source.
//!
//! [`MainLoop`] is the reference implementation.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use slotmap::{new_key_type, SlotMap};

use crate::clock::{Clock, SystemClock};
use crate::error::ReactorError;

new_key_type! {
    /// Registration handle for a source
    pub struct SourceId;
}

/// Dispatch priority. Lower values run first.
pub type Priority = i32;

/// Common priorities
pub mod priority {
    use super::Priority;

    pub const HIGH: Priority = -100;
    pub const DEFAULT: Priority = 0;
    pub const LOW: Priority = 300;
}

/// Result of a source's readiness test
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Readiness {
    pub ready: bool,
    /// How long the reactor may wait before polling this source again
    pub delay_ms: u64,
}

impl Readiness {
    pub fn ready(delay_ms: u64) -> Self {
        Self {
            ready: true,
            delay_ms,
        }
    }

    pub fn wait(delay_ms: u64) -> Self {
        Self {
            ready: false,
            delay_ms,
        }
    }
}

/// Whether a source stays registered after dispatch
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    Break,
}

/// An event source polled by a reactor
pub trait Source {
    fn name(&self) -> &str {
        "source"
    }

    /// Called before polling
    fn prepare(&mut self, now_ms: u64) -> Readiness;

    /// Called after polling for sources that were not ready in `prepare`
    fn check(&mut self, now_ms: u64) -> bool;

    /// Run the source's callback
    fn dispatch(&mut self) -> ControlFlow;
}

/// Host event loop collaborator
pub trait Reactor {
    /// Time base shared by the reactor and everything it drives
    fn clock(&self) -> Rc<dyn Clock>;

    /// Register a source
    fn add_source(
        &self,
        priority: Priority,
        source: Box<dyn Source>,
    ) -> Result<SourceId, ReactorError>;

    /// Cancel a registration. Returns false if the handle was not registered.
    ///
    /// Safe to call from inside a dispatch, including for the source that is
    /// currently being dispatched.
    fn remove_source(&self, id: SourceId) -> bool;
}

struct SourceEntry {
    priority: Priority,
    // None while the source is being dispatched
    source: Option<Box<dyn Source>>,
}

/// Summary of one [`MainLoop::iterate`] call
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Iteration {
    /// Number of sources dispatched
    pub dispatched: usize,
    /// Smallest delay hint reported by the remaining sources
    pub next_delay_ms: Option<u64>,
}

/// Reference single-threaded reactor
pub struct MainLoop {
    clock: Rc<dyn Clock>,
    sources: RefCell<SlotMap<SourceId, SourceEntry>>,
    closed: Cell<bool>,
}

impl MainLoop {
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self {
            clock,
            sources: RefCell::new(SlotMap::with_key()),
            closed: Cell::new(false),
        }
    }

    pub fn with_system_clock() -> Self {
        Self::new(Rc::new(SystemClock::new()))
    }

    /// Stop accepting new sources. Registered sources keep running.
    pub fn close(&self) {
        self.closed.set(true);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }

    pub fn contains(&self, id: SourceId) -> bool {
        self.sources.borrow().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.sources.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.borrow().is_empty()
    }

    /// Run one poll/dispatch cycle without blocking
    ///
    /// Every source is prepared in priority order; sources that are not ready
    /// are checked again after the poll. Each ready source is dispatched at
    /// most once.
    pub fn iterate(&self) -> Iteration {
        let now = self.clock.now_ms();

        let mut order: Vec<(Priority, SourceId)> = self
            .sources
            .borrow()
            .iter()
            .map(|(id, entry)| (entry.priority, id))
            .collect();
        order.sort_by_key(|(priority, _)| *priority);

        let mut ready = Vec::new();
        let mut pending = Vec::new();
        let mut next_delay: Option<u64> = None;

        {
            let mut sources = self.sources.borrow_mut();
            for &(_, id) in &order {
                let Some(source) = sources.get_mut(id).and_then(|e| e.source.as_mut()) else {
                    continue;
                };
                let readiness = source.prepare(now);
                next_delay = min_delay(next_delay, readiness.delay_ms);
                if readiness.ready {
                    ready.push(id);
                } else {
                    pending.push(id);
                }
            }
        }

        if !pending.is_empty() {
            let now = self.clock.now_ms();
            let mut sources = self.sources.borrow_mut();
            for id in pending {
                let Some(source) = sources.get_mut(id).and_then(|e| e.source.as_mut()) else {
                    continue;
                };
                if source.check(now) {
                    ready.push(id);
                }
            }
        }

        let mut dispatched = 0;
        for id in ready {
            if self.dispatch_one(id) {
                dispatched += 1;
            }
        }

        Iteration {
            dispatched,
            next_delay_ms: if self.is_empty() { None } else { next_delay },
        }
    }

    /// Iterate until no sources remain, sleeping on the clock between idle iterations
    pub fn run(&self) {
        while !self.is_empty() {
            let iteration = self.iterate();
            if iteration.dispatched == 0 {
                if let Some(delay) = iteration.next_delay_ms {
                    self.clock.sleep_ms(delay.max(1));
                }
            }
        }
    }

    fn dispatch_one(&self, id: SourceId) -> bool {
        let taken = self
            .sources
            .borrow_mut()
            .get_mut(id)
            .and_then(|entry| entry.source.take());

        // Removed by an earlier dispatch in this iteration
        let Some(mut source) = taken else {
            return false;
        };

        tracing::trace!(source = source.name(), "dispatching");
        let flow = source.dispatch();

        let leftover = {
            let mut sources = self.sources.borrow_mut();
            match (flow, sources.get_mut(id)) {
                (ControlFlow::Continue, Some(entry)) => {
                    entry.source = Some(source);
                    None
                }
                (ControlFlow::Break, Some(_)) => {
                    sources.remove(id);
                    Some(source)
                }
                // Removed while dispatching
                (_, None) => Some(source),
            }
        };

        // Dropped outside the borrow: a source's destructor may touch the loop
        drop(leftover);
        true
    }
}

fn min_delay(current: Option<u64>, candidate: u64) -> Option<u64> {
    Some(current.map_or(candidate, |c| c.min(candidate)))
}

impl Reactor for MainLoop {
    fn clock(&self) -> Rc<dyn Clock> {
        self.clock.clone()
    }

    fn add_source(
        &self,
        priority: Priority,
        source: Box<dyn Source>,
    ) -> Result<SourceId, ReactorError> {
        if self.closed.get() {
            return Err(ReactorError::Closed);
        }
        let name = source.name().to_owned();
        let id = self.sources.borrow_mut().insert(SourceEntry {
            priority,
            source: Some(source),
        });
        tracing::debug!(source = %name, priority, "source added");
        Ok(id)
    }

    fn remove_source(&self, id: SourceId) -> bool {
        let removed = self.sources.borrow_mut().remove(id);
        match removed {
            Some(entry) => {
                drop(entry);
                tracing::debug!("source removed");
                true
            }
            None => false,
        }
    }
}
