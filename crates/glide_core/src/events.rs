//! Event dispatch
//!
//! Single-threaded, fire-and-forget notification. Handlers run in the order
//! they were connected and may connect or disconnect handlers (including
//! themselves) while an event is being delivered.

use std::cell::{Cell, RefCell};

/// Handle returned by [`EventDispatcher::connect`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

/// Event handler function type
pub type EventHandler<E> = Box<dyn FnMut(&E)>;

struct Slot<E> {
    id: ObserverId,
    // None while the handler is running
    handler: Option<EventHandler<E>>,
}

/// Dispatches events to connected handlers
pub struct EventDispatcher<E> {
    slots: RefCell<Vec<Slot<E>>>,
    next_id: Cell<u64>,
}

impl<E> EventDispatcher<E> {
    pub fn new() -> Self {
        Self {
            slots: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
        }
    }

    /// Register an event handler
    pub fn connect<F>(&self, handler: F) -> ObserverId
    where
        F: FnMut(&E) + 'static,
    {
        let id = ObserverId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.slots.borrow_mut().push(Slot {
            id,
            handler: Some(Box::new(handler)),
        });
        id
    }

    /// Remove a handler. Returns false if it was not connected.
    pub fn disconnect(&self, id: ObserverId) -> bool {
        let mut slots = self.slots.borrow_mut();
        let before = slots.len();
        slots.retain(|slot| slot.id != id);
        slots.len() != before
    }

    /// Deliver an event to every handler connected before the call
    pub fn emit(&self, event: &E) {
        let ids: Vec<ObserverId> = self.slots.borrow().iter().map(|s| s.id).collect();

        for id in ids {
            let taken = self
                .slots
                .borrow_mut()
                .iter_mut()
                .find(|s| s.id == id)
                .and_then(|s| s.handler.take());

            let Some(mut handler) = taken else {
                continue;
            };

            handler(event);

            // The handler may have disconnected itself
            if let Some(slot) = self.slots.borrow_mut().iter_mut().find(|s| s.id == id) {
                slot.handler = Some(handler);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }
}

impl<E> Default for EventDispatcher<E> {
    fn default() -> Self {
        Self::new()
    }
}
