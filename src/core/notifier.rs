//! Ordered registry of selection handlers.
//!
//! Registration methods take `&self` so a handler holding an `Rc` to the
//! notifier may subscribe or unsubscribe while an emission is running. Each
//! emission iterates over a snapshot taken when it starts; such changes apply
//! from the next emission on.

use crate::core::date::CalendarDay;
use crate::core::error::{HandlerError, HandlerFailure, PickerError, PickerResult};
use indexmap::IndexMap;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub type SelectionHandler<C> = Rc<dyn Fn(CalendarDay, Option<&C>) -> Result<(), HandlerError>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

impl HandlerId {
    pub fn get(self) -> u64 {
        self.0
    }

    #[cfg(test)]
    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

pub struct SelectionNotifier<C> {
    handlers: RefCell<IndexMap<HandlerId, SelectionHandler<C>>>,
    next_id: Cell<u64>,
}

impl<C> Default for SelectionNotifier<C> {
    fn default() -> Self {
        Self {
            handlers: RefCell::new(IndexMap::new()),
            next_id: Cell::new(1),
        }
    }
}

impl<C> SelectionNotifier<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(CalendarDay, Option<&C>) -> Result<(), HandlerError> + 'static,
    {
        self.add_shared(Rc::new(handler))
    }

    /// Appends `handler`. Adding the same handler twice registers it twice.
    pub fn add_shared(&self, handler: SelectionHandler<C>) -> HandlerId {
        let id = HandlerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.handlers.borrow_mut().insert(id, handler);
        id
    }

    /// Returns whether a handler was removed; unknown ids are a no-op.
    pub fn remove(&self, id: HandlerId) -> bool {
        self.handlers.borrow_mut().shift_remove(&id).is_some()
    }

    /// Removes the first registration of this exact handler allocation.
    pub fn remove_shared(&self, handler: &SelectionHandler<C>) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let found = handlers
            .iter()
            .find(|(_, h)| Rc::ptr_eq(h, handler))
            .map(|(id, _)| *id);
        match found {
            Some(id) => handlers.shift_remove(&id).is_some(),
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.borrow().is_empty()
    }

    fn snapshot(&self) -> Vec<(HandlerId, SelectionHandler<C>)> {
        self.handlers
            .borrow()
            .iter()
            .map(|(id, h)| (*id, Rc::clone(h)))
            .collect()
    }

    /// Calls every registered handler in registration order.
    ///
    /// A failing handler does not stop the pass. Failures are collected and
    /// returned together once every handler has run. Returns the number of
    /// handlers called.
    pub fn emit(&self, date: CalendarDay, context: Option<&C>) -> PickerResult<usize> {
        let snapshot = self.snapshot();
        tracing::trace!(%date, handlers = snapshot.len(), "emitting selection");

        let mut failures = Vec::new();
        for (id, handler) in &snapshot {
            if let Err(error) = handler(date, context) {
                tracing::warn!(handler = id.get(), %error, "selection handler failed");
                failures.push(HandlerFailure { id: *id, error });
            }
        }

        if failures.is_empty() {
            Ok(snapshot.len())
        } else {
            Err(PickerError::SubscriberFailures { failures })
        }
    }
}
