//! Signal registry for the NPC shell.
//!
//! Maps signal names to handler closures and emits signals synchronously on the
//! event-loop thread. The registry owns the closures; emitters only name the signal.

use crate::types::signal::{Propagation, Signal};

/// Identifies a connected handler for later disconnection.
pub type HandlerId = u64;

/// A handler receives the shared context, the signal, and the registry itself so it
/// can connect or disconnect other handlers while the signal is being emitted.
pub type Handler<C> = Box<dyn FnMut(&mut C, &Signal, &mut SignalRegistry<C>) -> Propagation>;

struct Slot<C> {
    id: HandlerId,
    name: String,
    handler: Handler<C>,
}

/// Ordered collection of named handlers over a context type `C`.
pub struct SignalRegistry<C> {
    slots: Vec<Slot<C>>,
    next_id: HandlerId,
    emitting: bool,
    /// Ids of the slots taken out of `slots` for the current emission.
    checked_out: Vec<HandlerId>,
    /// Ids disconnected while their slot was checked out for emission.
    removed_during_emit: Vec<HandlerId>,
}

impl<C> Default for SignalRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> SignalRegistry<C> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            next_id: 1,
            emitting: false,
            checked_out: Vec::new(),
            removed_during_emit: Vec::new(),
        }
    }

    /// Connects `handler` under `name` (`"destroy"`, `"script-message-received::command"`, ...).
    /// A handler under a base name receives every detail of that signal.
    pub fn connect<F>(&mut self, name: &str, handler: F) -> HandlerId
    where
        F: FnMut(&mut C, &Signal, &mut SignalRegistry<C>) -> Propagation + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;
        self.slots.push(Slot {
            id,
            name: name.to_string(),
            handler: Box::new(handler),
        });
        id
    }

    /// Removes a handler. Returns false if the id is unknown.
    pub fn disconnect(&mut self, id: HandlerId) -> bool {
        let before = self.slots.len();
        self.slots.retain(|slot| slot.id != id);
        if self.slots.len() != before {
            return true;
        }
        if self.emitting
            && self.checked_out.contains(&id)
            && !self.removed_during_emit.contains(&id)
        {
            self.removed_during_emit.push(id);
            return true;
        }
        false
    }

    /// Invokes matching handlers in connection order until one returns `Stop`.
    ///
    /// Handlers connected during emission are not invoked for the signal being emitted.
    pub fn emit(&mut self, ctx: &mut C, signal: &Signal) -> Propagation {
        let mut slots = std::mem::take(&mut self.slots);
        let outer_emit = !self.emitting;
        self.emitting = true;
        self.checked_out.extend(slots.iter().map(|slot| slot.id));

        let mut result = Propagation::Proceed;
        for slot in slots.iter_mut() {
            if !signal.matches(&slot.name) || self.removed_during_emit.contains(&slot.id) {
                continue;
            }
            if (slot.handler)(ctx, signal, self).is_handled() {
                result = Propagation::Stop;
                break;
            }
        }

        // Anything connected during emission landed in `self.slots`.
        slots.append(&mut self.slots);
        let removed = &self.removed_during_emit;
        slots.retain(|slot| !removed.contains(&slot.id));
        self.slots = slots;

        if outer_emit {
            self.emitting = false;
            self.checked_out.clear();
            self.removed_during_emit.clear();
        }
        result
    }

    /// Number of handlers that would receive a signal connected exactly under `name`.
    pub fn handler_count(&self, name: &str) -> usize {
        self.slots.iter().filter(|slot| slot.name == name).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
