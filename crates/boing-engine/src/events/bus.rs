// events/bus.rs
//
// Per-owner mapping of event -> ordered listener list.
//
// Listeners receive the context they live in (`&mut C`), so a bus is usually
// stored somewhere inside `C` (a World, a collider inside a World, ...).
// Emission therefore takes a `locate` function that finds the bus inside the
// context: the listener list is copied out first, then every listener runs with
// full mutable access to the context, and the bus is looked up again afterwards.
//
// Usage:
//   let id = bus.on(FrameEvent::Update, |world, args| { ... });
//   EventBus::emit(&mut world, |w| Some(&mut w.events), FrameEvent::Update, &args);
//   bus.off(FrameEvent::Update, id)?;

use std::collections::HashMap;
use std::hash::Hash;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::api::types::ListenerId;
use crate::error::EngineError;

// Shared by every bus, so an id names exactly one registration.
static NEXT_LISTENER: AtomicU64 = AtomicU64::new(1);

fn fresh_listener_id() -> ListenerId {
    ListenerId(NEXT_LISTENER.fetch_add(1, Ordering::Relaxed))
}

/// A shared listener callback.
pub type Listener<A, C> = Rc<dyn Fn(&mut C, &A)>;

struct Registration<A, C: ?Sized> {
    id: ListenerId,
    once: bool,
    callback: Rc<dyn Fn(&mut C, &A)>,
}

impl<A, C: ?Sized> Clone for Registration<A, C> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            once: self.once,
            callback: Rc::clone(&self.callback),
        }
    }
}

/// Event name -> listeners, invoked in registration order.
pub struct EventBus<E, A, C: ?Sized> {
    listeners: HashMap<E, Vec<Registration<A, C>>>,
}

impl<E, A, C> EventBus<E, A, C>
where
    E: Copy + Eq + Hash,
    C: ?Sized,
{
    pub fn new() -> Self {
        Self {
            listeners: HashMap::new(),
        }
    }

    /// Register a persistent listener.
    pub fn on<F>(&mut self, event: E, listener: F) -> ListenerId
    where
        F: Fn(&mut C, &A) + 'static,
    {
        self.add(event, Rc::new(listener), false)
    }

    /// Register a listener that is removed after its first invocation.
    pub fn once<F>(&mut self, event: E, listener: F) -> ListenerId
    where
        F: Fn(&mut C, &A) + 'static,
    {
        self.add(event, Rc::new(listener), true)
    }

    /// Register an already shared callback.
    pub fn add(&mut self, event: E, callback: Listener<A, C>, once: bool) -> ListenerId {
        let id = fresh_listener_id();
        self.listeners.entry(event).or_default().push(Registration { id, once, callback });
        id
    }

    /// Remove a listener previously registered for `event`.
    pub fn off(&mut self, event: E, id: ListenerId) -> Result<(), EngineError> {
        if self.discard(event, id) {
            Ok(())
        } else {
            Err(EngineError::ListenerNotFound(id))
        }
    }

    /// Whether `id` is currently registered for `event`.
    pub fn contains(&self, event: E, id: ListenerId) -> bool {
        self.listeners
            .get(&event)
            .is_some_and(|list| list.iter().any(|r| r.id == id))
    }

    /// Number of listeners registered for `event`.
    pub fn listener_count(&self, event: E) -> usize {
        self.listeners.get(&event).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.values().all(Vec::is_empty)
    }

    /// Drop every listener.
    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    /// Invoke every listener registered for `event` at the moment emission begins.
    ///
    /// `locate` finds this bus inside `ctx`. Listeners added or removed while the
    /// emission runs do not change who is called this time. One-shot listeners
    /// are unregistered before they run, so a nested emit cannot fire them twice.
    /// If `locate` stops finding the bus (its owner was destroyed mid-emission),
    /// the remaining snapshot still runs.
    ///
    /// Returns the number of listeners invoked.
    pub fn emit<F>(ctx: &mut C, locate: F, event: E, args: &A) -> usize
    where
        F: Fn(&mut C) -> Option<&mut Self>,
    {
        let snapshot = match locate(ctx) {
            Some(bus) => bus.snapshot(event),
            None => return 0,
        };
        for registration in &snapshot {
            if registration.once {
                if let Some(bus) = locate(ctx) {
                    bus.discard(event, registration.id);
                }
            }
            (registration.callback)(ctx, args);
        }
        snapshot.len()
    }

    fn snapshot(&self, event: E) -> Vec<Registration<A, C>> {
        self.listeners.get(&event).cloned().unwrap_or_default()
    }

    fn discard(&mut self, event: E, id: ListenerId) -> bool {
        let Some(list) = self.listeners.get_mut(&event) else {
            return false;
        };
        match list.iter().position(|r| r.id == id) {
            Some(index) => {
                list.remove(index);
                true
            }
            None => false,
        }
    }
}

impl<E, A, C> Default for EventBus<E, A, C>
where
    E: Copy + Eq + Hash,
    C: ?Sized,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E, A, C: ?Sized> std::fmt::Debug for EventBus<E, A, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count: usize = self.listeners.values().map(Vec::len).sum();
        f.debug_struct("EventBus").field("listeners", &count).finish()
    }
}
