// ── Typed event bus ──
//
// In-process publish/subscribe. Handlers are registered per `EventKind`
// and run synchronously, in registration order, inside `emit`. The
// registry lock is released before any handler runs, so handlers may
// emit or subscribe reentrantly.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use strum::{Display, EnumIter};
use tracing::trace;

use crate::error::CoreError;

/// A dropdown selection: the control's field name and the chosen option's
/// raw value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownChange {
    pub field: String,
    pub value: String,
}

impl DropdownChange {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Every control event the board understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    DropdownChange(DropdownChange),
    PrevClick,
    NextClick,
}

impl BoardEvent {
    pub fn dropdown(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::DropdownChange(DropdownChange::new(field, value))
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Self::DropdownChange(_) => EventKind::DropdownChange,
            Self::PrevClick => EventKind::PrevClick,
            Self::NextClick => EventKind::NextClick,
        }
    }
}

/// Payload-free tag of a [`BoardEvent`], used to index the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum EventKind {
    DropdownChange,
    PrevClick,
    NextClick,
}

/// A registered event handler.
pub type Handler = Arc<dyn Fn(&BoardEvent) -> Result<(), CoreError> + Send + Sync>;

/// Publish/subscribe dispatcher keyed by [`EventKind`].
#[derive(Default)]
pub struct EventBus {
    handlers: Mutex<HashMap<EventKind, Vec<Handler>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for every future emission of `kind`.
    ///
    /// Registering the same closure twice makes it fire twice.
    pub fn subscribe<F>(&self, kind: EventKind, handler: F)
    where
        F: Fn(&BoardEvent) -> Result<(), CoreError> + Send + Sync + 'static,
    {
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(kind)
            .or_default()
            .push(Arc::new(handler));
    }

    /// Invoke every handler currently registered for the event's kind.
    ///
    /// Stops at the first handler error and returns it.
    pub fn emit(&self, event: &BoardEvent) -> Result<(), CoreError> {
        let kind = event.kind();
        let handlers: Vec<Handler> = self
            .handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .cloned()
            .unwrap_or_default();

        trace!(%kind, handlers = handlers.len(), "emit");

        for handler in &handlers {
            handler(event)?;
        }
        Ok(())
    }

    /// Number of handlers registered for `kind`.
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .map_or(0, Vec::len)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let handlers = self.handlers.lock().unwrap_or_else(PoisonError::into_inner);
        let counts: HashMap<EventKind, usize> =
            handlers.iter().map(|(k, v)| (*k, v.len())).collect();
        f.debug_struct("EventBus").field("handlers", &counts).finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn recorder() -> (Arc<Mutex<Vec<String>>>, Arc<Mutex<Vec<String>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        (Arc::clone(&log), log)
    }

    #[test]
    fn emit_without_handlers_is_a_noop() {
        let bus = EventBus::new();
        assert!(bus.emit(&BoardEvent::NextClick).is_ok());
        assert_eq!(bus.handler_count(EventKind::NextClick), 0);
    }

    #[test]
    fn handlers_run_in_registration_order() {
        let bus = EventBus::new();
        let (log, handle) = recorder();

        for name in ["first", "second", "third"] {
            let log = Arc::clone(&log);
            bus.subscribe(EventKind::PrevClick, move |_| {
                log.lock().unwrap().push(name.to_owned());
                Ok(())
            });
        }

        bus.emit(&BoardEvent::PrevClick).unwrap();
        assert_eq!(*handle.lock().unwrap(), ["first", "second", "third"]);
    }

    #[test]
    fn only_matching_kind_fires() {
        let bus = EventBus::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        bus.subscribe(EventKind::NextClick, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        bus.emit(&BoardEvent::PrevClick).unwrap();
        bus.emit(&BoardEvent::dropdown("limit", "5")).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        bus.emit(&BoardEvent::NextClick).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn duplicate_registration_fires_twice() {
        let bus = EventBus::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let handler = move |_: &BoardEvent| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        };
        bus.subscribe(EventKind::NextClick, handler.clone());
        bus.subscribe(EventKind::NextClick, handler);

        bus.emit(&BoardEvent::NextClick).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert_eq!(bus.handler_count(EventKind::NextClick), 2);
    }

    #[test]
    fn handler_receives_payload() {
        let bus = EventBus::new();
        let (log, handle) = recorder();
        bus.subscribe(EventKind::DropdownChange, move |event| {
            if let BoardEvent::DropdownChange(change) = event {
                log.lock()
                    .unwrap()
                    .push(format!("{}={}", change.field, change.value));
            }
            Ok(())
        });

        bus.emit(&BoardEvent::dropdown("orderBy", "Z-A")).unwrap();
        assert_eq!(*handle.lock().unwrap(), ["orderBy=Z-A"]);
    }

    #[test]
    fn handler_error_stops_dispatch_and_propagates() {
        let bus = EventBus::new();
        let hits = Arc::new(AtomicUsize::new(0));

        bus.subscribe(EventKind::PrevClick, |_| {
            Err(CoreError::Internal("boom".into()))
        });
        let counter = Arc::clone(&hits);
        bus.subscribe(EventKind::PrevClick, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        let err = bus.emit(&BoardEvent::PrevClick).unwrap_err();
        assert!(matches!(err, CoreError::Internal(msg) if msg == "boom"));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn reentrant_emit_runs_nested_handlers_synchronously() {
        let bus = Arc::new(EventBus::new());
        let (log, handle) = recorder();

        let inner_log = Arc::clone(&log);
        bus.subscribe(EventKind::PrevClick, move |_| {
            inner_log.lock().unwrap().push("prev".into());
            Ok(())
        });

        let weak = Arc::downgrade(&bus);
        let outer_log = Arc::clone(&log);
        bus.subscribe(EventKind::NextClick, move |_| {
            outer_log.lock().unwrap().push("next:start".into());
            if let Some(bus) = weak.upgrade() {
                bus.emit(&BoardEvent::PrevClick)?;
            }
            outer_log.lock().unwrap().push("next:end".into());
            Ok(())
        });

        bus.emit(&BoardEvent::NextClick).unwrap();
        assert_eq!(*handle.lock().unwrap(), ["next:start", "prev", "next:end"]);
    }

    #[test]
    fn subscribe_during_emit_applies_to_later_emissions() {
        let bus = Arc::new(EventBus::new());
        let hits = Arc::new(AtomicUsize::new(0));

        let weak = Arc::downgrade(&bus);
        let counter = Arc::clone(&hits);
        bus.subscribe(EventKind::NextClick, move |_| {
            if let Some(bus) = weak.upgrade() {
                let counter = Arc::clone(&counter);
                bus.subscribe(EventKind::NextClick, move |_| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                });
            }
            Ok(())
        });

        bus.emit(&BoardEvent::NextClick).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(bus.handler_count(EventKind::NextClick), 2);

        bus.emit(&BoardEvent::NextClick).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn event_kind_names_match_wire_names() {
        assert_eq!(EventKind::DropdownChange.to_string(), "dropdownChange");
        assert_eq!(EventKind::PrevClick.to_string(), "prevClick");
        assert_eq!(EventKind::NextClick.to_string(), "nextClick");
    }
}
