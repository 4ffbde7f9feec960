//! # Filter Notifications
//!
//! Before a filter pass changes any visibility in a target, a [`FilterEvent`] carrying
//! the found/hidden partition is dispatched for that target. Listeners can veto the
//! change with [`FilterEvent::prevent_default`].
//!
//! ## Dispatch Order
//!
//! Events bubble: listeners registered on the target run first, in registration order,
//! then document-level listeners. [`FilterEvent::stop_propagation`] ends dispatch, but
//! a veto already recorded still holds.
//!
//! ## Control Flow
//!
//! [`Notifier::notify`] returns `proceed`: `false` when a listener vetoed. The caller
//! skips the visibility step for that target only.

use crate::model::ItemId;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterEvent {
    name: String,
    target: String,
    found: Vec<ItemId>,
    hidden: Vec<ItemId>,
    #[serde(skip)]
    default_prevented: bool,
    #[serde(skip)]
    propagation_stopped: bool,
}

impl FilterEvent {
    pub fn new(
        name: impl Into<String>,
        target: impl Into<String>,
        found: Vec<ItemId>,
        hidden: Vec<ItemId>,
    ) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
            found,
            hidden,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn found(&self) -> &[ItemId] {
        &self.found
    }

    pub fn hidden(&self) -> &[ItemId] {
        &self.hidden
    }

    pub const fn bubbles(&self) -> bool {
        true
    }

    pub const fn cancelable(&self) -> bool {
        true
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }
}

pub trait FilterListener {
    fn handle(&mut self, event: &mut FilterEvent);
}

impl<F: FnMut(&mut FilterEvent)> FilterListener for F {
    fn handle(&mut self, event: &mut FilterEvent) {
        self(event)
    }
}

/// Where a listener is attached.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ListenerScope {
    Target(String),
    Document,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Registration {
    id: ListenerId,
    scope: ListenerScope,
    listener: Box<dyn FilterListener>,
}

pub struct Notifier {
    event_name: String,
    registrations: Vec<Registration>,
    next_id: u64,
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("event_name", &self.event_name)
            .field("listeners", &self.registrations.len())
            .finish()
    }
}

impl Notifier {
    pub fn new(event_name: impl Into<String>) -> Self {
        Self {
            event_name: event_name.into(),
            registrations: Vec::new(),
            next_id: 0,
        }
    }

    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    pub fn set_event_name(&mut self, name: impl Into<String>) {
        self.event_name = name.into();
    }

    pub fn listen<L: FilterListener + 'static>(
        &mut self,
        scope: ListenerScope,
        listener: L,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.registrations.push(Registration {
            id,
            scope,
            listener: Box::new(listener),
        });
        id
    }

    pub fn unlisten(&mut self, id: ListenerId) -> bool {
        let before = self.registrations.len();
        self.registrations.retain(|r| r.id != id);
        self.registrations.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.registrations.len()
    }

    /// Dispatches one event for `target` and returns whether to proceed.
    pub fn notify(&mut self, target: &str, found: &[ItemId], hidden: &[ItemId]) -> bool {
        let mut event = FilterEvent::new(
            self.event_name.clone(),
            target,
            found.to_vec(),
            hidden.to_vec(),
        );
        self.dispatch(&mut event);

        if event.is_default_prevented() {
            tracing::debug!(target_id = target, "filter notification cancelled");
        }
        !event.is_default_prevented()
    }

    fn dispatch(&mut self, event: &mut FilterEvent) {
        let target_scope = ListenerScope::Target(event.target.clone());
        for phase in [target_scope, ListenerScope::Document] {
            for registration in self.registrations.iter_mut().filter(|r| r.scope == phase) {
                registration.listener.handle(event);
                if event.propagation_stopped {
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_no_listeners_proceeds() {
        let mut notifier = Notifier::new("sieve-filter");
        assert!(notifier.notify("list", &[], &[]));
    }

    #[test]
    fn test_cancel_stops_proceeding() {
        let mut notifier = Notifier::new("sieve-filter");
        notifier.listen(ListenerScope::Document, |e: &mut FilterEvent| {
            e.prevent_default()
        });
        assert!(!notifier.notify("list", &[], &[]));
    }

    #[test]
    fn test_event_carries_partition() {
        let seen = Rc::new(RefCell::new(None));
        let sink = seen.clone();
        let mut notifier = Notifier::new("x-filter");
        notifier.listen(
            ListenerScope::Target("list".into()),
            move |e: &mut FilterEvent| {
                *sink.borrow_mut() = Some(e.clone());
            },
        );

        let found = vec![ItemId::new()];
        let hidden = vec![ItemId::new(), ItemId::new()];
        assert!(notifier.notify("list", &found, &hidden));

        let event = seen.borrow().clone().unwrap();
        assert_eq!(event.name(), "x-filter");
        assert_eq!(event.target(), "list");
        assert_eq!(event.found(), found.as_slice());
        assert_eq!(event.hidden(), hidden.as_slice());
        assert!(event.bubbles() && event.cancelable());
    }

    #[test]
    fn test_target_listeners_only_see_their_target() {
        let count = Rc::new(RefCell::new(0));
        let c = count.clone();
        let mut notifier = Notifier::new("f");
        notifier.listen(ListenerScope::Target("a".into()), move |e: &mut FilterEvent| {
            *c.borrow_mut() += 1;
            e.prevent_default();
        });

        assert!(!notifier.notify("a", &[], &[]));
        assert!(notifier.notify("b", &[], &[]));
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_bubbling_order_and_stop_propagation() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut notifier = Notifier::new("f");

        let o = order.clone();
        notifier.listen(ListenerScope::Document, move |_: &mut FilterEvent| {
            o.borrow_mut().push("document")
        });
        let o = order.clone();
        notifier.listen(ListenerScope::Target("a".into()), move |_: &mut FilterEvent| {
            o.borrow_mut().push("target")
        });

        notifier.notify("a", &[], &[]);
        assert_eq!(*order.borrow(), vec!["target", "document"]);

        let o = order.clone();
        let stopper = notifier.listen(
            ListenerScope::Target("a".into()),
            move |e: &mut FilterEvent| {
                o.borrow_mut().push("stopper");
                e.stop_propagation();
            },
        );
        order.borrow_mut().clear();
        notifier.notify("a", &[], &[]);
        assert_eq!(*order.borrow(), vec!["target", "stopper"]);

        assert!(notifier.unlisten(stopper));
        assert!(!notifier.unlisten(stopper));
    }
}
