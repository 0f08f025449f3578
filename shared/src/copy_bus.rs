//! Fallback channel between [`copy_text`](crate::copy::copy_text) and the
//! manual copy dialog.
//!
//! The bus is an explicit value owned by the application root and handed to
//! both sides, instead of an ambient window-level event. Cloning it is cheap
//! and every clone talks to the same listener table.

use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::{Rc, Weak},
};

use serde::{Deserialize, Serialize};

/// Name of the fallback channel, used as a tag in log records.
pub const COPY_FALLBACK_EVENT: &str = "cpab:manual-copy-fallback";

/// Text the user has to copy by hand, plus the call site that asked for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualCopyPayload {
    /// Trimmed, non-empty text to present.
    pub text: String,
    /// Diagnostic tag of the call site, e.g. `AdminAuthFiles.userCode`.
    pub source: String,
}

/// Identity of one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Rc<dyn Fn(&ManualCopyPayload)>;

#[derive(Default)]
struct BusInner {
    listeners: RefCell<Vec<(ListenerId, Listener)>>,
    next_id: Cell<u64>,
}

impl BusInner {
    fn remove(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }
}

/// Single-threaded publish/subscribe channel for [`ManualCopyPayload`]s.
#[derive(Clone, Default)]
pub struct CopyFallbackBus {
    inner: Rc<BusInner>,
}

impl CopyFallbackBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `payload` synchronously to every current listener.
    ///
    /// Listeners are snapshotted before dispatch, so a listener may emit,
    /// subscribe or unsubscribe while it runs. Without listeners this is a
    /// no-op. Payloads with blank text are dropped.
    pub fn emit(&self, payload: ManualCopyPayload) {
        if payload.text.trim().is_empty() {
            tracing::debug!(
                event = COPY_FALLBACK_EVENT,
                source = %payload.source,
                "dropping manual copy payload with blank text"
            );
            return;
        }

        let snapshot: Vec<Listener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        if snapshot.is_empty() {
            tracing::debug!(
                event = COPY_FALLBACK_EVENT,
                source = %payload.source,
                "no manual copy listener mounted"
            );
            return;
        }

        for listener in snapshot {
            listener(&payload);
        }
    }

    /// Register `listener`. It stays registered until the returned
    /// [`CopySubscription`] is dropped or unsubscribed.
    ///
    /// Registering the same closure twice creates two independent listeners.
    pub fn subscribe<F>(&self, listener: F) -> CopySubscription
    where
        F: Fn(&ManualCopyPayload) + 'static,
    {
        let id = ListenerId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));

        CopySubscription {
            bus: Rc::downgrade(&self.inner),
            id: Some(id),
        }
    }

    /// Number of listeners currently registered.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }
}

impl PartialEq for CopyFallbackBus {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for CopyFallbackBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CopyFallbackBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Handle tying one listener's lifetime to its owner.
///
/// Removal uses the same [`ListenerId`] the registration produced, so a
/// handle can never detach some other listener.
#[must_use = "dropping the subscription unsubscribes the listener"]
pub struct CopySubscription {
    bus: Weak<BusInner>,
    id: Option<ListenerId>,
}

impl CopySubscription {
    /// Identity of the listener this handle owns.
    pub fn id(&self) -> Option<ListenerId> {
        self.id
    }

    /// Detach the listener now.
    pub fn unsubscribe(mut self) {
        self.detach();
    }

    fn detach(&mut self) {
        let Some(id) = self.id.take() else {
            return;
        };
        if let Some(inner) = self.bus.upgrade() {
            inner.remove(id);
        }
    }
}

impl Drop for CopySubscription {
    fn drop(&mut self) {
        self.detach();
    }
}

impl fmt::Debug for CopySubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CopySubscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(text: &str) -> ManualCopyPayload {
        ManualCopyPayload {
            text: text.to_string(),
            source: "test.bus".to_string(),
        }
    }

    fn recorder(bus: &CopyFallbackBus) -> (Rc<RefCell<Vec<String>>>, CopySubscription) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let sub = bus.subscribe(move |p| sink.borrow_mut().push(p.text.clone()));
        (seen, sub)
    }

    #[test]
    fn emit_without_listeners_is_noop() {
        let bus = CopyFallbackBus::new();
        bus.emit(payload("abc"));
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn fans_out_to_every_listener() {
        let bus = CopyFallbackBus::new();
        let (first, _a) = recorder(&bus);
        let (second, _b) = recorder(&bus);

        bus.emit(payload("abc-123"));

        assert_eq!(*first.borrow(), vec!["abc-123".to_string()]);
        assert_eq!(*second.borrow(), vec!["abc-123".to_string()]);
    }

    #[test]
    fn unsubscribe_removes_only_own_listener() {
        let bus = CopyFallbackBus::new();
        let (first, a) = recorder(&bus);
        let (second, _b) = recorder(&bus);

        a.unsubscribe();
        bus.emit(payload("after"));

        assert!(first.borrow().is_empty());
        assert_eq!(*second.borrow(), vec!["after".to_string()]);
        assert_eq!(bus.listener_count(), 1);
    }

    #[test]
    fn dropping_subscription_detaches() {
        let bus = CopyFallbackBus::new();
        {
            let (_seen, _sub) = recorder(&bus);
            assert_eq!(bus.listener_count(), 1);
        }
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn same_closure_twice_gets_distinct_ids() {
        let bus = CopyFallbackBus::new();
        let hits = Rc::new(Cell::new(0));
        let listener = {
            let hits = Rc::clone(&hits);
            move |_: &ManualCopyPayload| hits.set(hits.get() + 1)
        };
        let a = bus.subscribe(listener.clone());
        let b = bus.subscribe(listener);
        assert_ne!(a.id(), b.id());

        bus.emit(payload("x"));
        assert_eq!(hits.get(), 2);

        drop(a);
        bus.emit(payload("y"));
        assert_eq!(hits.get(), 3);
        drop(b);
    }

    #[test]
    fn blank_text_is_dropped() {
        let bus = CopyFallbackBus::new();
        let (seen, _sub) = recorder(&bus);
        bus.emit(payload("   "));
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn listener_may_reenter_the_bus() {
        let bus = CopyFallbackBus::new();
        let late = Rc::new(RefCell::new(None::<CopySubscription>));
        let seen = Rc::new(Cell::new(0));

        let _sub = {
            let bus_handle = bus.clone();
            let late = Rc::clone(&late);
            let seen = Rc::clone(&seen);
            bus.subscribe(move |_| {
                seen.set(seen.get() + 1);
                if late.borrow().is_none() {
                    let sub = bus_handle.subscribe(|_| {});
                    *late.borrow_mut() = Some(sub);
                }
            })
        };

        bus.emit(payload("first"));
        assert_eq!(seen.get(), 1);
        assert_eq!(bus.listener_count(), 2);
    }

    #[test]
    fn subscription_outliving_bus_is_harmless() {
        let bus = CopyFallbackBus::new();
        let (_seen, sub) = recorder(&bus);
        drop(bus);
        sub.unsubscribe();
    }
}
