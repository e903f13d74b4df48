use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::trace;

/// Stream a listener is registered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListenerChannel {
    Crosshair,
    Toggle,
    Timeframe,
}

/// Handle returned by every `on_*` registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId {
    channel: ListenerChannel,
    raw: u64,
}

impl ListenerId {
    #[must_use]
    pub const fn channel(self) -> ListenerChannel {
        self.channel
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.raw
    }
}

pub type Listener<E> = Rc<dyn Fn(&E)>;

/// Ordered set of listeners for one channel.
///
/// `snapshot` copies the current list, so callers can release any borrow on
/// the registry before invoking listeners that may register or remove others.
pub struct ListenerRegistry<E> {
    channel: ListenerChannel,
    entries: Vec<(ListenerId, Listener<E>)>,
    next_raw: u64,
}

impl<E> fmt::Debug for ListenerRegistry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("channel", &self.channel)
            .field("listeners", &self.entries.len())
            .finish()
    }
}

impl<E> ListenerRegistry<E> {
    #[must_use]
    pub fn new(channel: ListenerChannel) -> Self {
        Self {
            channel,
            entries: Vec::new(),
            next_raw: 1,
        }
    }

    #[must_use]
    pub fn channel(&self) -> ListenerChannel {
        self.channel
    }

    pub fn add(&mut self, listener: impl Fn(&E) + 'static) -> ListenerId {
        let id = ListenerId {
            channel: self.channel,
            raw: self.next_raw,
        };
        self.next_raw = self.next_raw.saturating_add(1);
        self.entries.push((id, Rc::new(listener)));
        trace!(channel = ?self.channel, listener = id.raw, "listener added");
        id
    }

    /// Returns `false` for an unknown id or one from another channel.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        if id.channel != self.channel {
            return false;
        }
        let Some(position) = self.entries.iter().position(|(entry, _)| *entry == id) else {
            return false;
        };
        self.entries.remove(position);
        trace!(channel = ?self.channel, listener = id.raw, "listener removed");
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn snapshot(&self) -> SmallVec<[Listener<E>; 4]> {
        self.entries
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect()
    }

    /// Calls every listener in registration order; returns how many ran.
    pub fn emit(&self, event: &E) -> usize {
        let listeners = self.snapshot();
        for listener in &listeners {
            listener(event);
        }
        listeners.len()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::{ListenerChannel, ListenerRegistry};

    #[test]
    fn emits_in_registration_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut registry = ListenerRegistry::<u32>::new(ListenerChannel::Toggle);
        for tag in ["a", "b"] {
            let seen = Rc::clone(&seen);
            registry.add(move |value: &u32| seen.borrow_mut().push(format!("{tag}{value}")));
        }
        assert_eq!(registry.emit(&7), 2);
        assert_eq!(*seen.borrow(), vec!["a7".to_owned(), "b7".to_owned()]);
    }

    #[test]
    fn remove_checks_channel() {
        let mut toggles = ListenerRegistry::<()>::new(ListenerChannel::Toggle);
        let mut frames = ListenerRegistry::<()>::new(ListenerChannel::Timeframe);
        let id = toggles.add(|_| {});
        frames.add(|_| {});

        assert!(!frames.remove(id));
        assert!(toggles.remove(id));
        assert!(!toggles.remove(id));
        assert!(toggles.is_empty());
        assert_eq!(frames.len(), 1);
    }

    #[test]
    fn listener_can_unregister_itself_during_emit() {
        let registry = Rc::new(RefCell::new(ListenerRegistry::<()>::new(
            ListenerChannel::Crosshair,
        )));
        let own_id = Rc::new(RefCell::new(None));
        let id = {
            let registry_for_listener = Rc::clone(&registry);
            let own_id = Rc::clone(&own_id);
            registry.borrow_mut().add(move |_| {
                if let Some(id) = *own_id.borrow() {
                    registry_for_listener.borrow_mut().remove(id);
                }
            })
        };
        *own_id.borrow_mut() = Some(id);

        let listeners = registry.borrow().snapshot();
        for listener in &listeners {
            listener(&());
        }
        assert!(registry.borrow().is_empty());
    }
}
