//! Listener registration for layout and collection notifications.

use std::rc::Rc;

/// Notifications the host reacts to by re-querying layout outputs and
/// scheduling another layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutEvent {
    /// Extent, viewport or offset changed.
    ScrollInfoInvalidated,
    /// The realized window is stale and a measure pass is needed.
    MeasureInvalidated,
}

pub type ListenerId = u64;

/// Callback registry keyed by [`ListenerId`].
pub(crate) struct Listeners<E: ?Sized> {
    callbacks: Vec<(ListenerId, Rc<dyn Fn(&E)>)>,
    next_id: ListenerId,
}

impl<E: ?Sized> Default for Listeners<E> {
    fn default() -> Self {
        Self {
            callbacks: Vec::new(),
            next_id: 1,
        }
    }
}

impl<E: ?Sized> Listeners<E> {
    pub(crate) fn add(&mut self, callback: Rc<dyn Fn(&E)>) -> ListenerId {
        let id = self.next_id;
        self.next_id += 1;
        self.callbacks.push((id, callback));
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(cb_id, _)| *cb_id != id);
        self.callbacks.len() != before
    }

    pub(crate) fn notify(&self, event: &E) {
        // Snapshot so a callback may register or remove listeners.
        let callbacks: Vec<_> = self
            .callbacks
            .iter()
            .map(|(_, cb)| Rc::clone(cb))
            .collect();
        for callback in callbacks {
            callback(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn removed_listener_is_not_called() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut listeners: Listeners<LayoutEvent> = Listeners::default();

        let first = {
            let seen = Rc::clone(&seen);
            listeners.add(Rc::new(move |event: &LayoutEvent| {
                seen.borrow_mut().push(("first", *event))
            }))
        };
        {
            let seen = Rc::clone(&seen);
            listeners.add(Rc::new(move |event: &LayoutEvent| {
                seen.borrow_mut().push(("second", *event))
            }));
        }

        assert!(listeners.remove(first));
        listeners.notify(&LayoutEvent::MeasureInvalidated);

        assert_eq!(
            *seen.borrow(),
            vec![("second", LayoutEvent::MeasureInvalidated)]
        );
    }
}
