use std::cell::RefCell;
use std::fmt;

use async_channel::{Receiver, Sender, TrySendError, unbounded};
use log::warn;

/// A value that pushes every change to its subscribers.
///
/// Single-threaded: changes are made through `&self` and delivered over
/// unbounded channels, so a slow subscriber never blocks the writer.
pub(crate) struct Observable<T> {
    value: RefCell<T>,
    subscribers: RefCell<Vec<Sender<T>>>,
}

impl<T: Clone> Observable<T> {
    pub(crate) const fn new(value: T) -> Self {
        Self {
            value: RefCell::new(value),
            subscribers: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Read a part of the value without cloning all of it.
    pub(crate) fn with<R>(&self, read: impl FnOnce(&T) -> R) -> R {
        read(&self.value.borrow())
    }

    /// Subscribe to changes. The receiver starts with the current value.
    pub(crate) fn subscribe(&self) -> Receiver<T> {
        let (sender, receiver) = unbounded();
        // Unbounded and freshly created: cannot be full or closed.
        let _ = sender.try_send(self.get());
        self.subscribers.borrow_mut().push(sender);
        receiver
    }

    /// Mutate the value and publish the result.
    pub(crate) fn update(&self, change: impl FnOnce(&mut T)) {
        let current = {
            let mut value = self.value.borrow_mut();
            change(&mut value);
            value.clone()
        };
        self.publish(&current);
    }

    fn publish(&self, current: &T) {
        self.subscribers
            .borrow_mut()
            .retain(|sender| match sender.try_send(current.clone()) {
                Ok(()) => true,
                Err(TrySendError::Closed(_)) => false,
                Err(TrySendError::Full(_)) => {
                    warn!("dropping snapshot for a full subscriber");
                    true
                }
            });
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.value)
            .field("subscribers", &self.subscribers.borrow().len())
            .finish()
    }
}
