//! Observable value container backed by a tokio [`watch`] channel.
//!
//! A [`Store`] holds the latest value of a cache and hands out receivers to
//! any number of consumers. Writers either replace the value wholesale or
//! patch it in place; every subscriber sees the new value on its next read.
//! Slow subscribers never block writers, they simply skip to the latest value.

use tokio::sync::watch;

/// Shared, observable cache slot.
#[derive(Debug)]
pub struct Store<T> {
    sender: watch::Sender<T>,
}

impl<T: Default> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Store<T> {
    /// Create a store holding `initial`.
    #[must_use]
    pub fn new(initial: T) -> Self {
        let (sender, _) = watch::channel(initial);
        Self { sender }
    }

    /// Subscribe to changes.
    ///
    /// The receiver can read the current value right away; `changed()`
    /// resolves on the next write.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.sender.subscribe()
    }

    /// Run `f` against the current value without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.sender.borrow())
    }

    /// Replace the value and notify every subscriber.
    pub fn replace(&self, value: T) {
        self.sender.send_replace(value);
    }

    /// Patch the value in place. Subscribers are notified only when `f`
    /// returns `true`.
    ///
    /// Returns whatever `f` returned.
    pub fn modify(&self, f: impl FnOnce(&mut T) -> bool) -> bool {
        self.sender.send_if_modified(f)
    }
}

impl<T: Clone> Store<T> {
    /// Clone the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.sender.borrow().clone()
    }
}
