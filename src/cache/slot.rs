//! Single-assignment result slot
//!
//! Written once by the fetcher, read by any number of waiters. Built on a
//! `watch` channel so a waiter that subscribes after the value was published
//! still sees it.

use tokio::sync::watch;

use crate::error::SlotError;

#[derive(Debug)]
pub struct ResultSlot<T> {
    tx: watch::Sender<Option<T>>,
}

impl<T: Clone> Default for ResultSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> ResultSlot<T> {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Publish the value. Fails if the slot already holds one.
    pub fn set(&self, value: T) -> Result<(), SlotError> {
        let mut value = Some(value);
        let stored = self.tx.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = value.take();
            true
        });

        if stored {
            Ok(())
        } else {
            Err(SlotError::AlreadySet)
        }
    }

    #[cfg(test)]
    pub fn is_set(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// Current value without waiting
    #[cfg(test)]
    pub fn get(&self) -> Option<T> {
        self.tx.borrow().clone()
    }

    /// Wait until the value is published.
    ///
    /// Returns `None` only if the channel closed, which cannot happen while
    /// the slot itself is alive.
    pub async fn wait(&self) -> Option<T> {
        let mut rx = self.tx.subscribe();
        let value = match rx.wait_for(Option::is_some).await {
            Ok(value) => (*value).clone(),
            Err(_) => None,
        };
        value
    }
}
