//! # ExitBarrier: the all-children-exited condition.
//!
//! A counting barrier over [`tokio::sync::watch`]: the supervisor registers
//! one slot per tracked record before spawning, each record's wait task
//! releases its slot when the run ends for good, and the event loop awaits
//! the count reaching zero.
//!
//! ## Rules
//! - Register slots (`add`) before anyone awaits `wait_zero`; a barrier with
//!   no slots reports "all stopped" immediately.
//! - Control-plane starts and restarts run untracked — they neither add nor
//!   release slots, so the condition refers to the originally started set.

use tokio::sync::watch;

/// Cheap-to-clone counting barrier.
#[derive(Clone, Debug)]
pub struct ExitBarrier {
    tx: watch::Sender<usize>,
}

impl ExitBarrier {
    /// Creates a barrier with zero slots.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx }
    }

    /// Registers `n` additional slots.
    pub fn add(&self, n: usize) {
        self.tx.send_modify(|count| *count += n);
    }

    /// Releases one slot. Saturates at zero.
    pub fn done(&self) {
        self.tx.send_modify(|count| *count = count.saturating_sub(1));
    }

    /// Current number of outstanding slots.
    pub fn remaining(&self) -> usize {
        *self.tx.borrow()
    }

    /// Completes once the count is zero (immediately if it already is).
    pub async fn wait_zero(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in self, so wait_for can only fail after drop.
        let _ = rx.wait_for(|count| *count == 0).await;
    }
}

impl Default for ExitBarrier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_empty_barrier_is_already_zero() {
        let barrier = ExitBarrier::new();
        tokio::time::timeout(Duration::from_millis(50), barrier.wait_zero())
            .await
            .expect("empty barrier must not block");
    }

    #[tokio::test]
    async fn test_waits_for_all_slots() {
        let barrier = ExitBarrier::new();
        barrier.add(2);
        assert_eq!(barrier.remaining(), 2);

        let waiter = {
            let barrier = barrier.clone();
            tokio::spawn(async move { barrier.wait_zero().await })
        };

        barrier.done();
        assert_eq!(barrier.remaining(), 1);
        assert!(!waiter.is_finished());

        barrier.done();
        tokio::time::timeout(Duration::from_millis(100), waiter)
            .await
            .expect("barrier must release at zero")
            .unwrap();
    }

    #[tokio::test]
    async fn test_done_saturates() {
        let barrier = ExitBarrier::new();
        barrier.done();
        assert_eq!(barrier.remaining(), 0);
    }
}
