//! # Non-blocking event fan-out to multiple subscribers.
//!
//! [`SubscriberSet`] distributes events to every registered [`Subscribe`]
//! implementation without blocking the publisher.
//!
//! ## Rules
//! - **Per-subscriber FIFO**: each subscriber sees events in publish order.
//! - **No cross-subscriber ordering**: one subscriber may lag another.
//! - **Overflow**: a full queue drops the event for that subscriber only and
//!   publishes [`EventKind::SubscriberOverflow`].
//! - **Panic isolation**: a panicking subscriber does not take down the
//!   runtime; its worker keeps processing subsequent events.

use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::events::{Bus, Event, EventKind};
use crate::subscribers::Subscribe;

/// Per-subscriber queue metadata.
struct Channel {
    name: &'static str,
    sender: mpsc::Sender<Arc<Event>>,
}

/// Fan-out coordinator: one bounded queue and one worker task per subscriber.
pub struct SubscriberSet {
    channels: Vec<Channel>,
    workers: Vec<JoinHandle<()>>,
    bus: Bus,
}

impl SubscriberSet {
    /// Creates the set and spawns one worker task per subscriber.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>, bus: Bus) -> Self {
        let mut channels = Vec::with_capacity(subs.len());
        let mut workers = Vec::with_capacity(subs.len());

        for sub in subs {
            let name = sub.name();
            let (tx, mut rx) = mpsc::channel::<Arc<Event>>(sub.queue_capacity().max(1));

            let worker = tokio::spawn(async move {
                while let Some(ev) = rx.recv().await {
                    // Panics are contained to this event; the worker lives on.
                    let fut = sub.on_event(ev.as_ref());
                    let _ = std::panic::AssertUnwindSafe(fut).catch_unwind().await;
                }
            });
            channels.push(Channel { name, sender: tx });
            workers.push(worker);
        }
        Self {
            channels,
            workers,
            bus,
        }
    }

    /// Emits an event to all subscribers without blocking.
    ///
    /// On a full or closed queue the event is dropped for that subscriber and
    /// a `SubscriberOverflow` is published — unless the event itself is an
    /// overflow notice, which is never re-reported.
    pub fn emit(&self, event: &Event) {
        let shared = Arc::new(event.clone());
        let is_overflow = matches!(shared.kind, EventKind::SubscriberOverflow);

        for channel in &self.channels {
            match channel.sender.try_send(Arc::clone(&shared)) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    if !is_overflow {
                        self.bus
                            .publish(Event::subscriber_overflow(channel.name, "full"));
                    }
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    if !is_overflow {
                        self.bus
                            .publish(Event::subscriber_overflow(channel.name, "closed"));
                    }
                }
            }
        }
    }

    /// Closes all queues and waits for the workers to drain.
    pub async fn shutdown(self) {
        drop(self.channels);
        for worker in self.workers {
            let _ = worker.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counter(Arc<AtomicUsize>);

    #[async_trait]
    impl Subscribe for Counter {
        async fn on_event(&self, _event: &Event) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
        fn name(&self) -> &'static str {
            "counter"
        }
    }

    #[tokio::test]
    async fn test_emit_reaches_every_subscriber() {
        let bus = Bus::new(8);
        let seen_a = Arc::new(AtomicUsize::new(0));
        let seen_b = Arc::new(AtomicUsize::new(0));
        let set = SubscriberSet::new(
            vec![
                Arc::new(Counter(seen_a.clone())),
                Arc::new(Counter(seen_b.clone())),
            ],
            bus,
        );

        set.emit(&Event::now(EventKind::AllStopped));
        set.emit(&Event::now(EventKind::ShutdownRequested));
        set.shutdown().await;

        assert_eq!(seen_a.load(Ordering::SeqCst), 2);
        assert_eq!(seen_b.load(Ordering::SeqCst), 2);
    }
}
