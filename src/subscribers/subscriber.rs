//! # Event subscriber trait.
//!
//! [`Subscribe`] is the extension point for plugging observers (logging,
//! metrics, alerting) into the runtime.
//!
//! Each subscriber gets a dedicated worker task and a bounded queue, so a
//! slow subscriber only delays itself. See
//! [`SubscriberSet`](crate::subscribers::SubscriberSet) for delivery rules.

use async_trait::async_trait;

use crate::events::Event;

/// Event subscriber for runtime observability.
///
/// ### Implementation requirements
/// - Use async I/O; do not block the executor.
/// - Handle errors internally; do not panic.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Processes a single event.
    ///
    /// Called from a dedicated worker task, in FIFO order per subscriber.
    async fn on_event(&self, event: &Event);

    /// Subscriber name used in overflow/panic events.
    ///
    /// Prefer short names ("log", "metrics"); the default is the type name.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Bounded queue capacity for this subscriber (clamped to ≥ 1).
    fn queue_capacity(&self) -> usize {
        1024
    }
}
