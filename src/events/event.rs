//! # Runtime events emitted by the supervisor and lifecycle tasks.
//!
//! [`EventKind`] classifies events in three groups:
//! - **Process lifecycle**: starting, stopped, failed, force-kill escalation
//! - **Group shutdown**: shutdown requested, all processes stopped
//! - **Delivery**: subscriber overflow
//!
//! [`Event`] carries the metadata: wall-clock timestamp, monotonic sequence
//! number, optional process name and reason string.
//!
//! ## Ordering
//! Each event gets a globally unique `seq` that increases monotonically.
//! Subscribers can use it to restore publish order.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A process is being spawned.
    ///
    /// Sets: `proc`.
    ProcessStarting,

    /// A process run ended. Covers both expected stops and natural exits;
    /// `reason` carries the exit description when there is one.
    ///
    /// Sets: `proc`, optional `reason`.
    ProcessStopped,

    /// A process failed: spawn error or unexpected nonzero/signaled exit.
    ///
    /// Sets: `proc`, `reason`.
    ProcessFailed,

    /// The grace period expired and the process group is being force-killed.
    ///
    /// Sets: `proc`.
    GraceExceeded,

    /// Group shutdown was requested (OS signal, cancellation, or fatal policy).
    ///
    /// Sets: optional `reason` (signal name).
    ShutdownRequested,

    /// Every tracked process has exited.
    AllStopped,

    /// A subscriber queue dropped an event (full or closed).
    ///
    /// Sets: `proc` (subscriber name), `reason` ("full" / "closed").
    SubscriberOverflow,
}

/// A single runtime event with metadata.
#[derive(Debug, Clone)]
pub struct Event {
    /// What happened.
    pub kind: EventKind,
    /// Process (or subscriber) name, when the event concerns one.
    pub proc: Option<String>,
    /// Free-form detail: exit description, signal name, overflow cause.
    pub reason: Option<String>,
    /// Wall-clock timestamp taken at construction.
    pub at: SystemTime,
    /// Monotonic global sequence number.
    pub seq: u64,
}

impl Event {
    /// Creates an event stamped with the current time and the next sequence number.
    pub fn now(kind: EventKind) -> Self {
        Self {
            kind,
            proc: None,
            reason: None,
            at: SystemTime::now(),
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
        }
    }

    /// Attaches a process (or subscriber) name.
    pub fn with_proc(mut self, name: impl Into<String>) -> Self {
        self.proc = Some(name.into());
        self
    }

    /// Attaches a detail string.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Shorthand for the overflow event published by the subscriber set.
    pub(crate) fn subscriber_overflow(name: &'static str, cause: &'static str) -> Self {
        Event::now(EventKind::SubscriberOverflow)
            .with_proc(name)
            .with_reason(cause)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::now(EventKind::ProcessStarting);
        let b = Event::now(EventKind::ProcessStopped);
        let c = Event::now(EventKind::AllStopped);
        assert!(a.seq < b.seq);
        assert!(b.seq < c.seq);
    }

    #[test]
    fn test_builders_set_fields() {
        let ev = Event::now(EventKind::ProcessFailed)
            .with_proc("web2")
            .with_reason("exit code 1");
        assert_eq!(ev.kind, EventKind::ProcessFailed);
        assert_eq!(ev.proc.as_deref(), Some("web2"));
        assert_eq!(ev.reason.as_deref(), Some("exit code 1"));
    }
}
