//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a terse human-readable format:
//!
//! ```text
//! [starting] proc=web1
//! [stopped] proc=web1 reason="exit code 0"
//! [failed] proc=web2 reason="exit code 1"
//! [grace-exceeded] proc=web3
//! [shutdown-requested] reason="interrupt"
//! [all-stopped]
//! ```
//!
//! Enabled via the `logging` feature. Not intended for production use —
//! implement a custom [`Subscribe`] for structured logging or metrics.

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Stdout logging subscriber.
#[derive(Default)]
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let proc = e.proc.as_deref().unwrap_or("-");
        match e.kind {
            EventKind::ProcessStarting => println!("[starting] proc={proc}"),
            EventKind::ProcessStopped => match &e.reason {
                Some(r) => println!("[stopped] proc={proc} reason={r:?}"),
                None => println!("[stopped] proc={proc}"),
            },
            EventKind::ProcessFailed => {
                println!("[failed] proc={proc} reason={:?}", e.reason.as_deref());
            }
            EventKind::GraceExceeded => println!("[grace-exceeded] proc={proc}"),
            EventKind::ShutdownRequested => {
                println!("[shutdown-requested] reason={:?}", e.reason.as_deref());
            }
            EventKind::AllStopped => println!("[all-stopped]"),
            EventKind::SubscriberOverflow => {
                println!("[overflow] sub={proc} reason={:?}", e.reason.as_deref());
            }
        }
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
