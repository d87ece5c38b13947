//! # procvisor
//!
//! **Procvisor** is a lightweight process supervisor library for Rust.
//!
//! Given a set of named shell commands it spawns each as a child process,
//! tracks its lifecycle, serves start/stop/restart/list/dump requests from a
//! control channel, and coordinates a clean group shutdown when a policy
//! condition is met: a child fails (`exit_on_error`), every child exits
//! (`exit_on_stop`), an OS shutdown signal arrives, or the caller cancels.
//!
//! ## Architecture
//! ```text
//!   ProcessSeed ─► Registry ─────────────────────────────┐
//!                    │ one ProcessRecord per command     │
//!                    ▼                                   ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Supervisor (central event loop)                                  │
//! │  - Lifecycle (start / stop / restart, one record at a time)       │
//! │  - ExitBarrier (all-children-exited condition)                    │
//! │  - error channel (async spawn/exit failures)                      │
//! │  - Bus (broadcast events) + SubscriberSet (observer fan-out)      │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼                  ▼                  ▼
//!   ┌───────────┐     ┌───────────┐     ┌───────────┐
//!   │ child web1│     │ child web2│     │ child  …  │   (own process
//!   │ wait task │     │ wait task │     │ wait task │    group each)
//!   └┬──────────┘     └┬──────────┘     └┬──────────┘
//!    │ records outcome, clears pid, notifies exactly once,
//!    │ releases its barrier slot, forwards unexpected failures
//!    ▼
//!   Supervisor::run() selects over:
//!     error channel │ barrier at zero │ OS signals │ control requests │ cancel
//! ```
//!
//! ## Stop semantics
//! ```text
//! stop(name, signal)
//!   ├─► mark stopped_by_supervisor (expected exit, not a failure)
//!   ├─► Terminate::graceful ─► whole process group (POSIX pgid /
//!   │                          Windows console ctrl event)
//!   ├─► wait for the record's completion broadcast
//!   └─► grace period (default 10s) expired?
//!         ├─► Terminate::force_kill (SIGKILL / TerminateProcess)
//!         └─► keep waiting for the broadcast
//! ```
//!
//! ## Example
//! ```no_run
//! use tokio_util::sync::CancellationToken;
//! use procvisor::{
//!     Config, ControlHandle, ProcessSeed, Registry, Supervisor, shutdown,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = Registry::load([
//!         ProcessSeed::new("web", "python -m http.server $PORT").with_port(5000),
//!         ProcessSeed::new("worker", "./worker --queue jobs"),
//!     ])?;
//!
//!     let sup = Supervisor::new(Config::default(), registry, vec![]);
//!     let (_control, ctrl_rx) = ControlHandle::channel(16);
//!     let sig_rx = shutdown::notify_channel();
//!
//!     sup.run(sig_rx, ctrl_rx, CancellationToken::new()).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//! | Area            | Description                                            | Key types                              |
//! |-----------------|--------------------------------------------------------|----------------------------------------|
//! | **Supervision** | Spawn, track, and stop groups of shell commands.       | [`Supervisor`], [`Config`]             |
//! | **Data model**  | Named records, built once, reused across restarts.     | [`ProcessSeed`], [`Registry`]          |
//! | **Control**     | start/stop/restart/list/dump over a channel boundary.  | [`ControlHandle`], [`ControlVerb`]     |
//! | **Termination** | Platform strategy for group-wide graceful/forced stop. | [`Terminate`], [`StopSignal`]          |
//! | **Observers**   | Event hooks for logging/metrics.                       | [`Subscribe`], [`Event`]               |
//! | **Errors**      | Typed startup and runtime errors.                      | [`ConfigError`], [`ProcError`]         |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] for demos.


mod config;
mod control;
mod core;
mod error;
mod events;
mod output;
mod procs;
mod subscribers;
mod term;

pub use config::Config;
pub use control::{ControlHandle, ControlReply, ControlRequest, ControlVerb, UnknownVerb};
pub use crate::core::shutdown;
pub use crate::core::{ExitBarrier, Lifecycle, Supervisor};
pub use error::{ConfigError, ProcError};
pub use events::{Bus, Event, EventKind};
pub use output::Forwarder;
pub use procs::{ExitOutcome, ProcessRecord, ProcessSeed, Registry};
pub use subscribers::{Subscribe, SubscriberSet};
pub use term::{platform, StopSignal, Terminate};

#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
