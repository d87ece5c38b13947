//! # Supervisor: owns the registry and runs the central event loop.
//!
//! ## High-level architecture
//! ```text
//! Inputs:
//!   Registry (built from seeds, optionally filtered)
//!   sig_rx   — OS shutdown signals (shutdown::notify_channel, or a test channel)
//!   ctrl_rx  — decoded control requests (ControlHandle::channel)
//!   cancel   — external CancellationToken
//!
//! start_all():
//!   barrier.add(N) ──► lifecycle.start(record, tracked) for every record
//!
//! run() — one select loop, four event sources plus cancellation:
//!   ├─ err_rx: a child failed ──► exit_on_error ? stop_all + return err : keep looping
//!   ├─ barrier at zero        ──► exit_on_stop ? stop_all + return : keep looping
//!   ├─ sig_rx: OS signal      ──► stop_all(that signal), return its result
//!   ├─ ctrl_rx: request       ──► dispatch(verb, target), reply, keep looping
//!   └─ cancel fired           ──► stop_all(interrupt), return its result
//!
//! stop_all(signal):
//!   stop every active record in registry order; keep going past failures;
//!   return the last error encountered.
//! ```
//!
//! Everything observable flows over the [`Bus`]; a listener task fans events
//! out to the configured [`Subscribe`]rs via [`SubscriberSet`].

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::control::{ControlRequest, ControlVerb};
use crate::core::{barrier::ExitBarrier, lifecycle::Lifecycle};
use crate::error::ProcError;
use crate::events::{Bus, Event, EventKind};
use crate::procs::Registry;
use crate::subscribers::{Subscribe, SubscriberSet};
use crate::term::{self, StopSignal};

/// Async failures buffered between a child's exit and the loop observing it.
/// A full channel drops further reports rather than stalling child cleanup.
const ERROR_BUFFER: usize = 16;

/// Coordinates process lifecycles, policy decisions, and group shutdown.
pub struct Supervisor {
    cfg: Config,
    bus: Bus,
    subs: Arc<SubscriberSet>,
    registry: Registry,
    lifecycle: Lifecycle,
    barrier: ExitBarrier,
    err_rx: Mutex<Option<mpsc::Receiver<ProcError>>>,
}

impl Supervisor {
    /// Creates a supervisor over an already-built (and filtered) registry.
    pub fn new(cfg: Config, registry: Registry, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        let bus = Bus::new(cfg.bus_capacity);
        let subs = Arc::new(SubscriberSet::new(subscribers, bus.clone()));
        let (err_tx, err_rx) = mpsc::channel(ERROR_BUFFER);
        let lifecycle = Lifecycle::new(bus.clone(), err_tx, term::platform(), cfg.grace);

        Self {
            cfg,
            bus,
            subs,
            registry,
            lifecycle,
            barrier: ExitBarrier::new(),
            err_rx: Mutex::new(Some(err_rx)),
        }
    }

    /// The event bus, for additional ad hoc observers.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// The registry this supervisor owns.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Starts every active record concurrently, each tracked by the exit
    /// barrier. Spawn failures are reported through the error channel and
    /// judged by `run()`'s policy, not here.
    pub async fn start_all(&self) {
        self.barrier.add(self.registry.len());
        let starts = self
            .registry
            .iter()
            .map(|record| self.lifecycle.start(record, Some(self.barrier.clone())));
        let _ = futures::future::join_all(starts).await;
    }

    /// Runs the central event loop until a policy condition ends the group.
    ///
    /// `sig_rx` delivers OS shutdown signals (see
    /// [`shutdown::notify_channel`](crate::core::shutdown::notify_channel)),
    /// `ctrl_rx` delivers decoded control requests, and `cancel` is the
    /// external cancellation source; all three can be driven from tests.
    ///
    /// The first fatal condition becomes the return value and is meant to be
    /// the process's exit status. Can only be called once per supervisor.
    pub async fn run(
        &self,
        mut sig_rx: mpsc::Receiver<StopSignal>,
        mut ctrl_rx: mpsc::Receiver<ControlRequest>,
        cancel: CancellationToken,
    ) -> Result<(), ProcError> {
        let mut err_rx = self
            .err_rx
            .lock()
            .await
            .take()
            .ok_or(ProcError::AlreadyRunning)?;

        self.spawn_subscriber_listener();
        self.start_all().await;

        // The all-stopped condition fires once; afterwards the loop keeps
        // serving control requests (exit_on_stop = false).
        let mut watch_barrier = true;

        loop {
            tokio::select! {
                // A failing last child reports its error and releases its
                // barrier slot back to back; judge the failure before the
                // all-stopped condition when both are ready.
                biased;

                Some(err) = err_rx.recv() => {
                    if self.cfg.exit_on_error {
                        self.bus.publish(
                            Event::now(EventKind::ShutdownRequested)
                                .with_reason(err.as_label()),
                        );
                        let _ = self.stop_all(StopSignal::Interrupt).await;
                        return Err(err);
                    }
                }
                _ = self.barrier.wait_zero(), if watch_barrier => {
                    watch_barrier = false;
                    self.bus.publish(Event::now(EventKind::AllStopped));
                    if self.cfg.exit_on_stop {
                        return self.stop_all(StopSignal::Interrupt).await;
                    }
                }
                Some(sig) = sig_rx.recv() => {
                    self.bus.publish(
                        Event::now(EventKind::ShutdownRequested).with_reason(sig.name()),
                    );
                    return self.stop_all(sig).await;
                }
                Some(req) = ctrl_rx.recv() => {
                    let reply = self.dispatch(req.verb, req.target.as_deref()).await;
                    let _ = req.reply.send(reply);
                }
                _ = cancel.cancelled() => {
                    self.bus.publish(
                        Event::now(EventKind::ShutdownRequested).with_reason("cancelled"),
                    );
                    return self.stop_all(StopSignal::Interrupt).await;
                }
            }
        }
    }

    /// Stops every active record in registry order, continuing past
    /// individual failures. Returns the **last** error encountered — the
    /// documented aggregation policy.
    pub async fn stop_all(&self, signal: StopSignal) -> Result<(), ProcError> {
        let mut last = Ok(());
        for record in self.registry.iter() {
            if let Err(err) = self.lifecycle.stop(record, signal).await {
                last = Err(err);
            }
        }
        last
    }

    /// Synchronous dispatch entry point for the control plane.
    ///
    /// Single-process verbs reply with no payload; `list` and `dump` reply
    /// with newline-joined names. `dump` marks stopped records with a `#`
    /// prefix.
    pub async fn dispatch(
        &self,
        verb: ControlVerb,
        target: Option<&str>,
    ) -> Result<Option<String>, ProcError> {
        match verb {
            ControlVerb::Start => {
                let record = self.target_record(target)?;
                self.lifecycle.start(&record, None).await.map(|()| None)
            }
            ControlVerb::Stop => {
                let record = self.target_record(target)?;
                self.lifecycle
                    .stop(&record, StopSignal::default())
                    .await
                    .map(|()| None)
            }
            ControlVerb::Restart => {
                let record = self.target_record(target)?;
                self.lifecycle.restart(&record).await.map(|()| None)
            }
            ControlVerb::List => Ok(Some(self.registry.names().join("\n"))),
            ControlVerb::Dump => {
                let mut lines = Vec::with_capacity(self.registry.len());
                for record in self.registry.iter() {
                    if record.is_running().await {
                        lines.push(record.name().to_string());
                    } else {
                        lines.push(format!("#{}", record.name()));
                    }
                }
                Ok(Some(lines.join("\n")))
            }
        }
    }

    fn target_record(
        &self,
        target: Option<&str>,
    ) -> Result<Arc<crate::procs::ProcessRecord>, ProcError> {
        let name = target.unwrap_or_default();
        self.registry.find(name).ok_or_else(|| ProcError::UnknownProcess {
            name: name.to_string(),
        })
    }

    /// Forwards bus events to the subscriber set, fire-and-forget.
    fn spawn_subscriber_listener(&self) {
        let mut rx = self.bus.subscribe();
        let subs = Arc::clone(&self.subs);
        tokio::spawn(async move {
            while let Ok(ev) = rx.recv().await {
                subs.emit(&ev);
            }
        });
    }
}
