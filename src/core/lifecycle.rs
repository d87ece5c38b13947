//! # Lifecycle: the per-record state machine.
//!
//! One record walks `Idle → Starting → Running → Stopping → Idle` per run,
//! and a record is reusable across runs. The moving parts:
//!
//! ```text
//! start()                         stop(signal)
//!   │ spawn `sh -c cmdline`          │ pid present? mark stopped_by_supervisor
//!   │ own process group              │ register completion interest
//!   │ PORT env, piped output         │ Terminate::graceful(group, signal)
//!   │ store pid                      │ wait ──────────┬─ grace expired:
//!   └─► wait task (one per child)    │                │  Terminate::force_kill
//!         child.wait().await         │                │  keep waiting
//!         lock → record outcome,     ◄────────────────┘
//!         clear pid, classify exit,
//!         notify exactly once
//! ```
//!
//! ## Rules
//! - The broadcast fires strictly after the pid is cleared and the outcome
//!   recorded; a woken waiter always observes a fully stopped child.
//! - An exit with `stopped_by_supervisor` set is expected and swallowed;
//!   any other nonzero/signaled exit goes to the supervisor's error channel
//!   (`try_send`: a full channel drops the report rather than stalling the
//!   child's cleanup).
//! - A second stop while one is outstanding waits for the same broadcast
//!   without signalling again.

use std::io;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use tokio::process::Command;
use tokio::sync::mpsc;

use crate::core::barrier::ExitBarrier;
use crate::error::ProcError;
use crate::events::{Bus, Event, EventKind};
use crate::output::Forwarder;
use crate::procs::{ExitOutcome, ProcessRecord};
use crate::term::{self, StopSignal, Terminate};

/// Operations on a single record, sharing the supervisor's collaborators.
#[derive(Clone)]
pub struct Lifecycle {
    bus: Bus,
    err_tx: mpsc::Sender<ProcError>,
    terminator: Arc<dyn Terminate>,
    grace: Duration,
}

impl Lifecycle {
    pub(crate) fn new(
        bus: Bus,
        err_tx: mpsc::Sender<ProcError>,
        terminator: Arc<dyn Terminate>,
        grace: Duration,
    ) -> Self {
        Self {
            bus,
            err_tx,
            terminator,
            grace,
        }
    }

    /// Spawns the record's command. No-op if it is already running.
    ///
    /// On success the child runs in its own process group with `PORT` set
    /// when the record carries one, stdout/stderr forwarded line-wise, and a
    /// dedicated wait task parked on its exit. A `barrier` slot, when given,
    /// is released once that run ends (or right here on spawn failure).
    pub async fn start(
        &self,
        record: &Arc<ProcessRecord>,
        barrier: Option<ExitBarrier>,
    ) -> Result<(), ProcError> {
        let mut state = record.lock().await;
        if state.pid.is_some() {
            if let Some(barrier) = barrier {
                barrier.done();
            }
            return Ok(());
        }

        self.bus
            .publish(Event::now(EventKind::ProcessStarting).with_proc(record.name()));

        let mut child = match self.command(record).spawn() {
            Ok(child) => child,
            Err(err) => {
                drop(state);
                if let Some(barrier) = barrier {
                    barrier.done();
                }
                return Err(self.report_spawn_failure(record.name(), err));
            }
        };

        // id() is only None once the child has been reaped; right after
        // spawn that means it already exited, and the wait task below will
        // record the outcome.
        state.pid = child.id();
        state.stopped_by_supervisor = false;
        drop(state);

        let forwarder = Forwarder::new(record.name(), record.color_index());
        if let Some(stdout) = child.stdout.take() {
            forwarder.pipe(stdout);
        }
        if let Some(stderr) = child.stderr.take() {
            forwarder.pipe(stderr);
        }

        let record = Arc::clone(record);
        let bus = self.bus.clone();
        let err_tx = self.err_tx.clone();
        tokio::spawn(async move {
            let outcome = match child.wait().await {
                Ok(status) => ExitOutcome::from_status(status),
                // The OS wait itself failed; nothing more to learn about the child.
                Err(_) => ExitOutcome::Signaled(0),
            };

            let mut state = record.lock().await;
            state.last_exit = Some(outcome);
            state.pid = None;
            let expected = state.stopped_by_supervisor;
            // Broadcast strictly after the pid is cleared and the outcome
            // recorded: exactly once per run.
            record.done().notify_waiters();
            drop(state);

            if expected || outcome.is_success() {
                bus.publish(
                    Event::now(EventKind::ProcessStopped)
                        .with_proc(record.name())
                        .with_reason(outcome.describe()),
                );
            } else {
                bus.publish(
                    Event::now(EventKind::ProcessFailed)
                        .with_proc(record.name())
                        .with_reason(outcome.describe()),
                );
                let _ = err_tx.try_send(ProcError::Exit {
                    name: record.name().to_string(),
                    reason: outcome.describe(),
                });
            }

            if let Some(barrier) = barrier {
                barrier.done();
            }
        });

        Ok(())
    }

    /// Stops the record's child: graceful signal to the process group, then
    /// a forced kill if the grace period expires. No-op Ok when idle.
    ///
    /// Blocks the caller until the child's wait task broadcasts completion.
    /// Returns the signal-delivery error if delivery failed, else the
    /// force-kill error if the kill itself failed; grace expiry alone is not
    /// an error.
    pub async fn stop(
        &self,
        record: &Arc<ProcessRecord>,
        signal: StopSignal,
    ) -> Result<(), ProcError> {
        let mut state = record.lock().await;
        let Some(pid) = state.pid else {
            return Ok(());
        };
        let already_stopping = state.stopped_by_supervisor;
        state.stopped_by_supervisor = true;

        // Interest in the broadcast must be registered before the lock is
        // released, or the wait task could notify in between.
        let notified = record.done().notified();
        tokio::pin!(notified);
        notified.as_mut().enable();
        drop(state);

        let mut delivery: Result<(), ProcError> = Ok(());
        if !already_stopping {
            if let Err(source) = self.terminator.graceful(pid, signal) {
                delivery = Err(ProcError::Signal {
                    name: record.name().to_string(),
                    source,
                });
            }
        }

        let grace = tokio::time::sleep(self.grace);
        tokio::pin!(grace);
        let mut kill_failure: Option<ProcError> = None;

        tokio::select! {
            _ = notified.as_mut() => {}
            _ = &mut grace => {
                // Escalate only if the child is genuinely still up; the
                // timer can race the broadcast.
                if record.lock().await.pid.is_some() {
                    self.bus.publish(
                        Event::now(EventKind::GraceExceeded).with_proc(record.name()),
                    );
                    if let Err(source) = self.terminator.force_kill(pid) {
                        kill_failure = Some(ProcError::Kill {
                            name: record.name().to_string(),
                            source,
                        });
                    }
                }
                notified.await;
            }
        }

        match kill_failure {
            Some(err) if delivery.is_ok() => Err(err),
            _ => delivery,
        }
    }

    /// Sequential stop-then-start. Not atomic: the record is observably idle
    /// between the two halves.
    pub async fn restart(&self, record: &Arc<ProcessRecord>) -> Result<(), ProcError> {
        self.stop(record, StopSignal::default()).await?;
        self.start(record, None).await
    }

    /// Builds the shell invocation for a record.
    fn command(&self, record: &ProcessRecord) -> Command {
        #[cfg(unix)]
        let mut cmd = {
            let mut cmd = Command::new("/bin/sh");
            cmd.arg("-c").arg(record.cmdline());
            cmd
        };
        #[cfg(windows)]
        let mut cmd = {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(record.cmdline());
            cmd
        };

        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(port) = record.port() {
            cmd.env("PORT", port.to_string());
        }
        term::put_in_own_group(&mut cmd);
        cmd
    }

    /// Publishes and forwards a spawn failure, returning the caller's copy.
    fn report_spawn_failure(&self, name: &str, err: io::Error) -> ProcError {
        self.bus.publish(
            Event::now(EventKind::ProcessFailed)
                .with_proc(name)
                .with_reason(err.to_string()),
        );
        let _ = self.err_tx.try_send(ProcError::Spawn {
            name: name.to_string(),
            source: io::Error::new(err.kind(), err.to_string()),
        });
        ProcError::Spawn {
            name: name.to_string(),
            source: err,
        }
    }
}
