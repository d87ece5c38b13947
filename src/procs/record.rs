//! # ProcessRecord: the persistent supervisory record for one command.
//!
//! A record is created once at startup and lives for the whole supervisor
//! run; restarts reuse it. The mutable part — the live pid, the
//! supervisor-initiated-stop flag, and the last exit outcome — sits behind
//! one `tokio::sync::Mutex`, and a paired [`Notify`] is broadcast **exactly
//! once** per completed run of the child.
//!
//! ## Rules
//! - `pid` is `Some` if and only if an OS process for this record is alive.
//! - The broadcast happens strictly *after* `pid` is cleared and the exit
//!   outcome recorded: a woken waiter always observes a fully stopped child.
//! - Fields are only mutated with the record's own lock held; records are
//!   independent, so operations on different processes never contend.

use std::process::ExitStatus;

use tokio::sync::{Mutex, MutexGuard, Notify};

use crate::procs::ProcessSeed;

/// Outcome of one completed child run, retained for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    /// Exited with status 0.
    Clean,
    /// Exited with a nonzero status code.
    Code(i32),
    /// Terminated by a signal (unix) or without a code.
    Signaled(i32),
}

impl ExitOutcome {
    /// Classifies a wait result.
    pub fn from_status(status: ExitStatus) -> Self {
        match status.code() {
            Some(0) => ExitOutcome::Clean,
            Some(code) => ExitOutcome::Code(code),
            None => {
                #[cfg(unix)]
                {
                    use std::os::unix::process::ExitStatusExt;
                    ExitOutcome::Signaled(status.signal().unwrap_or(0))
                }
                #[cfg(not(unix))]
                ExitOutcome::Signaled(0)
            }
        }
    }

    /// True for a zero exit status.
    pub fn is_success(&self) -> bool {
        matches!(self, ExitOutcome::Clean)
    }

    /// Human-readable description used in events and errors.
    pub fn describe(&self) -> String {
        match self {
            ExitOutcome::Clean => "exit code 0".to_string(),
            ExitOutcome::Code(code) => format!("exit code {code}"),
            ExitOutcome::Signaled(sig) => format!("signal {sig}"),
        }
    }
}

/// Mutable per-record state, guarded by the record's mutex.
#[derive(Debug, Default)]
pub(crate) struct ProcState {
    /// Pid of the live child; `Some` iff the process is currently running.
    pub pid: Option<u32>,
    /// True exactly while a supervisor-initiated stop is outstanding;
    /// distinguishes expected exits from failures.
    pub stopped_by_supervisor: bool,
    /// Last termination outcome, kept across restarts for diagnostics.
    pub last_exit: Option<ExitOutcome>,
}

/// The persistent supervisory record for one configured command.
#[derive(Debug)]
pub struct ProcessRecord {
    name: String,
    cmdline: String,
    port: Option<u16>,
    color_index: usize,
    state: Mutex<ProcState>,
    done: Notify,
}

impl ProcessRecord {
    /// Builds a record from a seed; `color_index` is a cosmetic ordering
    /// token handed to the output forwarder.
    pub(crate) fn new(seed: ProcessSeed, color_index: usize) -> Self {
        Self {
            name: seed.name,
            cmdline: seed.cmdline,
            port: seed.port,
            color_index,
            state: Mutex::new(ProcState::default()),
            done: Notify::new(),
        }
    }

    /// Registry key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shell command text.
    pub fn cmdline(&self) -> &str {
        &self.cmdline
    }

    /// Port exported to the child as `PORT`, when assigned.
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Cosmetic color slot for log output.
    pub fn color_index(&self) -> usize {
        self.color_index
    }

    /// Whether an OS process for this record is currently alive.
    pub async fn is_running(&self) -> bool {
        self.state.lock().await.pid.is_some()
    }

    /// The outcome of the most recently completed run, if any.
    pub async fn last_exit(&self) -> Option<ExitOutcome> {
        self.state.lock().await.last_exit
    }

    /// Locks the mutable state. Lifecycle-internal.
    pub(crate) async fn lock(&self) -> MutexGuard<'_, ProcState> {
        self.state.lock().await
    }

    /// The exactly-once-per-run completion notifier. Lifecycle-internal.
    pub(crate) fn done(&self) -> &Notify {
        &self.done
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_describe() {
        assert_eq!(ExitOutcome::Clean.describe(), "exit code 0");
        assert_eq!(ExitOutcome::Code(2).describe(), "exit code 2");
        assert_eq!(ExitOutcome::Signaled(9).describe(), "signal 9");
        assert!(ExitOutcome::Clean.is_success());
        assert!(!ExitOutcome::Code(1).is_success());
    }

    #[tokio::test]
    async fn test_fresh_record_is_idle() {
        let rec = ProcessRecord::new(ProcessSeed::new("web", "sleep 1"), 0);
        assert!(!rec.is_running().await);
        assert_eq!(rec.last_exit().await, None);
        assert_eq!(rec.name(), "web");
    }
}
