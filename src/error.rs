//! Error types used by the procvisor runtime.
//!
//! Two families, split by phase:
//!
//! - [`ConfigError`] — raised while building the [`Registry`](crate::Registry),
//!   before anything is spawned. Always fatal to startup.
//! - [`ProcError`] — raised while supervising. Spawn and exit failures flow
//!   through the supervisor's async error channel; signal-delivery and
//!   force-kill failures are returned synchronously from `stop()`.
//!
//! Both types provide `as_label()` for stable snake_case identifiers in
//! logs/metrics.

use thiserror::Error;

/// Errors raised while building the process registry.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The seed list was empty; there is nothing to supervise.
    #[error("no valid process entries")]
    NoProcesses,

    /// Two seeds share a name; registry keys must be unique.
    #[error("duplicate process name: {name}")]
    DuplicateName {
        /// The repeated name.
        name: String,
    },

    /// A requested subset names a process that was never configured.
    #[error("unknown process: {name}")]
    UnknownProcess {
        /// The unrecognized name.
        name: String,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::NoProcesses => "config_no_processes",
            ConfigError::DuplicateName { .. } => "config_duplicate_name",
            ConfigError::UnknownProcess { .. } => "config_unknown_process",
        }
    }
}

/// Errors raised while supervising processes.
///
/// `Spawn` and `Exit` are asynchronous: the per-child wait task forwards them
/// to the supervisor's error channel, where policy (`exit_on_error`) decides
/// whether they are fatal. `Signal` and `Kill` come back synchronously from
/// `stop()` and are aggregated by `stop_all` (last one wins).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ProcError {
    /// A control request or lifecycle call named a record that is not registered.
    #[error("unknown process: {name}")]
    UnknownProcess {
        /// The unrecognized name.
        name: String,
    },

    /// The shell exec itself failed; the record stays idle.
    #[error("failed to spawn {name}: {source}")]
    Spawn {
        /// Record name.
        name: String,
        /// Underlying exec error.
        #[source]
        source: std::io::Error,
    },

    /// A child exited nonzero or on a signal without a supervisor-initiated stop.
    #[error("process {name} exited unexpectedly: {reason}")]
    Exit {
        /// Record name.
        name: String,
        /// Human-readable exit description (code or signal).
        reason: String,
    },

    /// Graceful signal delivery to the process group failed.
    #[error("failed to signal {name}: {source}")]
    Signal {
        /// Record name.
        name: String,
        /// Underlying delivery error.
        #[source]
        source: std::io::Error,
    },

    /// The forced kill after grace expiry failed.
    #[error("failed to kill {name}: {source}")]
    Kill {
        /// Record name.
        name: String,
        /// Underlying kill error.
        #[source]
        source: std::io::Error,
    },

    /// The control channel closed while a reply was pending.
    #[error("control channel closed")]
    ControlClosed,

    /// `run()` was called on a supervisor whose loop already started once.
    #[error("supervisor is already running")]
    AlreadyRunning,
}

impl ProcError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ProcError::UnknownProcess { .. } => "proc_unknown",
            ProcError::Spawn { .. } => "proc_spawn_failed",
            ProcError::Exit { .. } => "proc_exit_unexpected",
            ProcError::Signal { .. } => "proc_signal_failed",
            ProcError::Kill { .. } => "proc_kill_failed",
            ProcError::ControlClosed => "control_closed",
            ProcError::AlreadyRunning => "supervisor_already_running",
        }
    }

    /// The record this error concerns, when it concerns exactly one.
    pub fn proc_name(&self) -> Option<&str> {
        match self {
            ProcError::UnknownProcess { name }
            | ProcError::Spawn { name, .. }
            | ProcError::Exit { name, .. }
            | ProcError::Signal { name, .. }
            | ProcError::Kill { name, .. } => Some(name),
            ProcError::ControlClosed | ProcError::AlreadyRunning => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_labels_are_stable() {
        assert_eq!(ConfigError::NoProcesses.as_label(), "config_no_processes");
        let err = ConfigError::UnknownProcess {
            name: "web2".into(),
        };
        assert_eq!(err.as_label(), "config_unknown_process");
        assert_eq!(err.to_string(), "unknown process: web2");
    }

    #[test]
    fn test_proc_error_carries_name() {
        let err = ProcError::Exit {
            name: "web1".into(),
            reason: "exit code 1".into(),
        };
        assert_eq!(err.proc_name(), Some("web1"));
        assert_eq!(err.as_label(), "proc_exit_unexpected");
        assert_eq!(ProcError::ControlClosed.proc_name(), None);
    }
}
