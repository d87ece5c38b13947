//! # Platform termination strategy.
//!
//! [`Terminate`] is the only place in the crate that knows how an operating
//! system delivers a stop request to a process *and everything it spawned*.
//! The supervisor and lifecycle code hold an `Arc<dyn Terminate>` picked
//! once by [`platform()`] and contain no platform conditionals.
//!
//! - **unix**: resolve the process group; if the tracked pid leads its
//!   group, signal the whole group, otherwise the pid alone. Force kill is
//!   SIGKILL with the same group resolution.
//! - **windows**: children are created in their own console process group,
//!   so a CTRL_BREAK control event addressed to the pid reaches the group.
//!   Force kill is a direct `TerminateProcess`.

use std::io;
use std::sync::Arc;

#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

/// Logical stop signal, mapped per platform by the [`Terminate`] impl.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopSignal {
    /// SIGINT / Ctrl-C. The default graceful stop.
    #[default]
    Interrupt,
    /// SIGTERM.
    Terminate,
    /// SIGHUP.
    Hangup,
    /// SIGQUIT.
    Quit,
}

impl StopSignal {
    /// Stable lowercase name for events and logs.
    pub fn name(&self) -> &'static str {
        match self {
            StopSignal::Interrupt => "interrupt",
            StopSignal::Terminate => "terminate",
            StopSignal::Hangup => "hangup",
            StopSignal::Quit => "quit",
        }
    }
}

/// OS-specific delivery of graceful and forceful termination.
pub trait Terminate: Send + Sync + 'static {
    /// Delivers `signal` to the process and its descendants (group-wide when
    /// the pid leads its own group).
    fn graceful(&self, pid: u32, signal: StopSignal) -> io::Result<()>;

    /// Unconditionally and immediately terminates the process and its group.
    fn force_kill(&self, pid: u32) -> io::Result<()>;
}

/// Places a not-yet-spawned child in its own process group, so that
/// group-wide delivery by the [`Terminate`] impl reaches the command and
/// anything it forks.
pub fn put_in_own_group(cmd: &mut tokio::process::Command) {
    #[cfg(unix)]
    {
        cmd.process_group(0);
    }
    #[cfg(windows)]
    {
        use windows_sys::Win32::System::Threading::CREATE_NEW_PROCESS_GROUP;
        cmd.creation_flags(CREATE_NEW_PROCESS_GROUP);
    }
}

/// Selects the strategy for the compile-target platform.
pub fn platform() -> Arc<dyn Terminate> {
    #[cfg(unix)]
    {
        Arc::new(unix::UnixTerminator)
    }
    #[cfg(windows)]
    {
        Arc::new(windows::WindowsTerminator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_names() {
        assert_eq!(StopSignal::default(), StopSignal::Interrupt);
        assert_eq!(StopSignal::Terminate.name(), "terminate");
        assert_eq!(StopSignal::Hangup.name(), "hangup");
    }
}
