//! POSIX termination: pgid resolution plus `kill`/`killpg`.

use std::io;

use nix::sys::signal::{kill, killpg, Signal};
use nix::unistd::{getpgid, Pid};

use super::{StopSignal, Terminate};

pub(super) struct UnixTerminator;

impl UnixTerminator {
    /// Signals the whole group when `pid` is its leader, the pid otherwise.
    ///
    /// Children are spawned with `process_group(0)`, so in practice the pid
    /// leads its group and the signal fans out to anything the command
    /// itself forked.
    fn deliver(&self, pid: u32, signal: Signal) -> io::Result<()> {
        let pid = Pid::from_raw(pid as i32);
        let result = match getpgid(Some(pid)) {
            Ok(pgid) if pgid == pid => killpg(pgid, signal),
            _ => kill(pid, signal),
        };
        result.map_err(|errno| io::Error::from_raw_os_error(errno as i32))
    }
}

impl Terminate for UnixTerminator {
    fn graceful(&self, pid: u32, signal: StopSignal) -> io::Result<()> {
        let signal = match signal {
            StopSignal::Interrupt => Signal::SIGINT,
            StopSignal::Terminate => Signal::SIGTERM,
            StopSignal::Hangup => Signal::SIGHUP,
            StopSignal::Quit => Signal::SIGQUIT,
        };
        self.deliver(pid, signal)
    }

    fn force_kill(&self, pid: u32) -> io::Result<()> {
        self.deliver(pid, Signal::SIGKILL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signaling_reaped_pid_errors() {
        // Pid far outside any plausible live range: delivery must report an
        // error, not panic.
        let term = UnixTerminator;
        assert!(term.graceful(u32::MAX / 2, StopSignal::Interrupt).is_err());
        assert!(term.force_kill(u32::MAX / 2).is_err());
    }
}
