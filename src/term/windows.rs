//! Windows termination: console control events plus `TerminateProcess`.
//!
//! Children are spawned with `CREATE_NEW_PROCESS_GROUP`, which makes the
//! child's pid double as its console process-group id, so a CTRL_BREAK
//! event addressed to that pid reaches the command and its children.

use std::io;

use windows_sys::Win32::Foundation::CloseHandle;
use windows_sys::Win32::System::Console::{
    AttachConsole, FreeConsole, GenerateConsoleCtrlEvent, SetConsoleCtrlHandler, CTRL_BREAK_EVENT,
};
use windows_sys::Win32::System::Threading::{OpenProcess, TerminateProcess, PROCESS_TERMINATE};

use super::{StopSignal, Terminate};

pub(super) struct WindowsTerminator;

impl Terminate for WindowsTerminator {
    fn graceful(&self, pid: u32, _signal: StopSignal) -> io::Result<()> {
        // There is no per-signal distinction on the console transport; every
        // logical stop maps to CTRL_BREAK, which unlike CTRL_C can be
        // addressed to a single process group.
        unsafe {
            // Attach to the target's console so the control event can be
            // generated, shielding ourselves from receiving it.
            FreeConsole();
            if AttachConsole(pid) == 0 {
                return Err(io::Error::last_os_error());
            }
            SetConsoleCtrlHandler(None, 1);
            let sent = GenerateConsoleCtrlEvent(CTRL_BREAK_EVENT, pid);
            // Capture the failure before the console teardown clobbers it.
            let failure = (sent == 0).then(io::Error::last_os_error);
            FreeConsole();
            SetConsoleCtrlHandler(None, 0);
            if let Some(err) = failure {
                return Err(err);
            }
        }
        Ok(())
    }

    fn force_kill(&self, pid: u32) -> io::Result<()> {
        unsafe {
            let handle = OpenProcess(PROCESS_TERMINATE, 0, pid);
            if handle.is_null() {
                return Err(io::Error::last_os_error());
            }
            let ok = TerminateProcess(handle, 1);
            let failure = (ok == 0).then(io::Error::last_os_error);
            CloseHandle(handle);
            if let Some(err) = failure {
                return Err(err);
            }
        }
        Ok(())
    }
}
