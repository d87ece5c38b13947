//! # OS shutdown signals, delivered as a channel of [`StopSignal`]s.
//!
//! The run loop takes the receiver half so tests can inject signals through
//! a plain channel instead of raising real ones. [`notify_channel`] wires
//! the OS listeners for production use.
//!
//! ## Signals
//! **Unix:** SIGINT (Ctrl-C), SIGTERM (systemd/Kubernetes default kill),
//! SIGHUP — each forwarded as the matching [`StopSignal`] so the supervisor
//! can re-deliver the *same* signal to its children.
//!
//! **Elsewhere:** Ctrl-C via [`tokio::signal::ctrl_c`], forwarded as
//! [`StopSignal::Interrupt`].

use tokio::sync::mpsc;

use crate::term::StopSignal;

/// Capacity of the signal channel; repeated signals beyond this are dropped.
const SIGNAL_BUFFER: usize = 10;

/// Spawns OS signal listeners and returns the receiver the run loop selects on.
pub fn notify_channel() -> mpsc::Receiver<StopSignal> {
    let (tx, rx) = mpsc::channel(SIGNAL_BUFFER);
    tokio::spawn(async move {
        let _ = listen(tx).await;
    });
    rx
}

#[cfg(unix)]
async fn listen(tx: mpsc::Sender<StopSignal>) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sighup = signal(SignalKind::hangup())?;

    loop {
        let sig = tokio::select! {
            _ = sigint.recv() => StopSignal::Interrupt,
            _ = sigterm.recv() => StopSignal::Terminate,
            _ = sighup.recv() => StopSignal::Hangup,
        };
        if tx.send(sig).await.is_err() {
            return Ok(());
        }
    }
}

#[cfg(not(unix))]
async fn listen(tx: mpsc::Sender<StopSignal>) -> std::io::Result<()> {
    loop {
        tokio::signal::ctrl_c().await?;
        if tx.send(StopSignal::Interrupt).await.is_err() {
            return Ok(());
        }
    }
}
