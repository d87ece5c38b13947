//! # Basic supervision demo.
//!
//! Spawns a few shell commands, lets them run, and shuts the group down on
//! Ctrl-C (or when every command has exited).
//!
//! ## Run
//! ```bash
//! cargo run --example demo --features logging
//! ```

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use procvisor::{
    Config, ControlHandle, LogWriter, ProcessSeed, Registry, Subscribe, Supervisor, shutdown,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let registry = Registry::load([
        ProcessSeed::new("ticker", "while true; do echo tick; sleep 1; done"),
        ProcessSeed::new("oneshot", "echo hello from oneshot"),
        ProcessSeed::new("web", "echo serving on $PORT; sleep 30").with_port(5000),
    ])?;

    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter)];
    let cfg = Config {
        exit_on_stop: true,
        ..Config::default()
    };
    let sup = Supervisor::new(cfg, registry, subs);

    let (_control, ctrl_rx) = ControlHandle::channel(16);
    let sig_rx = shutdown::notify_channel();

    sup.run(sig_rx, ctrl_rx, CancellationToken::new()).await?;
    println!("supervisor finished");
    Ok(())
}
