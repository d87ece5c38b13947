//! # Control-plane demo.
//!
//! Drives a running supervisor through the control channel: stop one
//! process, restart another, and inspect the group with `list`/`dump`.
//!
//! ## Run
//! ```bash
//! cargo run --example control --features logging
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use procvisor::{
    Config, ControlHandle, ControlVerb, LogWriter, ProcessSeed, Registry, Subscribe, Supervisor,
    shutdown,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let registry = Registry::load([
        ProcessSeed::new("web1", "sleep 30"),
        ProcessSeed::new("web2", "sleep 30"),
        ProcessSeed::new("worker", "sleep 30"),
    ])?;

    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter)];
    let sup = Arc::new(Supervisor::new(Config::default(), registry, subs));

    let (control, ctrl_rx) = ControlHandle::channel(16);
    let sig_rx = shutdown::notify_channel();
    let cancel = CancellationToken::new();

    let runner = Arc::clone(&sup);
    let run_cancel = cancel.clone();
    let run = tokio::spawn(async move { runner.run(sig_rx, ctrl_rx, run_cancel).await });

    tokio::time::sleep(Duration::from_millis(300)).await;

    println!(" ─► list");
    let list = control.request(ControlVerb::List, None).await?;
    println!("{}", list.unwrap_or_default());

    println!(" ─► stop web2");
    control.request(ControlVerb::Stop, Some("web2".into())).await?;

    println!(" ─► restart worker");
    control
        .request(ControlVerb::Restart, Some("worker".into()))
        .await?;

    println!(" ─► dump (stopped records carry a # prefix)");
    let dump = control.request(ControlVerb::Dump, None).await?;
    println!("{}", dump.unwrap_or_default());

    println!(" ─► shutting the group down");
    cancel.cancel();
    run.await??;

    println!("Done");
    Ok(())
}
