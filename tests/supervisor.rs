//! End-to-end supervision tests with real `sh -c` children.
//!
//! Windows has no `sleep`/`trap` for keeping fixtures alive, so the suite is
//! unix-only, mirroring the platform split of the termination strategy.
#![cfg(unix)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use procvisor::{
    Config, ControlHandle, ControlVerb, ProcError, ProcessSeed, Registry, StopSignal, Supervisor,
};

const TEST_TIMEOUT: Duration = Duration::from_secs(10);

fn sleepers(names: &[&str], secs: &str) -> Vec<ProcessSeed> {
    names
        .iter()
        .map(|n| ProcessSeed::new(*n, format!("sleep {secs}")))
        .collect()
}

fn supervisor(cfg: Config, seeds: Vec<ProcessSeed>) -> Arc<Supervisor> {
    let registry = Registry::load(seeds).expect("valid seeds");
    Arc::new(Supervisor::new(cfg, registry, vec![]))
}

/// Runs the supervisor loop in a task, returning the pieces a test drives.
struct Harness {
    sup: Arc<Supervisor>,
    control: ControlHandle,
    sig_tx: mpsc::Sender<StopSignal>,
    cancel: CancellationToken,
    run: tokio::task::JoinHandle<Result<(), ProcError>>,
}

fn spawn_run(sup: Arc<Supervisor>) -> Harness {
    let (control, ctrl_rx) = ControlHandle::channel(16);
    let (sig_tx, sig_rx) = mpsc::channel(4);
    let cancel = CancellationToken::new();
    let run = {
        let sup = Arc::clone(&sup);
        let cancel = cancel.clone();
        tokio::spawn(async move { sup.run(sig_rx, ctrl_rx, cancel).await })
    };
    Harness {
        sup,
        control,
        sig_tx,
        cancel,
        run,
    }
}

async fn join(run: tokio::task::JoinHandle<Result<(), ProcError>>) -> Result<(), ProcError> {
    tokio::time::timeout(TEST_TIMEOUT, run)
        .await
        .expect("supervisor run timed out")
        .expect("supervisor run panicked")
}

#[tokio::test]
async fn test_all_children_exit_naturally() {
    let sup = supervisor(
        Config::default(),
        sleepers(&["web1", "web2", "web3", "web4"], "0.1"),
    );
    let h = spawn_run(sup);
    assert!(join(h.run).await.is_ok());
}

#[tokio::test]
async fn test_interrupt_stops_the_whole_group() {
    let sup = supervisor(
        Config::default(),
        sleepers(&["web1", "web2", "web3", "web4"], "10"),
    );
    let h = spawn_run(sup);
    tokio::time::sleep(Duration::from_millis(200)).await;

    let started = Instant::now();
    h.sig_tx.send(StopSignal::Interrupt).await.unwrap();
    assert!(join(h.run).await.is_ok());
    assert!(
        started.elapsed() < Duration::from_secs(3),
        "group shutdown took {:?}",
        started.elapsed()
    );

    for name in ["web1", "web2", "web3", "web4"] {
        let record = h.sup.registry().find(name).unwrap();
        assert!(!record.is_running().await, "{name} still running");
    }
}

#[tokio::test]
async fn test_exit_on_error_terminates_early() {
    let mut seeds = sleepers(&["web1", "web3", "web4"], "5");
    seeds.insert(1, ProcessSeed::new("web2", "exit 1"));
    let cfg = Config {
        exit_on_error: true,
        ..Config::default()
    };
    let sup = supervisor(cfg, seeds);

    let started = Instant::now();
    let h = spawn_run(sup);
    let err = join(h.run).await.unwrap_err();

    match err {
        ProcError::Exit { name, reason } => {
            assert_eq!(name, "web2");
            assert_eq!(reason, "exit code 1");
        }
        other => panic!("expected exit error, got {other:?}"),
    }
    // Well before the 5s siblings would have run.
    assert!(
        started.elapsed() < Duration::from_secs(2),
        "took {:?}",
        started.elapsed()
    );
}

#[tokio::test]
async fn test_sibling_failure_is_tolerated_by_default() {
    let mut seeds = sleepers(&["web1", "web3", "web4"], "0.3");
    seeds.insert(1, ProcessSeed::new("web2", "exit 1"));
    let sup = supervisor(Config::default(), seeds);

    let started = Instant::now();
    let h = spawn_run(sup);
    // exit_on_error is off: the failure is logged, siblings run their full
    // duration, and the all-stopped policy ends the run cleanly.
    assert!(join(h.run).await.is_ok());
    assert!(
        started.elapsed() >= Duration::from_millis(250),
        "siblings were cut short: {:?}",
        started.elapsed()
    );
}

#[tokio::test]
async fn test_stopping_one_process_leaves_siblings_running() {
    let sup = supervisor(
        Config::default(),
        sleepers(&["web1", "web2", "web3", "web4"], "10"),
    );
    let h = spawn_run(sup);
    tokio::time::sleep(Duration::from_millis(200)).await;

    let reply = h.control.request(ControlVerb::Stop, Some("web2".into())).await;
    assert!(matches!(reply, Ok(None)), "stop reply: {reply:?}");

    let dump = h
        .control
        .request(ControlVerb::Dump, None)
        .await
        .unwrap()
        .unwrap();
    let lines: Vec<&str> = dump.lines().collect();
    assert_eq!(lines, vec!["web1", "#web2", "web3", "web4"]);

    // A second stop of the same process is a no-op returning success.
    let reply = h.control.request(ControlVerb::Stop, Some("web2".into())).await;
    assert!(matches!(reply, Ok(None)));

    h.cancel.cancel();
    assert!(join(h.run).await.is_ok());
}

#[tokio::test]
async fn test_list_reports_active_names_in_order() {
    let sup = supervisor(Config::default(), sleepers(&["b", "a", "c"], "5"));
    let h = spawn_run(sup);
    tokio::time::sleep(Duration::from_millis(150)).await;

    let list = h
        .control
        .request(ControlVerb::List, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(list, "b\na\nc");

    h.cancel.cancel();
    assert!(join(h.run).await.is_ok());
}

#[tokio::test]
async fn test_unknown_targets_are_rejected_not_fatal() {
    let sup = supervisor(Config::default(), sleepers(&["web1"], "5"));
    let h = spawn_run(sup);
    tokio::time::sleep(Duration::from_millis(150)).await;

    let reply = h
        .control
        .request(ControlVerb::Restart, Some("ghost".into()))
        .await;
    assert!(matches!(
        reply,
        Err(ProcError::UnknownProcess { ref name }) if name == "ghost"
    ));

    // A verb that takes a target, sent without one.
    let reply = h.control.request(ControlVerb::Stop, None).await;
    assert!(matches!(reply, Err(ProcError::UnknownProcess { .. })));

    // The supervisor is still serving.
    let list = h.control.request(ControlVerb::List, None).await.unwrap();
    assert_eq!(list.as_deref(), Some("web1"));

    h.cancel.cancel();
    assert!(join(h.run).await.is_ok());
}

#[tokio::test]
async fn test_signal_ignoring_child_is_force_killed_after_grace() {
    let cfg = Config {
        grace: Duration::from_millis(300),
        ..Config::default()
    };
    let sup = supervisor(
        cfg,
        vec![ProcessSeed::new("stubborn", "trap '' INT TERM; sleep 10")],
    );
    let h = spawn_run(sup);
    tokio::time::sleep(Duration::from_millis(300)).await;

    let started = Instant::now();
    let reply = h
        .control
        .request(ControlVerb::Stop, Some("stubborn".into()))
        .await;
    let elapsed = started.elapsed();

    // Grace expiry is not an error; the forced kill resolves the stop.
    assert!(matches!(reply, Ok(None)), "stop reply: {reply:?}");
    assert!(
        elapsed >= Duration::from_millis(250),
        "returned before grace: {elapsed:?}"
    );
    assert!(
        elapsed < Duration::from_secs(3),
        "stop not bounded by grace: {elapsed:?}"
    );

    let record = h.sup.registry().find("stubborn").unwrap();
    assert!(!record.is_running().await);

    h.cancel.cancel();
    assert!(join(h.run).await.is_ok());
}

#[tokio::test]
async fn test_restart_cycles_a_process_without_ending_the_run() {
    let sup = supervisor(Config::default(), sleepers(&["web1", "web2"], "10"));
    let h = spawn_run(sup);
    tokio::time::sleep(Duration::from_millis(200)).await;

    let reply = h
        .control
        .request(ControlVerb::Restart, Some("web1".into()))
        .await;
    assert!(matches!(reply, Ok(None)), "restart reply: {reply:?}");

    let dump = h
        .control
        .request(ControlVerb::Dump, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(dump, "web1\nweb2");

    h.cancel.cancel();
    assert!(join(h.run).await.is_ok());
}

#[tokio::test]
async fn test_port_is_exported_to_the_child() {
    // The child asserts its own environment; exit_on_error turns a missing
    // PORT into a visible run failure.
    let cfg = Config {
        exit_on_error: true,
        ..Config::default()
    };
    let sup = supervisor(
        cfg.clone(),
        vec![ProcessSeed::new("portcheck", r#"[ "$PORT" = "6000" ]"#).with_port(6000)],
    );
    let h = spawn_run(sup);
    assert!(join(h.run).await.is_ok());

    let sup = supervisor(
        cfg,
        vec![ProcessSeed::new("portcheck", r#"[ "$PORT" = "6000" ]"#)],
    );
    let h = spawn_run(sup);
    let err = join(h.run).await.unwrap_err();
    assert!(matches!(err, ProcError::Exit { ref name, .. } if name == "portcheck"));
}

#[tokio::test]
async fn test_spawn_failure_reaches_the_error_policy() {
    let cfg = Config {
        exit_on_error: true,
        ..Config::default()
    };
    // The shell itself starts fine and then fails to exec the command, which
    // classifies as an unexpected nonzero exit.
    let sup = supervisor(
        cfg,
        vec![
            ProcessSeed::new("broken", "/no/such/binary-anywhere"),
            ProcessSeed::new("web1", "sleep 5"),
        ],
    );
    let started = Instant::now();
    let h = spawn_run(sup);
    let err = join(h.run).await.unwrap_err();
    assert!(matches!(err, ProcError::Exit { ref name, .. } if name == "broken"));
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_run_is_single_use() {
    let sup = supervisor(Config::default(), sleepers(&["web1"], "0.1"));
    let h = spawn_run(sup);
    assert!(join(h.run).await.is_ok());

    let (_, ctrl_rx) = ControlHandle::channel(4);
    let (_sig_tx, sig_rx) = mpsc::channel(4);
    let again = h.sup.run(sig_rx, ctrl_rx, CancellationToken::new()).await;
    assert!(matches!(again, Err(ProcError::AlreadyRunning)));
}

#[tokio::test]
async fn test_cancellation_token_stops_the_group() {
    let sup = supervisor(Config::default(), sleepers(&["web1", "web2"], "10"));
    let h = spawn_run(sup);
    tokio::time::sleep(Duration::from_millis(200)).await;

    let started = Instant::now();
    h.cancel.cancel();
    assert!(join(h.run).await.is_ok());
    assert!(started.elapsed() < Duration::from_secs(3));
}
