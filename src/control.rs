//! # Control-plane boundary.
//!
//! A transport collaborator (TCP RPC server, unix socket, CLI pipe — not
//! this crate's concern) decodes wire requests into [`ControlRequest`]s and
//! feeds them to the supervisor's run loop through an mpsc channel. The
//! loop dispatches each verb and answers through the request's oneshot.
//!
//! [`ControlHandle`] is the clonable client side: it pairs sending with
//! awaiting the reply, so concurrent callers serialize naturally on the
//! supervisor's loop.

use std::str::FromStr;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use crate::error::ProcError;

/// Reply to a control request: an optional payload (`list`/`dump`) or an error.
pub type ControlReply = Result<Option<String>, ProcError>;

/// The five verbs of the control contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlVerb {
    /// Start the named process (no-op if running).
    Start,
    /// Stop the named process gracefully.
    Stop,
    /// Stop, then start the named process.
    Restart,
    /// Newline-joined names of all active records.
    List,
    /// Like `list`, with stopped records marked by a `#` prefix.
    Dump,
}

impl ControlVerb {
    /// Wire-stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlVerb::Start => "start",
            ControlVerb::Stop => "stop",
            ControlVerb::Restart => "restart",
            ControlVerb::List => "list",
            ControlVerb::Dump => "dump",
        }
    }

    /// Whether this verb operates on a single named process.
    pub fn takes_target(&self) -> bool {
        matches!(
            self,
            ControlVerb::Start | ControlVerb::Stop | ControlVerb::Restart
        )
    }
}

/// Parse failure for a wire verb.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown control verb: {0}")]
pub struct UnknownVerb(pub String);

impl FromStr for ControlVerb {
    type Err = UnknownVerb;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(ControlVerb::Start),
            "stop" => Ok(ControlVerb::Stop),
            "restart" => Ok(ControlVerb::Restart),
            "list" => Ok(ControlVerb::List),
            "dump" => Ok(ControlVerb::Dump),
            other => Err(UnknownVerb(other.to_string())),
        }
    }
}

/// One decoded control request, with its reply slot.
#[derive(Debug)]
pub struct ControlRequest {
    /// What to do.
    pub verb: ControlVerb,
    /// The process it concerns, for verbs that take one.
    pub target: Option<String>,
    /// Where the synchronous answer goes.
    pub reply: oneshot::Sender<ControlReply>,
}

/// Clonable client handle over the control channel.
#[derive(Debug, Clone)]
pub struct ControlHandle {
    tx: mpsc::Sender<ControlRequest>,
}

impl ControlHandle {
    /// Creates the handle and the receiver half to hand to
    /// [`Supervisor::run`](crate::Supervisor::run).
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<ControlRequest>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    /// Sends a request and waits for the supervisor's reply.
    pub async fn request(&self, verb: ControlVerb, target: Option<String>) -> ControlReply {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(ControlRequest {
                verb,
                target,
                reply: reply_tx,
            })
            .await
            .map_err(|_| ProcError::ControlClosed)?;
        reply_rx.await.map_err(|_| ProcError::ControlClosed)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verb_round_trip() {
        for verb in [
            ControlVerb::Start,
            ControlVerb::Stop,
            ControlVerb::Restart,
            ControlVerb::List,
            ControlVerb::Dump,
        ] {
            assert_eq!(verb.as_str().parse::<ControlVerb>().unwrap(), verb);
        }
    }

    #[test]
    fn test_unknown_verb_rejected() {
        let err = "reload".parse::<ControlVerb>().unwrap_err();
        assert_eq!(err, UnknownVerb("reload".into()));
    }

    #[test]
    fn test_target_requirements() {
        assert!(ControlVerb::Restart.takes_target());
        assert!(!ControlVerb::List.takes_target());
        assert!(!ControlVerb::Dump.takes_target());
    }

    #[tokio::test]
    async fn test_request_against_closed_channel() {
        let (handle, rx) = ControlHandle::channel(4);
        drop(rx);
        let reply = handle.request(ControlVerb::List, None).await;
        assert!(matches!(reply, Err(ProcError::ControlClosed)));
    }
}
