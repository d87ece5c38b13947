//! # Child output forwarding.
//!
//! Each spawned child gets its stdout and stderr piped back here and
//! forwarded to the supervisor's stdout one line at a time, prefixed with
//! the process name. Rendering niceties (color, timestamps, name padding)
//! belong to the log-formatting collaborator; correctness of supervision
//! never depends on this module.

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

/// Line-oriented forwarder for one process's output streams.
#[derive(Debug, Clone)]
pub struct Forwarder {
    name: String,
    #[allow(dead_code)]
    color_index: usize,
}

impl Forwarder {
    /// Creates a forwarder for the named process. `color_index` is carried
    /// for the formatting collaborator; the built-in rendering ignores it.
    pub fn new(name: impl Into<String>, color_index: usize) -> Self {
        Self {
            name: name.into(),
            color_index,
        }
    }

    /// Spawns a task that copies `stream` to stdout line by line until EOF.
    ///
    /// The task ends on its own when the child closes the stream, so nothing
    /// here needs cancelling during shutdown.
    pub fn pipe<R>(&self, stream: R)
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let name = self.name.clone();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stream).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                println!("{name} | {line}");
            }
        });
    }
}
