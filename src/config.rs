//! # Global runtime configuration.
//!
//! [`Config`] defines supervisor-wide behavior: the stop grace period,
//! event bus capacity, and the two shutdown policy flags
//! (`exit_on_error`, `exit_on_stop`).
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use procvisor::Config;
//!
//! let mut cfg = Config::default();
//! cfg.exit_on_error = true;
//! cfg.grace = Duration::from_secs(5);
//!
//! assert!(cfg.exit_on_stop);
//! ```

use std::time::Duration;

/// Global configuration for the supervisor.
#[derive(Clone, Debug)]
pub struct Config {
    /// Time a process gets after the graceful stop signal before it is
    /// force-killed together with its process group.
    pub grace: Duration,
    /// Capacity of the event bus channel.
    pub bus_capacity: usize,
    /// If true, an unexpected child failure stops the whole group and the
    /// supervisor returns that failure.
    pub exit_on_error: bool,
    /// If true, the supervisor returns once every started child has exited.
    pub exit_on_stop: bool,
}

impl Default for Config {
    /// Provides the default configuration:
    /// - `grace = 10s`
    /// - `bus_capacity = 1024`
    /// - `exit_on_error = false`
    /// - `exit_on_stop = true`
    fn default() -> Self {
        Self {
            grace: Duration::from_secs(10),
            bus_capacity: 1024,
            exit_on_error: false,
            exit_on_stop: true,
        }
    }
}
