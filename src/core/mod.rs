//! Supervision engine: the [`Supervisor`] and its moving parts.

pub mod barrier;
pub mod lifecycle;
pub mod shutdown;
mod supervisor;

pub use barrier::ExitBarrier;
pub use lifecycle::Lifecycle;
pub use supervisor::Supervisor;
