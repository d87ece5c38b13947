//! Observability extension points: the [`Subscribe`] trait and the
//! [`SubscriberSet`] fan-out, plus the optional [`LogWriter`] demo sink.

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscriber;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscriber::Subscribe;
