//! The process data model: seeds in, records and the registry out.

mod record;
mod registry;
mod seed;

pub use record::{ExitOutcome, ProcessRecord};
pub use registry::Registry;
pub use seed::ProcessSeed;
