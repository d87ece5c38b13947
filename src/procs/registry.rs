//! # Registry: the ordered collection of process records.
//!
//! Built once from configuration seeds, optionally narrowed to a named
//! subset before the supervisor starts, and read-only afterwards — every
//! later consumer can walk it lock-free.
//!
//! The registry is owned by a [`Supervisor`](crate::Supervisor) instance,
//! not by process-wide state, so independent supervisors can coexist
//! (notably in tests).

use std::sync::Arc;

use crate::error::ConfigError;
use crate::procs::{ProcessRecord, ProcessSeed};

/// How many color slots the output forwarder cycles through.
const COLOR_CYCLE: usize = 6;

/// Ordered, name-keyed collection of [`ProcessRecord`]s.
#[derive(Debug, Default)]
pub struct Registry {
    records: Vec<Arc<ProcessRecord>>,
}

impl Registry {
    /// Builds records from an ordered seed sequence.
    ///
    /// Seeds with a blank name or command line are skipped, mirroring how a
    /// Procfile parser drops malformed lines. Fails with
    /// [`ConfigError::NoProcesses`] when nothing usable remains and with
    /// [`ConfigError::DuplicateName`] on a repeated name.
    pub fn load(seeds: impl IntoIterator<Item = ProcessSeed>) -> Result<Self, ConfigError> {
        let mut records: Vec<Arc<ProcessRecord>> = Vec::new();

        for seed in seeds {
            if !seed.is_valid() {
                continue;
            }
            if records.iter().any(|r| r.name() == seed.name) {
                return Err(ConfigError::DuplicateName { name: seed.name });
            }
            let color_index = records.len() % COLOR_CYCLE;
            records.push(Arc::new(ProcessRecord::new(seed, color_index)));
        }

        if records.is_empty() {
            return Err(ConfigError::NoProcesses);
        }
        Ok(Self { records })
    }

    /// Looks up a record by name.
    pub fn find(&self, name: &str) -> Option<Arc<ProcessRecord>> {
        self.records.iter().find(|r| r.name() == name).cloned()
    }

    /// Narrows the active set to exactly the named records, in the requested
    /// order. Fails with [`ConfigError::UnknownProcess`] if any name is
    /// absent; the registry is left untouched in that case.
    pub fn filter(&mut self, names: &[impl AsRef<str>]) -> Result<(), ConfigError> {
        let mut selected = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            match self.find(name) {
                Some(record) => selected.push(record),
                None => {
                    return Err(ConfigError::UnknownProcess {
                        name: name.to_string(),
                    })
                }
            }
        }
        self.records = selected;
        Ok(())
    }

    /// Active record names, in registry order.
    pub fn names(&self) -> Vec<String> {
        self.records.iter().map(|r| r.name().to_string()).collect()
    }

    /// Iterates the active records in order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ProcessRecord>> {
        self.records.iter()
    }

    /// Number of active records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no records are active.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeds() -> Vec<ProcessSeed> {
        vec![
            ProcessSeed::new("web1", "sleep 1").with_port(5000),
            ProcessSeed::new("web2", "sleep 1").with_port(5100),
            ProcessSeed::new("worker", "sleep 1"),
        ]
    }

    #[test]
    fn test_load_empty_fails() {
        assert_eq!(Registry::load([]).unwrap_err(), ConfigError::NoProcesses);
    }

    #[test]
    fn test_load_skips_invalid_seeds() {
        let err = Registry::load([ProcessSeed::new("", ""), ProcessSeed::new("x", " ")])
            .unwrap_err();
        assert_eq!(err, ConfigError::NoProcesses);
    }

    #[test]
    fn test_load_rejects_duplicates() {
        let err = Registry::load([
            ProcessSeed::new("web", "sleep 1"),
            ProcessSeed::new("web", "sleep 2"),
        ])
        .unwrap_err();
        assert_eq!(err, ConfigError::DuplicateName { name: "web".into() });
    }

    #[test]
    fn test_find_and_order() {
        let reg = Registry::load(seeds()).unwrap();
        assert_eq!(reg.len(), 3);
        assert_eq!(reg.names(), vec!["web1", "web2", "worker"]);
        assert!(reg.find("web2").is_some());
        assert!(reg.find("nope").is_none());
    }

    #[test]
    fn test_filter_reorders_to_request() {
        let mut reg = Registry::load(seeds()).unwrap();
        reg.filter(&["worker", "web1"]).unwrap();
        assert_eq!(reg.names(), vec!["worker", "web1"]);
    }

    #[test]
    fn test_filter_unknown_leaves_registry_intact() {
        let mut reg = Registry::load(seeds()).unwrap();
        let err = reg.filter(&["web1", "ghost"]).unwrap_err();
        assert_eq!(err, ConfigError::UnknownProcess { name: "ghost".into() });
        assert_eq!(reg.len(), 3);
    }
}
