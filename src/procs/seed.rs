//! # Process seed: the boundary type fed by the configuration collaborator.
//!
//! A [`ProcessSeed`] is one parsed entry — name, shell command line, and an
//! optional port to expose to the child as `PORT`. Procfile parsing and
//! `$VAR` interpolation happen upstream; seeds arrive ready to spawn.

/// One configured command, as handed over by the config loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSeed {
    /// Unique registry key.
    pub name: String,
    /// Shell command text, executed via `sh -c` (or `cmd /C`).
    pub cmdline: String,
    /// Port exposed to the child via the `PORT` environment variable.
    pub port: Option<u16>,
}

impl ProcessSeed {
    /// Creates a seed without a port assignment.
    pub fn new(name: impl Into<String>, cmdline: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cmdline: cmdline.into(),
            port: None,
        }
    }

    /// Assigns the port exported to the child as `PORT`.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// A seed is usable when both its name and command line are non-empty.
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty() && !self.cmdline.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_seed() {
        let seed = ProcessSeed::new("web", "python app.py").with_port(5000);
        assert!(seed.is_valid());
        assert_eq!(seed.port, Some(5000));
    }

    #[test]
    fn test_blank_fields_are_invalid() {
        assert!(!ProcessSeed::new("", "sleep 1").is_valid());
        assert!(!ProcessSeed::new("web", "   ").is_valid());
    }
}
