//! Dispatch table from tool name to checker plugin.

use std::collections::BTreeMap;

use crate::checker::Checker;
use crate::error::CheckError;

/// Registry of checker plugins keyed by tool name.
#[derive(Default)]
pub struct CheckerRegistry {
    checkers: BTreeMap<&'static str, Box<dyn Checker>>,
}

impl CheckerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a checker, replacing any previous one with the same name.
    pub fn register(&mut self, checker: Box<dyn Checker>) {
        tracing::trace!(tool = checker.name(), "registering checker");
        self.checkers.insert(checker.name(), checker);
    }

    pub fn with(mut self, checker: Box<dyn Checker>) -> Self {
        self.register(checker);
        self
    }

    /// Looks up the checker for `name`.
    pub fn dispatch(&self, name: &str) -> Result<&dyn Checker, CheckError> {
        self.checkers
            .get(name)
            .map(|c| c.as_ref())
            .ok_or_else(|| CheckError::UnknownTool {
                name: name.to_string(),
                known: self.names().join(", "),
            })
    }

    /// Registered tool names in sorted order.
    pub fn names(&self) -> Vec<&'static str> {
        self.checkers.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.checkers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkers.is_empty()
    }
}
