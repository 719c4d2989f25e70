//! Deferred auxiliary import tracking.
//!
//! Names are collected while declarations are emitted and turned into a
//! single aggregated import statement when the output is rendered.

use crate::document::ImportStatement;

/// Module the generated declarations import their auxiliary types from.
pub const DEFAULT_IMPORT_MODULE: &str = "mongoose";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Insertion-ordered set of type names imported from one module.
pub struct ImportTracker {
    module: String,
    names: Vec<String>,
}

impl Default for ImportTracker {
    fn default() -> Self {
        Self::new(DEFAULT_IMPORT_MODULE)
    }
}

impl ImportTracker {
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            names: Vec::new(),
        }
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    /// Registers a name; returns `false` when it was already pending.
    pub fn register(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.names.push(name.to_string());
        true
    }

    /// Moves every pending name of `other` into this tracker, keeping first-seen order.
    pub fn absorb(&mut self, other: ImportTracker) {
        for name in other.names {
            if !self.contains(&name) {
                self.names.push(name);
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Drains the pending names into one import statement.
    ///
    /// Returns `None` when nothing is pending, so a second flush without new
    /// registrations adds nothing to the output.
    pub fn flush(&mut self) -> Option<ImportStatement> {
        if self.names.is_empty() {
            return None;
        }
        let names = std::mem::take(&mut self.names);
        Some(ImportStatement::named(self.module.clone(), names))
    }
}
