//! Diagnostics sink.
//!
//! Semantic findings are data, not faults: every check reports through a
//! [`DiagnosticSink`] and keeps going. Message templates live here so the
//! wording stays identical across checks and tests.

use serde::Serialize;

use tessera_ast::location::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// One located finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub location: Location,
    pub message: String,
}

impl Diagnostic {
    #[must_use]
    pub fn new(severity: Severity, location: Location, message: impl Into<String>) -> Self {
        Self {
            severity,
            location,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(location: Location, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, location, message)
    }

    #[must_use]
    pub fn warning(location: Location, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, location, message)
    }

    /// The named module does not exist in the project index. Severity is
    /// configurable by the caller.
    #[must_use]
    pub fn missing_module(severity: Severity, location: Location, name: &str) -> Self {
        Self::new(
            severity,
            location,
            format!("There is no module with name `{name}'"),
        )
    }

    /// The named module exists but is not a specification module.
    #[must_use]
    pub fn wrong_module_kind(location: Location, name: &str) -> Self {
        Self::error(
            location,
            format!("Module `{name}' is not a specification module"),
        )
    }

    #[must_use]
    pub fn duplicate_definition(location: Location, name: &str) -> Self {
        Self::error(location, format!("duplicate definition with name `{name}'"))
    }

    #[must_use]
    pub fn duplicate_friend(location: Location, name: &str) -> Self {
        Self::warning(
            location,
            format!("duplicate friend declaration for module `{name}'"),
        )
    }

    /// `chain` is the rendered cycle slice, e.g. ``"`M.a' -> `M.b' -> `M.a'"``.
    #[must_use]
    pub fn circular_reference(location: Location, chain: &str) -> Self {
        Self::error(location, format!("circular reference: {chain}"))
    }
}

pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Vec-backed sink used by checks and tests.
#[derive(Debug, Default, Serialize)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    #[must_use]
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items
            .iter()
            .filter(|diagnostic| diagnostic.severity == Severity::Error)
    }

    #[must_use]
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items
            .iter()
            .filter(|diagnostic| diagnostic.severity == Severity::Warning)
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl DiagnosticSink for Diagnostics {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }
}
