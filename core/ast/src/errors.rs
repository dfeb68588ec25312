//! Error types for the AST crate.
//!
//! Structural failures of the incremental update protocol. Recoverable
//! semantic findings never appear here; those flow through the diagnostics
//! sink in the semantic crate.

use thiserror::Error;

/// Raised when an incremental patch cannot be completed locally: the caller
/// must discard the affected subtree and re-derive it from source text.
///
/// Propagates up exactly one level to the owning container, which either
/// retries with a larger region or escalates further. It must never be
/// silently swallowed; doing so would leave a syntactically stale subtree
/// marked as valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("damaged subtree cannot be patched in place and must be re-parsed")]
#[must_use = "a reparse escalation must be handled, not dropped"]
pub struct ReparseRequired;
