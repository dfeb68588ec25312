//! Semantic layer for the Tessera AST core.
//!
//! Scope and visibility resolution, timestamp-gated friend/import and
//! uniqueness checks, and the cycle checker over parameter defaults. All
//! semantic findings flow through the diagnostics sink and never abort a
//! check pass; the only control-flow failure in the system is the
//! re-parse escalation raised by the AST layer.

#![warn(clippy::pedantic)]

pub mod checks;
pub mod diagnostics;
pub mod project;
pub mod recursion;
pub mod scope;
