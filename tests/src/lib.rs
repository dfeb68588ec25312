//! End-to-end tests for the Tessera AST core: incremental edits followed by
//! semantic re-checks, exercised across the crate boundary.

#[cfg(test)]
mod utils;

#[cfg(test)]
mod checks;
#[cfg(test)]
mod incremental;
#[cfg(test)]
mod recursion;
