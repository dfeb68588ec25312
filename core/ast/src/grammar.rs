//! Grammar collaborator contract.
//!
//! The concrete grammar/tokenizer is not part of this core. During an
//! incremental update the tree asks the grammar for two services: re-lexing
//! a single identifier token, and re-deriving a damaged definitions block as
//! classified node sequences. Implementations live with the parser; tests
//! inject doubles.

use crate::location::Location;
use crate::nodes::{ControlPart, Definition, FriendModule, Group, Identifier, ImportModule};

/// Outcome of re-lexing a single identifier token.
///
/// `code` follows the tokenizer convention: zero means the span lexed
/// cleanly as one identifier; any other value is a failure and the caller
/// must escalate.
#[derive(Debug, Clone, Default)]
pub struct RelexOutcome {
    pub code: i32,
    pub identifier: Option<Identifier>,
}

impl RelexOutcome {
    #[must_use]
    pub fn success(identifier: Identifier) -> Self {
        Self {
            code: 0,
            identifier: Some(identifier),
        }
    }

    #[must_use]
    pub fn failure(code: i32) -> Self {
        debug_assert!(code != 0, "failure outcome requires a non-zero code");
        Self {
            code,
            identifier: None,
        }
    }
}

/// Freshly derived content for a damaged definitions block, classified by
/// kind and kept in source order. `error_count` reports syntax errors found
/// by the embedded parse; a non-zero count forbids merging any of it.
#[derive(Debug, Default)]
pub struct ReparsedUnits {
    pub definitions: Vec<Definition>,
    pub groups: Vec<Group>,
    pub imports: Vec<ImportModule>,
    pub friends: Vec<FriendModule>,
    pub control_parts: Vec<ControlPart>,
    pub error_count: usize,
}

impl ReparsedUnits {
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
            && self.groups.is_empty()
            && self.imports.is_empty()
            && self.friends.is_empty()
            && self.control_parts.is_empty()
    }
}

/// The parser/tokenizer seen from the incremental update protocol.
pub trait Grammar {
    /// Re-lex the single identifier expected to cover `span`.
    fn relex_identifier(&self, span: &Location) -> RelexOutcome;

    /// Re-derive the definitions-block content covering `span`.
    fn reparse_definitions(&self, span: &Location) -> ReparsedUnits;
}
