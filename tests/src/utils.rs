//! Shared builders and mock collaborators for the end-to-end tests.

use std::cell::Cell;

use rustc_hash::FxHashMap;

use tessera_ast::grammar::{Grammar, RelexOutcome, ReparsedUnits};
use tessera_ast::location::Location;
use tessera_ast::nodes::{
    ConstDefinition, Definition, Definitions, FormalParameter, FormalParameterList, FriendModule,
    Identifier, IntegerValue, Module, ModuleKind, Reference, ReferencedValue, TemplateDefinition,
    Value, Visibility,
};
use tessera_semantic::project::ModuleIndex;

pub(crate) const FILE: &str = "m.tsr";

pub(crate) fn loc(start: u32, end: u32) -> Location {
    Location::new(FILE, start, end)
}

pub(crate) fn spec_module(name: &str, definitions: Definitions) -> Module {
    Module::new(
        1,
        loc(0, 200),
        ModuleKind::Spec,
        Identifier::new(3, loc(7, 8), name),
        definitions,
    )
}

pub(crate) fn empty_definitions() -> Definitions {
    Definitions::new(2, loc(9, 190))
}

pub(crate) fn int_value(id: u32, start: u32, value: i64) -> Value {
    Value::Integer(IntegerValue::new(id, loc(start, start + 1), value))
}

/// A value referencing `name`, optionally with actual parameters.
pub(crate) fn reference_value(
    id: u32,
    start: u32,
    name: &str,
    parameters: Option<tessera_ast::nodes::ActualParameterList>,
) -> Value {
    let end = start + u32::try_from(name.len()).unwrap();
    Value::Referenced(ReferencedValue::new(
        id,
        loc(start, end),
        Reference::new(
            id + 1,
            loc(start, end),
            None,
            Identifier::new(id + 2, loc(start, end), name),
            parameters,
        ),
    ))
}

pub(crate) fn const_def(id: u32, start: u32, name: &str, value: Value) -> Definition {
    let name_end = start + 6 + u32::try_from(name.len()).unwrap();
    Definition::Const(ConstDefinition::new(
        id,
        loc(start, start + 20),
        Visibility::Private,
        Identifier::new(id + 100, loc(start + 6, name_end), name),
        value,
    ))
}

pub(crate) fn template_def(
    id: u32,
    start: u32,
    name: &str,
    parameters: Vec<FormalParameter>,
    body: Value,
) -> Definition {
    let name_end = start + 9 + u32::try_from(name.len()).unwrap();
    Definition::Template(TemplateDefinition::new(
        id,
        loc(start, start + 40),
        Visibility::Private,
        Identifier::new(id + 100, loc(start + 9, name_end), name),
        FormalParameterList::new(id + 101, loc(name_end, name_end + 10), parameters),
        body,
    ))
}

pub(crate) fn formal(id: u32, start: u32, name: &str, default: Option<Value>) -> FormalParameter {
    let end = start + u32::try_from(name.len()).unwrap();
    FormalParameter::new(
        id,
        loc(start, start + 8),
        Identifier::new(id + 100, loc(start, end), name),
        default,
    )
}

/// `friend <name>;` starting at `start`; the identifier begins at
/// `start + 7`.
pub(crate) fn friend_decl(id: u32, start: u32, name: &str) -> FriendModule {
    let name_start = start + 7;
    let name_end = name_start + u32::try_from(name.len()).unwrap();
    FriendModule::new(
        id,
        loc(start, name_end + 1),
        Identifier::new(id + 100, loc(name_start, name_end), name),
    )
}

/// Grammar double with canned answers and call counters.
#[derive(Default)]
pub(crate) struct StubGrammar {
    /// `Some` relexes successfully to this identifier; `None` fails with a
    /// non-zero result code.
    pub(crate) relex_result: Option<Identifier>,
    pub(crate) reparsed_definitions: Vec<Definition>,
    pub(crate) reparsed_friends: Vec<FriendModule>,
    pub(crate) error_count: usize,
    pub(crate) reparse_calls: Cell<usize>,
}

impl Grammar for StubGrammar {
    fn relex_identifier(&self, _span: &Location) -> RelexOutcome {
        match &self.relex_result {
            Some(identifier) => RelexOutcome::success(identifier.clone()),
            None => RelexOutcome::failure(1),
        }
    }

    fn reparse_definitions(&self, _span: &Location) -> ReparsedUnits {
        self.reparse_calls.set(self.reparse_calls.get() + 1);
        ReparsedUnits {
            definitions: self.reparsed_definitions.clone(),
            friends: self.reparsed_friends.clone(),
            error_count: self.error_count,
            ..ReparsedUnits::default()
        }
    }
}

/// Module index that counts resolutions, for observing memoization.
#[derive(Default)]
pub(crate) struct CountingIndex {
    modules: FxHashMap<String, Module>,
    pub(crate) lookups: Cell<usize>,
}

impl CountingIndex {
    pub(crate) fn new(modules: impl IntoIterator<Item = Module>) -> Self {
        Self {
            modules: modules
                .into_iter()
                .map(|module| (module.name().to_owned(), module))
                .collect(),
            lookups: Cell::new(0),
        }
    }
}

impl ModuleIndex for CountingIndex {
    fn get_module_by_name(&self, name: &str) -> Option<&Module> {
        self.lookups.set(self.lookups.get() + 1);
        self.modules.get(name)
    }
}
