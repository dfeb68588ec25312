//! Scope chain and visibility resolution.
//!
//! Scopes form a lookup graph separate from the ownership tree. Each scope
//! has at most one parent (lookup delegates upward on miss) and zero-or-one
//! "runs on" projection scope exposing the members of the component a
//! function runs on. Lookup order is: local symbols, then the projection's
//! local symbols only (never its parent chain, so lookup always terminates),
//! then the parent chain.
//!
//! Visibility is gated at resolution time, not at tree-construction time,
//! because friendships can be declared after the fact and are re-validated
//! per compilation timestamp.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::bail;
use rustc_hash::FxHashMap;

use tessera_ast::location::Location;
use tessera_ast::nodes::{Definition, Module, Visibility};

use crate::project::ModuleIndex;

pub type ScopeRef = Rc<RefCell<Scope>>;

/// A definition visible at some point, as seen by lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolEntry {
    pub name: String,
    pub node_id: u32,
    pub visibility: Visibility,
    /// Name of the module the definition lives in.
    pub module: String,
    pub location: Location,
}

#[derive(Debug)]
pub struct Scope {
    pub id: u32,
    pub name: String,
    parent: Option<ScopeRef>,
    runs_on: Option<ScopeRef>,
    symbols: FxHashMap<String, SymbolEntry>,
}

impl Scope {
    #[must_use = "scope constructor returns a new scope that should be used"]
    pub fn new(id: u32, name: &str, parent: Option<ScopeRef>) -> ScopeRef {
        Rc::new(RefCell::new(Self {
            id,
            name: name.to_string(),
            parent,
            runs_on: None,
            symbols: FxHashMap::default(),
        }))
    }

    pub fn set_runs_on(&mut self, projection: ScopeRef) {
        self.runs_on = Some(projection);
    }

    pub fn insert_symbol(&mut self, entry: SymbolEntry) -> anyhow::Result<()> {
        if self.symbols.contains_key(&entry.name) {
            bail!("Symbol `{}` already exists in this scope", entry.name);
        }
        self.symbols.insert(entry.name.clone(), entry);
        Ok(())
    }

    #[must_use = "this is a pure lookup with no side effects"]
    pub fn lookup_local(&self, name: &str) -> Option<SymbolEntry> {
        self.symbols.get(name).cloned()
    }

    #[must_use = "this is a pure lookup with no side effects"]
    pub fn lookup(&self, name: &str) -> Option<SymbolEntry> {
        if let Some(entry) = self.lookup_local(name) {
            return Some(entry);
        }
        if let Some(runs_on) = &self.runs_on {
            if let Some(entry) = runs_on.borrow().lookup_local(name) {
                return Some(entry);
            }
        }
        if let Some(parent) = &self.parent {
            return parent.borrow().lookup(name);
        }
        None
    }
}

/// Whether `entry`, found in another module's scope, may satisfy a lookup
/// issued from `from_module`.
#[must_use = "this is a pure check with no side effects"]
pub fn is_visible_from(entry: &SymbolEntry, from_module: &str, index: &dyn ModuleIndex) -> bool {
    if entry.module == from_module {
        return true;
    }
    match entry.visibility {
        Visibility::Public => true,
        Visibility::Friend => index
            .get_module_by_name(&entry.module)
            .is_some_and(|module| {
                module
                    .definitions
                    .friends
                    .iter()
                    .any(|friend| friend.module_name.name == from_module)
            }),
        Visibility::Private => false,
    }
}

/// Scope lookup with the visibility gate applied. An entry the looking
/// module may not see counts as not found.
#[must_use = "this is a pure lookup with no side effects"]
pub fn resolve_visible(
    scope: &ScopeRef,
    name: &str,
    from_module: &str,
    index: &dyn ModuleIndex,
) -> Option<SymbolEntry> {
    let entry = scope.borrow().lookup(name)?;
    is_visible_from(&entry, from_module, index).then_some(entry)
}

/// The scope graph built from one module tree.
#[derive(Debug)]
pub struct ModuleScopes {
    pub module: ScopeRef,
    /// Component name to the scope of its body.
    pub components: FxHashMap<String, ScopeRef>,
    /// Function name to its body scope (formal parameters, runs-on
    /// projection).
    pub functions: FxHashMap<String, ScopeRef>,
}

/// Builds the scope graph for a module. Duplicate names are skipped here;
/// reporting them is the uniqueness check's job.
#[must_use]
pub fn build_module_scopes(module: &Module) -> ModuleScopes {
    let module_name = module.name().to_owned();
    let mut next_id = 0;
    let mut fresh_id = || {
        let id = next_id;
        next_id += 1;
        id
    };

    let root = Scope::new(fresh_id(), &module_name, None);
    let mut components = FxHashMap::default();

    for definition in &module.definitions.definitions {
        let _ = root.borrow_mut().insert_symbol(entry_for(definition, &module_name));

        if let Definition::Component(component) = definition {
            let scope = Scope::new(fresh_id(), &component.name.name, Some(Rc::clone(&root)));
            for member in &component.members {
                let _ = scope
                    .borrow_mut()
                    .insert_symbol(entry_for(member, &module_name));
            }
            components.insert(component.name.name.clone(), scope);
        }
    }

    // Second pass: functions may run on components declared later in the
    // module body.
    let mut functions = FxHashMap::default();
    for definition in &module.definitions.definitions {
        let Definition::Function(function) = definition else {
            continue;
        };
        let scope = Scope::new(fresh_id(), &function.name.name, Some(Rc::clone(&root)));
        for parameter in &function.parameters.parameters {
            let _ = scope.borrow_mut().insert_symbol(SymbolEntry {
                name: parameter.name.name.clone(),
                node_id: parameter.id,
                visibility: Visibility::Private,
                module: module_name.clone(),
                location: parameter.name.location.clone(),
            });
        }
        if let Some(runs_on) = &function.runs_on {
            if let Some(component_scope) = components.get(&runs_on.name) {
                scope.borrow_mut().set_runs_on(Rc::clone(component_scope));
            }
        }
        functions.insert(function.name.name.clone(), scope);
    }

    ModuleScopes {
        module: root,
        components,
        functions,
    }
}

fn entry_for(definition: &Definition, module_name: &str) -> SymbolEntry {
    SymbolEntry {
        name: definition.name().to_owned(),
        node_id: definition.id(),
        visibility: definition.visibility(),
        module: module_name.to_owned(),
        location: definition.name_location().clone(),
    }
}
