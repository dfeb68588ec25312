//! Cycle detection over parameter bindings and default values.
//!
//! The dependency graph is "definition A's default parameter value mentions
//! definition B". Detection runs depth-first with an explicit
//! [`ReferenceChain`] passed by reference through the walk; `mark_state` /
//! `previous_state` bracket every descent so the chain reflects only the
//! current call path, never all paths ever explored. That discipline is what
//! keeps detection correct in DAG-shaped dependency structures with shared
//! default values.

use tessera_ast::location::Location;
use tessera_ast::nodes::{
    ActualParameter, ActualParameterList, DefaultParameter, Definition, FormalParameterList,
    Module, Reference, Value, ValueParameter,
};
use tessera_ast::timestamp::CompilationTimestamp;

use crate::diagnostics::{Diagnostic, DiagnosticSink};

/// One link on the current dependency path.
#[derive(Debug, Clone)]
pub struct ChainLink {
    pub module: String,
    pub name: String,
    pub location: Location,
}

impl ChainLink {
    fn same_definition(&self, other: &ChainLink) -> bool {
        self.module == other.module && self.name == other.name
    }

    fn render(&self) -> String {
        format!("`{}.{}'", self.module, self.name)
    }
}

/// A detected cycle: the rendered loop slice and the location of its
/// outermost definition.
#[derive(Debug, Clone)]
pub struct Cycle {
    pub rendered: String,
    pub location: Location,
}

/// Explicit traversal state shared across one check invocation.
#[derive(Debug, Default)]
pub struct ReferenceChain {
    links: Vec<ChainLink>,
    marks: Vec<usize>,
}

impl ReferenceChain {
    /// Pushes a checkpoint; [`Self::previous_state`] pops back to it.
    pub fn mark_state(&mut self) {
        self.marks.push(self.links.len());
    }

    pub fn previous_state(&mut self) {
        if let Some(length) = self.marks.pop() {
            self.links.truncate(length);
        }
    }

    /// Appends a link, or signals the cycle when the same definition is
    /// already on the current path. The cycle slice starts at the first
    /// occurrence and is attributed to it.
    pub fn add(&mut self, link: ChainLink) -> Result<(), Cycle> {
        if let Some(start) = self
            .links
            .iter()
            .position(|existing| existing.same_definition(&link))
        {
            let mut rendered: Vec<String> =
                self.links[start..].iter().map(ChainLink::render).collect();
            rendered.push(link.render());
            return Err(Cycle {
                rendered: rendered.join(" -> "),
                location: self.links[start].location.clone(),
            });
        }
        self.links.push(link);
        Ok(())
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.links.len()
    }
}

/// Derives the effective actual-parameter list for a call site: supplied
/// bindings pass through, missing trailing ones become generated `Default`
/// parameters owning a synthetic copy of the formal's default value.
#[must_use]
pub fn apply_defaults(
    formals: &FormalParameterList,
    actuals: &ActualParameterList,
) -> ActualParameterList {
    let mut parameters = actuals.parameters.clone();
    for formal in formals.parameters.iter().skip(parameters.len()) {
        let Some(default) = &formal.default else {
            // Missing with no default is a resolution problem, not ours.
            continue;
        };
        let generated = ActualParameter::Value(ValueParameter::new(
            0,
            Location::null(),
            default.clone(),
        ));
        parameters.push(ActualParameter::Default(DefaultParameter::generated(
            generated,
        )));
    }
    ActualParameterList::new(actuals.id, actuals.location.clone(), parameters)
}

/// Checks every definition of a module for circular default-value
/// dependencies. Gated by the module's recursion cache.
pub fn check_module_recursions(
    module: &Module,
    now: CompilationTimestamp,
    sink: &mut dyn DiagnosticSink,
) {
    if module.definitions.recursion_check.is_fresh(now) {
        return;
    }
    let mut checker = RecursionChecker { module, sink };
    for definition in &module.definitions.definitions {
        checker.check_definition(definition);
    }
    module.definitions.recursion_check.record(now);
}

pub struct RecursionChecker<'a> {
    module: &'a Module,
    sink: &'a mut dyn DiagnosticSink,
}

impl<'a> RecursionChecker<'a> {
    #[must_use]
    pub fn new(module: &'a Module, sink: &'a mut dyn DiagnosticSink) -> Self {
        Self { module, sink }
    }

    /// Runs one outermost check. At most one cycle is reported per
    /// invocation, attributed to the cycle's first occurrence on the chain
    /// (for a cycle found below the checked definition that is the cycle's
    /// entry, not the checked definition itself); the chain depth returns to
    /// zero afterwards.
    pub fn check_definition(&mut self, definition: &Definition) {
        let mut chain = ReferenceChain::default();
        let mut reported = false;
        chain.mark_state();
        // The chain starts empty, so the first link can never collide.
        let _ = chain.add(self.link_for(definition));
        self.check_definition_body(definition, &mut chain, &mut reported);
        chain.previous_state();
        debug_assert_eq!(chain.depth(), 0, "unbalanced mark/restore");
    }

    fn link_for(&self, definition: &Definition) -> ChainLink {
        ChainLink {
            module: self.module.name().to_owned(),
            name: definition.name().to_owned(),
            location: definition.name_location().clone(),
        }
    }

    fn check_definition_body(
        &mut self,
        definition: &Definition,
        chain: &mut ReferenceChain,
        reported: &mut bool,
    ) {
        match definition {
            Definition::Const(def) => self.check_value(&def.value, chain, reported),
            Definition::Template(def) => {
                self.check_formals(&def.parameters, chain, reported);
                self.check_value(&def.body, chain, reported);
            }
            Definition::Function(def) => self.check_formals(&def.parameters, chain, reported),
            Definition::Component(def) => {
                for member in &def.members {
                    chain.mark_state();
                    self.check_definition_body(member, chain, reported);
                    chain.previous_state();
                }
            }
        }
    }

    fn check_formals(
        &mut self,
        formals: &FormalParameterList,
        chain: &mut ReferenceChain,
        reported: &mut bool,
    ) {
        for formal in &formals.parameters {
            if let Some(default) = &formal.default {
                chain.mark_state();
                self.check_value(default, chain, reported);
                chain.previous_state();
            }
        }
    }

    fn check_parameter(
        &mut self,
        parameter: &ActualParameter,
        chain: &mut ReferenceChain,
        reported: &mut bool,
    ) {
        match parameter {
            ActualParameter::Value(bound) => {
                chain.mark_state();
                self.check_value(&bound.value, chain, reported);
                chain.previous_state();
            }
            // A bare reference cannot complete a cycle without being
            // evaluated; the referenced entity's own check covers it.
            ActualParameter::Reference(_) => {}
            ActualParameter::Default(bound) => {
                chain.mark_state();
                self.check_parameter(&bound.parameter, chain, reported);
                chain.previous_state();
            }
        }
    }

    fn check_value(&mut self, value: &Value, chain: &mut ReferenceChain, reported: &mut bool) {
        match value {
            Value::Integer(_) | Value::Str(_) => {}
            Value::Referenced(referenced) => {
                self.check_reference(&referenced.reference, chain, reported);
            }
        }
    }

    fn check_reference(
        &mut self,
        reference: &Reference,
        chain: &mut ReferenceChain,
        reported: &mut bool,
    ) {
        let Some(target) = self.resolve(reference) else {
            // Unresolvable names belong to the scope checks; the supplied
            // bindings are still explored.
            if let Some(parameters) = &reference.parameters {
                for parameter in &parameters.parameters {
                    self.check_parameter(parameter, chain, reported);
                }
            }
            return;
        };

        match chain.add(self.link_for(target)) {
            Err(cycle) => {
                if !*reported {
                    self.sink
                        .report(Diagnostic::circular_reference(cycle.location, &cycle.rendered));
                    *reported = true;
                }
            }
            Ok(()) => {
                let effective = formals_of(target).map(|formals| {
                    reference.parameters.as_ref().map_or_else(
                        || {
                            apply_defaults(
                                formals,
                                &ActualParameterList::new(0, Location::null(), Vec::new()),
                            )
                        },
                        |actuals| apply_defaults(formals, actuals),
                    )
                });
                if let Some(parameters) = effective {
                    for parameter in &parameters.parameters {
                        self.check_parameter(parameter, chain, reported);
                    }
                }
                self.check_definition_body(target, chain, reported);
            }
        }
    }

    /// Resolves a reference to a sibling definition of this module.
    /// Cross-module references are left to their own module's check.
    fn resolve(&self, reference: &Reference) -> Option<&'a Definition> {
        if let Some(module) = &reference.module {
            if module.name != self.module.name() {
                return None;
            }
        }
        find_definition(&self.module.definitions.definitions, &reference.name.name)
    }
}

fn find_definition<'a>(definitions: &'a [Definition], name: &str) -> Option<&'a Definition> {
    for definition in definitions {
        if definition.name() == name {
            return Some(definition);
        }
        if let Definition::Component(component) = definition {
            if let Some(found) = find_definition(&component.members, name) {
                return Some(found);
            }
        }
    }
    None
}

fn formals_of(definition: &Definition) -> Option<&FormalParameterList> {
    match definition {
        Definition::Template(def) => Some(&def.parameters),
        Definition::Function(def) => Some(&def.parameters),
        Definition::Const(_) | Definition::Component(_) => None,
    }
}
