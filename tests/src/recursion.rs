//! Cycle-detection scenarios over default-value dependency graphs.

use tessera_ast::location::Location;
use tessera_ast::nodes::{ActualParameter, ActualParameterList, ValueParameter};
use tessera_ast::timestamp::CompilationTimestamp;
use tessera_semantic::diagnostics::Diagnostics;
use tessera_semantic::recursion::{
    check_module_recursions, ChainLink, RecursionChecker, ReferenceChain,
};

use crate::utils::{
    const_def, empty_definitions, formal, int_value, loc, reference_value, spec_module,
    template_def,
};

#[test]
fn transitive_cycle_reports_exactly_one_error_at_the_outermost_definition() {
    // const a = b; const b = c; const c = a;
    let mut definitions = empty_definitions();
    definitions
        .definitions
        .push(const_def(10, 20, "a", reference_value(15, 30, "b", None)));
    definitions
        .definitions
        .push(const_def(40, 50, "b", reference_value(45, 60, "c", None)));
    definitions
        .definitions
        .push(const_def(70, 80, "c", reference_value(75, 90, "a", None)));
    let module = spec_module("M", definitions);

    let mut sink = Diagnostics::default();
    let mut checker = RecursionChecker::new(&module, &mut sink);
    checker.check_definition(&module.definitions.definitions[0]);

    assert_eq!(sink.len(), 1);
    let diagnostic = sink.iter().next().unwrap();
    assert_eq!(
        diagnostic.message,
        "circular reference: `M.a' -> `M.b' -> `M.c' -> `M.a'"
    );
    // Attributed to `a`, the outermost definition of this check.
    assert_eq!(diagnostic.location, loc(26, 27));
}

#[test]
fn acyclic_default_chains_are_clean() {
    // const c0 = 1; const c1 = c0; ... const c4 = c3;
    let mut definitions = empty_definitions();
    definitions
        .definitions
        .push(const_def(10, 20, "c0", int_value(15, 32, 1)));
    for step in 1..5u32 {
        let id = 10 + step * 20;
        let start = 20 + step * 25;
        definitions.definitions.push(const_def(
            id,
            start,
            &format!("c{step}"),
            reference_value(id + 5, start + 12, &format!("c{}", step - 1), None),
        ));
    }
    let module = spec_module("M", definitions);

    let mut sink = Diagnostics::default();
    check_module_recursions(&module, CompilationTimestamp::default().tick(), &mut sink);
    assert!(sink.is_empty());
}

#[test]
fn mark_restore_returns_the_chain_to_its_pre_call_depth() {
    let link = |name: &str| ChainLink {
        module: "M".to_owned(),
        name: name.to_owned(),
        location: Location::null(),
    };
    let mut chain = ReferenceChain::default();
    chain.add(link("outer")).unwrap();
    let before = chain.depth();

    chain.mark_state();
    chain.add(link("a")).unwrap();
    chain.mark_state();
    chain.add(link("b")).unwrap();
    chain.previous_state();
    chain.previous_state();

    assert_eq!(chain.depth(), before);
}

#[test]
fn a_bound_value_satisfies_a_sibling_parameter_default() {
    // template t(a, b := a); const c = t(1);
    // b's generated default references `a`, which is bound to the plain
    // value 1 at the call site; the traversal completes with no cycle.
    let template = template_def(
        10,
        20,
        "t",
        vec![
            formal(11, 32, "a", None),
            formal(14, 36, "b", Some(reference_value(16, 41, "a", None))),
        ],
        int_value(13, 55, 0),
    );
    let actuals = ActualParameterList::new(
        81,
        loc(92, 96),
        vec![ActualParameter::Value(ValueParameter::new(
            82,
            loc(93, 94),
            int_value(83, 93, 1),
        ))],
    );
    let call = reference_value(85, 96, "t", Some(actuals));

    let mut definitions = empty_definitions();
    definitions.definitions.push(template);
    definitions.definitions.push(const_def(80, 90, "c", call));
    let module = spec_module("M", definitions);

    let mut sink = Diagnostics::default();
    check_module_recursions(&module, CompilationTimestamp::default().tick(), &mut sink);
    assert!(sink.is_empty());
}
