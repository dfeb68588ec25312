//! Edit-to-recheck flows: the incremental protocol applied to whole modules,
//! followed by semantic checks over the patched tree.

use tessera_ast::errors::ReparseRequired;
use tessera_ast::incremental::{EditContext, UpdateSyntax};
use tessera_semantic::checks::CheckContext;
use tessera_semantic::diagnostics::{Diagnostics, Severity};
use tessera_semantic::project::Project;

use crate::utils::{
    const_def, empty_definitions, friend_decl, int_value, loc, spec_module, FILE, StubGrammar,
};

#[test]
fn undamaged_update_changes_nothing() {
    let grammar = StubGrammar::default();
    let mut definitions = empty_definitions();
    definitions
        .definitions
        .push(const_def(10, 20, "a", int_value(40, 35, 1)));
    definitions.friends.push(friend_decl(50, 100, "F"));
    let mut module = spec_module("M", definitions);

    let project = Project::default();
    let now = project.advance();
    module.definitions.uniqueness_check.record(now);
    module.definitions.friends[0].check.record(now);

    let before = module.clone();
    // An edit entirely after the module: locations and caches stay put.
    let mut ctx = EditContext::new(&grammar, FILE, 250, 250, 0);
    module.apply_edit(&mut ctx).unwrap();

    assert_eq!(module, before);
    assert!(module.definitions.uniqueness_check.is_fresh(now));
    assert!(module.definitions.friends[0].check.is_fresh(now));
    assert_eq!(grammar.reparse_calls.get(), 0);
}

#[test]
fn merge_is_atomic_when_the_grammar_reports_errors() {
    let grammar = StubGrammar {
        reparsed_definitions: vec![const_def(90, 20, "a", int_value(95, 35, 2))],
        reparsed_friends: vec![friend_decl(60, 120, "F")],
        error_count: 1,
        ..StubGrammar::default()
    };
    let mut definitions = empty_definitions();
    definitions
        .definitions
        .push(const_def(10, 20, "a", int_value(40, 35, 1)));
    let mut module = spec_module("M", definitions);

    // Damage the const's literal; literals always escalate to the block.
    let mut ctx = EditContext::new(&grammar, FILE, 35, 36, 1);
    assert_eq!(module.apply_edit(&mut ctx), Err(ReparseRequired));

    // Nothing speculative made it into the tree.
    assert_eq!(grammar.reparse_calls.get(), 1);
    assert_eq!(module.definitions.definitions.len(), 1);
    assert_eq!(module.definitions.definitions[0].id(), 10);
    assert!(module.definitions.friends.is_empty());
}

#[test]
fn merged_content_is_picked_up_by_the_next_check_pass() {
    let grammar = StubGrammar {
        reparsed_definitions: vec![const_def(90, 20, "a", int_value(95, 35, 2))],
        reparsed_friends: vec![friend_decl(60, 120, "F")],
        ..StubGrammar::default()
    };
    let mut definitions = empty_definitions();
    definitions
        .definitions
        .push(const_def(10, 20, "a", int_value(40, 35, 1)));
    let mut module = spec_module("M", definitions);

    let project = Project::default();
    let now = project.advance();
    module.definitions.uniqueness_check.record(now);

    let mut ctx = EditContext::new(&grammar, FILE, 35, 36, 0);
    module.apply_edit(&mut ctx).unwrap();

    // The stale const was replaced and the new friend attached.
    assert_eq!(module.definitions.definitions.len(), 1);
    assert_eq!(module.definitions.definitions[0].id(), 90);
    assert_eq!(module.definitions.friends.len(), 1);
    assert!(!module.definitions.uniqueness_check.is_fresh(now));

    // The next pass re-validates everything; F is not in the project.
    let recheck = project.advance();
    let mut sink = Diagnostics::default();
    let mut check = CheckContext {
        now: recheck,
        index: &project,
        missing_module_severity: Severity::Warning,
        sink: &mut sink,
    };
    check.check_module(&module);

    assert_eq!(sink.len(), 1);
    let diagnostic = sink.iter().next().unwrap();
    assert_eq!(diagnostic.message, "There is no module with name `F'");
    assert!(module.definitions.friends[0].check.is_fresh(recheck));
    assert!(module.definitions.uniqueness_check.is_fresh(recheck));
}

#[test]
fn failed_relex_escalates_the_whole_friend_declaration() {
    // relex_result stays None, so the grammar cannot lex the damaged token.
    let grammar = StubGrammar::default();
    let mut friend = friend_decl(50, 100, "F");

    // The identifier at [107, 108) is fully enveloped by the damage.
    let mut ctx = EditContext::new(&grammar, FILE, 107, 108, 0);
    assert_eq!(friend.update_syntax(&mut ctx, true), Err(ReparseRequired));

    // No partially updated identifier is left behind.
    assert_eq!(friend.module_name.name, "F");
    assert_eq!(friend.module_name.location, loc(107, 108));
}
