//! Friend/import resolution scenarios and the memoization discipline,
//! observed through injected collaborators.

use tessera_ast::timestamp::CompilationTimestamp;
use tessera_semantic::checks::CheckContext;
use tessera_semantic::diagnostics::{Diagnostic, Diagnostics, Severity};
use tessera_semantic::project::{ModuleIndex, Project};

use crate::utils::{empty_definitions, friend_decl, loc, spec_module, CountingIndex};

#[test]
fn missing_friend_module_is_reported_not_raised() {
    let mut definitions = empty_definitions();
    definitions.friends.push(friend_decl(50, 100, "F"));
    let mut project = Project::default();
    let now = project.insert_module(spec_module("M", definitions));

    let mut sink = Diagnostics::default();
    {
        let module = project.get_module_by_name("M").unwrap();
        let mut ctx = CheckContext {
            now,
            index: &project,
            missing_module_severity: Severity::Warning,
            sink: &mut sink,
        };
        ctx.check_module(module);
    }

    assert_eq!(sink.len(), 1);
    let diagnostic = sink.iter().next().unwrap();
    assert_eq!(diagnostic.message, "There is no module with name `F'");
    assert_eq!(diagnostic.severity, Severity::Warning);
    // At the friend's declared identifier, not at the module root.
    assert_eq!(diagnostic.location, loc(107, 108));
}

#[test]
fn an_unchanged_tree_is_never_re_resolved() {
    let mut definitions = empty_definitions();
    definitions.friends.push(friend_decl(50, 100, "F"));
    let module = spec_module("M", definitions);
    let index = CountingIndex::new([spec_module("F", empty_definitions())]);

    let t1 = CompilationTimestamp::default().tick();
    let mut sink = Diagnostics::default();
    {
        let mut ctx = CheckContext {
            now: t1,
            index: &index,
            missing_module_severity: Severity::Warning,
            sink: &mut sink,
        };
        ctx.check_friend(&module.definitions.friends[0]);
        assert_eq!(index.lookups.get(), 1);

        // Same generation: memoized, no resolution work.
        ctx.check_friend(&module.definitions.friends[0]);
        assert_eq!(index.lookups.get(), 1);
    }

    // An older generation is also satisfied by the cached result.
    {
        let mut ctx = CheckContext {
            now: CompilationTimestamp::default(),
            index: &index,
            missing_module_severity: Severity::Warning,
            sink: &mut sink,
        };
        ctx.check_friend(&module.definitions.friends[0]);
        assert_eq!(index.lookups.get(), 1);
    }
    assert!(sink.is_empty());

    // A new generation forces one re-resolution.
    {
        let mut ctx = CheckContext {
            now: t1.tick(),
            index: &index,
            missing_module_severity: Severity::Warning,
            sink: &mut sink,
        };
        ctx.check_friend(&module.definitions.friends[0]);
    }
    assert_eq!(index.lookups.get(), 2);
    assert!(sink.is_empty());
}

#[test]
fn diagnostics_serialize_for_outer_tools() {
    let diagnostic = Diagnostic::missing_module(Severity::Warning, loc(107, 108), "F");
    let json = serde_json::to_value(&diagnostic).unwrap();

    assert_eq!(json["severity"], "Warning");
    assert_eq!(json["message"], "There is no module with name `F'");
    assert_eq!(json["location"]["file"], "m.tsr");
    assert_eq!(json["location"]["start"], 107);
    assert_eq!(json["location"]["end"], 108);
}
