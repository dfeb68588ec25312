//! Timestamp-gated semantic checks.
//!
//! Every check follows the same memoization discipline: skip when the cached
//! timestamp is not less than the current one, run otherwise, and record the
//! timestamp unconditionally, even when findings were reported, so repeated
//! checks on an unchanged tree stay O(1).

use rustc_hash::{FxHashMap, FxHashSet};

use tessera_ast::nodes::{Definitions, FriendModule, ImportModule, Module, ModuleKind, Visibility};
use tessera_ast::timestamp::CompilationTimestamp;

use crate::diagnostics::{Diagnostic, DiagnosticSink, Severity};
use crate::project::ModuleIndex;
use crate::recursion::check_module_recursions;

/// Everything one check pass needs: the current generation, the module
/// index, the sink, and the severity configured for missing modules.
pub struct CheckContext<'a> {
    pub now: CompilationTimestamp,
    pub index: &'a dyn ModuleIndex,
    pub missing_module_severity: Severity,
    pub sink: &'a mut dyn DiagnosticSink,
}

impl CheckContext<'_> {
    /// Runs the full semantic pass over one module: uniqueness, friend and
    /// import resolution, and the cycle check over parameter defaults.
    pub fn check_module(&mut self, module: &Module) {
        self.check_uniqueness(&module.definitions);
        for friend in &module.definitions.friends {
            self.check_friend(friend);
        }
        for import in &module.definitions.imports {
            self.check_import(import);
        }
        check_module_recursions(module, self.now, self.sink);
    }

    /// Resolves a friend declaration against the module index. A friend must
    /// name an existing specification module; a missing target is reported
    /// at the configured severity, a wrong-kind target is a hard error.
    pub fn check_friend(&mut self, friend: &FriendModule) {
        if friend.check.is_fresh(self.now) {
            return;
        }
        match self.index.get_module_by_name(&friend.module_name.name) {
            None => self.sink.report(Diagnostic::missing_module(
                self.missing_module_severity,
                friend.module_name.location.clone(),
                &friend.module_name.name,
            )),
            Some(module) if module.kind != ModuleKind::Spec => {
                self.sink.report(Diagnostic::wrong_module_kind(
                    friend.module_name.location.clone(),
                    &friend.module_name.name,
                ));
            }
            Some(_) => {}
        }
        friend.check.record(self.now);
    }

    /// Resolves an import against the module index. Imports may target any
    /// module kind; only a missing target is reported.
    pub fn check_import(&mut self, import: &ImportModule) {
        if import.check.is_fresh(self.now) {
            return;
        }
        if self
            .index
            .get_module_by_name(&import.module_name.name)
            .is_none()
        {
            self.sink.report(Diagnostic::missing_module(
                self.missing_module_severity,
                import.module_name.location.clone(),
                &import.module_name.name,
            ));
        }
        import.check.record(self.now);
    }

    /// No two sibling definitions may share a name within the same
    /// visibility class; group names form their own class; duplicate friend
    /// declarations are harmless but suspicious, so they only warn.
    pub fn check_uniqueness(&mut self, definitions: &Definitions) {
        if definitions.uniqueness_check.is_fresh(self.now) {
            return;
        }

        let mut seen: FxHashSet<(Visibility, &str)> = FxHashSet::default();
        for definition in &definitions.definitions {
            if !seen.insert((definition.visibility(), definition.name())) {
                self.sink.report(Diagnostic::duplicate_definition(
                    definition.name_location().clone(),
                    definition.name(),
                ));
            }
        }

        let mut group_names: FxHashSet<&str> = FxHashSet::default();
        for group in &definitions.groups {
            if !group_names.insert(&group.name.name) {
                self.sink.report(Diagnostic::duplicate_definition(
                    group.name.location.clone(),
                    &group.name.name,
                ));
            }
        }

        let mut friend_targets: FxHashMap<&str, usize> = FxHashMap::default();
        for friend in &definitions.friends {
            let count = friend_targets
                .entry(friend.module_name.name.as_str())
                .or_insert(0);
            *count += 1;
            if *count > 1 {
                self.sink.report(Diagnostic::duplicate_friend(
                    friend.module_name.location.clone(),
                    &friend.module_name.name,
                ));
            }
        }

        definitions.uniqueness_check.record(self.now);
    }
}
