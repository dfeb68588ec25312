//! Project module index.
//!
//! Module resolution is an in-memory lookup, never I/O. The index is a trait
//! so checks can be exercised against injected doubles (e.g. an index that
//! counts resolutions to observe memoization).

use rustc_hash::FxHashMap;

use tessera_ast::nodes::Module;
use tessera_ast::timestamp::{CompilationTimestamp, TimestampSource};

pub trait ModuleIndex {
    fn get_module_by_name(&self, name: &str) -> Option<&Module>;
}

/// Owns the modules of one project plus the compilation timestamp source.
/// Inserting or replacing a module advances the timestamp, so every cached
/// check result from the previous generation goes stale at once.
#[derive(Debug, Default)]
pub struct Project {
    modules: FxHashMap<String, Module>,
    timestamps: TimestampSource,
}

impl Project {
    /// Adds or replaces a module and opens a new check generation.
    pub fn insert_module(&mut self, module: Module) -> CompilationTimestamp {
        self.modules.insert(module.name().to_owned(), module);
        self.timestamps.advance()
    }

    pub fn remove_module(&mut self, name: &str) -> Option<Module> {
        let removed = self.modules.remove(name);
        if removed.is_some() {
            self.timestamps.advance();
        }
        removed
    }

    /// Opens a new check generation without changing any module, e.g. after
    /// an in-place incremental update of an owned tree.
    pub fn advance(&self) -> CompilationTimestamp {
        self.timestamps.advance()
    }

    #[must_use]
    pub fn now(&self) -> CompilationTimestamp {
        self.timestamps.current()
    }

    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }
}

impl ModuleIndex for Project {
    fn get_module_by_name(&self, name: &str) -> Option<&Module> {
        self.modules.get(name)
    }
}
