//! Node side table.
//!
//! Ownership in the tree is strictly parent-to-child, so parent links and
//! full-name paths live outside the nodes, keyed by node id. The registry is
//! rebuilt from the module root after a parse or an incremental merge; it is
//! a lookup index, never an owner.

use rustc_hash::FxHashMap;

use crate::nodes::Module;
use crate::visitor::{AstVisitor, NodeRef, VisitAction};

/// Parent links, child order and diagnostic full names for one module tree.
///
/// Node ids are assumed unique within the tree. Synthetic nodes (generated
/// default parameters, all carrying the null location) are not indexed.
#[derive(Debug, Default)]
pub struct NodeRegistry {
    parents: FxHashMap<u32, u32>,
    children: FxHashMap<u32, Vec<u32>>,
    full_names: FxHashMap<u32, String>,
}

impl NodeRegistry {
    #[must_use]
    pub fn build(module: &Module) -> Self {
        let mut indexer = Indexer::default();
        module.accept(&mut indexer);
        indexer.registry
    }

    #[must_use]
    pub fn parent(&self, id: u32) -> Option<u32> {
        self.parents.get(&id).copied()
    }

    /// Child ids in declaration order. Empty for leaves and unknown ids.
    #[must_use]
    pub fn children(&self, id: u32) -> &[u32] {
        self.children.get(&id).map_or(&[], Vec::as_slice)
    }

    /// Dotted path of the named constructs enclosing a node, e.g.
    /// `M.C.setup` for a function inside a component. Only named nodes
    /// carry a full name.
    #[must_use]
    pub fn full_name(&self, id: u32) -> Option<&str> {
        self.full_names.get(&id).map(String::as_str)
    }
}

#[derive(Default)]
struct Indexer {
    registry: NodeRegistry,
    ancestry: Vec<u32>,
    path: Vec<String>,
}

fn synthetic(node: NodeRef<'_>) -> bool {
    node.location().is_null()
}

impl AstVisitor for Indexer {
    fn visit(&mut self, node: NodeRef<'_>) -> VisitAction {
        if synthetic(node) {
            return VisitAction::SkipSubtree;
        }
        if let Some(&parent) = self.ancestry.last() {
            self.registry.parents.insert(node.id(), parent);
            self.registry
                .children
                .entry(parent)
                .or_default()
                .push(node.id());
        }
        if let Some(segment) = node.name_segment() {
            self.path.push(segment.to_owned());
            self.registry
                .full_names
                .insert(node.id(), self.path.join("."));
        }
        self.ancestry.push(node.id());
        VisitAction::Continue
    }

    fn leave(&mut self, node: NodeRef<'_>) {
        if synthetic(node) {
            return;
        }
        self.ancestry.pop();
        if node.name_segment().is_some() {
            self.path.pop();
        }
    }
}
