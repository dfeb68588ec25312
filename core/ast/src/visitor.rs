//! Generic tree traversal.
//!
//! External collaborators (reference finders, proposal builders, the node
//! registry) walk the tree exclusively through [`AstVisitor`]; they never
//! touch node internals directly. Every composite node forwards to its owned
//! children in declaration order and short-circuits on abort.

use crate::nodes::{
    ActualParameter, ActualParameterList, ComponentDefinition, ConstDefinition, ControlPart,
    DefaultParameter, Definition, Definitions, FormalParameter, FormalParameterList, FriendModule,
    FunctionDefinition, Group, Identifier, ImportModule, IntegerValue, Module, Reference,
    ReferenceParameter, ReferencedValue, StringValue, TemplateDefinition, Value, ValueParameter,
};
use crate::location::Location;

/// Visitor verdict for one node.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum VisitAction {
    /// Descend into the node's children.
    #[default]
    Continue,
    /// Skip the node's children but keep walking siblings.
    SkipSubtree,
    /// Stop the whole traversal.
    Abort,
}

pub trait AstVisitor {
    fn visit(&mut self, node: NodeRef<'_>) -> VisitAction {
        let _ = node;
        VisitAction::Continue
    }

    fn leave(&mut self, node: NodeRef<'_>) {
        let _ = node;
    }
}

/// Borrowed view of any node kind, handed to visitors.
#[derive(Clone, Copy, Debug)]
pub enum NodeRef<'a> {
    Module(&'a Module),
    Identifier(&'a Identifier),
    Definitions(&'a Definitions),
    Group(&'a Group),
    Import(&'a ImportModule),
    Friend(&'a FriendModule),
    Control(&'a ControlPart),
    Const(&'a ConstDefinition),
    Template(&'a TemplateDefinition),
    Component(&'a ComponentDefinition),
    Function(&'a FunctionDefinition),
    FormalParameterList(&'a FormalParameterList),
    FormalParameter(&'a FormalParameter),
    ActualParameterList(&'a ActualParameterList),
    ValueParameter(&'a ValueParameter),
    ReferenceParameter(&'a ReferenceParameter),
    DefaultParameter(&'a DefaultParameter),
    Reference(&'a Reference),
    Integer(&'a IntegerValue),
    Str(&'a StringValue),
    Referenced(&'a ReferencedValue),
}

impl NodeRef<'_> {
    #[must_use]
    pub fn id(&self) -> u32 {
        match self {
            NodeRef::Module(n) => n.id,
            NodeRef::Identifier(n) => n.id,
            NodeRef::Definitions(n) => n.id,
            NodeRef::Group(n) => n.id,
            NodeRef::Import(n) => n.id,
            NodeRef::Friend(n) => n.id,
            NodeRef::Control(n) => n.id,
            NodeRef::Const(n) => n.id,
            NodeRef::Template(n) => n.id,
            NodeRef::Component(n) => n.id,
            NodeRef::Function(n) => n.id,
            NodeRef::FormalParameterList(n) => n.id,
            NodeRef::FormalParameter(n) => n.id,
            NodeRef::ActualParameterList(n) => n.id,
            NodeRef::ValueParameter(n) => n.id,
            NodeRef::ReferenceParameter(n) => n.id,
            NodeRef::DefaultParameter(n) => n.id,
            NodeRef::Reference(n) => n.id,
            NodeRef::Integer(n) => n.id,
            NodeRef::Str(n) => n.id,
            NodeRef::Referenced(n) => n.id,
        }
    }

    #[must_use]
    pub fn location(&self) -> &Location {
        match self {
            NodeRef::Module(n) => &n.location,
            NodeRef::Identifier(n) => &n.location,
            NodeRef::Definitions(n) => &n.location,
            NodeRef::Group(n) => &n.location,
            NodeRef::Import(n) => &n.location,
            NodeRef::Friend(n) => &n.location,
            NodeRef::Control(n) => &n.location,
            NodeRef::Const(n) => &n.location,
            NodeRef::Template(n) => &n.location,
            NodeRef::Component(n) => &n.location,
            NodeRef::Function(n) => &n.location,
            NodeRef::FormalParameterList(n) => &n.location,
            NodeRef::FormalParameter(n) => &n.location,
            NodeRef::ActualParameterList(n) => &n.location,
            NodeRef::ValueParameter(n) => &n.location,
            NodeRef::ReferenceParameter(n) => &n.location,
            NodeRef::DefaultParameter(n) => &n.location,
            NodeRef::Reference(n) => &n.location,
            NodeRef::Integer(n) => &n.location,
            NodeRef::Str(n) => &n.location,
            NodeRef::Referenced(n) => &n.location,
        }
    }

    /// The path segment this node contributes to a diagnostic full name.
    #[must_use]
    pub fn name_segment(&self) -> Option<&str> {
        match self {
            NodeRef::Module(n) => Some(&n.name.name),
            NodeRef::Group(n) => Some(&n.name.name),
            NodeRef::Const(n) => Some(&n.name.name),
            NodeRef::Template(n) => Some(&n.name.name),
            NodeRef::Component(n) => Some(&n.name.name),
            NodeRef::Function(n) => Some(&n.name.name),
            NodeRef::FormalParameter(n) => Some(&n.name.name),
            NodeRef::Import(n) => Some(&n.module_name.name),
            NodeRef::Friend(n) => Some(&n.module_name.name),
            _ => None,
        }
    }
}

macro_rules! walk {
    ($self:ident, $v:ident, $variant:ident $(, $child:expr)* $(,)?) => {{
        match $v.visit(NodeRef::$variant($self)) {
            VisitAction::Abort => return false,
            VisitAction::SkipSubtree => {
                $v.leave(NodeRef::$variant($self));
                return true;
            }
            VisitAction::Continue => {}
        }
        $(
            if !$child {
                return false;
            }
        )*
        $v.leave(NodeRef::$variant($self));
        true
    }};
}

impl Module {
    pub fn accept(&self, v: &mut dyn AstVisitor) -> bool {
        walk!(self, v, Module, self.name.accept(v), self.definitions.accept(v))
    }
}

impl Identifier {
    pub fn accept(&self, v: &mut dyn AstVisitor) -> bool {
        walk!(self, v, Identifier)
    }
}

impl Definitions {
    pub fn accept(&self, v: &mut dyn AstVisitor) -> bool {
        walk!(
            self,
            v,
            Definitions,
            self.definitions.iter().all(|def| def.accept(v)),
            self.groups.iter().all(|group| group.accept(v)),
            self.imports.iter().all(|import| import.accept(v)),
            self.friends.iter().all(|friend| friend.accept(v)),
            self.control.as_ref().is_none_or(|control| control.accept(v)),
        )
    }
}

impl Group {
    pub fn accept(&self, v: &mut dyn AstVisitor) -> bool {
        walk!(self, v, Group, self.name.accept(v))
    }
}

impl ImportModule {
    pub fn accept(&self, v: &mut dyn AstVisitor) -> bool {
        walk!(self, v, Import, self.module_name.accept(v))
    }
}

impl FriendModule {
    pub fn accept(&self, v: &mut dyn AstVisitor) -> bool {
        walk!(self, v, Friend, self.module_name.accept(v))
    }
}

impl ControlPart {
    pub fn accept(&self, v: &mut dyn AstVisitor) -> bool {
        walk!(self, v, Control)
    }
}

impl Definition {
    pub fn accept(&self, v: &mut dyn AstVisitor) -> bool {
        match self {
            Definition::Const(def) => def.accept(v),
            Definition::Template(def) => def.accept(v),
            Definition::Component(def) => def.accept(v),
            Definition::Function(def) => def.accept(v),
        }
    }
}

impl ConstDefinition {
    pub fn accept(&self, v: &mut dyn AstVisitor) -> bool {
        walk!(self, v, Const, self.name.accept(v), self.value.accept(v))
    }
}

impl TemplateDefinition {
    pub fn accept(&self, v: &mut dyn AstVisitor) -> bool {
        walk!(
            self,
            v,
            Template,
            self.name.accept(v),
            self.parameters.accept(v),
            self.body.accept(v),
        )
    }
}

impl ComponentDefinition {
    pub fn accept(&self, v: &mut dyn AstVisitor) -> bool {
        walk!(
            self,
            v,
            Component,
            self.name.accept(v),
            self.members.iter().all(|member| member.accept(v)),
        )
    }
}

impl FunctionDefinition {
    pub fn accept(&self, v: &mut dyn AstVisitor) -> bool {
        walk!(
            self,
            v,
            Function,
            self.name.accept(v),
            self.parameters.accept(v),
            self.runs_on.as_ref().is_none_or(|runs_on| runs_on.accept(v)),
        )
    }
}

impl FormalParameterList {
    pub fn accept(&self, v: &mut dyn AstVisitor) -> bool {
        walk!(
            self,
            v,
            FormalParameterList,
            self.parameters.iter().all(|param| param.accept(v)),
        )
    }
}

impl FormalParameter {
    pub fn accept(&self, v: &mut dyn AstVisitor) -> bool {
        walk!(
            self,
            v,
            FormalParameter,
            self.name.accept(v),
            self.default.as_ref().is_none_or(|default| default.accept(v)),
        )
    }
}

impl ActualParameterList {
    pub fn accept(&self, v: &mut dyn AstVisitor) -> bool {
        walk!(
            self,
            v,
            ActualParameterList,
            self.parameters.iter().all(|param| param.accept(v)),
        )
    }
}

impl ActualParameter {
    pub fn accept(&self, v: &mut dyn AstVisitor) -> bool {
        match self {
            ActualParameter::Value(param) => param.accept(v),
            ActualParameter::Reference(param) => param.accept(v),
            ActualParameter::Default(param) => param.accept(v),
        }
    }
}

impl ValueParameter {
    pub fn accept(&self, v: &mut dyn AstVisitor) -> bool {
        walk!(self, v, ValueParameter, self.value.accept(v))
    }
}

impl ReferenceParameter {
    pub fn accept(&self, v: &mut dyn AstVisitor) -> bool {
        walk!(self, v, ReferenceParameter, self.reference.accept(v))
    }
}

impl DefaultParameter {
    pub fn accept(&self, v: &mut dyn AstVisitor) -> bool {
        walk!(self, v, DefaultParameter, self.parameter.accept(v))
    }
}

impl Reference {
    pub fn accept(&self, v: &mut dyn AstVisitor) -> bool {
        walk!(
            self,
            v,
            Reference,
            self.module.as_ref().is_none_or(|module| module.accept(v)),
            self.name.accept(v),
            self.parameters.as_ref().is_none_or(|params| params.accept(v)),
        )
    }
}

impl Value {
    pub fn accept(&self, v: &mut dyn AstVisitor) -> bool {
        match self {
            Value::Integer(value) => value.accept(v),
            Value::Str(value) => value.accept(v),
            Value::Referenced(value) => value.accept(v),
        }
    }
}

impl IntegerValue {
    pub fn accept(&self, v: &mut dyn AstVisitor) -> bool {
        walk!(self, v, Integer)
    }
}

impl StringValue {
    pub fn accept(&self, v: &mut dyn AstVisitor) -> bool {
        walk!(self, v, Str)
    }
}

impl ReferencedValue {
    pub fn accept(&self, v: &mut dyn AstVisitor) -> bool {
        walk!(self, v, Referenced, self.reference.accept(v))
    }
}
