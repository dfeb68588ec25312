//! AST node definitions for the Tessera specification language.
//!
//! Nodes are plain structs generated by the `ast_node!` macro family; every
//! node carries a sequential `id`, a [`Location`], and an `erroneous` flag.
//! Node categories are closed tagged unions over those structs. Ownership is
//! parent-to-child and tree-shaped; nodes are never shared between trees.
//! Parent links live in a separate side table (see `registry`).

use crate::location::Location;
use crate::timestamp::CheckCache;

#[macro_export]
macro_rules! ast_node {
    (
        $(#[$outer:meta])*
        $struct_vis:vis struct $name:ident {
            $(
                $(#[$field_attr:meta])*
                $field_vis:vis $field_name:ident : $field_ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Clone, PartialEq, Eq, Debug)]
        $struct_vis struct $name {
            pub id: u32,
            pub location: $crate::location::Location,
            /// Set when the node was produced from damaged or unparsable text.
            pub erroneous: ::std::cell::Cell<bool>,
            $(
                $(#[$field_attr])*
                $field_vis $field_name : $field_ty,
            )*
        }
    };
}

macro_rules! ast_nodes {
    (
        $(
            $(#[$outer:meta])*
            $struct_vis:vis struct $name:ident { $($fields:tt)* }
        )+
    ) => {
        $(
            ast_node! {
                $(#[$outer])*
                $struct_vis struct $name { $($fields)* }
            }
        )+
    };
}

macro_rules! ast_enum {
    (
        $(#[$outer:meta])*
        $enum_vis:vis enum $name:ident {
            $(
                $(#[$arm_attr:meta])*
                $arm:ident ( $payload:ty ) ,
            )*
        }
    ) => {
        $(#[$outer])*
        #[derive(Clone, PartialEq, Eq, Debug)]
        $enum_vis enum $name {
            $(
                $(#[$arm_attr])*
                $arm ( $payload ) ,
            )*
        }

        impl $name {
            #[must_use]
            pub fn id(&self) -> u32 {
                match self {
                    $(
                        $name::$arm(node) => node.id,
                    )*
                }
            }

            #[must_use]
            pub fn location(&self) -> &Location {
                match self {
                    $(
                        $name::$arm(node) => &node.location,
                    )*
                }
            }

            pub fn set_erroneous(&self, flag: bool) {
                match self {
                    $(
                        $name::$arm(node) => node.erroneous.set(flag),
                    )*
                }
            }
        }
    };
}

macro_rules! ast_enums {
    (
        $(
            $(#[$outer:meta])*
            $enum_vis:vis enum $name:ident { $($arms:tt)* }
        )+
    ) => {
        $(
            ast_enum! {
                $(#[$outer])*
                $enum_vis enum $name { $($arms)* }
            }
        )+
    };
}

/// Visibility of a definition towards other modules, checked at resolution
/// time rather than tree-construction time.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Visibility {
    #[default]
    Private,
    Friend,
    Public,
}

/// Kind of a module. Friend declarations may only target specification
/// modules.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ModuleKind {
    #[default]
    Spec,
    Data,
}

ast_enums! {

    pub enum Definition {
        Const(ConstDefinition),
        Template(TemplateDefinition),
        Component(ComponentDefinition),
        Function(FunctionDefinition),
    }

    pub enum Value {
        Integer(IntegerValue),
        Str(StringValue),
        Referenced(ReferencedValue),
    }

    /// A concrete argument supplied at an instantiation site. Closed union:
    /// pattern matching, not open-ended dispatch.
    pub enum ActualParameter {
        Value(ValueParameter),
        Reference(ReferenceParameter),
        Default(DefaultParameter),
    }
}

ast_nodes! {

    pub struct Module {
        pub kind: ModuleKind,
        pub name: Identifier,
        pub definitions: Definitions,
    }

    pub struct Identifier {
        pub name: String,
    }

    /// Ordered container for everything declared inside a module body.
    /// Mutated only by a full parse or by the incremental merge.
    pub struct Definitions {
        pub definitions: Vec<Definition>,
        pub groups: Vec<Group>,
        pub imports: Vec<ImportModule>,
        pub friends: Vec<FriendModule>,
        pub control: Option<ControlPart>,
        /// Gate for the duplicate-name check; cleared whenever the
        /// incremental merge attaches new content.
        pub uniqueness_check: CheckCache,
        /// Gate for the cycle check over parameter defaults.
        pub recursion_check: CheckCache,
    }

    pub struct Group {
        pub name: Identifier,
    }

    pub struct ImportModule {
        pub module_name: Identifier,
        pub attribute_path: Option<String>,
        pub check: CheckCache,
    }

    pub struct FriendModule {
        pub module_name: Identifier,
        pub attribute_path: Option<String>,
        pub check: CheckCache,
    }

    pub struct ControlPart {
    }

    pub struct ConstDefinition {
        pub visibility: Visibility,
        pub name: Identifier,
        pub value: Value,
    }

    pub struct TemplateDefinition {
        pub visibility: Visibility,
        pub name: Identifier,
        pub parameters: FormalParameterList,
        pub body: Value,
    }

    pub struct ComponentDefinition {
        pub visibility: Visibility,
        pub name: Identifier,
        pub members: Vec<Definition>,
    }

    pub struct FunctionDefinition {
        pub visibility: Visibility,
        pub name: Identifier,
        pub parameters: FormalParameterList,
        pub runs_on: Option<Identifier>,
    }

    pub struct FormalParameterList {
        pub parameters: Vec<FormalParameter>,
    }

    pub struct FormalParameter {
        pub name: Identifier,
        pub default: Option<Value>,
    }

    pub struct ActualParameterList {
        pub parameters: Vec<ActualParameter>,
    }

    pub struct ValueParameter {
        pub value: Value,
    }

    pub struct ReferenceParameter {
        pub reference: Reference,
    }

    /// "Use the formal parameter's default": exclusively owns the generated
    /// default sub-parameter, a synthetic node with a null location.
    pub struct DefaultParameter {
        pub parameter: Box<ActualParameter>,
    }

    pub struct Reference {
        pub module: Option<Identifier>,
        pub name: Identifier,
        pub parameters: Option<ActualParameterList>,
    }

    pub struct IntegerValue {
        pub value: i64,
    }

    pub struct StringValue {
        pub value: String,
    }

    pub struct ReferencedValue {
        pub reference: Reference,
    }

}
