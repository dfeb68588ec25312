use std::cell::Cell;

use crate::location::Location;
use crate::nodes::{
    ActualParameter, ActualParameterList, ComponentDefinition, ConstDefinition, ControlPart,
    DefaultParameter, Definition, Definitions, FormalParameter, FormalParameterList, FriendModule,
    FunctionDefinition, Group, Identifier, ImportModule, IntegerValue, Module, ModuleKind,
    Reference, ReferenceParameter, ReferencedValue, StringValue, TemplateDefinition, Value,
    ValueParameter, Visibility,
};
use crate::timestamp::CheckCache;

impl Module {
    #[must_use]
    pub fn new(
        id: u32,
        location: Location,
        kind: ModuleKind,
        name: Identifier,
        definitions: Definitions,
    ) -> Self {
        Self {
            id,
            location,
            erroneous: Cell::new(false),
            kind,
            name,
            definitions,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name.name
    }
}

impl Identifier {
    #[must_use]
    pub fn new(id: u32, location: Location, name: impl Into<String>) -> Self {
        Self {
            id,
            location,
            erroneous: Cell::new(false),
            name: name.into(),
        }
    }
}

impl Definitions {
    #[must_use]
    pub fn new(id: u32, location: Location) -> Self {
        Self {
            id,
            location,
            erroneous: Cell::new(false),
            definitions: Vec::new(),
            groups: Vec::new(),
            imports: Vec::new(),
            friends: Vec::new(),
            control: None,
            uniqueness_check: CheckCache::default(),
            recursion_check: CheckCache::default(),
        }
    }

    /// Discards every cached semantic result for this container. Called by
    /// the incremental merge whenever new content is attached.
    pub fn invalidate_semantics(&self) {
        self.uniqueness_check.invalidate();
        self.recursion_check.invalidate();
        for import in &self.imports {
            import.check.invalidate();
        }
        for friend in &self.friends {
            friend.check.invalidate();
        }
    }
}

impl Group {
    #[must_use]
    pub fn new(id: u32, location: Location, name: Identifier) -> Self {
        Self {
            id,
            location,
            erroneous: Cell::new(false),
            name,
        }
    }
}

impl ImportModule {
    #[must_use]
    pub fn new(id: u32, location: Location, module_name: Identifier) -> Self {
        Self {
            id,
            location,
            erroneous: Cell::new(false),
            module_name,
            attribute_path: None,
            check: CheckCache::default(),
        }
    }
}

impl FriendModule {
    #[must_use]
    pub fn new(id: u32, location: Location, module_name: Identifier) -> Self {
        Self {
            id,
            location,
            erroneous: Cell::new(false),
            module_name,
            attribute_path: None,
            check: CheckCache::default(),
        }
    }
}

impl ControlPart {
    #[must_use]
    pub fn new(id: u32, location: Location) -> Self {
        Self {
            id,
            location,
            erroneous: Cell::new(false),
        }
    }
}

impl ConstDefinition {
    #[must_use]
    pub fn new(
        id: u32,
        location: Location,
        visibility: Visibility,
        name: Identifier,
        value: Value,
    ) -> Self {
        Self {
            id,
            location,
            erroneous: Cell::new(false),
            visibility,
            name,
            value,
        }
    }
}

impl TemplateDefinition {
    #[must_use]
    pub fn new(
        id: u32,
        location: Location,
        visibility: Visibility,
        name: Identifier,
        parameters: FormalParameterList,
        body: Value,
    ) -> Self {
        Self {
            id,
            location,
            erroneous: Cell::new(false),
            visibility,
            name,
            parameters,
            body,
        }
    }
}

impl ComponentDefinition {
    #[must_use]
    pub fn new(
        id: u32,
        location: Location,
        visibility: Visibility,
        name: Identifier,
        members: Vec<Definition>,
    ) -> Self {
        Self {
            id,
            location,
            erroneous: Cell::new(false),
            visibility,
            name,
            members,
        }
    }
}

impl FunctionDefinition {
    #[must_use]
    pub fn new(
        id: u32,
        location: Location,
        visibility: Visibility,
        name: Identifier,
        parameters: FormalParameterList,
        runs_on: Option<Identifier>,
    ) -> Self {
        Self {
            id,
            location,
            erroneous: Cell::new(false),
            visibility,
            name,
            parameters,
            runs_on,
        }
    }
}

impl Definition {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Definition::Const(def) => &def.name.name,
            Definition::Template(def) => &def.name.name,
            Definition::Component(def) => &def.name.name,
            Definition::Function(def) => &def.name.name,
        }
    }

    #[must_use]
    pub fn name_location(&self) -> &Location {
        match self {
            Definition::Const(def) => &def.name.location,
            Definition::Template(def) => &def.name.location,
            Definition::Component(def) => &def.name.location,
            Definition::Function(def) => &def.name.location,
        }
    }

    #[must_use]
    pub fn visibility(&self) -> Visibility {
        match self {
            Definition::Const(def) => def.visibility,
            Definition::Template(def) => def.visibility,
            Definition::Component(def) => def.visibility,
            Definition::Function(def) => def.visibility,
        }
    }
}

impl FormalParameterList {
    #[must_use]
    pub fn new(id: u32, location: Location, parameters: Vec<FormalParameter>) -> Self {
        Self {
            id,
            location,
            erroneous: Cell::new(false),
            parameters,
        }
    }
}

impl FormalParameter {
    #[must_use]
    pub fn new(id: u32, location: Location, name: Identifier, default: Option<Value>) -> Self {
        Self {
            id,
            location,
            erroneous: Cell::new(false),
            name,
            default,
        }
    }
}

impl ActualParameterList {
    #[must_use]
    pub fn new(id: u32, location: Location, parameters: Vec<ActualParameter>) -> Self {
        Self {
            id,
            location,
            erroneous: Cell::new(false),
            parameters,
        }
    }
}

impl ValueParameter {
    #[must_use]
    pub fn new(id: u32, location: Location, value: Value) -> Self {
        Self {
            id,
            location,
            erroneous: Cell::new(false),
            value,
        }
    }
}

impl ReferenceParameter {
    #[must_use]
    pub fn new(id: u32, location: Location, reference: Reference) -> Self {
        Self {
            id,
            location,
            erroneous: Cell::new(false),
            reference,
        }
    }
}

impl DefaultParameter {
    /// Wraps the actual parameter generated from a formal parameter's
    /// default value. The wrapper is synthetic: it carries the null location
    /// and is exempt from the valid-location invariant.
    #[must_use]
    pub fn generated(parameter: ActualParameter) -> Self {
        Self {
            id: 0,
            location: Location::null(),
            erroneous: Cell::new(false),
            parameter: Box::new(parameter),
        }
    }
}

impl Reference {
    #[must_use]
    pub fn new(
        id: u32,
        location: Location,
        module: Option<Identifier>,
        name: Identifier,
        parameters: Option<ActualParameterList>,
    ) -> Self {
        Self {
            id,
            location,
            erroneous: Cell::new(false),
            module,
            name,
            parameters,
        }
    }
}

impl IntegerValue {
    #[must_use]
    pub fn new(id: u32, location: Location, value: i64) -> Self {
        Self {
            id,
            location,
            erroneous: Cell::new(false),
            value,
        }
    }
}

impl StringValue {
    #[must_use]
    pub fn new(id: u32, location: Location, value: impl Into<String>) -> Self {
        Self {
            id,
            location,
            erroneous: Cell::new(false),
            value: value.into(),
        }
    }
}

impl ReferencedValue {
    #[must_use]
    pub fn new(id: u32, location: Location, reference: Reference) -> Self {
        Self {
            id,
            location,
            erroneous: Cell::new(false),
            reference,
        }
    }
}
