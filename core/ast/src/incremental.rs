//! Incremental update protocol.
//!
//! An edit produces a damaged region. The protocol walks the existing tree
//! top-down; every node decides locally whether it can patch itself in place
//! or must fail with [`ReparseRequired`], in which case the owning container
//! replaces the single stale child and leaves its siblings untouched.
//! Undamaged nodes only re-anchor their recorded locations against the text
//! shift. Children are always processed in declaration order because later
//! siblings' bookkeeping depends on earlier siblings having been shifted.

use crate::errors::ReparseRequired;
use crate::grammar::Grammar;
use crate::location::Location;
use crate::nodes::{
    ActualParameter, ActualParameterList, ComponentDefinition, ConstDefinition, DefaultParameter,
    Definition, Definitions, FormalParameter, FormalParameterList, FriendModule,
    FunctionDefinition, Group, Identifier, ImportModule, IntegerValue, Module, Reference,
    ReferenceParameter, ReferencedValue, StringValue, TemplateDefinition, Value, ValueParameter,
};

/// One edit applied to one source buffer: the damaged byte range in old
/// coordinates plus the net length change of the replacement text.
///
/// The damaged region only ever widens; a node that re-lexes a token larger
/// than the original damage extends the region so later siblings see the
/// true extent.
pub struct EditContext<'g> {
    file: String,
    damage_start: u32,
    damage_end: u32,
    shift: i32,
    grammar: &'g dyn Grammar,
}

impl<'g> EditContext<'g> {
    #[must_use]
    pub fn new(
        grammar: &'g dyn Grammar,
        file: impl Into<String>,
        damage_start: u32,
        damage_end: u32,
        shift: i32,
    ) -> Self {
        debug_assert!(damage_start <= damage_end, "inverted damage range");
        Self {
            file: file.into(),
            damage_start,
            damage_end,
            shift,
            grammar,
        }
    }

    /// True when `location` intersects the damaged region.
    #[must_use]
    pub fn touches(&self, location: &Location) -> bool {
        location.file == self.file && location.intersects(self.damage_start, self.damage_end)
    }

    /// True when the damaged region fully covers `location`.
    #[must_use]
    pub fn envelops(&self, location: &Location) -> bool {
        !location.is_null()
            && location.file == self.file
            && self.damage_start <= location.start
            && location.end <= self.damage_end
    }

    /// Damage for a child node: a child is only damaged if its parent is.
    #[must_use]
    pub fn child_damage(&self, parent_damaged: bool, location: &Location) -> bool {
        parent_damaged && self.touches(location)
    }

    /// Widens the damaged region to include `[start, end)`. Never shrinks.
    pub fn extend_damage(&mut self, start: u32, end: u32) {
        self.damage_start = self.damage_start.min(start);
        self.damage_end = self.damage_end.max(end);
    }

    #[must_use]
    pub fn damaged_span(&self) -> Location {
        Location::new(self.file.clone(), self.damage_start, self.damage_end)
    }

    /// Re-anchors a location in old coordinates against the text shift.
    /// Positions at the damage boundary are right-biased: an insertion at a
    /// node's end stays outside the node, an insertion at a node's start
    /// pushes the node rightward.
    pub fn shift_location(&self, location: &mut Location) {
        if self.shift == 0 || location.is_null() || location.file != self.file {
            return;
        }
        if location.start >= self.damage_end {
            location.start = self.shifted(location.start);
        }
        if location.end > self.damage_end {
            location.end = self.shifted(location.end);
        }
    }

    fn shifted(&self, position: u32) -> u32 {
        let moved = i64::from(position) + i64::from(self.shift);
        u32::try_from(moved.max(0)).unwrap_or(u32::MAX)
    }
}

/// Per-node-kind patch-or-escalate contract.
///
/// `is_damaged` is true when the node's own location intersects the edit.
/// A damaged node either re-derives its damaged leaf sub-construct locally
/// or fails with [`ReparseRequired`]; an undamaged node shifts its location
/// and recurses unconditionally.
pub trait UpdateSyntax {
    fn update_syntax(
        &mut self,
        ctx: &mut EditContext<'_>,
        is_damaged: bool,
    ) -> Result<(), ReparseRequired>;
}

/// Patches or shifts an owned identifier. When the identifier is hit by the
/// edit the damage is first widened to the whole token so the re-lex sees a
/// complete identifier span.
fn update_identifier(
    ctx: &mut EditContext<'_>,
    identifier: &mut Identifier,
    parent_damaged: bool,
) -> Result<(), ReparseRequired> {
    if ctx.child_damage(parent_damaged, &identifier.location) {
        ctx.extend_damage(identifier.location.start, identifier.location.end);
        identifier.update_syntax(ctx, true)
    } else {
        identifier.update_syntax(ctx, false)
    }
}

impl Module {
    /// Entry point for one edit: computes the module's own damage flag and
    /// runs the protocol over the whole tree.
    pub fn apply_edit(&mut self, ctx: &mut EditContext<'_>) -> Result<(), ReparseRequired> {
        let damaged = ctx.touches(&self.location);
        self.update_syntax(ctx, damaged)
    }
}

impl UpdateSyntax for Module {
    fn update_syntax(
        &mut self,
        ctx: &mut EditContext<'_>,
        is_damaged: bool,
    ) -> Result<(), ReparseRequired> {
        let name_damaged = ctx.child_damage(is_damaged, &self.name.location);
        let body_damaged = ctx.child_damage(is_damaged, &self.definitions.location);
        // Damage absorbed by no sub-construct (keyword, braces) cannot be
        // patched; the module must be re-derived from source.
        if is_damaged && !name_damaged && !body_damaged {
            return Err(ReparseRequired);
        }
        update_identifier(ctx, &mut self.name, is_damaged)?;
        self.definitions.update_syntax(ctx, body_damaged)?;
        ctx.shift_location(&mut self.location);
        Ok(())
    }
}

impl UpdateSyntax for Identifier {
    fn update_syntax(
        &mut self,
        ctx: &mut EditContext<'_>,
        is_damaged: bool,
    ) -> Result<(), ReparseRequired> {
        if !is_damaged {
            ctx.shift_location(&mut self.location);
            return Ok(());
        }
        // A damaged identifier must be fully enveloped; anything else is a
        // malformed edit context and always escalates.
        if !ctx.envelops(&self.location) {
            return Err(ReparseRequired);
        }
        let outcome = ctx.grammar.relex_identifier(&ctx.damaged_span());
        if outcome.code != 0 {
            return Err(ReparseRequired);
        }
        let Some(fresh) = outcome.identifier else {
            return Err(ReparseRequired);
        };
        // The fresh token carries its post-edit location; the damage region
        // stays in pre-edit coordinates and is not extended by it.
        self.name = fresh.name;
        self.location = fresh.location;
        self.erroneous.set(false);
        Ok(())
    }
}

impl UpdateSyntax for Definitions {
    fn update_syntax(
        &mut self,
        ctx: &mut EditContext<'_>,
        is_damaged: bool,
    ) -> Result<(), ReparseRequired> {
        if !is_damaged {
            for definition in &mut self.definitions {
                definition.update_syntax(ctx, false)?;
            }
            for group in &mut self.groups {
                group.update_syntax(ctx, false)?;
            }
            for import in &mut self.imports {
                import.update_syntax(ctx, false)?;
            }
            for friend in &mut self.friends {
                friend.update_syntax(ctx, false)?;
            }
            if let Some(control) = &mut self.control {
                ctx.shift_location(&mut control.location);
            }
            ctx.shift_location(&mut self.location);
            return Ok(());
        }

        // Patch damaged elements in declaration order; remember the ones
        // whose local patch failed so a block re-derivation can replace
        // them while their siblings stay untouched.
        let mut patched = false;
        let mut stale_definitions = Vec::new();
        let mut stale_groups = Vec::new();
        let mut stale_imports = Vec::new();
        let mut stale_friends = Vec::new();
        let mut stale_control = false;

        for definition in &mut self.definitions {
            if ctx.touches(definition.location()) {
                match definition.update_syntax(ctx, true) {
                    Ok(()) => patched = true,
                    Err(ReparseRequired) => stale_definitions.push(definition.id()),
                }
            } else {
                definition.update_syntax(ctx, false)?;
            }
        }
        for group in &mut self.groups {
            if ctx.touches(&group.location) {
                match group.update_syntax(ctx, true) {
                    Ok(()) => patched = true,
                    Err(ReparseRequired) => stale_groups.push(group.id),
                }
            } else {
                group.update_syntax(ctx, false)?;
            }
        }
        for import in &mut self.imports {
            if ctx.touches(&import.location) {
                match import.update_syntax(ctx, true) {
                    Ok(()) => patched = true,
                    Err(ReparseRequired) => stale_imports.push(import.id),
                }
            } else {
                import.update_syntax(ctx, false)?;
            }
        }
        for friend in &mut self.friends {
            if ctx.touches(&friend.location) {
                match friend.update_syntax(ctx, true) {
                    Ok(()) => patched = true,
                    Err(ReparseRequired) => stale_friends.push(friend.id),
                }
            } else {
                friend.update_syntax(ctx, false)?;
            }
        }
        if let Some(control) = &mut self.control {
            if ctx.touches(&control.location) {
                // A control part has no locally patchable sub-construct.
                stale_control = true;
            } else {
                ctx.shift_location(&mut control.location);
            }
        }

        let any_stale = !stale_definitions.is_empty()
            || !stale_groups.is_empty()
            || !stale_imports.is_empty()
            || !stale_friends.is_empty()
            || stale_control;

        // Re-derive the block when a patch failed or when the damage was
        // absorbed by no element at all (newly typed content).
        if any_stale || !patched {
            let units = ctx.grammar.reparse_definitions(&ctx.damaged_span());
            if units.has_errors() {
                // Atomicity: nothing speculative is merged; the caller
                // falls back to a coarser-grained reparse.
                return Err(ReparseRequired);
            }
            // A module has at most one control part.
            if units.control_parts.len() > 1 {
                return Err(ReparseRequired);
            }
            self.definitions
                .retain(|definition| !stale_definitions.contains(&definition.id()));
            self.groups.retain(|group| !stale_groups.contains(&group.id));
            self.imports
                .retain(|import| !stale_imports.contains(&import.id));
            self.friends
                .retain(|friend| !stale_friends.contains(&friend.id));
            if stale_control {
                self.control = None;
            }
            let fresh_content = !units.is_empty();
            self.definitions.extend(units.definitions);
            self.groups.extend(units.groups);
            self.imports.extend(units.imports);
            self.friends.extend(units.friends);
            if let Some(control) = units.control_parts.into_iter().next() {
                self.control = Some(control);
            }
            // Removed content changes the module just like fresh content
            // does; a delete-only edit must not leave the caches fresh.
            if fresh_content || any_stale {
                self.invalidate_semantics();
            }
        }

        ctx.shift_location(&mut self.location);
        Ok(())
    }
}

impl UpdateSyntax for Group {
    fn update_syntax(
        &mut self,
        ctx: &mut EditContext<'_>,
        is_damaged: bool,
    ) -> Result<(), ReparseRequired> {
        let name_damaged = ctx.child_damage(is_damaged, &self.name.location);
        if is_damaged && !name_damaged {
            return Err(ReparseRequired);
        }
        update_identifier(ctx, &mut self.name, is_damaged)?;
        ctx.shift_location(&mut self.location);
        Ok(())
    }
}

impl UpdateSyntax for ImportModule {
    fn update_syntax(
        &mut self,
        ctx: &mut EditContext<'_>,
        is_damaged: bool,
    ) -> Result<(), ReparseRequired> {
        let name_damaged = ctx.child_damage(is_damaged, &self.module_name.location);
        if is_damaged && !name_damaged {
            // Damage outside the identifier token cannot be patched here.
            return Err(ReparseRequired);
        }
        update_identifier(ctx, &mut self.module_name, is_damaged)?;
        if name_damaged {
            // A renamed target must be re-resolved.
            self.check.invalidate();
        }
        ctx.shift_location(&mut self.location);
        Ok(())
    }
}

impl UpdateSyntax for FriendModule {
    fn update_syntax(
        &mut self,
        ctx: &mut EditContext<'_>,
        is_damaged: bool,
    ) -> Result<(), ReparseRequired> {
        let name_damaged = ctx.child_damage(is_damaged, &self.module_name.location);
        if is_damaged && !name_damaged {
            return Err(ReparseRequired);
        }
        update_identifier(ctx, &mut self.module_name, is_damaged)?;
        if name_damaged {
            self.check.invalidate();
        }
        ctx.shift_location(&mut self.location);
        Ok(())
    }
}

impl UpdateSyntax for Definition {
    fn update_syntax(
        &mut self,
        ctx: &mut EditContext<'_>,
        is_damaged: bool,
    ) -> Result<(), ReparseRequired> {
        match self {
            Definition::Const(def) => def.update_syntax(ctx, is_damaged),
            Definition::Template(def) => def.update_syntax(ctx, is_damaged),
            Definition::Component(def) => def.update_syntax(ctx, is_damaged),
            Definition::Function(def) => def.update_syntax(ctx, is_damaged),
        }
    }
}

impl UpdateSyntax for ConstDefinition {
    fn update_syntax(
        &mut self,
        ctx: &mut EditContext<'_>,
        is_damaged: bool,
    ) -> Result<(), ReparseRequired> {
        let name_damaged = ctx.child_damage(is_damaged, &self.name.location);
        let value_damaged = ctx.child_damage(is_damaged, self.value.location());
        if is_damaged && !name_damaged && !value_damaged {
            return Err(ReparseRequired);
        }
        update_identifier(ctx, &mut self.name, is_damaged)?;
        self.value.update_syntax(ctx, value_damaged)?;
        ctx.shift_location(&mut self.location);
        Ok(())
    }
}

impl UpdateSyntax for TemplateDefinition {
    fn update_syntax(
        &mut self,
        ctx: &mut EditContext<'_>,
        is_damaged: bool,
    ) -> Result<(), ReparseRequired> {
        let name_damaged = ctx.child_damage(is_damaged, &self.name.location);
        let parameters_damaged = ctx.child_damage(is_damaged, &self.parameters.location);
        let body_damaged = ctx.child_damage(is_damaged, self.body.location());
        if is_damaged && !name_damaged && !parameters_damaged && !body_damaged {
            return Err(ReparseRequired);
        }
        update_identifier(ctx, &mut self.name, is_damaged)?;
        self.parameters.update_syntax(ctx, parameters_damaged)?;
        self.body.update_syntax(ctx, body_damaged)?;
        ctx.shift_location(&mut self.location);
        Ok(())
    }
}

impl UpdateSyntax for ComponentDefinition {
    fn update_syntax(
        &mut self,
        ctx: &mut EditContext<'_>,
        is_damaged: bool,
    ) -> Result<(), ReparseRequired> {
        let name_damaged = ctx.child_damage(is_damaged, &self.name.location);
        let any_member_damaged = self
            .members
            .iter()
            .any(|member| ctx.child_damage(is_damaged, member.location()));
        if is_damaged && !name_damaged && !any_member_damaged {
            return Err(ReparseRequired);
        }
        update_identifier(ctx, &mut self.name, is_damaged)?;
        for member in &mut self.members {
            let member_damaged = ctx.child_damage(is_damaged, member.location());
            // A failed member patch escalates; the enclosing definitions
            // block replaces the whole component.
            member.update_syntax(ctx, member_damaged)?;
        }
        ctx.shift_location(&mut self.location);
        Ok(())
    }
}

impl UpdateSyntax for FunctionDefinition {
    fn update_syntax(
        &mut self,
        ctx: &mut EditContext<'_>,
        is_damaged: bool,
    ) -> Result<(), ReparseRequired> {
        let name_damaged = ctx.child_damage(is_damaged, &self.name.location);
        let parameters_damaged = ctx.child_damage(is_damaged, &self.parameters.location);
        let runs_on_damaged = self
            .runs_on
            .as_ref()
            .is_some_and(|runs_on| ctx.child_damage(is_damaged, &runs_on.location));
        if is_damaged && !name_damaged && !parameters_damaged && !runs_on_damaged {
            return Err(ReparseRequired);
        }
        update_identifier(ctx, &mut self.name, is_damaged)?;
        self.parameters.update_syntax(ctx, parameters_damaged)?;
        if let Some(runs_on) = &mut self.runs_on {
            update_identifier(ctx, runs_on, is_damaged)?;
        }
        ctx.shift_location(&mut self.location);
        Ok(())
    }
}

impl UpdateSyntax for FormalParameterList {
    fn update_syntax(
        &mut self,
        ctx: &mut EditContext<'_>,
        is_damaged: bool,
    ) -> Result<(), ReparseRequired> {
        // Damage on list punctuation may change the parameter structure.
        if is_damaged
            && !self
                .parameters
                .iter()
                .any(|parameter| ctx.touches(&parameter.location))
        {
            return Err(ReparseRequired);
        }
        for parameter in &mut self.parameters {
            let parameter_damaged = ctx.child_damage(is_damaged, &parameter.location);
            parameter.update_syntax(ctx, parameter_damaged)?;
        }
        ctx.shift_location(&mut self.location);
        Ok(())
    }
}

impl UpdateSyntax for FormalParameter {
    fn update_syntax(
        &mut self,
        ctx: &mut EditContext<'_>,
        is_damaged: bool,
    ) -> Result<(), ReparseRequired> {
        let name_damaged = ctx.child_damage(is_damaged, &self.name.location);
        let default_damaged = self
            .default
            .as_ref()
            .is_some_and(|default| ctx.child_damage(is_damaged, default.location()));
        if is_damaged && !name_damaged && !default_damaged {
            return Err(ReparseRequired);
        }
        update_identifier(ctx, &mut self.name, is_damaged)?;
        if let Some(default) = &mut self.default {
            default.update_syntax(ctx, default_damaged)?;
        }
        ctx.shift_location(&mut self.location);
        Ok(())
    }
}

impl UpdateSyntax for ActualParameterList {
    fn update_syntax(
        &mut self,
        ctx: &mut EditContext<'_>,
        is_damaged: bool,
    ) -> Result<(), ReparseRequired> {
        if is_damaged
            && !self
                .parameters
                .iter()
                .any(|parameter| ctx.touches(parameter.location()))
        {
            return Err(ReparseRequired);
        }
        for parameter in &mut self.parameters {
            let parameter_damaged = ctx.child_damage(is_damaged, parameter.location());
            parameter.update_syntax(ctx, parameter_damaged)?;
        }
        ctx.shift_location(&mut self.location);
        Ok(())
    }
}

impl UpdateSyntax for ActualParameter {
    fn update_syntax(
        &mut self,
        ctx: &mut EditContext<'_>,
        is_damaged: bool,
    ) -> Result<(), ReparseRequired> {
        match self {
            ActualParameter::Value(parameter) => parameter.update_syntax(ctx, is_damaged),
            ActualParameter::Reference(parameter) => parameter.update_syntax(ctx, is_damaged),
            ActualParameter::Default(parameter) => parameter.update_syntax(ctx, is_damaged),
        }
    }
}

impl UpdateSyntax for ValueParameter {
    fn update_syntax(
        &mut self,
        ctx: &mut EditContext<'_>,
        is_damaged: bool,
    ) -> Result<(), ReparseRequired> {
        let value_damaged = ctx.child_damage(is_damaged, self.value.location());
        if is_damaged && !value_damaged {
            return Err(ReparseRequired);
        }
        self.value.update_syntax(ctx, value_damaged)?;
        ctx.shift_location(&mut self.location);
        Ok(())
    }
}

impl UpdateSyntax for ReferenceParameter {
    fn update_syntax(
        &mut self,
        ctx: &mut EditContext<'_>,
        is_damaged: bool,
    ) -> Result<(), ReparseRequired> {
        let reference_damaged = ctx.child_damage(is_damaged, &self.reference.location);
        if is_damaged && !reference_damaged {
            return Err(ReparseRequired);
        }
        self.reference.update_syntax(ctx, reference_damaged)?;
        ctx.shift_location(&mut self.location);
        Ok(())
    }
}

impl UpdateSyntax for DefaultParameter {
    fn update_syntax(
        &mut self,
        ctx: &mut EditContext<'_>,
        _is_damaged: bool,
    ) -> Result<(), ReparseRequired> {
        // Generated nodes carry the null location and are never damaged by
        // a text edit; only bookkeeping recursion is needed.
        self.parameter.update_syntax(ctx, false)
    }
}

impl UpdateSyntax for Reference {
    fn update_syntax(
        &mut self,
        ctx: &mut EditContext<'_>,
        is_damaged: bool,
    ) -> Result<(), ReparseRequired> {
        let module_damaged = self
            .module
            .as_ref()
            .is_some_and(|module| ctx.child_damage(is_damaged, &module.location));
        let name_damaged = ctx.child_damage(is_damaged, &self.name.location);
        let parameters_damaged = self
            .parameters
            .as_ref()
            .is_some_and(|parameters| ctx.child_damage(is_damaged, &parameters.location));
        if is_damaged && !module_damaged && !name_damaged && !parameters_damaged {
            return Err(ReparseRequired);
        }
        if let Some(module) = &mut self.module {
            update_identifier(ctx, module, is_damaged)?;
        }
        update_identifier(ctx, &mut self.name, is_damaged)?;
        if let Some(parameters) = &mut self.parameters {
            parameters.update_syntax(ctx, parameters_damaged)?;
        }
        ctx.shift_location(&mut self.location);
        Ok(())
    }
}

impl UpdateSyntax for Value {
    fn update_syntax(
        &mut self,
        ctx: &mut EditContext<'_>,
        is_damaged: bool,
    ) -> Result<(), ReparseRequired> {
        match self {
            Value::Integer(value) => value.update_syntax(ctx, is_damaged),
            Value::Str(value) => value.update_syntax(ctx, is_damaged),
            Value::Referenced(value) => value.update_syntax(ctx, is_damaged),
        }
    }
}

impl UpdateSyntax for IntegerValue {
    fn update_syntax(
        &mut self,
        ctx: &mut EditContext<'_>,
        is_damaged: bool,
    ) -> Result<(), ReparseRequired> {
        if is_damaged {
            // Literal tokens are re-derived by the grammar, not patched.
            return Err(ReparseRequired);
        }
        ctx.shift_location(&mut self.location);
        Ok(())
    }
}

impl UpdateSyntax for StringValue {
    fn update_syntax(
        &mut self,
        ctx: &mut EditContext<'_>,
        is_damaged: bool,
    ) -> Result<(), ReparseRequired> {
        if is_damaged {
            return Err(ReparseRequired);
        }
        ctx.shift_location(&mut self.location);
        Ok(())
    }
}

impl UpdateSyntax for ReferencedValue {
    fn update_syntax(
        &mut self,
        ctx: &mut EditContext<'_>,
        is_damaged: bool,
    ) -> Result<(), ReparseRequired> {
        let reference_damaged = ctx.child_damage(is_damaged, &self.reference.location);
        if is_damaged && !reference_damaged {
            return Err(ReparseRequired);
        }
        self.reference.update_syntax(ctx, reference_damaged)?;
        ctx.shift_location(&mut self.location);
        Ok(())
    }
}
