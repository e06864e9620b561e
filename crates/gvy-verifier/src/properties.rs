//! Getter and setter synthesis for properties.

use gvy_ast::{
    BytecodeSequence, ClassId, MemberFlags, MethodId, MethodNode, Modifiers, PrimitiveType,
    PropertyId, Stmt, TypeRef,
};

use crate::error::VerifyResult;
use crate::verifier::{Verifier, capitalize};

impl Verifier<'_> {
    /// Add the accessors a property is missing. Returns the methods added,
    /// which have already been visited.
    pub(crate) fn visit_property(&mut self, class: ClassId, property: PropertyId) -> VerifyResult<Vec<MethodId>> {
        let node = self.arena.property(property);
        let name = node.name.clone();
        let ty = node.ty.clone();
        let is_static = node.is_static();
        let is_private = node.is_private();
        let field = node.field;
        let accessor_modifiers = node.modifiers - (Modifiers::TRANSIENT | Modifiers::VOLATILE);

        let getter_name = format!("get{}", capitalize(&name));
        let boolean_getter_name = format!("is{}", capitalize(&name));
        let setter_name = format!("set{}", capitalize(&name));

        let mut getter_block = node.getter_block.clone();
        let mut setter_block = node.setter_block.clone();

        let owner = self.arena.class(class).internal_name();
        let field_node = self.arena.field(field);
        let field_name = field_node.name.clone();
        let field_type = field_node.ty.clone();
        let field_static = field_node.is_static();

        if getter_block.is_none() {
            let mut existing = self.arena.getter_method(class, &getter_name, !is_static);
            if existing.is_none() && ty == TypeRef::boolean() {
                existing = self.arena.getter_method(class, &boolean_getter_name, true);
            }
            if !is_private && self.needs_replacement(class, existing) {
                getter_block = Some(Stmt::Bytecode(BytecodeSequence::FieldGetter {
                    owner: owner.clone(),
                    field: field_name.clone(),
                    field_type: field_type.clone(),
                    is_static: field_static,
                }));
            }
        }
        if setter_block.is_none() {
            let existing = self.arena.setter_method(class, &setter_name, false);
            if !is_private && !accessor_modifiers.is_final() && self.needs_replacement(class, existing) {
                setter_block = Some(Stmt::Bytecode(BytecodeSequence::FieldSetter {
                    owner,
                    field: field_name,
                    field_type,
                    is_static: field_static,
                }));
            }
        }

        let mut getter_modifiers = accessor_modifiers;
        if is_static {
            getter_modifiers.remove(Modifiers::FINAL);
        }

        let mut added = Vec::new();
        if let Some(block) = getter_block {
            let is_boolean = ty.unwrapped().as_primitive() == Some(PrimitiveType::Boolean);
            added.push(self.add_getter(class, &ty, block.clone(), getter_modifiers, getter_name)?);
            if is_boolean {
                added.push(self.add_getter(class, &ty, block, getter_modifiers, boolean_getter_name)?);
            }
        }
        if let Some(block) = setter_block {
            tracing::trace!(property = %name, "adding setter");
            let value = self.arena.new_param("value", ty);
            let mut setter = MethodNode::new(
                setter_name,
                accessor_modifiers,
                TypeRef::void(),
                vec![value],
                Some(block),
                class,
            );
            setter.flags |= MemberFlags::SYNTHETIC;
            let setter = self.add_property_method(setter);
            self.visit_method(class, setter)?;
            added.push(setter);
        }
        Ok(added)
    }

    fn add_getter(
        &mut self,
        class: ClassId,
        ty: &TypeRef,
        block: Stmt,
        modifiers: Modifiers,
        name: String,
    ) -> VerifyResult<MethodId> {
        tracing::trace!(getter = %name, "adding getter");
        let mut getter = MethodNode::new(name, modifiers, ty.clone(), Vec::new(), Some(block), class);
        getter.flags |= MemberFlags::SYNTHETIC;
        let getter = self.add_property_method(getter);
        self.visit_method(class, getter)?;
        Ok(getter)
    }

    /// An accessor is generated unless the class declares one itself or
    /// inherits a final one.
    fn needs_replacement(&self, class: ClassId, existing: Option<MethodId>) -> bool {
        let Some(method) = existing else {
            return true;
        };
        let node = self.arena.method(method);
        node.declaring_class != class && !node.modifiers.is_final()
    }
}
