//! `GroovyObject` plumbing: the static metaclass accessor, the fast-path
//! flag field, the `metaClass` field and `getMetaClass`/`setMetaClass`.

use gvy_ast::{
    BytecodeSequence, ClassId, Expr, FieldId, FieldNode, MemberFlags, MethodId, MethodNode,
    Modifiers, Stmt, TypeRef, names,
};
use gvy_common::diagnostics::diagnostic_codes;
use gvy_common::limits::MAX_SYNTHETIC_NAME_ATTEMPTS;
use gvy_common::Span;

use crate::error::{ErrorNode, VerifyError, VerifyResult};
use crate::verifier::Verifier;

pub const STATIC_CLASS_INFO_FIELD: &str = "$staticClassInfo";
pub const STATIC_META_CLASS_METHOD: &str = "$getStaticMetaClass";
pub const FAST_PATH_FIELD: &str = "__$stMC";
pub const META_CLASS_FIELD: &str = "metaClass";

impl Verifier<'_> {
    /// `$staticClassInfo` cache plus the protected `$getStaticMetaClass()`.
    pub(crate) fn add_static_meta_class_field(&mut self, class: ClassId) {
        let mut field_name = STATIC_CLASS_INFO_FIELD.to_string();
        let mut attempts = 0;
        while self.arena.declared_field(class, &field_name).is_some()
            && attempts < MAX_SYNTHETIC_NAME_ATTEMPTS
        {
            field_name.push('$');
            attempts += 1;
        }

        self.add_synthetic_field(
            class,
            &field_name,
            Modifiers::PRIVATE | Modifiers::STATIC | Modifiers::SYNTHETIC,
            TypeRef::class(names::CLASS_INFO),
            None,
        );

        let owner = self.arena.class(class).internal_name();
        let mut method = MethodNode::new(
            STATIC_META_CLASS_METHOD,
            Modifiers::PROTECTED | Modifiers::SYNTHETIC,
            TypeRef::meta_class(),
            Vec::new(),
            Some(Stmt::Bytecode(BytecodeSequence::StaticMetaClass {
                owner,
                class_info_field: field_name.clone(),
            })),
            class,
        );
        method.flags |= MemberFlags::SYNTHETIC;
        self.arena.add_method(method);
        tracing::trace!(field = %field_name, "added static metaclass accessor");
    }

    /// `public static transient boolean __$stMC`, unless the class opted out
    /// or already declares a compatible one.
    pub(crate) fn add_fast_path_helper_field(&mut self, class: ClassId) -> VerifyResult<()> {
        if self.arena.class(class).flags.contains(gvy_ast::ClassFlags::SKIP_FAST_PATH) {
            return Ok(());
        }
        match self.arena.declared_field(class, FAST_PATH_FIELD) {
            Some(field) => {
                let node = self.arena.field(field);
                if node.modifiers.is_public() && node.ty == TypeRef::boolean() {
                    Ok(())
                } else {
                    let class_name = self.arena.class(class).name.clone();
                    Err(VerifyError::parser(
                        diagnostic_codes::FIELD_RESERVED_FOR_INTERNAL_USE,
                        &[&class_name, FAST_PATH_FIELD],
                        ErrorNode::Field(field),
                        node.span.or(self.arena.class(class).span),
                    ))
                }
            }
            None => {
                self.add_synthetic_field(
                    class,
                    FAST_PATH_FIELD,
                    Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::SYNTHETIC | Modifiers::TRANSIENT,
                    TypeRef::boolean(),
                    None,
                );
                Ok(())
            }
        }
    }

    pub(crate) fn add_groovy_object_interface_and_methods(&mut self, class: ClassId) -> VerifyResult<()> {
        if !self.arena.is_derived_from_groovy_object(class) {
            tracing::trace!("adding GroovyObject interface");
            self.arena
                .class_mut(class)
                .interfaces
                .push(TypeRef::class(names::GROOVY_OBJECT));
        }

        let mut meta_class_field = self.meta_class_field(class)?;
        let owner = self.arena.class(class).internal_name();

        if !self.arena.has_method(class, "getMetaClass", &[]) {
            let field = self.ensure_meta_class_field(class, meta_class_field);
            meta_class_field = Some(field);
            let code = Stmt::Bytecode(BytecodeSequence::GetMetaClass {
                owner: owner.clone(),
                field: self.arena.field(field).name.clone(),
            });
            self.add_generated_method(
                class,
                "getMetaClass",
                Modifiers::PUBLIC,
                TypeRef::meta_class(),
                Vec::new(),
                code,
            );
        }

        if !self.arena.has_method(class, "setMetaClass", &[TypeRef::meta_class()]) {
            let field = self.ensure_meta_class_field(class, meta_class_field);
            let node = self.arena.field(field);
            let code = if node.is_final() {
                Stmt::throw(Expr::new_instance(
                    TypeRef::class(names::ILLEGAL_ARGUMENT_EXCEPTION),
                    vec![Expr::string("cannot set read-only meta class")],
                ))
            } else {
                Stmt::Bytecode(BytecodeSequence::SetMetaClass {
                    owner,
                    field: node.name.clone(),
                })
            };
            let parameter = self.arena.new_param("mc", TypeRef::meta_class());
            self.add_generated_method(
                class,
                "setMetaClass",
                Modifiers::PUBLIC,
                TypeRef::void(),
                vec![parameter],
                code,
            );
        }
        Ok(())
    }

    /// The `metaClass` field visible to `class`: its own (which must be typed
    /// `MetaClass`) or the nearest non-private one of a superclass.
    fn meta_class_field(&self, class: ClassId) -> VerifyResult<Option<FieldId>> {
        if let Some(field) = self.arena.declared_field(class, META_CLASS_FIELD) {
            let node = self.arena.field(field);
            if !node.ty.is_class(names::META_CLASS) {
                let class_name = self.arena.class(class).name.clone();
                let type_name = node.ty.to_string();
                return Err(VerifyError::parser(
                    diagnostic_codes::META_CLASS_FIELD_HAS_WRONG_TYPE,
                    &[&class_name, &type_name],
                    ErrorNode::Field(field),
                    node.span.or(self.arena.class(class).span),
                ));
            }
            return Ok(Some(field));
        }

        let name = self.arena.class(class).name.clone();
        let inherited = self
            .arena
            .superclass_chain(&name)
            .iter()
            .filter_map(|ty| self.arena.class_of_type(ty))
            .find_map(|superclass| {
                self.arena
                    .declared_field(superclass, META_CLASS_FIELD)
                    .filter(|&f| !self.arena.field(f).modifiers.is_private())
            });
        Ok(inherited)
    }

    fn ensure_meta_class_field(&mut self, class: ClassId, existing: Option<FieldId>) -> FieldId {
        if let Some(field) = existing {
            return field;
        }
        tracing::trace!("adding metaClass field");
        let initial = Expr::call(Expr::this(), STATIC_META_CLASS_METHOD, Vec::new());
        self.add_synthetic_field(
            class,
            META_CLASS_FIELD,
            Modifiers::PRIVATE | Modifiers::TRANSIENT | Modifiers::SYNTHETIC,
            TypeRef::meta_class(),
            Some(initial),
        )
    }

    fn add_synthetic_field(
        &mut self,
        class: ClassId,
        name: &str,
        modifiers: Modifiers,
        ty: TypeRef,
        initial_expression: Option<Expr>,
    ) -> FieldId {
        self.arena.add_field(FieldNode {
            name: name.to_string(),
            modifiers,
            flags: MemberFlags::SYNTHETIC,
            ty,
            initial_expression,
            declaring_class: class,
            span: Span::NONE,
        })
    }

    /// Metaclass accessor, visible (`GENERATED | INTERNAL`) when generated
    /// members are annotated and synthetic otherwise.
    fn add_generated_method(
        &mut self,
        class: ClassId,
        name: &str,
        modifiers: Modifiers,
        return_type: TypeRef,
        parameters: Vec<gvy_ast::ParamId>,
        code: Stmt,
    ) -> MethodId {
        let mut node = MethodNode::new(name, modifiers, return_type, parameters, Some(code), class);
        if self.options.annotate_generated {
            node.modifiers.remove(Modifiers::SYNTHETIC);
            node.flags |= MemberFlags::GENERATED | MemberFlags::INTERNAL;
        } else {
            node.modifiers |= Modifiers::SYNTHETIC;
            node.flags |= MemberFlags::SYNTHETIC;
        }
        tracing::trace!(method = name, "added GroovyObject method");
        self.arena.add_method(node)
    }

    /// Public no-argument constructor for classes that declare none.
    pub(crate) fn add_default_constructor(&mut self, class: ClassId) {
        if !self.arena.class(class).constructors.is_empty() {
            return;
        }
        let mut node = MethodNode::constructor(
            Modifiers::PUBLIC,
            Vec::new(),
            Some(Stmt::block(Vec::new())),
            class,
        );
        node.flags |= MemberFlags::NO_REAL_SOURCE_POSITION;
        let constructor = self.arena.add_method(node);
        self.mark_as_generated(constructor);
        tracing::trace!("added default constructor");
    }
}
