//! Declaration nodes stored in the arena.

use gvy_common::{Span, Spanned};
use serde::{Deserialize, Serialize};

use crate::expr::Expr;
use crate::ids::{ClassId, FieldId, MethodId, ModuleId, ParamId, PropertyId};
use crate::modifiers::{ClassFlags, MemberFlags, Modifiers};
use crate::stmt::Stmt;
use crate::types::{GenericsType, TypeRef};

pub const CONSTRUCTOR_NAME: &str = "<init>";
pub const STATIC_INITIALIZER_NAME: &str = "<clinit>";

/// A source unit: one file and the classes declared in it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleNode {
    /// Source file name, used in diagnostics.
    pub name: String,
    pub classes: Vec<ClassId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassNode {
    /// Qualified binary name, e.g. `pkg.Outer$Inner`.
    pub name: String,
    pub modifiers: Modifiers,
    #[serde(default)]
    pub flags: ClassFlags,
    /// `None` only for `java.lang.Object` itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub super_class: Option<TypeRef>,
    #[serde(default)]
    pub interfaces: Vec<TypeRef>,
    #[serde(default)]
    pub generics: Vec<GenericsType>,
    #[serde(default)]
    pub fields: Vec<FieldId>,
    #[serde(default)]
    pub properties: Vec<PropertyId>,
    #[serde(default)]
    pub methods: Vec<MethodId>,
    #[serde(default)]
    pub constructors: Vec<MethodId>,
    /// `{ ... }` instance initializer blocks, in source order.
    #[serde(default)]
    pub object_initializers: Vec<Stmt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outer_class: Option<ClassId>,
    /// Method or constructor an anonymous inner class is instantiated in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enclosing_method: Option<MethodId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<ModuleId>,
    #[serde(default)]
    pub span: Span,
}

impl ClassNode {
    pub fn new(name: impl Into<String>, modifiers: Modifiers, super_class: Option<TypeRef>) -> Self {
        ClassNode {
            name: name.into(),
            modifiers,
            flags: ClassFlags::PRIMARY,
            super_class,
            interfaces: Vec::new(),
            generics: Vec::new(),
            fields: Vec::new(),
            properties: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            object_initializers: Vec::new(),
            outer_class: None,
            enclosing_method: None,
            module: None,
            span: Span::NONE,
        }
    }

    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.modifiers.contains(Modifiers::INTERFACE)
    }

    #[must_use]
    pub fn is_enum(&self) -> bool {
        self.modifiers.contains(Modifiers::ENUM)
    }

    #[must_use]
    pub fn is_trait(&self) -> bool {
        self.flags.contains(ClassFlags::TRAIT)
    }

    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.flags.contains(ClassFlags::ANONYMOUS)
    }

    /// JVM internal name, e.g. `pkg/Outer$Inner`.
    #[must_use]
    pub fn internal_name(&self) -> String {
        self.name.replace('.', "/")
    }

    #[must_use]
    pub fn name_without_package(&self) -> &str {
        match self.name.rfind('.') {
            Some(dot) => &self.name[dot + 1..],
            None => &self.name,
        }
    }

    /// Raw reference to this class.
    #[must_use]
    pub fn as_type(&self) -> TypeRef {
        TypeRef::class(self.name.clone())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodKind {
    Method,
    Constructor,
    StaticInitializer,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MethodNode {
    pub name: String,
    pub kind: MethodKind,
    pub modifiers: Modifiers,
    #[serde(default)]
    pub flags: MemberFlags,
    pub return_type: TypeRef,
    #[serde(default)]
    pub parameters: Vec<ParamId>,
    #[serde(default)]
    pub exceptions: Vec<TypeRef>,
    /// `None` for abstract and interface methods.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<Stmt>,
    #[serde(default)]
    pub generics: Vec<GenericsType>,
    pub declaring_class: ClassId,
    #[serde(default)]
    pub span: Span,
}

impl MethodNode {
    pub fn new(
        name: impl Into<String>,
        modifiers: Modifiers,
        return_type: TypeRef,
        parameters: Vec<ParamId>,
        code: Option<Stmt>,
        declaring_class: ClassId,
    ) -> Self {
        MethodNode {
            name: name.into(),
            kind: MethodKind::Method,
            modifiers,
            flags: MemberFlags::empty(),
            return_type,
            parameters,
            exceptions: Vec::new(),
            code,
            generics: Vec::new(),
            declaring_class,
            span: Span::NONE,
        }
    }

    pub fn constructor(
        modifiers: Modifiers,
        parameters: Vec<ParamId>,
        code: Option<Stmt>,
        declaring_class: ClassId,
    ) -> Self {
        MethodNode {
            kind: MethodKind::Constructor,
            ..MethodNode::new(
                CONSTRUCTOR_NAME,
                modifiers,
                TypeRef::void(),
                parameters,
                code,
                declaring_class,
            )
        }
    }

    pub fn static_initializer(declaring_class: ClassId) -> Self {
        MethodNode {
            kind: MethodKind::StaticInitializer,
            ..MethodNode::new(
                STATIC_INITIALIZER_NAME,
                Modifiers::STATIC,
                TypeRef::void(),
                Vec::new(),
                Some(Stmt::block(Vec::new())),
                declaring_class,
            )
        }
    }

    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.kind == MethodKind::Constructor
    }

    #[must_use]
    pub fn is_static_initializer(&self) -> bool {
        self.kind == MethodKind::StaticInitializer
    }

    #[must_use]
    pub fn is_static(&self) -> bool {
        self.modifiers.is_static()
    }

    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.modifiers.is_abstract()
    }

    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        self.flags.contains(MemberFlags::SYNTHETIC)
    }

    #[must_use]
    pub fn is_void(&self) -> bool {
        self.return_type.is_void()
    }

    #[must_use]
    pub fn is_script_body(&self) -> bool {
        self.flags.contains(MemberFlags::SCRIPT_BODY)
    }

    #[must_use]
    pub fn has_dynamic_return_type(&self) -> bool {
        self.flags.contains(MemberFlags::DYNAMIC_RETURN_TYPE)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub ty: TypeRef,
    #[serde(default)]
    pub modifiers: Modifiers,
    /// Default value written in the signature, e.g. `int b = 2`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_expression: Option<Expr>,
    /// Where the default value lives once overloads have been generated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_initial_expression: Option<Expr>,
    /// Declared without a type (`def x` or bare name).
    #[serde(default)]
    pub dynamic_type: bool,
    #[serde(default)]
    pub span: Span,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Parameter {
            name: name.into(),
            ty,
            modifiers: Modifiers::empty(),
            initial_expression: None,
            default_initial_expression: None,
            dynamic_type: false,
            span: Span::NONE,
        }
    }

    #[must_use]
    pub fn has_initial_expression(&self) -> bool {
        self.initial_expression.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldNode {
    pub name: String,
    pub modifiers: Modifiers,
    #[serde(default)]
    pub flags: MemberFlags,
    pub ty: TypeRef,
    /// Initializer written at the declaration; the verifier moves it into
    /// constructors or `<clinit>`, or keeps it as a class-file constant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_expression: Option<Expr>,
    pub declaring_class: ClassId,
    #[serde(default)]
    pub span: Span,
}

impl FieldNode {
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.modifiers.is_static()
    }

    #[must_use]
    pub fn is_final(&self) -> bool {
        self.modifiers.is_final()
    }

    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        self.flags.contains(MemberFlags::SYNTHETIC)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertyNode {
    pub name: String,
    pub modifiers: Modifiers,
    #[serde(default)]
    pub flags: MemberFlags,
    pub ty: TypeRef,
    /// Backing field.
    pub field: FieldId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub getter_block: Option<Stmt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setter_block: Option<Stmt>,
    #[serde(default)]
    pub span: Span,
}

impl PropertyNode {
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.modifiers.is_static()
    }

    #[must_use]
    pub fn is_private(&self) -> bool {
        self.modifiers.is_private()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocalVariable {
    pub name: String,
    pub ty: TypeRef,
    #[serde(default)]
    pub modifiers: Modifiers,
    /// Captured and written by a closure, so it lives in a shared reference.
    #[serde(default)]
    pub closure_shared: bool,
}

impl Spanned for ClassNode {
    fn span(&self) -> Span {
        self.span
    }
}

impl Spanned for MethodNode {
    fn span(&self) -> Span {
        self.span
    }
}

impl Spanned for FieldNode {
    fn span(&self) -> Span {
        self.span
    }
}

impl Spanned for PropertyNode {
    fn span(&self) -> Span {
        self.span
    }
}

impl Spanned for Parameter {
    fn span(&self) -> Span {
        self.span
    }
}
