//! Arena storage for the class/member graph.
//!
//! Every declaration lives in a flat table and is referenced by a typed id.
//! Links that would be back-pointers in an object graph (declaring class,
//! outer class, the method a default-parameter overload was generated from)
//! are ids as well, so the verifier can rewrite any node in place.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::expr::{Expr, VarTarget};
use crate::ids::{ClassId, FieldId, LocalId, MethodId, ModuleId, ParamId, PropertyId};
use crate::modifiers::{MemberFlags, Modifiers};
use crate::nodes::{
    ClassNode, FieldNode, LocalVariable, MethodKind, MethodNode, ModuleNode, Parameter,
    PropertyNode,
};
use crate::stmt::Stmt;
use crate::types::TypeRef;

/// Arena-based storage for declarations.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AstArena {
    #[serde(default)]
    pub modules: Vec<ModuleNode>,
    #[serde(default)]
    pub classes: Vec<ClassNode>,
    #[serde(default)]
    pub methods: Vec<MethodNode>,
    #[serde(default)]
    pub fields: Vec<FieldNode>,
    #[serde(default)]
    pub properties: Vec<PropertyNode>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub locals: Vec<LocalVariable>,
    /// Generated member -> member it was derived from.
    #[serde(default)]
    generated_from: FxHashMap<MethodId, MethodId>,
}

impl AstArena {
    pub fn new() -> AstArena {
        AstArena::default()
    }

    // =========================================================================
    // Insertion
    // =========================================================================

    pub fn add_module(&mut self, name: impl Into<String>) -> ModuleId {
        let id = ModuleId(self.modules.len() as u32);
        self.modules.push(ModuleNode {
            name: name.into(),
            classes: Vec::new(),
        });
        id
    }

    pub fn add_class(&mut self, class: ClassNode) -> ClassId {
        let id = ClassId(self.classes.len() as u32);
        let module = class.module;
        self.classes.push(class);
        if let Some(module) = module {
            self.modules[module.index()].classes.push(id);
        }
        id
    }

    /// Add a method, constructor or static initializer to its declaring class.
    pub fn add_method(&mut self, method: MethodNode) -> MethodId {
        let id = MethodId(self.methods.len() as u32);
        let owner = method.declaring_class;
        let kind = method.kind;
        self.methods.push(method);
        let class = &mut self.classes[owner.index()];
        match kind {
            MethodKind::Constructor => class.constructors.push(id),
            MethodKind::Method | MethodKind::StaticInitializer => class.methods.push(id),
        }
        id
    }

    pub fn add_field(&mut self, field: FieldNode) -> FieldId {
        let id = FieldId(self.fields.len() as u32);
        let owner = field.declaring_class;
        self.fields.push(field);
        self.classes[owner.index()].fields.push(id);
        id
    }

    pub fn add_property(&mut self, property: PropertyNode) -> PropertyId {
        let id = PropertyId(self.properties.len() as u32);
        let owner = self.fields[property.field.index()].declaring_class;
        self.properties.push(property);
        self.classes[owner.index()].properties.push(id);
        id
    }

    pub fn add_parameter(&mut self, parameter: Parameter) -> ParamId {
        let id = ParamId(self.parameters.len() as u32);
        self.parameters.push(parameter);
        id
    }

    pub fn add_local(&mut self, local: LocalVariable) -> LocalId {
        let id = LocalId(self.locals.len() as u32);
        self.locals.push(local);
        id
    }

    // =========================================================================
    // Access
    // =========================================================================

    #[inline]
    pub fn module(&self, id: ModuleId) -> &ModuleNode {
        &self.modules[id.index()]
    }

    #[inline]
    pub fn class(&self, id: ClassId) -> &ClassNode {
        &self.classes[id.index()]
    }

    #[inline]
    pub fn class_mut(&mut self, id: ClassId) -> &mut ClassNode {
        &mut self.classes[id.index()]
    }

    #[inline]
    pub fn get_class(&self, id: ClassId) -> Option<&ClassNode> {
        self.classes.get(id.index())
    }

    #[inline]
    pub fn method(&self, id: MethodId) -> &MethodNode {
        &self.methods[id.index()]
    }

    #[inline]
    pub fn method_mut(&mut self, id: MethodId) -> &mut MethodNode {
        &mut self.methods[id.index()]
    }

    #[inline]
    pub fn field(&self, id: FieldId) -> &FieldNode {
        &self.fields[id.index()]
    }

    #[inline]
    pub fn field_mut(&mut self, id: FieldId) -> &mut FieldNode {
        &mut self.fields[id.index()]
    }

    #[inline]
    pub fn property(&self, id: PropertyId) -> &PropertyNode {
        &self.properties[id.index()]
    }

    #[inline]
    pub fn property_mut(&mut self, id: PropertyId) -> &mut PropertyNode {
        &mut self.properties[id.index()]
    }

    #[inline]
    pub fn param(&self, id: ParamId) -> &Parameter {
        &self.parameters[id.index()]
    }

    /// Parameter lookup that tolerates dangling ids from a malformed tree.
    #[inline]
    pub fn get_param(&self, id: ParamId) -> Option<&Parameter> {
        self.parameters.get(id.index())
    }

    #[inline]
    pub fn param_mut(&mut self, id: ParamId) -> &mut Parameter {
        &mut self.parameters[id.index()]
    }

    #[inline]
    pub fn local(&self, id: LocalId) -> &LocalVariable {
        &self.locals[id.index()]
    }

    #[inline]
    pub fn local_mut(&mut self, id: LocalId) -> &mut LocalVariable {
        &mut self.locals[id.index()]
    }

    pub fn class_ids(&self) -> impl Iterator<Item = ClassId> + '_ {
        (0..self.classes.len() as u32).map(ClassId)
    }

    // =========================================================================
    // Generated-from side table
    // =========================================================================

    pub fn set_generated_from(&mut self, generated: MethodId, original: MethodId) {
        self.generated_from.insert(generated, original);
    }

    pub fn generated_from(&self, generated: MethodId) -> Option<MethodId> {
        self.generated_from.get(&generated).copied()
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    pub fn class_by_name(&self, name: &str) -> Option<ClassId> {
        self.classes
            .iter()
            .position(|c| c.name == name)
            .map(|i| ClassId(i as u32))
    }

    /// Declaration behind a class type reference, if it is in the arena.
    pub fn class_of_type(&self, ty: &TypeRef) -> Option<ClassId> {
        if ty.is_array() {
            return None;
        }
        self.class_by_name(ty.class_name()?)
    }

    pub fn declared_field(&self, class: ClassId, name: &str) -> Option<FieldId> {
        self.class(class)
            .fields
            .iter()
            .copied()
            .find(|&f| self.field(f).name == name)
    }

    pub fn declared_property(&self, class: ClassId, name: &str) -> Option<PropertyId> {
        self.class(class)
            .properties
            .iter()
            .copied()
            .find(|&p| self.property(p).name == name)
    }

    pub fn parameter_types(&self, method: MethodId) -> Vec<TypeRef> {
        self.method(method)
            .parameters
            .iter()
            .map(|&p| self.param(p).ty.clone())
            .collect()
    }

    /// True when both parameter lists erase to the same types.
    pub fn same_parameter_types(&self, params: &[ParamId], types: &[TypeRef]) -> bool {
        params.len() == types.len()
            && params
                .iter()
                .zip(types)
                .all(|(&p, ty)| self.param(p).ty.same_erasure(ty))
    }

    /// Method (not constructor) declared directly in `class` with this signature.
    pub fn declared_method(&self, class: ClassId, name: &str, types: &[TypeRef]) -> Option<MethodId> {
        self.class(class).methods.iter().copied().find(|&m| {
            let method = self.method(m);
            method.name == name && self.same_parameter_types(&method.parameters, types)
        })
    }

    pub fn declared_constructor(&self, class: ClassId, types: &[TypeRef]) -> Option<MethodId> {
        self.class(class)
            .constructors
            .iter()
            .copied()
            .find(|&m| self.same_parameter_types(&self.method(m).parameters, types))
    }

    pub fn static_initializer(&self, class: ClassId) -> Option<MethodId> {
        self.class(class)
            .methods
            .iter()
            .copied()
            .find(|&m| self.method(m).is_static_initializer())
    }

    /// The class's `<clinit>`, created with an empty body when missing.
    pub fn get_or_add_static_initializer(&mut self, class: ClassId) -> MethodId {
        match self.static_initializer(class) {
            Some(id) => id,
            None => self.add_method(MethodNode::static_initializer(class)),
        }
    }

    // =========================================================================
    // Expression helpers
    // =========================================================================

    pub fn param_ref(&self, id: ParamId) -> Expr {
        Expr::var(self.param(id).name.clone(), VarTarget::Parameter(id))
    }

    pub fn local_ref(&self, id: LocalId) -> Expr {
        Expr::var(self.local(id).name.clone(), VarTarget::Local(id))
    }

    /// Direct field access expression.
    pub fn field_expr(&self, id: FieldId) -> Expr {
        Expr::field(id, self.field(id).name.clone())
    }

    /// Field referenced by simple name through implicit `this`.
    pub fn field_ref(&self, id: FieldId) -> Expr {
        Expr::var(self.field(id).name.clone(), VarTarget::Field(id))
    }

    // =========================================================================
    // Builders
    // =========================================================================

    pub fn new_class(
        &mut self,
        name: impl Into<String>,
        modifiers: Modifiers,
        super_class: Option<TypeRef>,
    ) -> ClassId {
        self.add_class(ClassNode::new(name, modifiers, super_class))
    }

    /// Class extending `java.lang.Object`, declared in `module`.
    pub fn new_class_in(&mut self, module: ModuleId, name: impl Into<String>, modifiers: Modifiers) -> ClassId {
        let mut class = ClassNode::new(name, modifiers, Some(TypeRef::object()));
        class.module = Some(module);
        self.add_class(class)
    }

    pub fn new_param(&mut self, name: impl Into<String>, ty: TypeRef) -> ParamId {
        self.add_parameter(Parameter::new(name, ty))
    }

    pub fn new_param_with_default(&mut self, name: impl Into<String>, ty: TypeRef, default: Expr) -> ParamId {
        let mut parameter = Parameter::new(name, ty);
        parameter.initial_expression = Some(default);
        self.add_parameter(parameter)
    }

    pub fn new_local(&mut self, name: impl Into<String>, ty: TypeRef, modifiers: Modifiers) -> LocalId {
        self.add_local(LocalVariable {
            name: name.into(),
            ty,
            modifiers,
            closure_shared: false,
        })
    }

    pub fn new_method(
        &mut self,
        class: ClassId,
        name: impl Into<String>,
        modifiers: Modifiers,
        return_type: TypeRef,
        parameters: Vec<ParamId>,
        code: Option<Stmt>,
    ) -> MethodId {
        self.add_method(MethodNode::new(
            name,
            modifiers,
            return_type,
            parameters,
            code,
            class,
        ))
    }

    pub fn new_constructor(
        &mut self,
        class: ClassId,
        modifiers: Modifiers,
        parameters: Vec<ParamId>,
        code: Option<Stmt>,
    ) -> MethodId {
        self.add_method(MethodNode::constructor(modifiers, parameters, code, class))
    }

    pub fn new_field(
        &mut self,
        class: ClassId,
        name: impl Into<String>,
        modifiers: Modifiers,
        ty: TypeRef,
        initial_expression: Option<Expr>,
    ) -> FieldId {
        self.add_field(FieldNode {
            name: name.into(),
            modifiers,
            flags: MemberFlags::empty(),
            ty,
            initial_expression,
            declaring_class: class,
            span: gvy_common::Span::NONE,
        })
    }

    /// Property with a private backing field of the same name.
    pub fn new_property(
        &mut self,
        class: ClassId,
        name: impl Into<String>,
        modifiers: Modifiers,
        ty: TypeRef,
        initial_expression: Option<Expr>,
    ) -> PropertyId {
        let name = name.into();
        let field_modifiers = Modifiers::PRIVATE | (modifiers & (Modifiers::STATIC | Modifiers::FINAL));
        let field = self.new_field(class, name.clone(), field_modifiers, ty.clone(), initial_expression);
        self.add_property(PropertyNode {
            name,
            modifiers,
            flags: MemberFlags::empty(),
            ty,
            field,
            getter_block: None,
            setter_block: None,
            span: gvy_common::Span::NONE,
        })
    }
}
