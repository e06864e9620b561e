//! Bridge methods for covariant overrides.
//!
//! When a declared method overrides an inherited one with a narrower return
//! type, or with parameter types that only match after generics
//! substitution, the JVM still dispatches on the inherited erased signature.
//! A synthetic bridge with that signature forwards to the real method.

use gvy_ast::{
    BridgeBody, BytecodeSequence, ClassId, MethodId, MethodNode, Modifiers, SlotLoad, Stmt,
    TypeRef, signature_text,
};
use gvy_common::diagnostics::diagnostic_codes;
use gvy_common::limits::MAX_HIERARCHY_DEPTH;
use indexmap::IndexMap;
use rustc_hash::FxHashSet;

use crate::error::VerifyResult;
use crate::generics::{
    GenericsSpec, add_method_generics, correct_to_generics_spec, create_generics_spec,
};
use crate::verifier::Verifier;

/// A bridge not yet added to the class.
#[derive(Clone, Debug)]
struct BridgeCandidate {
    name: String,
    modifiers: Modifiers,
    return_type: TypeRef,
    parameters: Vec<(String, TypeRef)>,
    exceptions: Vec<TypeRef>,
    body: BridgeBody,
}

impl BridgeCandidate {
    fn type_descriptor(&self) -> String {
        let types: Vec<TypeRef> = self.parameters.iter().map(|(_, ty)| ty.clone()).collect();
        format!("{} {}", self.return_type.erasure().display_name(), signature_text(&self.name, &types))
    }
}

/// Methods by type descriptor, in discovery order.
type MethodsMap = IndexMap<String, MethodId>;

/// State threaded through the hierarchy walk.
struct CovariantWalk {
    class: ClassId,
    declared: Vec<MethodId>,
    abstract_methods: MethodsMap,
    to_add: IndexMap<String, BridgeCandidate>,
}

impl Verifier<'_> {
    pub(crate) fn add_covariant_methods(&mut self, class: ClassId) -> VerifyResult<()> {
        let mut abstract_methods = self.declared_methods_from_interfaces(class);
        let mut all_interface_methods = abstract_methods.clone();
        self.add_declared_methods_from_all_interfaces(class, &mut all_interface_methods);

        let mut declared = Vec::new();
        for method in self.arena.class(class).methods.clone() {
            let descriptor = self.arena.type_descriptor(method);
            abstract_methods.shift_remove(&descriptor);

            let node = self.arena.method(method);
            if !node.is_static() && (node.modifiers.is_public() || node.modifiers.is_protected()) {
                declared.push(method);
            }
            if let Some(&interface_method) = all_interface_methods.get(&descriptor) {
                if !node.modifiers.is_synthetic()
                    && !node.modifiers.is_public()
                    && !node.is_static_initializer()
                {
                    let interface_class = self.arena.method(interface_method).declaring_class;
                    let interface_name = self.arena.class(interface_class).name.clone();
                    let name = node.name.clone();
                    return Err(self.method_error(
                        method,
                        diagnostic_codes::METHOD_SHOULD_BE_PUBLIC,
                        &[&name, &interface_name],
                    ));
                }
            }
        }

        let mut walk = CovariantWalk {
            class,
            declared,
            abstract_methods,
            to_add: IndexMap::new(),
        };
        let root = self.arena.class(class).as_type();
        self.walk_covariant_methods(&root, &mut walk, &GenericsSpec::default(), 0)?;

        if walk.to_add.is_empty() {
            return Ok(());
        }
        // Bridges the class already implements itself are skipped.
        let implemented: FxHashSet<String> = walk
            .declared
            .iter()
            .map(|&m| self.arena.type_descriptor(m))
            .collect();
        for (descriptor, bridge) in walk.to_add {
            if implemented.contains(&descriptor) {
                continue;
            }
            tracing::debug!(bridge = %descriptor, "adding covariant bridge");
            self.add_bridge(class, bridge);
        }
        Ok(())
    }

    fn add_bridge(&mut self, class: ClassId, bridge: BridgeCandidate) -> MethodId {
        let parameters = bridge
            .parameters
            .into_iter()
            .map(|(name, ty)| self.arena.new_param(name, ty))
            .collect();
        let mut node = MethodNode::new(
            bridge.name,
            bridge.modifiers,
            bridge.return_type,
            parameters,
            Some(Stmt::Bytecode(BytecodeSequence::Bridge(bridge.body))),
            class,
        );
        node.exceptions = bridge.exceptions;
        self.add_property_method(node)
    }

    fn walk_covariant_methods(
        &mut self,
        current: &TypeRef,
        walk: &mut CovariantWalk,
        old_spec: &GenericsSpec,
        depth: usize,
    ) -> VerifyResult<()> {
        if depth > MAX_HIERARCHY_DEPTH {
            return Ok(());
        }
        let Some(name) = current.class_name().map(str::to_string) else {
            return Ok(());
        };

        if let Some(superclass) = self.arena.superclass_of(&name) {
            let spec = create_generics_spec(self.arena, &superclass, old_spec);
            let class_methods = self.methods_of_type(&superclass);
            // Declared methods overriding superclass methods.
            self.store_missing_for_declared(walk, &spec, &class_methods)?;
            // Superclass methods implementing interface methods of the class.
            if !walk.abstract_methods.is_empty() {
                let abstract_methods: Vec<MethodId> = walk.abstract_methods.values().copied().collect();
                for method in class_methods {
                    if self.arena.method(method).is_static() {
                        continue;
                    }
                    self.store_missing(walk, &abstract_methods, method, &GenericsSpec::default(), true)?;
                }
            }
            self.walk_covariant_methods(&superclass, walk, &spec, depth + 1)?;
        }

        for interface in self.arena.interfaces_of(&name) {
            let interface_methods = self.methods_of_type(&interface);
            let spec = create_generics_spec(self.arena, &interface, old_spec);
            self.store_missing_for_declared(walk, &spec, &interface_methods)?;
            self.walk_covariant_methods(&interface, walk, &spec, depth + 1)?;
        }
        Ok(())
    }

    fn store_missing_for_declared(
        &mut self,
        walk: &mut CovariantWalk,
        spec: &GenericsSpec,
        candidates: &[MethodId],
    ) -> VerifyResult<()> {
        for method in walk.declared.clone() {
            if self.arena.method(method).is_static() {
                continue;
            }
            self.store_missing(walk, candidates, method, spec, false)?;
        }
        Ok(())
    }

    /// Record a bridge for the first of `candidates` that `overriding`
    /// covariantly overrides.
    fn store_missing(
        &mut self,
        walk: &mut CovariantWalk,
        candidates: &[MethodId],
        overriding: MethodId,
        spec: &GenericsSpec,
        ignore_error: bool,
    ) -> VerifyResult<()> {
        for &old in candidates {
            if let Some(bridge) =
                self.covariant_implementation(walk.class, old, overriding, spec, ignore_error)?
            {
                walk.to_add.insert(bridge.type_descriptor(), bridge);
                return Ok(());
            }
        }
        Ok(())
    }

    /// Bridge needed for `overriding` to override `old`, if any.
    fn covariant_implementation(
        &mut self,
        class: ClassId,
        old: MethodId,
        overriding: MethodId,
        spec: &GenericsSpec,
        ignore_error: bool,
    ) -> VerifyResult<Option<BridgeCandidate>> {
        let old_node = self.arena.method(old);
        let new_node = self.arena.method(overriding);
        if old_node.name != new_node.name
            || new_node.modifiers.is_bridge()
            || old_node.modifiers.is_bridge()
            || old_node.modifiers.is_private()
        {
            return Ok(None);
        }

        let spec = if old_node.generics.is_empty() {
            spec.clone()
        } else {
            add_method_generics(&old_node.generics, spec)
        };

        let old_types = self.arena.parameter_types(old);
        let new_types = self.arena.parameter_types(overriding);
        if old_types.len() != new_types.len() {
            return Ok(None);
        }
        let normal_equal = new_types
            .iter()
            .zip(&old_types)
            .all(|(n, o)| n.same_erasure(o));
        let generic_equal = new_types
            .iter()
            .zip(&old_types)
            .all(|(n, o)| n.same_erasure(&correct_to_generics_spec(&spec, o)));
        if !normal_equal && !generic_equal {
            return Ok(None);
        }
        let spec = add_method_generics(&new_node.generics, &spec);

        let new_return = new_node.return_type.clone();
        let old_return = old_node.return_type.clone();
        let equal_return = new_return.same_erasure(&old_return);

        let old_class = self.arena.class(old_node.declaring_class).name.clone();
        let corrected_return = correct_to_generics_spec(&spec, &old_return);
        if !self.is_assignable(&new_return, &corrected_return) {
            if ignore_error {
                return Ok(None);
            }
            let descriptor = self.arena.type_descriptor(overriding);
            let new_class = self.arena.class(new_node.declaring_class).name.clone();
            return Err(self.method_error(
                overriding,
                diagnostic_codes::INCOMPATIBLE_RETURN_TYPE,
                &[&descriptor, &new_class, &corrected_return.to_string(), &old_class],
            ));
        }

        if equal_return && normal_equal {
            return Ok(None);
        }

        let old_descriptor = self.arena.type_descriptor(old);
        if old_node.modifiers.is_final() {
            return Err(self.method_error(
                overriding,
                diagnostic_codes::CANNOT_OVERRIDE_FINAL_METHOD,
                &[&old_descriptor, &old_class],
            ));
        }
        if old_node.is_static() != new_node.is_static() {
            return Err(self.method_error(
                overriding,
                diagnostic_codes::DISPARATE_STATIC_MODIFIER,
                &[&old_descriptor, &old_class],
            ));
        }
        if !equal_return {
            if let Some(code) = primitive_return_conflict(&old_return, &new_return) {
                return Err(self.method_error(overriding, code, &[&old_descriptor, &old_class]));
            }
            // An inferred return type takes the inherited one.
            if normal_equal && new_node.has_dynamic_return_type() {
                tracing::trace!(method = %new_node.name, "narrowing inferred return type");
                self.arena.method_mut(overriding).return_type = old_return.erasure();
                return Ok(None);
            }
        }

        let mut loads = Vec::with_capacity(old_types.len());
        let mut slot: u16 = 1;
        for (old_type, new_type) in old_types.iter().zip(&new_types) {
            let ty = old_type.erasure();
            let cast_to = (!ty.same_erasure(new_type)).then(|| new_type.erasure());
            let size = ty.slot_size();
            loads.push(SlotLoad { slot, ty, cast_to });
            slot += size;
        }
        let body = BridgeBody {
            owner: self.arena.class(class).internal_name(),
            target_name: new_node.name.clone(),
            target_descriptor: self.arena.jvm_descriptor(overriding),
            loads,
            return_type: old_return.erasure(),
        };
        let parameters = old_node
            .parameters
            .iter()
            .map(|&p| {
                let param = self.arena.param(p);
                (param.name.clone(), param.ty.erasure())
            })
            .collect();

        Ok(Some(BridgeCandidate {
            name: old_node.name.clone(),
            modifiers: new_node.modifiers | Modifiers::SYNTHETIC | Modifiers::BRIDGE,
            return_type: old_return.erasure(),
            parameters,
            exceptions: old_node.exceptions.clone(),
            body,
        }))
    }

    /// A value of `ty` can be returned where `target` is expected: arrays
    /// by component, interfaces by implementation, classes by inheritance.
    pub(crate) fn is_assignable(&self, ty: &TypeRef, target: &TypeRef) -> bool {
        if let (Some(a), Some(b)) = (ty.component(), target.component()) {
            return self.is_assignable(a, b);
        }
        if self.arena.is_interface_type(target)
            && (ty.same_erasure(target) || self.arena.implements_interface(ty, target))
        {
            return true;
        }
        self.arena.is_derived_from(ty, target)
    }

    // =========================================================================
    // Method maps
    // =========================================================================

    fn methods_of_type(&self, ty: &TypeRef) -> Vec<MethodId> {
        self.arena
            .class_of_type(ty)
            .map(|c| self.arena.class(c).methods.clone())
            .unwrap_or_default()
    }

    /// Methods visible on a type: inherited from the superclass, then from
    /// interfaces (not overriding), then its own (overriding).
    fn declared_methods_map(&self, name: &str, depth: usize) -> MethodsMap {
        let mut result = MethodsMap::new();
        if depth > MAX_HIERARCHY_DEPTH {
            return result;
        }
        let Some(class) = self.arena.class_by_name(name) else {
            return result;
        };
        let node = self.arena.class(class);
        if let Some(superclass) = node.super_class.as_ref().and_then(TypeRef::class_name) {
            result = self.declared_methods_map(superclass, depth + 1);
        }
        for interface in &node.interfaces {
            let Some(interface_name) = interface.class_name() else {
                continue;
            };
            for (descriptor, method) in self.declared_methods_map(interface_name, depth + 1) {
                result.entry(descriptor).or_insert(method);
            }
        }
        for &method in &node.methods {
            result.insert(self.arena.type_descriptor(method), method);
        }
        result
    }

    /// Methods of the interfaces `class` implements directly.
    fn declared_methods_from_interfaces(&self, class: ClassId) -> MethodsMap {
        let mut result = MethodsMap::new();
        for interface in &self.arena.class(class).interfaces {
            if let Some(name) = interface.class_name() {
                result.extend(self.declared_methods_map(name, 0));
            }
        }
        result
    }

    /// Add methods of interfaces implemented by superclasses that `class`
    /// does not implement directly.
    fn add_declared_methods_from_all_interfaces(&self, class: ClassId, methods: &mut MethodsMap) {
        let node = self.arena.class(class);
        let direct: Vec<&str> = node.interfaces.iter().filter_map(TypeRef::class_name).collect();
        for superclass in self.arena.superclass_chain(&node.name) {
            if superclass.is_object() {
                break;
            }
            let Some(super_name) = superclass.class_name() else {
                continue;
            };
            for interface in self.arena.interfaces_of(super_name) {
                let Some(name) = interface.class_name() else {
                    continue;
                };
                if !direct.contains(&name) {
                    methods.extend(self.declared_methods_map(name, 0));
                }
            }
        }
    }
}

/// Error code for overriding `old_return` with a different `new_return`
/// when either of them is primitive.
pub(crate) fn primitive_return_conflict(old_return: &TypeRef, new_return: &TypeRef) -> Option<u32> {
    match (old_return.is_primitive(), new_return.is_primitive()) {
        (true, true) => Some(diagnostic_codes::DIFFERENT_PRIMITIVE_RETURN_TYPES),
        (false, true) => Some(diagnostic_codes::NEW_METHOD_HAS_PRIMITIVE_RETURN_TYPE),
        (true, false) => Some(diagnostic_codes::OLD_METHOD_HAS_PRIMITIVE_RETURN_TYPE),
        (false, false) => None,
    }
}
