//! Class-level structural checks and the `main` signature fix-up.

use gvy_ast::{ClassId, MethodId, NodeRef, Stmt, TypeRef};
use gvy_common::{Span, Spanned, render_message};
use gvy_common::diagnostics::diagnostic_codes;
use gvy_common::limits::MAX_HIERARCHY_DEPTH;
use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{ErrorNode, VerifyError, VerifyResult};
use crate::generics::{GenericsSpec, correct_to_generics_spec, create_generics_spec, generic_text};
use crate::verifier::Verifier;

impl Verifier<'_> {
    // =========================================================================
    // Interfaces
    // =========================================================================

    /// The implements list must not name an interface twice. Implementing
    /// one generic interface with different arguments along two paths is
    /// only a warning.
    pub(crate) fn check_duplicate_interfaces(&mut self, class: ClassId) -> VerifyResult<()> {
        let names: Vec<String> = self
            .arena
            .class(class)
            .interfaces
            .iter()
            .map(ToString::to_string)
            .collect();
        let unique: FxHashSet<&str> = names.iter().map(String::as_str).collect();
        if unique.len() != names.len() {
            let list = names.join(", ");
            return Err(self.class_error(
                class,
                diagnostic_codes::DUPLICATE_INTERFACES_IN_IMPLEMENTS_LIST,
                &[&list],
            ));
        }

        self.check_generic_interface_arguments(class);
        Ok(())
    }

    fn check_generic_interface_arguments(&mut self, class: ClassId) {
        let mut seen: IndexMap<String, TypeRef> = IndexMap::new();
        let mut conflicts = Vec::new();
        let root = self.arena.class(class).as_type();
        self.collect_generic_interfaces(&root, &GenericsSpec::default(), &mut seen, &mut conflicts, 0);

        let span = self.arena.class(class).span;
        for (first, second) in conflicts {
            let name = first.class_name().unwrap_or_default().to_string();
            self.warn(
                class,
                diagnostic_codes::INTERFACE_IMPLEMENTED_WITH_DIFFERENT_ARGUMENTS,
                &[&name, &generic_text(&first), &generic_text(&second)],
                span,
            );
        }
    }

    fn collect_generic_interfaces(
        &self,
        ty: &TypeRef,
        spec: &GenericsSpec,
        seen: &mut IndexMap<String, TypeRef>,
        conflicts: &mut Vec<(TypeRef, TypeRef)>,
        depth: usize,
    ) {
        if depth > MAX_HIERARCHY_DEPTH {
            return;
        }
        let Some(name) = ty.class_name() else {
            return;
        };
        let supertypes = self
            .arena
            .superclass_of(name)
            .into_iter()
            .map(|superclass| (superclass, false))
            .chain(self.arena.interfaces_of(name).into_iter().map(|i| (i, true)));

        for (supertype, is_interface) in supertypes {
            let corrected = correct_to_generics_spec(spec, &supertype);
            if is_interface && !corrected.type_arguments().is_empty() {
                let key = corrected.class_name().unwrap_or_default().to_string();
                if let Some(previous) = seen.get(&key) {
                    let reported = conflicts
                        .iter()
                        .any(|(first, _)| first.class_name() == Some(key.as_str()));
                    if *previous != corrected && !reported {
                        conflicts.push((previous.clone(), corrected.clone()));
                    }
                } else {
                    seen.insert(key, corrected.clone());
                }
            }
            let next_spec = create_generics_spec(self.arena, &corrected, spec);
            self.collect_generic_interfaces(&corrected, &next_spec, seen, conflicts, depth + 1);
        }
    }

    // =========================================================================
    // Duplicates
    // =========================================================================

    /// No two user methods (or constructors) may share a name and erased
    /// parameter list.
    pub(crate) fn check_for_duplicate_methods(&self, class: ClassId) -> VerifyResult<()> {
        let node = self.arena.class(class);
        let script_body = node
            .methods
            .iter()
            .copied()
            .find(|&m| self.arena.method(m).is_script_body())
            .map(|m| self.arena.descriptor_without_return_type(m));

        let mut descriptors = FxHashMap::default();
        for &method in &node.methods {
            if self.arena.method(method).is_synthetic() {
                continue;
            }
            let descriptor = self.arena.descriptor_without_return_type(method);
            if let Some(&first) = descriptors.get(&descriptor) {
                let text = self.arena.method_text(method);
                let code = if self.arena.method(method).is_script_body()
                    || script_body.as_deref() == Some(descriptor.as_str())
                {
                    diagnostic_codes::METHOD_DUPLICATES_SCRIPT_BODY
                } else {
                    diagnostic_codes::METHOD_DUPLICATES_ANOTHER_METHOD
                };
                return Err(self.duplicate_error(method, first, code, &text));
            }
            descriptors.insert(descriptor, method);
        }

        let mut signatures = FxHashMap::default();
        for &constructor in &node.constructors {
            if self.arena.method(constructor).is_synthetic() {
                continue;
            }
            let signature = self.arena.descriptor_without_return_type(constructor);
            if let Some(&first) = signatures.get(&signature) {
                let text = self.constructor_text(class, constructor);
                return Err(self.duplicate_error(
                    constructor,
                    first,
                    diagnostic_codes::CONSTRUCTOR_DUPLICATES_ANOTHER_CONSTRUCTOR,
                    &text,
                ));
            }
            signatures.insert(signature, constructor);
        }
        Ok(())
    }

    fn duplicate_error(&self, duplicate: MethodId, first: MethodId, code: u32, text: &str) -> VerifyError {
        let (_, first_span) = self.source_of(first);
        let note = render_message(diagnostic_codes::FIRST_DECLARED_HERE, &[text]);
        self.method_error(duplicate, code, &[text]).with_related(first_span, note)
    }

    /// `Name(T1 a, T2 b)` for constructor diagnostics.
    fn constructor_text(&self, class: ClassId, constructor: MethodId) -> String {
        let params = self
            .arena
            .method(constructor)
            .parameters
            .iter()
            .map(|&p| {
                let param = self.arena.param(p);
                format!("{} {}", param.ty, param.name)
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}({params})", self.arena.class(class).name_without_package())
    }

    // =========================================================================
    // Object initializers
    // =========================================================================

    /// `return` may appear in object initializer blocks only inside closures.
    pub(crate) fn check_return_in_object_initializer(&self, class: ClassId) -> VerifyResult<()> {
        for block in &self.arena.class(class).object_initializers {
            if let Some(span) = find_return_outside_closures(block) {
                let span = span.or(self.arena.class(class).span);
                return Err(VerifyError::parser(
                    diagnostic_codes::RETURN_NOT_ALLOWED_IN_OBJECT_INITIALIZER,
                    &[],
                    ErrorNode::Code,
                    span,
                ));
            }
        }
        Ok(())
    }

    // =========================================================================
    // Methods
    // =========================================================================

    /// MOP helpers (`this$...`, `super$...`) are generated later in class
    /// generation and must not exist yet.
    pub(crate) fn check_mop_method(&self, class: ClassId, method: MethodId) -> VerifyResult<()> {
        let name = &self.arena.method(method).name;
        if is_mop_method(name) {
            let class_name = self.arena.class(class).name.clone();
            return Err(self.class_error(class, diagnostic_codes::UNEXPECTED_MOP_METHOD, &[&class_name, name]));
        }
        Ok(())
    }

    /// `static main(args)` with an untyped parameter becomes
    /// `static void main(String[] args)`.
    pub(crate) fn adjust_types_if_static_main_method(&mut self, method: MethodId) {
        let node = self.arena.method(method);
        if node.name != "main" || !node.is_static() || node.parameters.len() != 1 {
            return;
        }
        let parameter = node.parameters[0];
        let param = self.arena.param(parameter);
        if !param.dynamic_type && !param.ty.is_object() {
            return;
        }
        tracing::trace!("coercing main(String[])");
        self.arena.param_mut(parameter).ty = TypeRef::array_of(TypeRef::string());
        let node = self.arena.method_mut(method);
        if node.return_type.is_object() {
            node.return_type = TypeRef::void();
        }
    }
}

fn is_mop_method(name: &str) -> bool {
    (name.starts_with("this$") || name.starts_with("super$")) && !name.contains("$dist$")
}

/// Span of the first `return` not nested in a closure.
fn find_return_outside_closures(block: &Stmt) -> Option<Span> {
    let mut found = None;
    NodeRef::Stmt(block).walk(&mut |node| {
        if found.is_some() {
            return false;
        }
        match node {
            NodeRef::Expr(gvy_ast::Expr::Closure { .. }) => false,
            NodeRef::Stmt(stmt @ Stmt::Return { .. }) => {
                found = Some(stmt.span());
                false
            }
            _ => true,
        }
    });
    found
}
