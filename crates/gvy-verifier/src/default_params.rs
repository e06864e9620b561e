//! Overloads for parameters with default values.
//!
//! `def f(int a, int b = 2, int c = 3)` yields `f(int, int)` calling
//! `f(a, b, 3)` and `f(int)` calling `f(a, 2, 3)`. Constructors chain through
//! `this(...)` instead. Afterwards the defaults are moved off the original
//! parameters into `default_initial_expression`.

use gvy_ast::{
    ClassId, Expr, LocalId, MemberFlags, MethodId, MethodNode, Modifiers, NodeMut, NodeRef, ParamId,
    Stmt, TypeRef, VarTarget, signature_text,
};
use gvy_common::diagnostics::diagnostic_codes;
use gvy_common::limits::MAX_AST_WALK_DEPTH;

use crate::error::{VerifyError, VerifyResult};
use crate::verifier::Verifier;

/// One generated overload: kept parameters plus the argument list that
/// forwards to the full-arity member.
struct Overload {
    parameters: Vec<ParamId>,
    arguments: Vec<Expr>,
    /// Per argument position, the dropped parameter whose default fills it.
    defaulted: Vec<Option<ParamId>>,
}

impl Verifier<'_> {
    pub(crate) fn add_default_parameter_methods(&mut self, class: ClassId) -> VerifyResult<()> {
        let methods = self.arena.class(class).methods.clone();
        for method in methods {
            if !self.has_default_parameters(method) {
                continue;
            }
            tracing::debug!(method = %self.arena.method(method).name, "adding default parameter methods");
            for overload in self.default_parameter_overloads(method)? {
                self.add_default_method_overload(class, method, overload)?;
            }
            self.strip_default_values(method);
        }
        Ok(())
    }

    pub(crate) fn add_default_parameter_constructors(&mut self, class: ClassId) -> VerifyResult<()> {
        let constructors = self.arena.class(class).constructors.clone();
        for constructor in constructors {
            if !self.has_default_parameters(constructor) {
                continue;
            }
            tracing::debug!("adding default parameter constructors");
            for overload in self.default_parameter_overloads(constructor)? {
                self.add_default_constructor_overload(class, constructor, overload)?;
            }
            self.strip_default_values(constructor);
        }
        Ok(())
    }

    fn has_default_parameters(&self, method: MethodId) -> bool {
        self.arena
            .method(method)
            .parameters
            .iter()
            .any(|&p| self.arena.get_param(p).is_some_and(|param| param.has_initial_expression()))
    }

    /// Overloads dropping the last 1..=n defaulted parameters, in that order.
    fn default_parameter_overloads(&self, method: MethodId) -> VerifyResult<Vec<Overload>> {
        let node = self.arena.method(method);
        let mut parameters = Vec::with_capacity(node.parameters.len());
        for &id in &node.parameters {
            let param = self.arena.get_param(id).ok_or_else(|| {
                VerifyError::internal(format!(
                    "Parameter should not be null for method {}",
                    node.name
                ))
            })?;
            parameters.push((id, param));
        }

        let mut seen_default = false;
        for (_, param) in &parameters {
            if param.has_initial_expression() {
                seen_default = true;
            } else if seen_default {
                let descriptor = self.arena.type_descriptor(method);
                return Err(self.method_error(
                    method,
                    diagnostic_codes::DEFAULT_PARAMETER_NOT_TRAILING,
                    &[&param.name, &descriptor],
                ));
            }
        }

        let defaults = parameters
            .iter()
            .filter(|(_, p)| p.has_initial_expression())
            .count();
        let mut overloads = Vec::with_capacity(defaults);
        for i in 1..=defaults {
            let mut overload = Overload {
                parameters: Vec::new(),
                arguments: Vec::with_capacity(parameters.len()),
                defaulted: Vec::with_capacity(parameters.len()),
            };
            let mut index = 1;
            for &(id, param) in &parameters {
                match &param.initial_expression {
                    Some(init) if index > defaults - i => {
                        overload.arguments.push(Expr::cast(param.ty.clone(), init.clone()));
                        overload.defaulted.push(Some(id));
                    }
                    _ => {
                        overload.parameters.push(id);
                        overload
                            .arguments
                            .push(Expr::cast(param.ty.clone(), self.arena.param_ref(id)));
                        overload.defaulted.push(None);
                    }
                }
                if param.has_initial_expression() {
                    index += 1;
                }
            }
            overloads.push(overload);
        }
        Ok(overloads)
    }

    fn strip_default_values(&mut self, method: MethodId) {
        let parameters = self.arena.method(method).parameters.clone();
        for id in parameters {
            let param = self.arena.param_mut(id);
            if let Some(init) = param.initial_expression.take() {
                param.default_initial_expression = Some(init);
            }
        }
    }

    // =========================================================================
    // Methods
    // =========================================================================

    fn add_default_method_overload(
        &mut self,
        class: ClassId,
        method: MethodId,
        overload: Overload,
    ) -> VerifyResult<()> {
        let Overload {
            parameters,
            mut arguments,
            defaulted,
        } = overload;
        let original = self.arena.method(method).clone();
        let types: Vec<TypeRef> = parameters
            .iter()
            .map(|&p| self.arena.param(p).ty.clone())
            .collect();

        if self.arena.declared_method(class, &original.name, &types).is_some() {
            let existing = self.arena.type_descriptor(method);
            let generated = format!(
                "{} {}",
                original.return_type.erasure(),
                signature_text(&original.name, &types)
            );
            return Err(self.method_error(
                method,
                diagnostic_codes::DEFAULT_PARAMETER_METHOD_ALREADY_DEFINED,
                &[&existing, &generated],
            ));
        }

        // A default that mentions another dropped parameter reads a local
        // holding that parameter's default instead.
        let mut captured: Vec<(ParamId, LocalId)> = Vec::new();
        let mut declarations = Vec::new();
        for argument in &arguments {
            let mut references = Vec::new();
            collect_parameter_references(NodeRef::Expr(argument), false, &mut references, 0);
            for (param, in_closure) in references {
                let Some(init) = self.arena.param(param).initial_expression.clone() else {
                    continue;
                };
                if parameters.contains(&param) {
                    continue;
                }
                let local = match captured.iter().find(|(p, _)| *p == param) {
                    Some(&(_, local)) => local,
                    None => {
                        let source = self.arena.param(param);
                        let (name, ty, modifiers) =
                            (source.name.clone(), source.ty.clone(), source.modifiers);
                        let local = self.arena.new_local(name.clone(), ty, modifiers);
                        declarations.push(Stmt::expr(Expr::declare(local, name, Some(init))));
                        captured.push((param, local));
                        local
                    }
                };
                if in_closure {
                    self.arena.local_mut(local).closure_shared = true;
                }
            }
        }
        for (argument, slot) in arguments.iter_mut().zip(&defaulted) {
            if let Some(&(_, local)) = slot.and_then(|p| captured.iter().find(|(q, _)| *q == p)) {
                *argument = self.arena.local_ref(local);
            }
        }
        if !captured.is_empty() {
            let replacements: Vec<(ParamId, Expr)> = captured
                .iter()
                .map(|&(param, local)| (param, self.arena.local_ref(local)))
                .collect();
            let mut redirect = |expr: &mut Expr| {
                let Expr::Variable {
                    target: VarTarget::Parameter(param),
                    span,
                    ..
                } = *expr
                else {
                    return;
                };
                if let Some((_, local)) = replacements.iter().find(|(p, _)| *p == param) {
                    *expr = local.clone().at(span);
                }
            };
            for argument in &mut arguments {
                NodeMut::Expr(argument).walk_exprs_mut(&mut redirect);
            }
            for declaration in &mut declarations {
                NodeMut::Stmt(declaration).walk_exprs_mut(&mut redirect);
            }
        }

        let call = Expr::MethodCall {
            object: Box::new(Expr::this()),
            method: original.name.clone(),
            arguments,
            implicit_this: true,
            target: Some(method),
            span: gvy_common::Span::NONE,
        };
        let mut statements = declarations;
        statements.push(if original.is_void() {
            Stmt::expr(call)
        } else {
            Stmt::ret(Some(call))
        });

        let mut node = MethodNode::new(
            original.name.clone(),
            original.modifiers - Modifiers::ABSTRACT,
            original.return_type.clone(),
            parameters,
            Some(Stmt::block(statements)),
            class,
        );
        node.exceptions = original.exceptions.clone();
        node.generics = original.generics.clone();

        let generated = self.add_property_method(node);
        self.arena.method_mut(generated).flags |= MemberFlags::DEFAULT_PARAMETER_GENERATED;
        self.arena.set_generated_from(generated, method);
        self.claim_anonymous_classes(generated);
        tracing::trace!(
            method = %original.name,
            arity = self.arena.method(generated).parameters.len(),
            "generated default parameter overload"
        );
        Ok(())
    }

    // =========================================================================
    // Constructors
    // =========================================================================

    fn add_default_constructor_overload(
        &mut self,
        class: ClassId,
        constructor: MethodId,
        overload: Overload,
    ) -> VerifyResult<()> {
        let Overload {
            parameters,
            mut arguments,
            ..
        } = overload;
        let original = self.arena.method(constructor).clone();

        // A reference to a dropped parameter with a constant default is
        // replaced by the constant.
        for (position, argument) in arguments.iter_mut().enumerate() {
            let Expr::Variable {
                target: VarTarget::Parameter(param),
                ..
            } = argument.strip_cast()
            else {
                continue;
            };
            let param = *param;
            if parameters.contains(&param) {
                continue;
            }
            let Some(init @ Expr::Constant { .. }) = self.arena.param(param).initial_expression.clone()
            else {
                continue;
            };
            let ty = self.arena.param(original.parameters[position]).ty.clone();
            *argument = Expr::cast(ty, init);
        }

        for argument in &arguments {
            let mut references = Vec::new();
            collect_parameter_references(NodeRef::Expr(argument), false, &mut references, 0);
            for (param, _) in references {
                if parameters.contains(&param) || !self.arena.param(param).has_initial_expression() {
                    continue;
                }
                let class_name = self.arena.class(class).name_without_package().to_string();
                let types = parameters
                    .iter()
                    .map(|&p| self.arena.param(p).ty.to_string())
                    .collect::<Vec<_>>()
                    .join(",");
                let name = self.arena.param(param).name.clone();
                return Err(self.method_error(
                    constructor,
                    diagnostic_codes::GENERATED_CONSTRUCTOR_REFERENCES_REPLACED_PARAMETER,
                    &[&class_name, &types, &name],
                ));
            }
        }

        let mut node = MethodNode::constructor(
            original.modifiers,
            parameters,
            Some(Stmt::block(vec![Stmt::expr(Expr::this_call(arguments))])),
            class,
        );
        node.exceptions = original.exceptions.clone();
        node.flags |= MemberFlags::DEFAULT_PARAMETER_GENERATED;

        let generated = self.arena.add_method(node);
        self.mark_as_generated(generated);
        self.arena.set_generated_from(generated, constructor);
        self.claim_anonymous_classes(generated);
        tracing::trace!(
            arity = self.arena.method(generated).parameters.len(),
            "generated default parameter constructor"
        );
        Ok(())
    }

    /// Anonymous classes instantiated in a generated body now live in it.
    fn claim_anonymous_classes(&mut self, method: MethodId) {
        let mut anonymous = Vec::new();
        if let Some(code) = &self.arena.method(method).code {
            NodeRef::Stmt(code).walk(&mut |node| {
                if let NodeRef::Expr(Expr::ConstructorCall {
                    anonymous_class: Some(class),
                    ..
                }) = node
                {
                    anonymous.push(*class);
                }
                true
            });
        }
        for class in anonymous {
            self.arena.class_mut(class).enclosing_method = Some(method);
        }
    }
}

/// Parameters referenced under `node`, with whether the reference sits
/// inside a closure.
fn collect_parameter_references(
    node: NodeRef<'_>,
    in_closure: bool,
    out: &mut Vec<(ParamId, bool)>,
    depth: usize,
) {
    if depth > MAX_AST_WALK_DEPTH {
        return;
    }
    let in_closure = in_closure || matches!(node, NodeRef::Expr(Expr::Closure { .. }));
    if let NodeRef::Expr(Expr::Variable {
        target: VarTarget::Parameter(param),
        ..
    }) = node
    {
        out.push((*param, in_closure));
    }
    let children = match node {
        NodeRef::Expr(expr) => expr.children(),
        NodeRef::Stmt(stmt) => stmt.children(),
    };
    for child in children {
        collect_parameter_references(child, in_closure, out, depth + 1);
    }
}
