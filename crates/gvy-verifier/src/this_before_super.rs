//! Rejects use of the instance being constructed inside the arguments of a
//! constructor's `this(...)`/`super(...)` call.
//!
//! Only parameters, static members and members of enclosing classes are
//! reachable there. Field references inside closures are allowed since the
//! closure runs later.

use gvy_ast::{AstArena, ClassId, Expr, MethodId, NodeRef, VarTarget};
use gvy_common::diagnostics::diagnostic_codes;
use gvy_common::limits::MAX_AST_WALK_DEPTH;
use gvy_common::{Span, Spanned};
use smallvec::SmallVec;

use crate::error::{ErrorNode, VerifyError, VerifyResult};
use crate::verifier::Verifier;

impl Verifier<'_> {
    pub(crate) fn check_this_before_super(&self, class: ClassId, constructor: MethodId) -> VerifyResult<()> {
        let Some(code) = self.arena.method(constructor).code.as_ref() else {
            return Ok(());
        };
        let mut scan = SuperCallScan {
            arena: self.arena,
            outer_classes: self.arena.outer_classes(class),
            ancestors: SmallVec::new(),
        };
        match scan.visit(NodeRef::Stmt(code), 0) {
            Ok(()) => Ok(()),
            Err(reference) => {
                let (node, span) = if reference.span.has_position() {
                    (ErrorNode::Code, reference.span)
                } else {
                    self.source_of(constructor)
                };
                Err(VerifyError::parser(
                    diagnostic_codes::CANNOT_REFERENCE_BEFORE_SUPERTYPE_CONSTRUCTOR,
                    &[&reference.name],
                    node,
                    span,
                ))
            }
        }
    }
}

/// An illegal reference: the name reported and where.
struct EarlyReference {
    name: String,
    span: Span,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Ancestor {
    SpecialConstructorCall,
    Closure,
    Other,
}

struct SuperCallScan<'a> {
    arena: &'a AstArena,
    outer_classes: Vec<ClassId>,
    /// Enclosing expressions, innermost last.
    ancestors: SmallVec<[(Ancestor, Span); 16]>,
}

impl SuperCallScan<'_> {
    fn in_special_constructor_call(&self) -> bool {
        self.ancestors
            .iter()
            .any(|(kind, _)| *kind == Ancestor::SpecialConstructorCall)
    }

    fn in_closure(&self) -> bool {
        self.ancestors.iter().any(|(kind, _)| *kind == Ancestor::Closure)
    }

    /// Innermost positioned span, starting at `own`.
    fn report_span(&self, own: Span) -> Span {
        if own.has_position() {
            return own;
        }
        self.ancestors
            .iter()
            .rev()
            .map(|(_, span)| *span)
            .find(Span::has_position)
            .unwrap_or(Span::NONE)
    }

    fn visit(&mut self, node: NodeRef<'_>, depth: usize) -> Result<(), EarlyReference> {
        if depth > MAX_AST_WALK_DEPTH {
            return Ok(());
        }
        let NodeRef::Expr(expr) = node else {
            for child in node_children(node) {
                self.visit(child, depth + 1)?;
            }
            return Ok(());
        };

        let kind = match expr {
            Expr::ConstructorCall { .. } if expr.is_special_constructor_call() => {
                Ancestor::SpecialConstructorCall
            }
            Expr::Closure { .. } => Ancestor::Closure,
            _ => Ancestor::Other,
        };

        match expr {
            Expr::Variable { name, target, span } if self.in_special_constructor_call() => {
                if matches!(target, VarTarget::This | VarTarget::Super) || self.is_instance_member(*target) {
                    return Err(EarlyReference {
                        name: name.clone(),
                        span: self.report_span(*span),
                    });
                }
                return Ok(());
            }
            Expr::MethodCall {
                object,
                method,
                arguments,
                implicit_this,
                target,
                span,
            } if self.in_special_constructor_call() && (*implicit_this || object.is_this() || object.is_super()) => {
                let allowed = target.is_some_and(|m| {
                    let callee = self.arena.method(m);
                    callee.is_static() || self.outer_classes.contains(&callee.declaring_class)
                });
                if !allowed {
                    let (name, own) = if *implicit_this {
                        (method.clone(), *span)
                    } else {
                        (object.text(), object.span())
                    };
                    return Err(EarlyReference {
                        name,
                        span: self.report_span(own),
                    });
                }
                self.ancestors.push((kind, *span));
                for argument in arguments {
                    self.visit(NodeRef::Expr(argument), depth + 1)?;
                }
                self.ancestors.pop();
                return Ok(());
            }
            _ => {}
        }

        self.ancestors.push((kind, expr.span()));
        for child in expr.children() {
            self.visit(child, depth + 1)?;
        }
        self.ancestors.pop();
        Ok(())
    }

    /// A non-static field of some class, read outside any closure.
    fn is_instance_member(&self, target: VarTarget) -> bool {
        match target {
            VarTarget::Field(field) => !self.in_closure() && !self.arena.field(field).is_static(),
            _ => false,
        }
    }
}

fn node_children(node: NodeRef<'_>) -> SmallVec<[NodeRef<'_>; 4]> {
    match node {
        NodeRef::Expr(expr) => expr.children(),
        NodeRef::Stmt(stmt) => stmt.children(),
    }
}
