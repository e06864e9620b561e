//! Checks over method and constructor bodies: identifier validity, map
//! entries in lists and enum instantiation.

use gvy_ast::{AstArena, ClassId, ConstructorTarget, Expr, MethodId, NodeRef, Stmt};
use gvy_common::diagnostics::diagnostic_codes;
use gvy_common::limits::MAX_AST_WALK_DEPTH;
use gvy_common::{Span, Spanned};

use crate::error::{ErrorNode, VerifyError, VerifyResult};
use crate::verifier::Verifier;

impl Verifier<'_> {
    pub(crate) fn check_method_code(&self, class: ClassId, method: MethodId) -> VerifyResult<()> {
        let Some(code) = self.arena.method(method).code.as_ref() else {
            return Ok(());
        };
        let checker = CodeChecker {
            arena: self.arena,
            class,
        };
        checker.check(NodeRef::Stmt(code), 0).map_err(|err| {
            let (node, span) = self.source_of(method);
            err.or_at(node, span)
        })
    }
}

struct CodeChecker<'a> {
    arena: &'a AstArena,
    class: ClassId,
}

impl CodeChecker<'_> {
    fn check(&self, node: NodeRef<'_>, depth: usize) -> VerifyResult<()> {
        if depth > MAX_AST_WALK_DEPTH {
            return Ok(());
        }
        match node {
            NodeRef::Stmt(Stmt::ForIn { name, span, .. }) => {
                assert_valid_identifier(name, "for loop variable name", *span)?;
            }
            NodeRef::Expr(expr) => match expr {
                Expr::Variable { name, span, .. } | Expr::Declaration { name, span, .. } => {
                    assert_valid_identifier(name, "variable name", *span)?;
                }
                Expr::Field { field, name, span } => {
                    if !self.arena.field(*field).is_synthetic() {
                        assert_valid_identifier(name, "field name", *span)?;
                    }
                }
                Expr::List { elements, .. } => {
                    if let Some(entry) = elements.iter().find(|e| matches!(e, Expr::MapEntry { .. })) {
                        return Err(code_error(diagnostic_codes::MAP_ENTRY_NOT_ALLOWED, &[], entry.span()));
                    }
                }
                Expr::ConstructorCall { target, span, .. } => {
                    if let ConstructorTarget::New(ty) = target {
                        let is_foreign_enum = self
                            .arena
                            .class_of_type(ty)
                            .is_some_and(|c| c != self.class && self.arena.class(c).is_enum());
                        if is_foreign_enum {
                            return Err(code_error(
                                diagnostic_codes::ENUM_CONSTRUCTOR_CALL_OUTSIDE_ENUM,
                                &[],
                                *span,
                            ));
                        }
                    }
                    // Arguments are not checked.
                    return Ok(());
                }
                _ => {}
            },
            NodeRef::Stmt(_) => {}
        }

        let children = match node {
            NodeRef::Expr(expr) => expr.children(),
            NodeRef::Stmt(stmt) => stmt.children(),
        };
        for child in children {
            self.check(child, depth + 1)?;
        }
        Ok(())
    }
}

fn code_error(code: u32, args: &[&str], span: Span) -> VerifyError {
    VerifyError::parser(code, args, ErrorNode::Code, span)
}

/// Java identifier rules, with `$` and `_` as letters.
fn assert_valid_identifier(name: &str, kind: &str, span: Span) -> VerifyResult<()> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(code_error(diagnostic_codes::IDENTIFIER_MUST_NOT_BE_EMPTY, &[kind], span));
    };
    if name == "$" {
        return Err(code_error(
            diagnostic_codes::IDENTIFIER_MUST_INCLUDE_A_LETTER,
            &[kind, name],
            span,
        ));
    }
    if !is_identifier_start(first) {
        return Err(code_error(
            diagnostic_codes::IDENTIFIER_MUST_START_WITH_A_LETTER,
            &[kind, name],
            span,
        ));
    }
    if !chars.all(is_identifier_part) {
        return Err(code_error(diagnostic_codes::IDENTIFIER_IS_NOT_VALID, &[kind, name], span));
    }
    Ok(())
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '$' || c == '_'
}

fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '$' || c == '_'
}
