//! Explicit returns for methods whose value is their last expression.

use gvy_ast::{Expr, MethodId, Stmt};
use gvy_common::{Span, Spanned};

use crate::verifier::Verifier;

impl Verifier<'_> {
    pub(crate) fn add_return_if_needed(&mut self, method: MethodId) {
        let node = self.arena.method(method);
        if node.is_void() || node.is_abstract() || node.is_constructor() || node.is_static_initializer() {
            return;
        }
        let Some(code) = node.code.as_ref() else {
            return;
        };
        if code.is_bytecode() {
            return;
        }

        let name = node.name.clone();
        let Some(code) = self.arena.method_mut(method).code.take() else {
            return;
        };
        let code = self.add_returns(code);
        tracing::trace!(method = %name, "added implicit returns");
        self.arena.method_mut(method).code = Some(code);
    }

    fn add_returns(&self, stmt: Stmt) -> Stmt {
        match stmt {
            Stmt::Return { .. } | Stmt::Throw { .. } | Stmt::Bytecode(_) => stmt,
            Stmt::Empty => Stmt::return_null(),
            Stmt::Block {
                mut statements,
                span,
            } => {
                match statements.pop() {
                    Some(last) => statements.push(self.add_returns(last)),
                    None => statements.push(Stmt::return_null()),
                }
                Stmt::Block { statements, span }
            }
            Stmt::Expression { expr, span } => self.return_expression(expr, span),
            Stmt::If {
                condition,
                then_branch,
                else_branch,
                span,
            } => {
                let then_branch = Box::new(self.add_returns(*then_branch));
                let else_branch = match else_branch {
                    Some(branch) => self.add_returns(*branch),
                    None => Stmt::return_null(),
                };
                Stmt::If {
                    condition,
                    then_branch,
                    else_branch: Some(Box::new(else_branch)),
                    span,
                }
            }
            loop_stmt @ (Stmt::While { .. } | Stmt::ForIn { .. }) => {
                let span = loop_stmt.span();
                Stmt::Block {
                    statements: vec![loop_stmt, Stmt::return_null()],
                    span,
                }
            }
        }
    }

    /// `expr` becomes `return expr`; a declaration stays and returns the
    /// declared variable.
    fn return_expression(&self, expr: Expr, span: Span) -> Stmt {
        if let Expr::Declaration { local, .. } = &expr {
            let variable = self.arena.local_ref(*local).at(expr.span());
            let declaration = Stmt::Expression { expr, span };
            return Stmt::Block {
                statements: vec![declaration, Stmt::ret(Some(variable)).at(span)],
                span,
            };
        }
        Stmt::Return {
            expr: Some(expr),
            span,
        }
    }
}
