//! Uniform child access for the expression and statement trees.

use crate::expr::Expr;
use crate::stmt::Stmt;

#[derive(Clone, Copy, Debug)]
pub enum NodeRef<'a> {
    Expr(&'a Expr),
    Stmt(&'a Stmt),
}

#[derive(Debug)]
pub enum NodeMut<'a> {
    Expr(&'a mut Expr),
    Stmt(&'a mut Stmt),
}

impl NodeRef<'_> {
    /// Pre-order walk over this node and all descendants.
    ///
    /// The callback returns `false` to skip the children of a node.
    pub fn walk(self, f: &mut impl FnMut(NodeRef<'_>) -> bool) {
        if !f(self) {
            return;
        }
        let children = match self {
            NodeRef::Expr(expr) => expr.children(),
            NodeRef::Stmt(stmt) => stmt.children(),
        };
        for child in children {
            child.walk(f);
        }
    }
}

impl NodeMut<'_> {
    /// Post-order walk that lets the callback rewrite expressions in place.
    pub fn walk_exprs_mut(self, f: &mut impl FnMut(&mut Expr)) {
        match self {
            NodeMut::Expr(expr) => {
                for child in expr.children_mut() {
                    child.walk_exprs_mut(f);
                }
                f(expr);
            }
            NodeMut::Stmt(stmt) => {
                for child in stmt.children_mut() {
                    child.walk_exprs_mut(f);
                }
            }
        }
    }
}
