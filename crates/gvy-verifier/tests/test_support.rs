//! Shared fixtures for verifier tests.

use gvy_ast::{
    AstArena, BinaryOp, ClassId, ConstantValue, Expr, LocalId, MethodId, Modifiers, ParamId,
    Stmt, VarTarget,
};
use rustc_hash::FxHashMap;

use crate::{Verifier, VerifierOptions, VerifyResult};

pub(crate) fn arena_with_class() -> (AstArena, ClassId) {
    let mut arena = AstArena::new();
    let module = arena.add_module("Foo.groovy");
    let class = arena.new_class_in(module, "pkg.Foo", Modifiers::PUBLIC);
    (arena, class)
}

pub(crate) fn verify(arena: &mut AstArena, class: ClassId) -> VerifyResult<()> {
    verify_with(arena, class, VerifierOptions::default())
}

pub(crate) fn verify_with(arena: &mut AstArena, class: ClassId, options: VerifierOptions) -> VerifyResult<()> {
    Verifier::new(arena, options).visit_class(class)
}

pub(crate) fn methods_named(arena: &AstArena, class: ClassId, name: &str) -> Vec<MethodId> {
    arena
        .class(class)
        .methods
        .iter()
        .copied()
        .filter(|&m| arena.method(m).name == name)
        .collect()
}

pub(crate) fn only_method(arena: &AstArena, class: ClassId, name: &str) -> MethodId {
    let found = methods_named(arena, class, name);
    assert_eq!(found.len(), 1, "expected exactly one method named {name}, found {found:?}");
    found[0]
}

pub(crate) fn body_statements(arena: &AstArena, method: MethodId) -> Vec<Stmt> {
    arena
        .method(method)
        .code
        .clone()
        .map(Stmt::into_statements)
        .unwrap_or_default()
}

/// Evaluate an integer-valued method body: parameters, locals, casts,
/// arithmetic and calls with a resolved target.
pub(crate) fn call_int(arena: &AstArena, method: MethodId, arguments: &[i64]) -> i64 {
    let node = arena.method(method);
    assert_eq!(node.parameters.len(), arguments.len(), "arity mismatch calling {}", node.name);
    let mut frame = Frame {
        parameters: node.parameters.iter().copied().zip(arguments.iter().copied()).collect(),
        locals: FxHashMap::default(),
    };
    let code = node.code.as_ref().expect("method has a body");
    frame.exec(arena, code).expect("method returns a value")
}

struct Frame {
    parameters: FxHashMap<ParamId, i64>,
    locals: FxHashMap<LocalId, i64>,
}

impl Frame {
    fn exec(&mut self, arena: &AstArena, stmt: &Stmt) -> Option<i64> {
        match stmt {
            Stmt::Block { statements, .. } => statements.iter().find_map(|s| self.exec(arena, s)),
            Stmt::Return { expr: Some(expr), .. } => Some(self.eval(arena, expr)),
            Stmt::Expression { expr, .. } => {
                self.eval(arena, expr);
                None
            }
            other => panic!("unsupported statement {other:?}"),
        }
    }

    fn eval(&mut self, arena: &AstArena, expr: &Expr) -> i64 {
        match expr {
            Expr::Constant {
                value: ConstantValue::Int(v),
                ..
            } => i64::from(*v),
            Expr::Cast { expr, .. } => self.eval(arena, expr),
            Expr::Variable {
                target: VarTarget::Parameter(p),
                ..
            } => self.parameters[p],
            Expr::Variable {
                target: VarTarget::Local(l),
                ..
            } => self.locals[l],
            Expr::Declaration {
                local, initializer, ..
            } => {
                let value = initializer.as_ref().map_or(0, |init| self.eval(arena, init));
                self.locals.insert(*local, value);
                value
            }
            Expr::Binary { left, op, right, .. } => {
                let (l, r) = (self.eval(arena, left), self.eval(arena, right));
                match op {
                    BinaryOp::Plus => l + r,
                    BinaryOp::Minus => l - r,
                    BinaryOp::Multiply => l * r,
                    other => panic!("unsupported operator {other:?}"),
                }
            }
            Expr::MethodCall {
                arguments,
                target: Some(target),
                ..
            } => {
                let values: Vec<i64> = arguments.iter().map(|a| self.eval(arena, a)).collect();
                call_int(arena, *target, &values)
            }
            other => panic!("unsupported expression {other:?}"),
        }
    }
}
