//! Tests for definite assignment of final locals and parameters.

use gvy_ast::{
    AstArena, BinaryOp, ClassId, ConstantValue, Expr, LocalId, Modifiers, Stmt, TypeRef, UpdateOp,
};
use gvy_common::Span;
use gvy_common::diagnostics::diagnostic_codes;

use crate::test_support::{arena_with_class, verify};

fn final_local(arena: &mut AstArena, name: &str) -> LocalId {
    arena.new_local(name, TypeRef::int(), Modifiers::FINAL)
}

fn void_method(arena: &mut AstArena, class: ClassId, statements: Vec<Stmt>) {
    arena.new_method(class, "run", Modifiers::PUBLIC, TypeRef::void(), vec![], Some(Stmt::block(statements)));
}

fn assign(arena: &AstArena, local: LocalId, value: i32) -> Stmt {
    Stmt::expr(Expr::assign(arena.local_ref(local), Expr::int(value)))
}

fn use_of(arena: &AstArena, local: LocalId) -> Stmt {
    Stmt::expr(Expr::call(Expr::this(), "println", vec![arena.local_ref(local)]))
}

fn condition() -> Expr {
    Expr::constant(ConstantValue::Boolean(true))
}

#[test]
fn test_reading_initialized_final_is_fine() {
    let (mut arena, class) = arena_with_class();
    let x = final_local(&mut arena, "x");
    let statements = vec![Stmt::expr(Expr::declare(x, "x", Some(Expr::int(1)))), use_of(&arena, x)];
    void_method(&mut arena, class, statements);

    verify(&mut arena, class).expect("read after initialization");
}

#[test]
fn test_reassigning_final_local_is_rejected() {
    let (mut arena, class) = arena_with_class();
    let x = final_local(&mut arena, "x");
    let reassignment = Expr::assign(arena.local_ref(x), Expr::int(2)).at(Span::new(3, 9));
    let statements = vec![Stmt::expr(Expr::declare(x, "x", Some(Expr::int(1)))), Stmt::expr(reassignment)];
    void_method(&mut arena, class, statements);

    let err = verify(&mut arena, class).expect_err("x is final");
    assert_eq!(err.code(), diagnostic_codes::FINAL_VARIABLE_REASSIGNED);
    assert!(err.to_string().contains("variable [x]"), "{err}");
    assert_eq!(err.span(), Span::new(3, 9));
}

#[test]
fn test_reassigning_final_parameter_is_rejected() {
    let (mut arena, class) = arena_with_class();
    let p = arena.new_param("p", TypeRef::int());
    arena.param_mut(p).modifiers |= Modifiers::FINAL;
    let code = Stmt::block(vec![Stmt::expr(Expr::assign(arena.param_ref(p), Expr::int(0)))]);
    arena.new_method(class, "run", Modifiers::PUBLIC, TypeRef::void(), vec![p], Some(code));

    let err = verify(&mut arena, class).expect_err("p is final");
    assert_eq!(err.code(), diagnostic_codes::FINAL_VARIABLE_REASSIGNED);
    assert!(err.to_string().contains("parameter [p]"), "{err}");
}

#[test]
fn test_deferred_initialization_is_fine() {
    let (mut arena, class) = arena_with_class();
    let x = final_local(&mut arena, "x");
    let statements = vec![
        Stmt::expr(Expr::declare(x, "x", None)),
        assign(&arena, x, 1),
        use_of(&arena, x),
    ];
    void_method(&mut arena, class, statements);

    verify(&mut arena, class).expect("assigned once before use");
}

#[test]
fn test_reading_uninitialized_final_is_rejected() {
    let (mut arena, class) = arena_with_class();
    let x = final_local(&mut arena, "x");
    let statements = vec![Stmt::expr(Expr::declare(x, "x", None)), use_of(&arena, x)];
    void_method(&mut arena, class, statements);

    let err = verify(&mut arena, class).expect_err("x read before assignment");
    assert_eq!(err.code(), diagnostic_codes::FINAL_VARIABLE_MAY_BE_UNINITIALIZED);
    assert!(err.to_string().contains("[x]"), "{err}");
}

#[test]
fn test_assignment_on_both_branches_is_fine() {
    let (mut arena, class) = arena_with_class();
    let x = final_local(&mut arena, "x");
    let branches = Stmt::If {
        condition: condition(),
        then_branch: Box::new(assign(&arena, x, 1)),
        else_branch: Some(Box::new(assign(&arena, x, 2))),
        span: Span::NONE,
    };
    let statements = vec![Stmt::expr(Expr::declare(x, "x", None)), branches, use_of(&arena, x)];
    void_method(&mut arena, class, statements);

    verify(&mut arena, class).expect("definitely assigned after the if");
}

#[test]
fn test_assignment_on_one_branch_leaves_final_maybe_unassigned() {
    let (mut arena, class) = arena_with_class();
    let x = final_local(&mut arena, "x");
    let branch = Stmt::If {
        condition: condition(),
        then_branch: Box::new(assign(&arena, x, 1)),
        else_branch: None,
        span: Span::NONE,
    };
    let statements = vec![Stmt::expr(Expr::declare(x, "x", None)), branch, use_of(&arena, x)];
    void_method(&mut arena, class, statements);

    let err = verify(&mut arena, class).expect_err("x may be unassigned");
    assert_eq!(err.code(), diagnostic_codes::FINAL_VARIABLE_MAY_BE_UNINITIALIZED);
}

#[test]
fn test_branch_that_returns_does_not_count() {
    let (mut arena, class) = arena_with_class();
    let x = final_local(&mut arena, "x");
    let branch = Stmt::If {
        condition: condition(),
        then_branch: Box::new(Stmt::block(vec![Stmt::ret(None)])),
        else_branch: Some(Box::new(assign(&arena, x, 2))),
        span: Span::NONE,
    };
    let statements = vec![Stmt::expr(Expr::declare(x, "x", None)), branch, use_of(&arena, x)];
    void_method(&mut arena, class, statements);

    verify(&mut arena, class).expect("the returning path never reaches the read");
}

#[test]
fn test_assignment_inside_loop_is_rejected() {
    let (mut arena, class) = arena_with_class();
    let x = final_local(&mut arena, "x");
    let looped = Stmt::While {
        condition: condition(),
        body: Box::new(Stmt::block(vec![assign(&arena, x, 1)])),
        span: Span::NONE,
    };
    void_method(&mut arena, class, vec![Stmt::expr(Expr::declare(x, "x", None)), looped]);

    let err = verify(&mut arena, class).expect_err("second iteration reassigns x");
    assert_eq!(err.code(), diagnostic_codes::FINAL_VARIABLE_REASSIGNED);
}

#[test]
fn test_final_declared_inside_loop_is_fine() {
    let (mut arena, class) = arena_with_class();
    let x = final_local(&mut arena, "x");
    let body = Stmt::block(vec![Stmt::expr(Expr::declare(x, "x", Some(Expr::int(1)))), use_of(&arena, x)]);
    let looped = Stmt::While {
        condition: condition(),
        body: Box::new(body),
        span: Span::NONE,
    };
    void_method(&mut arena, class, vec![looped]);

    verify(&mut arena, class).expect("each iteration declares a fresh x");
}

#[test]
fn test_compound_assignment_is_rejected() {
    let (mut arena, class) = arena_with_class();
    let x = final_local(&mut arena, "x");
    let increment = Expr::binary(arena.local_ref(x), BinaryOp::PlusAssign, Expr::int(1));
    let statements = vec![Stmt::expr(Expr::declare(x, "x", Some(Expr::int(1)))), Stmt::expr(increment)];
    void_method(&mut arena, class, statements);

    let err = verify(&mut arena, class).expect_err("x += 1 reassigns x");
    assert_eq!(err.code(), diagnostic_codes::FINAL_VARIABLE_REASSIGNED);
}

#[test]
fn test_increment_of_unassigned_final_is_a_reassignment() {
    let (mut arena, class) = arena_with_class();
    let x = final_local(&mut arena, "x");
    let increment = Expr::Update {
        op: UpdateOp::Increment,
        prefix: false,
        operand: Box::new(arena.local_ref(x)),
        span: Span::new(4, 9),
    };
    let statements = vec![Stmt::expr(Expr::declare(x, "x", None)), Stmt::expr(increment)];
    void_method(&mut arena, class, statements);

    let err = verify(&mut arena, class).expect_err("x++ writes a final");
    assert_eq!(
        err.code(),
        diagnostic_codes::FINAL_VARIABLE_REASSIGNED,
        "reported as a write, not an uninitialized read: {err}"
    );
    assert!(err.to_string().contains("variable [x]"), "{err}");
    assert_eq!(err.span(), Span::new(4, 9));
}

#[test]
fn test_assignment_inside_closure_is_rejected() {
    let (mut arena, class) = arena_with_class();
    let x = final_local(&mut arena, "x");
    let closure = Expr::closure(vec![], Stmt::block(vec![assign(&arena, x, 2)]));
    let statements = vec![Stmt::expr(Expr::declare(x, "x", None)), Stmt::expr(closure)];
    void_method(&mut arena, class, statements);

    let err = verify(&mut arena, class).expect_err("closures cannot assign captured finals");
    assert_eq!(err.code(), diagnostic_codes::FINAL_VARIABLE_REASSIGNED);
}

#[test]
fn test_non_final_locals_are_ignored() {
    let (mut arena, class) = arena_with_class();
    let y = arena.new_local("y", TypeRef::int(), Modifiers::empty());
    let statements = vec![
        Stmt::expr(Expr::declare(y, "y", None)),
        use_of(&arena, y),
        assign(&arena, y, 1),
        assign(&arena, y, 2),
    ];
    void_method(&mut arena, class, statements);

    verify(&mut arena, class).expect("y is not final");
}
