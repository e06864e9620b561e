//! Tests for default-parameter overload generation.

use gvy_ast::{
    AstArena, BinaryOp, ClassId, ConstructorTarget, Expr, MemberFlags, MethodId, Modifiers,
    Stmt, TypeRef,
};
use gvy_common::diagnostics::diagnostic_codes;

use crate::test_support::{arena_with_class, body_statements, call_int, methods_named, verify};

/// `int f(int a, int b = <b>, int c = <c>) { return a + b + c }`
fn add_sum_method(arena: &mut AstArena, class: ClassId, b: Expr, c: Expr) -> MethodId {
    let a = arena.new_param("a", TypeRef::int());
    let b = arena.new_param_with_default("b", TypeRef::int(), b);
    let c = arena.new_param_with_default("c", TypeRef::int(), c);
    let sum = Expr::binary(
        Expr::binary(arena.param_ref(a), BinaryOp::Plus, arena.param_ref(b)),
        BinaryOp::Plus,
        arena.param_ref(c),
    );
    arena.new_method(
        class,
        "f",
        Modifiers::PUBLIC,
        TypeRef::int(),
        vec![a, b, c],
        Some(Stmt::block(vec![Stmt::ret(Some(sum))])),
    )
}

fn overload_with_arity(arena: &AstArena, class: ClassId, arity: usize) -> MethodId {
    methods_named(arena, class, "f")
        .into_iter()
        .find(|&m| arena.method(m).parameters.len() == arity)
        .unwrap_or_else(|| panic!("no overload of f with {arity} parameters"))
}

#[test]
fn test_default_parameters_generate_shorter_overloads() {
    let (mut arena, class) = arena_with_class();
    let original = add_sum_method(&mut arena, class, Expr::int(2), Expr::int(3));

    verify(&mut arena, class).expect("class verifies");

    let mut arities: Vec<usize> = methods_named(&arena, class, "f")
        .into_iter()
        .map(|m| arena.method(m).parameters.len())
        .collect();
    arities.sort_unstable();
    assert_eq!(arities, vec![1, 2, 3], "one overload per trailing default");

    let shortest = overload_with_arity(&arena, class, 1);
    assert!(
        arena.method(shortest).flags.contains(MemberFlags::DEFAULT_PARAMETER_GENERATED),
        "overload should be marked as generated from defaults"
    );
    assert!(arena.method(shortest).flags.contains(MemberFlags::GENERATED));
    assert_eq!(arena.generated_from(shortest), Some(original));
}

#[test]
fn test_default_parameter_overloads_forward_defaults() {
    let (mut arena, class) = arena_with_class();
    add_sum_method(&mut arena, class, Expr::int(2), Expr::int(3));

    verify(&mut arena, class).expect("class verifies");

    assert_eq!(call_int(&arena, overload_with_arity(&arena, class, 1), &[1]), 6);
    assert_eq!(call_int(&arena, overload_with_arity(&arena, class, 2), &[1, 10]), 14);
    assert_eq!(call_int(&arena, overload_with_arity(&arena, class, 3), &[1, 10, 100]), 111);
}

#[test]
fn test_default_referencing_earlier_dropped_parameter_reads_local() {
    let (mut arena, class) = arena_with_class();
    // c = b * 10
    let b_default = Expr::int(2);
    let original = add_sum_method(&mut arena, class, b_default, Expr::int(0));
    let b = arena.method(original).parameters[1];
    let c = arena.method(original).parameters[2];
    arena.param_mut(c).initial_expression = Some(Expr::binary(
        arena.param_ref(b),
        BinaryOp::Multiply,
        Expr::int(10),
    ));

    verify(&mut arena, class).expect("class verifies");

    let shortest = overload_with_arity(&arena, class, 1);
    assert!(
        matches!(
            body_statements(&arena, shortest).first(),
            Some(Stmt::Expression {
                expr: Expr::Declaration { .. },
                ..
            })
        ),
        "the dropped parameter should be declared as a local first"
    );
    assert_eq!(call_int(&arena, shortest, &[1]), 1 + 2 + 20);
    assert_eq!(call_int(&arena, overload_with_arity(&arena, class, 2), &[1, 5]), 1 + 5 + 50);
}

#[test]
fn test_defaults_move_to_default_initial_expression() {
    let (mut arena, class) = arena_with_class();
    let original = add_sum_method(&mut arena, class, Expr::int(2), Expr::int(3));

    verify(&mut arena, class).expect("class verifies");

    for &p in &arena.method(original).parameters[1..] {
        let param = arena.param(p);
        assert!(param.initial_expression.is_none(), "{} keeps its default", param.name);
        assert!(param.default_initial_expression.is_some());
    }
}

#[test]
fn test_default_parameter_overload_clashing_with_declared_method() {
    let (mut arena, class) = arena_with_class();
    let x = arena.new_param("x", TypeRef::int());
    arena.new_method(class, "f", Modifiers::PUBLIC, TypeRef::int(), vec![x], Some(Stmt::block(vec![])));
    add_sum_method(&mut arena, class, Expr::int(2), Expr::int(3));

    let err = verify(&mut arena, class).expect_err("overload f(int) already exists");
    assert_eq!(err.code(), diagnostic_codes::DEFAULT_PARAMETER_METHOD_ALREADY_DEFINED);
}

#[test]
fn test_non_trailing_default_is_rejected() {
    let (mut arena, class) = arena_with_class();
    let a = arena.new_param_with_default("a", TypeRef::int(), Expr::int(1));
    let b = arena.new_param("b", TypeRef::int());
    arena.new_method(class, "g", Modifiers::PUBLIC, TypeRef::void(), vec![a, b], Some(Stmt::block(vec![])));

    let err = verify(&mut arena, class).expect_err("default before required parameter");
    assert_eq!(err.code(), diagnostic_codes::DEFAULT_PARAMETER_NOT_TRAILING);
    assert!(err.to_string().contains("'b'"), "message names the parameter: {err}");
}

#[test]
fn test_default_parameter_constructor_delegates_with_this_call() {
    let (mut arena, class) = arena_with_class();
    let a = arena.new_param("a", TypeRef::int());
    let b = arena.new_param_with_default("b", TypeRef::int(), Expr::int(7));
    arena.new_constructor(class, Modifiers::PUBLIC, vec![a, b], Some(Stmt::block(vec![])));

    verify(&mut arena, class).expect("class verifies");

    let constructors = &arena.class(class).constructors;
    assert_eq!(constructors.len(), 2, "original plus one generated constructor");
    let generated = constructors[1];
    assert_eq!(arena.method(generated).parameters, vec![a]);

    let statements = body_statements(&arena, generated);
    let Some(Stmt::Expression {
        expr: Expr::ConstructorCall {
            target: ConstructorTarget::This,
            arguments,
            ..
        },
        ..
    }) = statements.first()
    else {
        panic!("generated constructor should start with this(...): {statements:?}");
    };
    assert_eq!(arguments.len(), 2);
    assert_eq!(
        arguments[1].strip_cast().as_constant(),
        Expr::int(7).as_constant(),
        "dropped parameter is filled with its default"
    );
}

fn this_call_arguments(arena: &AstArena, constructor: MethodId) -> Vec<Expr> {
    match body_statements(arena, constructor).first() {
        Some(Stmt::Expression {
            expr: Expr::ConstructorCall {
                target: ConstructorTarget::This,
                arguments,
                ..
            },
            ..
        }) => arguments.clone(),
        other => panic!("generated constructor should start with this(...): {other:?}"),
    }
}

#[test]
fn test_constructor_default_referencing_dropped_constant_parameter_inlines_constant() {
    let (mut arena, class) = arena_with_class();
    // Foo(int a = 1, int b = a)
    let a = arena.new_param_with_default("a", TypeRef::int(), Expr::int(1));
    let a_ref = arena.param_ref(a);
    let b = arena.new_param_with_default("b", TypeRef::int(), a_ref);
    arena.new_constructor(class, Modifiers::PUBLIC, vec![a, b], Some(Stmt::block(vec![])));

    verify(&mut arena, class).expect("class verifies");

    let constructors = arena.class(class).constructors.clone();
    assert_eq!(constructors.len(), 3, "Foo(int, int), Foo(int) and Foo()");
    let no_args = constructors
        .iter()
        .copied()
        .find(|&c| arena.method(c).parameters.is_empty())
        .expect("Foo() is generated");

    let arguments = this_call_arguments(&arena, no_args);
    assert_eq!(arguments.len(), 2);
    let Expr::Cast { ty, expr, .. } = &arguments[1] else {
        panic!("b is passed as a cast constant: {:?}", arguments[1]);
    };
    assert_eq!(*ty, TypeRef::int());
    assert_eq!(expr.as_constant(), Expr::int(1).as_constant(), "a's default replaces the reference to a");

    let one_arg = constructors
        .iter()
        .copied()
        .find(|&c| arena.method(c).parameters == vec![a])
        .expect("Foo(int) is generated");
    let arguments = this_call_arguments(&arena, one_arg);
    assert!(
        matches!(arguments[1].strip_cast(), Expr::Variable { name, .. } if name == "a"),
        "kept parameter is forwarded as is: {:?}",
        arguments[1]
    );
}

#[test]
fn test_constructor_default_referencing_dropped_computed_parameter_is_rejected() {
    let (mut arena, class) = arena_with_class();
    // Foo(int a = seed(), int b = a)
    let a = arena.new_param_with_default("a", TypeRef::int(), Expr::call_this("seed", vec![]));
    let a_ref = arena.param_ref(a);
    let b = arena.new_param_with_default("b", TypeRef::int(), a_ref);
    arena.new_constructor(class, Modifiers::PUBLIC, vec![a, b], Some(Stmt::block(vec![])));

    let err = verify(&mut arena, class).expect_err("Foo() cannot pass a replaced parameter");
    assert_eq!(err.code(), diagnostic_codes::GENERATED_CONSTRUCTOR_REFERENCES_REPLACED_PARAMETER);
    let message = err.to_string();
    assert!(message.contains("\"Foo()\""), "names the generated constructor: {message}");
    assert!(message.contains("parameter 'a'"), "names the replaced parameter: {message}");
}
