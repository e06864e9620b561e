//! Tests for constructor and static initializer assembly.

use gvy_ast::{
    AstArena, BinaryOp, BytecodeSequence, ClassFlags, ClassId, ConstantValue, Expr, FieldNode,
    MemberFlags, Modifiers, ParamId, Stmt, TypeRef, UnaryOp, VarTarget,
};
use gvy_common::Span;
use gvy_common::diagnostics::diagnostic_codes;

use crate::test_support::{arena_with_class, body_statements, only_method, verify, verify_with};
use crate::{
    SWAP_INIT_METHOD, Verifier, VerifierOptions, to_primitive_constant, transform_inline_constants,
};

fn assigned_field(stmt: &Stmt) -> Option<&str> {
    match stmt.as_expression()? {
        Expr::Binary {
            left,
            op: BinaryOp::Assign,
            ..
        } => match left.as_ref() {
            Expr::Field { name, .. } => Some(name),
            _ => None,
        },
        _ => None,
    }
}

fn called_method(stmt: &Stmt) -> Option<&str> {
    match stmt.as_expression()? {
        Expr::MethodCall { method, .. } => Some(method),
        _ => None,
    }
}

fn position(statements: &[Stmt], pred: impl Fn(&Stmt) -> bool) -> usize {
    statements
        .iter()
        .position(pred)
        .unwrap_or_else(|| panic!("statement not found in {statements:#?}"))
}

fn clinit_statements(arena: &AstArena, class: ClassId) -> Vec<Stmt> {
    let clinit = arena.static_initializer(class).expect("class has <clinit>");
    body_statements(arena, clinit)
}

#[test]
fn test_constructor_gets_field_and_block_initializers_after_super_call() {
    let (mut arena, class) = arena_with_class();
    arena.new_field(class, "a", Modifiers::PRIVATE, TypeRef::int(), Some(Expr::int(1)));
    arena.new_field(class, "b", Modifiers::PRIVATE, TypeRef::int(), Some(Expr::int(2)));
    arena
        .class_mut(class)
        .object_initializers
        .push(Stmt::expr(Expr::call_this("init", vec![])));
    let constructor = arena.new_constructor(
        class,
        Modifiers::PUBLIC,
        vec![],
        Some(Stmt::block(vec![
            Stmt::expr(Expr::super_call(vec![])),
            Stmt::expr(Expr::call_this("afterwards", vec![])),
        ])),
    );

    verify(&mut arena, class).expect("class verifies");

    let statements = body_statements(&arena, constructor);
    assert!(
        statements[0]
            .as_expression()
            .is_some_and(Expr::is_special_constructor_call),
        "super(...) stays first: {statements:#?}"
    );
    let a = position(&statements, |s| assigned_field(s) == Some("a"));
    let b = position(&statements, |s| assigned_field(s) == Some("b"));
    let meta = position(&statements, |s| assigned_field(s) == Some("metaClass"));
    let init = position(&statements, |s| called_method(s) == Some("init"));
    let rest = position(&statements, |s| called_method(s) == Some("afterwards"));
    assert!(a < b && b < init, "fields in declaration order before blocks");
    assert!(meta < init, "metaClass is initialized with the other fields");
    assert!(init < rest, "authored body runs last");
    assert!(
        arena.class(class).object_initializers.is_empty(),
        "object initializers are consumed"
    );
    assert!(arena.field(arena.declared_field(class, "a").unwrap()).initial_expression.is_some());
}

#[test]
fn test_this_delegating_constructor_gets_no_initializers() {
    let (mut arena, class) = arena_with_class();
    arena.new_field(class, "a", Modifiers::PRIVATE, TypeRef::int(), Some(Expr::int(1)));
    let x = arena.new_param("x", TypeRef::int());
    arena.new_constructor(class, Modifiers::PUBLIC, vec![x], Some(Stmt::block(vec![])));
    let delegating = arena.new_constructor(
        class,
        Modifiers::PUBLIC,
        vec![],
        Some(Stmt::block(vec![Stmt::expr(Expr::this_call(vec![Expr::int(0)]))])),
    );

    verify(&mut arena, class).expect("class verifies");

    assert_eq!(body_statements(&arena, delegating).len(), 1);
}

/// `this.<field> = <param>` for a synthetic capture field.
fn capture(arena: &mut AstArena, class: ClassId, field: &str, param: ParamId) -> Stmt {
    let ty = arena.param(param).ty.clone();
    let id = arena.new_field(class, field, Modifiers::PRIVATE | Modifiers::FINAL, ty, None);
    arena.field_mut(id).flags |= MemberFlags::SYNTHETIC;
    let name = arena.param(param).name.clone();
    Stmt::expr(Expr::assign(arena.field_expr(id), Expr::var(name, VarTarget::Parameter(param))))
}

#[test]
fn test_inner_class_assigns_outer_instance_before_super_call() {
    let (mut arena, outer) = arena_with_class();
    let module = arena.class(outer).module.expect("outer class has a module");
    let inner = arena.new_class_in(module, "pkg.Foo$Inner", Modifiers::PUBLIC);
    arena.class_mut(inner).outer_class = Some(outer);
    arena.new_field(inner, "x", Modifiers::PRIVATE, TypeRef::int(), Some(Expr::int(1)));

    let p = arena.new_param("$p", TypeRef::class("pkg.Foo"));
    let this0 = capture(&mut arena, inner, "this$0", p);
    let constructor = arena.new_constructor(
        inner,
        Modifiers::PUBLIC,
        vec![p],
        Some(Stmt::block(vec![Stmt::expr(Expr::super_call(vec![])), this0])),
    );

    verify(&mut arena, inner).expect("inner class verifies");

    let statements = body_statements(&arena, constructor);
    assert_eq!(assigned_field(&statements[0]), Some("this$0"), "outer instance first: {statements:#?}");
    assert!(
        statements[1]
            .as_expression()
            .is_some_and(Expr::is_special_constructor_call),
        "super(...) follows the outer instance"
    );
    let x = position(&statements, |s| assigned_field(s) == Some("x"));
    let meta = position(&statements, |s| assigned_field(s) == Some("metaClass"));
    assert!(1 < x && 1 < meta, "field initializers run after super(...)");
    let this0_count = statements
        .iter()
        .filter(|s| assigned_field(s) == Some("this$0"))
        .count();
    assert_eq!(this0_count, 1, "the capture is moved, not copied");
}

#[test]
fn test_anonymous_class_assigns_captured_locals_before_super_call() {
    let (mut arena, outer) = arena_with_class();
    let module = arena.class(outer).module.expect("outer class has a module");
    let anonymous = arena.new_class_in(module, "pkg.Foo$1", Modifiers::empty());
    arena.class_mut(anonymous).outer_class = Some(outer);
    arena.class_mut(anonymous).flags |= ClassFlags::ANONYMOUS;
    arena.new_field(anonymous, "count", Modifiers::PRIVATE, TypeRef::int(), Some(Expr::int(0)));

    let p = arena.new_param("$p", TypeRef::class("pkg.Foo"));
    let name = arena.new_param("name", TypeRef::string());
    let this0 = capture(&mut arena, anonymous, "this$0", p);
    let local = capture(&mut arena, anonymous, "name", name);
    let constructor = arena.new_constructor(
        anonymous,
        Modifiers::PUBLIC,
        vec![p, name],
        Some(Stmt::block(vec![
            Stmt::expr(Expr::super_call(vec![])),
            Stmt::block(vec![this0, local]),
            Stmt::expr(Expr::call_this("run", vec![])),
        ])),
    );

    verify(&mut arena, anonymous).expect("anonymous class verifies");

    let statements = body_statements(&arena, constructor);
    assert_eq!(assigned_field(&statements[0]), Some("this$0"), "{statements:#?}");
    assert_eq!(assigned_field(&statements[1]), Some("name"), "captured local before super(...)");
    assert!(
        statements[2]
            .as_expression()
            .is_some_and(Expr::is_special_constructor_call)
    );
    let count = position(&statements, |s| assigned_field(s) == Some("count"));
    let run = position(&statements, |s| called_method(s) == Some("run"));
    assert!(2 < count && count < run, "field initializers, then the authored body");
}

#[test]
fn test_default_constructor_added_when_none_declared() {
    let (mut arena, class) = arena_with_class();

    verify(&mut arena, class).expect("class verifies");

    let constructors = &arena.class(class).constructors;
    assert_eq!(constructors.len(), 1);
    let constructor = arena.method(constructors[0]);
    assert!(constructor.parameters.is_empty());
    assert!(constructor.modifiers.is_public());
    assert!(constructor.flags.contains(MemberFlags::NO_REAL_SOURCE_POSITION));
}

#[test]
fn test_static_initializers_move_to_clinit_and_constants_stay() {
    let (mut arena, class) = arena_with_class();
    let max = arena.new_field(
        class,
        "MAX",
        Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::FINAL,
        TypeRef::int(),
        Some(Expr::int(10)),
    );
    let name = arena.new_field(
        class,
        "name",
        Modifiers::PRIVATE | Modifiers::STATIC,
        TypeRef::string(),
        Some(Expr::string("hello")),
    );

    verify(&mut arena, class).expect("class verifies");

    assert!(
        arena.field(max).initial_expression.is_some(),
        "static final constant keeps its value on the declaration"
    );
    assert!(arena.field(name).initial_expression.is_none());
    let clinit = clinit_statements(&arena, class);
    assert!(clinit.iter().any(|s| assigned_field(s) == Some("name")));
    assert!(!clinit.iter().any(|s| assigned_field(s) == Some("MAX")));
}

#[test]
fn test_static_initializers_stay_on_fields_when_not_inlined() {
    let (mut arena, class) = arena_with_class();
    let name = arena.new_field(
        class,
        "name",
        Modifiers::PRIVATE | Modifiers::STATIC,
        TypeRef::string(),
        Some(Expr::string("hello")),
    );
    let options = VerifierOptions {
        inline_static_field_initializers_into_clinit: false,
        ..VerifierOptions::default()
    };

    verify_with(&mut arena, class, options).expect("class verifies");

    assert!(arena.field(name).initial_expression.is_some());
    assert!(arena.static_initializer(class).is_none());
}

#[test]
fn test_enum_statics_run_after_values_array() {
    let mut arena = AstArena::new();
    let module = arena.add_module("Color.groovy");
    let color = arena.new_class_in(
        module,
        "pkg.Color",
        Modifiers::PUBLIC | Modifiers::FINAL | Modifiers::ENUM,
    );
    let color_type = TypeRef::class("pkg.Color");
    arena.new_field(
        color,
        "RED",
        Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::FINAL | Modifiers::ENUM,
        color_type.clone(),
        Some(Expr::new_instance(color_type.clone(), vec![])),
    );
    let values = arena.add_field(FieldNode {
        name: "$VALUES".to_string(),
        modifiers: Modifiers::PRIVATE | Modifiers::STATIC | Modifiers::FINAL | Modifiers::SYNTHETIC,
        flags: MemberFlags::SYNTHETIC,
        ty: TypeRef::array_of(color_type),
        initial_expression: None,
        declaring_class: color,
        span: Span::NONE,
    });
    arena.new_field(
        color,
        "counter",
        Modifiers::PRIVATE | Modifiers::STATIC,
        TypeRef::int(),
        Some(Expr::int(5)),
    );
    let clinit = arena.get_or_add_static_initializer(color);
    let values_assignment = Expr::assign(arena.field_expr(values), Expr::null());
    arena.method_mut(clinit).code = Some(Stmt::block(vec![Stmt::expr(values_assignment)]));

    verify(&mut arena, color).expect("enum verifies");

    let statements = clinit_statements(&arena, color);
    let red = position(&statements, |s| assigned_field(s) == Some("RED"));
    let values = position(&statements, |s| assigned_field(s) == Some("$VALUES"));
    let counter = position(&statements, |s| assigned_field(s) == Some("counter"));
    assert!(red < values, "constants are created before $VALUES");
    assert_eq!(counter, values + 1, "user statics directly follow $VALUES");
}

#[test]
fn test_optimized_constants_move_to_swap_init() {
    let (mut arena, class) = arena_with_class();
    let constant = arena.add_field(FieldNode {
        name: "$const$0".to_string(),
        modifiers: Modifiers::PRIVATE | Modifiers::STATIC | Modifiers::SYNTHETIC,
        flags: MemberFlags::SYNTHETIC,
        ty: TypeRef::int(),
        initial_expression: Some(Expr::int(42)),
        declaring_class: class,
        span: Span::NONE,
    });

    verify(&mut arena, class).expect("class verifies");

    assert!(arena.field(constant).initial_expression.is_none());
    let swap_init = only_method(&arena, class, SWAP_INIT_METHOD);
    assert!(arena.method(swap_init).is_static());
    let statements = body_statements(&arena, swap_init);
    assert_eq!(statements[0], Stmt::Bytecode(BytecodeSequence::SwapInitCallSites));
    let Some(Expr::Binary { right, .. }) = statements[1].as_expression() else {
        panic!("expected the constant assignment: {statements:#?}");
    };
    assert!(
        matches!(right.as_ref(), Expr::Constant { ty, .. } if *ty == TypeRef::int()),
        "constant is stored unboxed"
    );

    let clinit = clinit_statements(&arena, class);
    assert_eq!(
        clinit[0],
        Stmt::Bytecode(BytecodeSequence::InvokeSwapInit {
            owner: "pkg/Foo".to_string()
        })
    );
}

#[test]
fn test_initialization_assembly_is_idempotent() {
    let (mut arena, class) = arena_with_class();
    arena.new_field(class, "a", Modifiers::PRIVATE, TypeRef::int(), Some(Expr::int(1)));
    arena.new_field(
        class,
        "shared",
        Modifiers::PRIVATE | Modifiers::STATIC,
        TypeRef::object(),
        Some(Expr::new_instance(TypeRef::object(), vec![])),
    );

    let mut verifier = Verifier::new(&mut arena, VerifierOptions::default());
    verifier.add_default_constructor(class);
    verifier.add_initialization(class).expect("first assembly");
    let methods = verifier.arena().methods.clone();
    let fields = verifier.arena().fields.clone();
    verifier.add_initialization(class).expect("second assembly");

    assert_eq!(verifier.arena().methods, methods, "second run must not change method bodies");
    assert_eq!(verifier.arena().fields, fields);
}

#[test]
fn test_return_in_object_initializer_is_rejected() {
    let (mut arena, class) = arena_with_class();
    arena
        .class_mut(class)
        .object_initializers
        .push(Stmt::block(vec![Stmt::ret(None).at(Span::new(4, 5))]));

    let err = verify(&mut arena, class).expect_err("return in initializer block");
    assert_eq!(err.code(), diagnostic_codes::RETURN_NOT_ALLOWED_IN_OBJECT_INITIALIZER);
    assert_eq!(err.span(), Span::new(4, 5));
}

#[test]
fn test_interface_keeps_static_initialization_only() {
    let mut arena = AstArena::new();
    let module = arena.add_module("Api.groovy");
    let api = arena.new_class_in(
        module,
        "pkg.Api",
        Modifiers::PUBLIC | Modifiers::INTERFACE | Modifiers::ABSTRACT,
    );
    arena.new_field(
        api,
        "DEFAULTS",
        Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::FINAL,
        TypeRef::object(),
        Some(Expr::new_instance(TypeRef::object(), vec![])),
    );

    verify(&mut arena, api).expect("interface verifies");

    assert!(arena.class(api).constructors.is_empty(), "interfaces get no constructor");
    assert!(clinit_statements(&arena, api).iter().any(|s| assigned_field(s) == Some("DEFAULTS")));
    assert!(arena.declared_field(api, "metaClass").is_none());
}

// =============================================================================
// Constant folding
// =============================================================================

#[test]
fn test_transform_inline_constants_folds_arithmetic_and_references() {
    let (mut arena, class) = arena_with_class();
    let base = arena.new_field(
        class,
        "BASE",
        Modifiers::STATIC | Modifiers::FINAL,
        TypeRef::int(),
        Some(Expr::int(40)),
    );
    let expr = Expr::binary(arena.field_ref(base), BinaryOp::Plus, Expr::int(2));

    let folded = transform_inline_constants(&arena, &expr);
    assert_eq!(folded.as_constant(), Some(&ConstantValue::Int(42)));

    let negated = Expr::Unary {
        op: UnaryOp::Negate,
        operand: Box::new(Expr::int(7)),
        span: Span::NONE,
    };
    assert_eq!(
        transform_inline_constants(&arena, &negated).as_constant(),
        Some(&ConstantValue::Int(-7))
    );

    let concat = Expr::binary(Expr::string("v"), BinaryOp::Plus, Expr::int(1));
    assert_eq!(
        transform_inline_constants(&arena, &concat).as_constant(),
        Some(&ConstantValue::String("v1".to_string()))
    );
}

#[test]
fn test_transform_inline_constants_leaves_non_constants() {
    let (mut arena, class) = arena_with_class();
    let mutable = arena.new_field(class, "count", Modifiers::STATIC, TypeRef::int(), Some(Expr::int(1)));
    let expr = Expr::binary(arena.field_ref(mutable), BinaryOp::Plus, Expr::int(2));

    assert_eq!(transform_inline_constants(&arena, &expr), expr, "non-final field is not folded");

    let mixed = Expr::binary(Expr::int(1), BinaryOp::Plus, Expr::constant(ConstantValue::Long(2)));
    assert_eq!(transform_inline_constants(&arena, &mixed), mixed, "no numeric widening");
}

#[test]
fn test_to_primitive_constant_unboxes_and_makes_single_chars() {
    let boxed = to_primitive_constant(Expr::int(3));
    assert!(matches!(boxed, Expr::Constant { ref ty, .. } if *ty == TypeRef::int()));

    let single = to_primitive_constant(Expr::string("x"));
    assert_eq!(single.as_constant(), Some(&ConstantValue::Char('x')));

    let longer = to_primitive_constant(Expr::string("xy"));
    assert!(matches!(longer, Expr::Constant { ref ty, .. } if *ty == TypeRef::string()));
}
