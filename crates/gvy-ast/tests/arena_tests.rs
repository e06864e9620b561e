//! Tests for arena storage, lookup and descriptors.

use crate::{AstArena, Expr, MethodKind, Modifiers, Stmt, TypeRef, VarTarget};

fn arena_with_class() -> (AstArena, crate::ClassId) {
    let mut arena = AstArena::new();
    let module = arena.add_module("Foo.groovy");
    let class = arena.new_class_in(module, "pkg.Foo", Modifiers::PUBLIC);
    (arena, class)
}

#[test]
fn test_add_method_attaches_by_kind() {
    let (mut arena, class) = arena_with_class();
    let m = arena.new_method(class, "run", Modifiers::PUBLIC, TypeRef::void(), vec![], None);
    let c = arena.new_constructor(class, Modifiers::PUBLIC, vec![], Some(Stmt::block(vec![])));

    assert_eq!(arena.class(class).methods, vec![m]);
    assert_eq!(arena.class(class).constructors, vec![c]);
    assert_eq!(arena.method(c).kind, MethodKind::Constructor);
    assert_eq!(arena.method(c).name, "<init>");
    assert_eq!(arena.module(crate::ModuleId(0)).classes, vec![class]);
}

#[test]
fn test_static_initializer_is_created_once() {
    let (mut arena, class) = arena_with_class();
    assert!(arena.static_initializer(class).is_none());

    let first = arena.get_or_add_static_initializer(class);
    let second = arena.get_or_add_static_initializer(class);
    assert_eq!(first, second);
    assert!(arena.method(first).is_static_initializer());
    assert!(arena.method(first).is_static());
    assert_eq!(arena.method(first).code, Some(Stmt::block(vec![])));
}

#[test]
fn test_declared_method_matches_erased_parameter_types() {
    let (mut arena, class) = arena_with_class();
    let p = arena.new_param("x", TypeRef::placeholder("T", Some(TypeRef::class("java.lang.Number"))));
    let m = arena.new_method(class, "take", Modifiers::PUBLIC, TypeRef::void(), vec![p], None);

    assert_eq!(
        arena.declared_method(class, "take", &[TypeRef::class("java.lang.Number")]),
        Some(m)
    );
    assert_eq!(arena.declared_method(class, "take", &[TypeRef::object()]), None);
    assert_eq!(arena.declared_method(class, "take", &[]), None);
}

#[test]
fn test_new_property_creates_private_backing_field() {
    let (mut arena, class) = arena_with_class();
    let prop = arena.new_property(
        class,
        "name",
        Modifiers::PUBLIC | Modifiers::STATIC,
        TypeRef::string(),
        Some(Expr::string("x")),
    );
    let field = arena.property(prop).field;

    assert_eq!(arena.field(field).name, "name");
    assert!(arena.field(field).modifiers.is_private());
    assert!(arena.field(field).is_static());
    assert_eq!(arena.field(field).initial_expression, Some(Expr::string("x")));
    assert_eq!(arena.declared_property(class, "name"), Some(prop));
    assert_eq!(arena.declared_field(class, "name"), Some(field));
}

#[test]
fn test_param_ref_resolves_to_parameter() {
    let mut arena = AstArena::new();
    let p = arena.new_param("a", TypeRef::int());
    match arena.param_ref(p) {
        Expr::Variable { name, target, .. } => {
            assert_eq!(name, "a");
            assert_eq!(target, VarTarget::Parameter(p));
        }
        other => panic!("expected variable, got {other:?}"),
    }
}

#[test]
fn test_generated_from_side_table() {
    let (mut arena, class) = arena_with_class();
    let original = arena.new_method(class, "f", Modifiers::PUBLIC, TypeRef::int(), vec![], None);
    let generated = arena.new_method(class, "f", Modifiers::PUBLIC, TypeRef::int(), vec![], None);
    arena.set_generated_from(generated, original);
    assert_eq!(arena.generated_from(generated), Some(original));
    assert_eq!(arena.generated_from(original), None);
}

#[test]
fn test_descriptors() {
    let (mut arena, class) = arena_with_class();
    let a = arena.new_param("a", TypeRef::int());
    let b = arena.new_param("b", TypeRef::array_of(TypeRef::string()));
    let m = arena.new_method(class, "foo", Modifiers::PUBLIC, TypeRef::object(), vec![a, b], None);

    assert_eq!(arena.type_descriptor(m), "java.lang.Object foo(int, java.lang.String[])");
    assert_eq!(arena.descriptor_without_return_type(m), "foo(int, java.lang.String[])");
    assert_eq!(arena.jvm_descriptor(m), "(I[Ljava/lang/String;)Ljava/lang/Object;");
}

#[test]
fn test_method_text_shows_defaults() {
    let (mut arena, class) = arena_with_class();
    let a = arena.new_param("a", TypeRef::int());
    let b = arena.new_param_with_default("b", TypeRef::int(), Expr::int(2));
    let m = arena.new_method(
        class,
        "foo",
        Modifiers::PUBLIC | Modifiers::STATIC,
        TypeRef::void(),
        vec![a, b],
        None,
    );
    assert_eq!(
        arena.method_text(m),
        "public static void foo(int a, int b = 2) { ... }"
    );
}

#[test]
fn test_arena_serde_round_trip_keeps_links() {
    let (mut arena, class) = arena_with_class();
    let p = arena.new_param("a", TypeRef::long());
    let m = arena.new_method(
        class,
        "f",
        Modifiers::PUBLIC,
        TypeRef::long(),
        vec![p],
        Some(Stmt::ret(Some(arena.param_ref(p)))),
    );
    arena.set_generated_from(m, m);

    let json = serde_json::to_string(&arena).expect("serialize");
    let back: AstArena = serde_json::from_str(&json).expect("deserialize");

    assert_eq!(back.class(class).methods, vec![m]);
    assert_eq!(back.method(m).code, arena.method(m).code);
    assert_eq!(back.generated_from(m), Some(m));
}
