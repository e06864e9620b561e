//! Tests for superclass, interface and accessor lookups.

use crate::{AstArena, Modifiers, Stmt, TypeRef, names};

#[test]
fn test_library_wrappers_derive_from_number() {
    let arena = AstArena::new();
    let number = TypeRef::class("java.lang.Number");
    assert!(arena.is_derived_from(&TypeRef::class(names::INTEGER), &number));
    assert!(arena.is_derived_from(&TypeRef::class(names::DOUBLE), &number));
    assert!(!arena.is_derived_from(&TypeRef::string(), &number));
}

#[test]
fn test_void_only_derives_from_void() {
    let arena = AstArena::new();
    assert!(arena.is_derived_from(&TypeRef::void(), &TypeRef::void()));
    assert!(!arena.is_derived_from(&TypeRef::void(), &TypeRef::object()));
    assert!(arena.is_derived_from(&TypeRef::string(), &TypeRef::object()));
}

#[test]
fn test_arena_superclass_chain() {
    let mut arena = AstArena::new();
    arena.new_class("A", Modifiers::PUBLIC, Some(TypeRef::object()));
    arena.new_class("B", Modifiers::PUBLIC, Some(TypeRef::class("A")));
    arena.new_class("C", Modifiers::PUBLIC, Some(TypeRef::class("B")));

    let chain: Vec<_> = arena
        .superclass_chain("C")
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(chain, vec!["B", "A", names::OBJECT]);
    assert!(arena.is_derived_from(&TypeRef::class("C"), &TypeRef::class("A")));
    assert!(!arena.is_derived_from(&TypeRef::class("A"), &TypeRef::class("C")));
}

#[test]
fn test_cyclic_hierarchy_terminates() {
    let mut arena = AstArena::new();
    arena.new_class("X", Modifiers::PUBLIC, Some(TypeRef::class("Y")));
    arena.new_class("Y", Modifiers::PUBLIC, Some(TypeRef::class("X")));
    assert!(!arena.is_derived_from(&TypeRef::class("X"), &TypeRef::class("Z")));
}

#[test]
fn test_implements_interface_through_super_interfaces() {
    let mut arena = AstArena::new();
    arena.new_class("I", Modifiers::PUBLIC | Modifiers::INTERFACE | Modifiers::ABSTRACT, None);
    let j = arena.new_class("J", Modifiers::PUBLIC | Modifiers::INTERFACE | Modifiers::ABSTRACT, None);
    arena.class_mut(j).interfaces.push(TypeRef::class("I"));
    let base = arena.new_class("Base", Modifiers::PUBLIC, Some(TypeRef::object()));
    arena.class_mut(base).interfaces.push(TypeRef::class("J"));
    let derived = arena.new_class("Derived", Modifiers::PUBLIC, Some(TypeRef::class("Base")));

    let derived_ty = arena.class(derived).as_type();
    assert!(arena.implements_interface(&derived_ty, &TypeRef::class("I")));
    assert!(arena.is_interface_type(&TypeRef::class("J")));
    assert!(!arena.implements_interface(&TypeRef::class("Base"), &TypeRef::class("K")));
}

#[test]
fn test_groovy_object_support_counts_as_groovy_object() {
    let mut arena = AstArena::new();
    let class = arena.new_class(
        "Bean",
        Modifiers::PUBLIC,
        Some(TypeRef::class(names::GROOVY_OBJECT_SUPPORT)),
    );
    assert!(arena.is_derived_from_groovy_object(class));
}

#[test]
fn test_getter_lookup_prefers_non_synthetic_and_searches_super() {
    let mut arena = AstArena::new();
    let base = arena.new_class("Base", Modifiers::PUBLIC, Some(TypeRef::object()));
    let sub = arena.new_class("Sub", Modifiers::PUBLIC, Some(TypeRef::class("Base")));
    let bridge = arena.new_method(
        base,
        "getName",
        Modifiers::PUBLIC | Modifiers::SYNTHETIC | Modifiers::BRIDGE,
        TypeRef::object(),
        vec![],
        Some(Stmt::block(vec![])),
    );
    let real = arena.new_method(
        base,
        "getName",
        Modifiers::PUBLIC,
        TypeRef::string(),
        vec![],
        Some(Stmt::block(vec![])),
    );
    assert_ne!(bridge, real);

    assert_eq!(arena.getter_method(sub, "getName", true), Some(real));
    assert_eq!(arena.getter_method(sub, "getName", false), None);
}

#[test]
fn test_is_getter_requires_boolean() {
    let mut arena = AstArena::new();
    let class = arena.new_class("C", Modifiers::PUBLIC, Some(TypeRef::object()));
    arena.new_method(class, "isOpen", Modifiers::PUBLIC, TypeRef::int(), vec![], None);
    assert_eq!(arena.getter_method(class, "isOpen", false), None);

    let ok = arena.new_method(
        class,
        "isOpen",
        Modifiers::PUBLIC,
        TypeRef::class(names::BOOLEAN),
        vec![],
        None,
    );
    assert_eq!(arena.getter_method(class, "isOpen", false), Some(ok));
}

#[test]
fn test_outer_classes_innermost_first() {
    let mut arena = AstArena::new();
    let outer = arena.new_class("O", Modifiers::PUBLIC, Some(TypeRef::object()));
    let mid = arena.new_class("O$M", Modifiers::PUBLIC, Some(TypeRef::object()));
    let inner = arena.new_class("O$M$I", Modifiers::PUBLIC, Some(TypeRef::object()));
    arena.class_mut(mid).outer_class = Some(outer);
    arena.class_mut(inner).outer_class = Some(mid);
    assert_eq!(arena.outer_classes(inner), vec![mid, outer]);
}
