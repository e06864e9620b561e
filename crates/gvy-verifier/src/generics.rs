//! Placeholder substitution along a type hierarchy.
//!
//! A spec maps type variable names to the types bound at a use site:
//! walking from `Sub extends Base<String>` into `Base<T>` produces
//! `{T: String}`.

use gvy_ast::{AstArena, GenericsType, TypeRef};
use rustc_hash::FxHashMap;

pub(crate) type GenericsSpec = FxHashMap<String, TypeRef>;

/// Replace placeholders in `ty` with their binding in `spec`. Unbound
/// placeholders are kept as they are.
pub(crate) fn correct_to_generics_spec(spec: &GenericsSpec, ty: &TypeRef) -> TypeRef {
    match ty {
        TypeRef::Array { component } => TypeRef::array_of(correct_to_generics_spec(spec, component)),
        TypeRef::Placeholder { name, .. } => spec.get(name).cloned().unwrap_or_else(|| ty.clone()),
        TypeRef::Class {
            name,
            type_arguments,
        } if !type_arguments.is_empty() => TypeRef::generic(
            name.clone(),
            type_arguments
                .iter()
                .map(|arg| correct_to_generics_spec(spec, arg))
                .collect(),
        ),
        _ => ty.clone(),
    }
}

/// Spec seen inside the declaration of `current`, given the spec of the
/// code that references it.
pub(crate) fn create_generics_spec(arena: &AstArena, current: &TypeRef, old: &GenericsSpec) -> GenericsSpec {
    let arguments = current.type_arguments();
    if arguments.is_empty() {
        return old.clone();
    }
    let Some(declared) = arena
        .class_of_type(current)
        .map(|class| &arena.class(class).generics)
        .filter(|generics| !generics.is_empty())
    else {
        return old.clone();
    };
    declared
        .iter()
        .zip(arguments)
        .map(|(variable, argument)| (variable.name.clone(), correct_to_generics_spec(old, argument)))
        .collect()
}

/// `old` extended with a method's own type variables, which shadow class
/// level ones of the same name.
pub(crate) fn add_method_generics(method_generics: &[GenericsType], old: &GenericsSpec) -> GenericsSpec {
    let mut spec = old.clone();
    for variable in method_generics {
        spec.insert(variable.name.clone(), variable.as_placeholder());
    }
    spec
}

/// `Name<A, B>` with type arguments, for diagnostics.
pub(crate) fn generic_text(ty: &TypeRef) -> String {
    match ty {
        TypeRef::Class {
            name,
            type_arguments,
        } if !type_arguments.is_empty() => format!(
            "{name}<{}>",
            type_arguments
                .iter()
                .map(generic_text)
                .collect::<Vec<_>>()
                .join(", ")
        ),
        TypeRef::Placeholder { name, .. } => name.clone(),
        TypeRef::Array { component } => format!("{}[]", generic_text(component)),
        _ => ty.to_string(),
    }
}
