//! Type hierarchy queries.
//!
//! Classes declared in this compilation are looked up in the arena. Library
//! types outside it fall back to a small table of well-known JDK and Groovy
//! runtime types; anything else is treated as a leaf class extending
//! `java.lang.Object` with no interfaces.
//!
//! Every walk is bounded by the limits in `gvy_common::limits`, so a cyclic
//! hierarchy from a broken front end degrades into a truncated answer instead
//! of a hang.

use gvy_common::limits::{MAX_HIERARCHY_DEPTH, MAX_INTERFACE_DEPTH};
use rustc_hash::FxHashSet;

use crate::arena::AstArena;
use crate::ids::{ClassId, MethodId};
use crate::modifiers::MemberFlags;
use crate::types::{PrimitiveType, TypeRef, names};

/// Superclass of a library type not declared in the arena.
fn library_superclass(name: &str) -> Option<&'static str> {
    match name {
        names::OBJECT => None,
        names::INTEGER | names::LONG | names::SHORT | names::BYTE | names::FLOAT | names::DOUBLE => {
            Some("java.lang.Number")
        }
        "java.math.BigInteger" | "java.math.BigDecimal" => Some("java.lang.Number"),
        "java.util.ArrayList" => Some("java.util.AbstractList"),
        "java.util.AbstractList" => Some("java.util.AbstractCollection"),
        "java.lang.RuntimeException" => Some("java.lang.Exception"),
        names::ILLEGAL_ARGUMENT_EXCEPTION => Some("java.lang.RuntimeException"),
        "java.lang.Exception" | "java.lang.Error" => Some("java.lang.Throwable"),
        _ => Some(names::OBJECT),
    }
}

/// Interfaces declared directly by a library type not in the arena.
fn library_interfaces(name: &str) -> &'static [&'static str] {
    match name {
        names::STRING => &[
            "java.io.Serializable",
            "java.lang.Comparable",
            "java.lang.CharSequence",
        ],
        "java.lang.Number" => &["java.io.Serializable"],
        names::INTEGER | names::LONG | names::SHORT | names::BYTE | names::FLOAT | names::DOUBLE
        | names::CHARACTER | names::BOOLEAN => &["java.lang.Comparable"],
        names::GROOVY_OBJECT_SUPPORT => &[names::GROOVY_OBJECT],
        names::GSTRING => &["java.lang.Comparable", "java.lang.CharSequence"],
        "java.util.ArrayList" => &["java.util.List", "java.util.RandomAccess"],
        "java.util.List" | "java.util.Set" => &["java.util.Collection"],
        "java.util.Collection" => &["java.lang.Iterable"],
        _ => &[],
    }
}

fn is_library_interface(name: &str) -> bool {
    matches!(
        name,
        "java.io.Serializable"
            | "java.lang.Comparable"
            | "java.lang.CharSequence"
            | "java.lang.Cloneable"
            | "java.lang.Runnable"
            | "java.lang.Iterable"
            | "java.util.Collection"
            | "java.util.List"
            | "java.util.Set"
            | "java.util.Map"
            | "java.util.RandomAccess"
            | "java.util.concurrent.Callable"
            | "java.util.function.Supplier"
            | names::GROOVY_OBJECT
    )
}

impl AstArena {
    /// Direct superclass of the named type.
    #[must_use]
    pub fn superclass_of(&self, name: &str) -> Option<TypeRef> {
        match self.class_by_name(name) {
            Some(id) => self.class(id).super_class.clone(),
            None if name == names::OBJECT => None,
            None => library_superclass(name).map(TypeRef::class),
        }
    }

    /// Interfaces declared directly on the named type (for an interface,
    /// the interfaces it extends).
    #[must_use]
    pub fn interfaces_of(&self, name: &str) -> Vec<TypeRef> {
        match self.class_by_name(name) {
            Some(id) => self.class(id).interfaces.clone(),
            None => library_interfaces(name)
                .iter()
                .map(|&n| TypeRef::class(n))
                .collect(),
        }
    }

    /// Superclasses of `name`, nearest first, excluding `name` itself.
    #[must_use]
    pub fn superclass_chain(&self, name: &str) -> Vec<TypeRef> {
        let mut chain = Vec::new();
        let mut current = self.superclass_of(name);
        while let Some(ty) = current {
            if chain.len() >= MAX_HIERARCHY_DEPTH {
                break;
            }
            current = ty.class_name().and_then(|n| self.superclass_of(n));
            chain.push(ty);
        }
        chain
    }

    #[must_use]
    pub fn is_interface_type(&self, ty: &TypeRef) -> bool {
        if ty.is_array() {
            return false;
        }
        let Some(name) = ty.class_name() else {
            return false;
        };
        match self.class_by_name(name) {
            Some(id) => self.class(id).is_interface(),
            None => is_library_interface(name),
        }
    }

    /// `ty` is `target` or a subclass of it.
    ///
    /// `void` is derived only from `void`; everything else is derived from
    /// `java.lang.Object`.
    #[must_use]
    pub fn is_derived_from(&self, ty: &TypeRef, target: &TypeRef) -> bool {
        if ty.is_void() || target.is_void() {
            return ty.is_void() && target.is_void();
        }
        if target.is_object() {
            return true;
        }
        if let (Some(a), Some(b)) = (ty.component(), target.component()) {
            return self.is_derived_from(a, b);
        }
        if ty.same_erasure(target) {
            return true;
        }
        if ty.is_primitive() || ty.is_array() {
            return false;
        }
        let Some(name) = ty.class_name() else {
            return false;
        };
        self.superclass_chain(name)
            .iter()
            .any(|sup| sup.same_erasure(target))
    }

    /// `ty`, one of its superclasses, or one of their super-interfaces
    /// declares `iface`.
    #[must_use]
    pub fn implements_interface(&self, ty: &TypeRef, iface: &TypeRef) -> bool {
        let Some(target) = iface.class_name() else {
            return false;
        };
        let Some(name) = ty.class_name() else {
            return false;
        };
        if ty.is_array() {
            return false;
        }
        let mut visited = FxHashSet::default();
        let mut classes = vec![TypeRef::class(name)];
        classes.extend(self.superclass_chain(name));
        classes.iter().any(|class| {
            class
                .class_name()
                .is_some_and(|n| self.declares_interface(n, target, &mut visited, 0))
        })
    }

    fn declares_interface(
        &self,
        name: &str,
        target: &str,
        visited: &mut FxHashSet<String>,
        depth: usize,
    ) -> bool {
        if depth > MAX_INTERFACE_DEPTH || !visited.insert(name.to_string()) {
            return false;
        }
        self.interfaces_of(name).iter().any(|iface| {
            iface.class_name().is_some_and(|n| {
                n == target || self.declares_interface(n, target, visited, depth + 1)
            })
        })
    }

    #[must_use]
    pub fn is_derived_from_groovy_object(&self, class: ClassId) -> bool {
        self.implements_interface(&self.class(class).as_type(), &TypeRef::class(names::GROOVY_OBJECT))
    }

    /// Enclosing classes of `class`, innermost first.
    #[must_use]
    pub fn outer_classes(&self, class: ClassId) -> Vec<ClassId> {
        let mut out = Vec::new();
        let mut current = self.class(class).outer_class;
        while let Some(outer) = current {
            if out.len() >= MAX_HIERARCHY_DEPTH || out.contains(&outer) {
                break;
            }
            out.push(outer);
            current = self.class(outer).outer_class;
        }
        out
    }

    /// Arena classes of `class` and its superclasses, nearest first.
    fn self_and_super_declarations(&self, class: ClassId) -> Vec<ClassId> {
        let name = self.class(class).name.clone();
        let mut out = vec![class];
        out.extend(
            self.superclass_chain(&name)
                .iter()
                .filter_map(|ty| self.class_of_type(ty)),
        );
        out
    }

    /// Method with this signature declared by `class` or inherited from a
    /// superclass in the arena.
    #[must_use]
    pub fn find_method(&self, class: ClassId, name: &str, types: &[TypeRef]) -> Option<MethodId> {
        self.self_and_super_declarations(class)
            .into_iter()
            .find_map(|c| self.declared_method(c, name, types))
    }

    #[must_use]
    pub fn has_method(&self, class: ClassId, name: &str, types: &[TypeRef]) -> bool {
        self.find_method(class, name, types).is_some()
    }

    /// Getter named `getter_name`: no parameters and a non-void return type;
    /// an `is` getter must return `boolean`/`Boolean`. A non-synthetic match
    /// wins over a synthetic (bridge) one.
    #[must_use]
    pub fn getter_method(&self, class: ClassId, getter_name: &str, search_super: bool) -> Option<MethodId> {
        let boolean_only = getter_name.starts_with("is");
        let candidates = if search_super {
            self.self_and_super_declarations(class)
        } else {
            vec![class]
        };
        for c in candidates {
            let mut found: Option<MethodId> = None;
            for &m in &self.class(c).methods {
                let method = self.method(m);
                let returns_boolean = method.return_type.unwrapped().as_primitive()
                    == Some(PrimitiveType::Boolean);
                if method.name == getter_name
                    && !method.is_void()
                    && method.parameters.is_empty()
                    && (!boolean_only || returns_boolean)
                    && found.is_none_or(|f| self.is_synthetic_method(f))
                {
                    found = Some(m);
                }
            }
            if found.is_some() {
                return found;
            }
        }
        None
    }

    /// Single-parameter setter named `setter_name`, searching superclasses.
    #[must_use]
    pub fn setter_method(&self, class: ClassId, setter_name: &str, void_only: bool) -> Option<MethodId> {
        self.self_and_super_declarations(class)
            .into_iter()
            .find_map(|c| {
                self.class(c).methods.iter().copied().find(|&m| {
                    let method = self.method(m);
                    method.name == setter_name
                        && (!void_only || method.is_void())
                        && method.parameters.len() == 1
                })
            })
    }

    /// Synthetic either as a class-file flag or as a compiler-generated marker.
    #[must_use]
    pub fn is_synthetic_method(&self, method: MethodId) -> bool {
        let node = self.method(method);
        node.modifiers.is_synthetic() || node.flags.contains(MemberFlags::SYNTHETIC)
    }
}
