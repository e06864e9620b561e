//! Method signatures rendered as text.
//!
//! Two families live here: the human readable descriptors used as map keys
//! and in diagnostics (`java.lang.Object get(int, java.lang.String)`), and
//! JVM descriptors (`(ILjava/lang/String;)Ljava/lang/Object;`) for bridge
//! bodies.

use crate::arena::AstArena;
use crate::ids::MethodId;
use crate::modifiers::Modifiers;
use crate::types::TypeRef;

impl TypeRef {
    /// JVM field descriptor of the erased type.
    #[must_use]
    pub fn jvm_descriptor(&self) -> String {
        match self.erasure() {
            TypeRef::Primitive { primitive } => primitive.descriptor().to_string(),
            TypeRef::Array { component } => format!("[{}", component.jvm_descriptor()),
            TypeRef::Class { name, .. } => format!("L{};", name.replace('.', "/")),
            TypeRef::Placeholder { .. } => "Ljava/lang/Object;".to_string(),
        }
    }
}

fn join_types<'a>(types: impl Iterator<Item = &'a TypeRef>) -> String {
    types
        .map(|ty| ty.erasure().display_name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// `name(T1, T2)` with erased parameter types.
pub fn signature_text(name: &str, parameter_types: &[TypeRef]) -> String {
    format!("{name}({})", join_types(parameter_types.iter()))
}

/// JVM method descriptor, e.g. `(IJ)Ljava/lang/String;`.
pub fn jvm_method_descriptor(parameter_types: &[TypeRef], return_type: &TypeRef) -> String {
    let mut out = String::from("(");
    for ty in parameter_types {
        out.push_str(&ty.jvm_descriptor());
    }
    out.push(')');
    out.push_str(&return_type.jvm_descriptor());
    out
}

/// Source order of modifier keywords.
const MODIFIER_KEYWORDS: &[(Modifiers, &str)] = &[
    (Modifiers::PUBLIC, "public"),
    (Modifiers::PROTECTED, "protected"),
    (Modifiers::PRIVATE, "private"),
    (Modifiers::ABSTRACT, "abstract"),
    (Modifiers::STATIC, "static"),
    (Modifiers::FINAL, "final"),
    (Modifiers::SYNCHRONIZED, "synchronized"),
    (Modifiers::NATIVE, "native"),
    (Modifiers::STRICT, "strictfp"),
];

#[must_use]
pub fn modifiers_text(modifiers: Modifiers) -> String {
    MODIFIER_KEYWORDS
        .iter()
        .filter(|(flag, _)| modifiers.contains(*flag))
        .map(|(_, keyword)| *keyword)
        .collect::<Vec<_>>()
        .join(" ")
}

impl AstArena {
    /// `ret name(T1, T2)`: the key under which overrides are matched.
    #[must_use]
    pub fn type_descriptor(&self, method: MethodId) -> String {
        let node = self.method(method);
        format!(
            "{} {}",
            node.return_type.erasure().display_name(),
            self.descriptor_without_return_type(method)
        )
    }

    /// `name(T1, T2)`: the key under which duplicate declarations collide.
    #[must_use]
    pub fn descriptor_without_return_type(&self, method: MethodId) -> String {
        let node = self.method(method);
        signature_text(&node.name, &self.parameter_types(method))
    }

    #[must_use]
    pub fn jvm_descriptor(&self, method: MethodId) -> String {
        jvm_method_descriptor(&self.parameter_types(method), &self.method(method).return_type)
    }

    /// Source-like header used in diagnostics:
    /// `public java.lang.Object foo(int a, int b = 2) { ... }`.
    #[must_use]
    pub fn method_text(&self, method: MethodId) -> String {
        let node = self.method(method);
        let params = node
            .parameters
            .iter()
            .map(|&p| {
                let param = self.param(p);
                match &param.initial_expression {
                    Some(init) => format!("{} {} = {}", param.ty, param.name, init.text()),
                    None => format!("{} {}", param.ty, param.name),
                }
            })
            .collect::<Vec<_>>()
            .join(", ");

        let mut text = modifiers_text(node.modifiers);
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(&format!("{} {}({params})", node.return_type, node.name));
        if !node.exceptions.is_empty() {
            text.push_str(" throws ");
            text.push_str(&join_types(node.exceptions.iter()));
        }
        text.push_str(" { ... }");
        text
    }
}
