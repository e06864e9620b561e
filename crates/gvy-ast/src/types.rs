//! Type references.
//!
//! A [`TypeRef`] is a use-site reference to a type. Class references are by
//! qualified name; the declaration (when it is part of this compilation) is
//! found through [`AstArena::class_by_name`](crate::AstArena::class_by_name).
//!
//! Equality in the verifier's override checks is *erasure* equality: a
//! placeholder `T extends Number` compares equal to `java.lang.Number`. Use
//! [`TypeRef::same_erasure`] for that; the derived `PartialEq` is structural.

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod names {
    pub const OBJECT: &str = "java.lang.Object";
    pub const STRING: &str = "java.lang.String";
    pub const CLASS: &str = "java.lang.Class";
    pub const ILLEGAL_ARGUMENT_EXCEPTION: &str = "java.lang.IllegalArgumentException";
    pub const META_CLASS: &str = "groovy.lang.MetaClass";
    pub const GROOVY_OBJECT: &str = "groovy.lang.GroovyObject";
    pub const GROOVY_OBJECT_SUPPORT: &str = "groovy.lang.GroovyObjectSupport";
    pub const GSTRING: &str = "groovy.lang.GString";
    pub const REFERENCE: &str = "groovy.lang.Reference";
    pub const CLASS_INFO: &str = "org.codehaus.groovy.reflection.ClassInfo";

    pub const BOOLEAN: &str = "java.lang.Boolean";
    pub const BYTE: &str = "java.lang.Byte";
    pub const CHARACTER: &str = "java.lang.Character";
    pub const SHORT: &str = "java.lang.Short";
    pub const INTEGER: &str = "java.lang.Integer";
    pub const LONG: &str = "java.lang.Long";
    pub const FLOAT: &str = "java.lang.Float";
    pub const DOUBLE: &str = "java.lang.Double";
    pub const VOID: &str = "java.lang.Void";
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Void,
}

impl PrimitiveType {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Char => "char",
            PrimitiveType::Short => "short",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
            PrimitiveType::Void => "void",
        }
    }

    /// JVM descriptor character.
    #[must_use]
    pub const fn descriptor(self) -> char {
        match self {
            PrimitiveType::Boolean => 'Z',
            PrimitiveType::Byte => 'B',
            PrimitiveType::Char => 'C',
            PrimitiveType::Short => 'S',
            PrimitiveType::Int => 'I',
            PrimitiveType::Long => 'J',
            PrimitiveType::Float => 'F',
            PrimitiveType::Double => 'D',
            PrimitiveType::Void => 'V',
        }
    }

    #[must_use]
    pub const fn wrapper(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => names::BOOLEAN,
            PrimitiveType::Byte => names::BYTE,
            PrimitiveType::Char => names::CHARACTER,
            PrimitiveType::Short => names::SHORT,
            PrimitiveType::Int => names::INTEGER,
            PrimitiveType::Long => names::LONG,
            PrimitiveType::Float => names::FLOAT,
            PrimitiveType::Double => names::DOUBLE,
            PrimitiveType::Void => names::VOID,
        }
    }

    #[must_use]
    pub fn from_wrapper(name: &str) -> Option<PrimitiveType> {
        Some(match name {
            names::BOOLEAN => PrimitiveType::Boolean,
            names::BYTE => PrimitiveType::Byte,
            names::CHARACTER => PrimitiveType::Char,
            names::SHORT => PrimitiveType::Short,
            names::INTEGER => PrimitiveType::Int,
            names::LONG => PrimitiveType::Long,
            names::FLOAT => PrimitiveType::Float,
            names::DOUBLE => PrimitiveType::Double,
            names::VOID => PrimitiveType::Void,
            _ => return None,
        })
    }

    /// `long` and `double` occupy two local variable slots.
    #[must_use]
    pub const fn is_wide(self) -> bool {
        matches!(self, PrimitiveType::Long | PrimitiveType::Double)
    }
}

/// A type reference at a use site.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeRef {
    Primitive { primitive: PrimitiveType },
    Class {
        name: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        type_arguments: Vec<TypeRef>,
    },
    Array { component: Box<TypeRef> },
    /// A generics placeholder such as `T`; erases to its bound or `Object`.
    Placeholder {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bound: Option<Box<TypeRef>>,
    },
}

impl TypeRef {
    #[must_use]
    pub const fn primitive(primitive: PrimitiveType) -> TypeRef {
        TypeRef::Primitive { primitive }
    }

    #[must_use]
    pub const fn void() -> TypeRef {
        TypeRef::primitive(PrimitiveType::Void)
    }

    #[must_use]
    pub const fn int() -> TypeRef {
        TypeRef::primitive(PrimitiveType::Int)
    }

    #[must_use]
    pub const fn long() -> TypeRef {
        TypeRef::primitive(PrimitiveType::Long)
    }

    #[must_use]
    pub const fn double() -> TypeRef {
        TypeRef::primitive(PrimitiveType::Double)
    }

    #[must_use]
    pub const fn boolean() -> TypeRef {
        TypeRef::primitive(PrimitiveType::Boolean)
    }

    #[must_use]
    pub fn class(name: impl Into<String>) -> TypeRef {
        TypeRef::Class {
            name: name.into(),
            type_arguments: Vec::new(),
        }
    }

    #[must_use]
    pub fn generic(name: impl Into<String>, type_arguments: Vec<TypeRef>) -> TypeRef {
        TypeRef::Class {
            name: name.into(),
            type_arguments,
        }
    }

    #[must_use]
    pub fn array_of(component: TypeRef) -> TypeRef {
        TypeRef::Array {
            component: Box::new(component),
        }
    }

    #[must_use]
    pub fn placeholder(name: impl Into<String>, bound: Option<TypeRef>) -> TypeRef {
        TypeRef::Placeholder {
            name: name.into(),
            bound: bound.map(Box::new),
        }
    }

    #[must_use]
    pub fn object() -> TypeRef {
        TypeRef::class(names::OBJECT)
    }

    #[must_use]
    pub fn string() -> TypeRef {
        TypeRef::class(names::STRING)
    }

    #[must_use]
    pub fn meta_class() -> TypeRef {
        TypeRef::class(names::META_CLASS)
    }

    #[must_use]
    pub fn as_primitive(&self) -> Option<PrimitiveType> {
        match self {
            TypeRef::Primitive { primitive } => Some(*primitive),
            _ => None,
        }
    }

    /// Primitive in the JVM sense; `void` is not a value type.
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        matches!(self.as_primitive(), Some(p) if p != PrimitiveType::Void)
    }

    #[must_use]
    pub fn is_void(&self) -> bool {
        self.as_primitive() == Some(PrimitiveType::Void)
    }

    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, TypeRef::Array { .. })
    }

    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        matches!(self, TypeRef::Placeholder { .. })
    }

    #[must_use]
    pub fn component(&self) -> Option<&TypeRef> {
        match self {
            TypeRef::Array { component } => Some(component),
            _ => None,
        }
    }

    #[must_use]
    pub fn type_arguments(&self) -> &[TypeRef] {
        match self {
            TypeRef::Class { type_arguments, .. } => type_arguments,
            _ => &[],
        }
    }

    /// Qualified name of the class this reference erases to, if it is a class.
    #[must_use]
    pub fn class_name(&self) -> Option<&str> {
        match self {
            TypeRef::Class { name, .. } => Some(name),
            TypeRef::Placeholder { bound: Some(bound), .. } => bound.class_name(),
            TypeRef::Placeholder { bound: None, .. } => Some(names::OBJECT),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_class(&self, qualified_name: &str) -> bool {
        self.class_name() == Some(qualified_name) && !self.is_array()
    }

    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, TypeRef::Class { name, .. } if name == names::OBJECT)
    }

    /// Raw, placeholder-free form of the type.
    #[must_use]
    pub fn erasure(&self) -> TypeRef {
        match self {
            TypeRef::Primitive { .. } => self.clone(),
            TypeRef::Class { name, .. } => TypeRef::class(name.clone()),
            TypeRef::Array { component } => TypeRef::array_of(component.erasure()),
            TypeRef::Placeholder { bound: Some(bound), .. } => bound.erasure(),
            TypeRef::Placeholder { bound: None, .. } => TypeRef::object(),
        }
    }

    #[must_use]
    pub fn same_erasure(&self, other: &TypeRef) -> bool {
        self.erasure() == other.erasure()
    }

    /// Primitive counterpart of a wrapper class (`java.lang.Integer` -> `int`).
    #[must_use]
    pub fn unwrapped(&self) -> TypeRef {
        match self {
            TypeRef::Class { name, .. } => match PrimitiveType::from_wrapper(name) {
                Some(p) => TypeRef::primitive(p),
                None => self.clone(),
            },
            _ => self.clone(),
        }
    }

    /// Boxed counterpart of a primitive (`int` -> `java.lang.Integer`).
    #[must_use]
    pub fn wrapped(&self) -> TypeRef {
        match self {
            TypeRef::Primitive { primitive } => TypeRef::class(primitive.wrapper()),
            _ => self.clone(),
        }
    }

    /// Types whose constant values may initialize a `static final` field
    /// directly through the class file's `ConstantValue` attribute.
    #[must_use]
    pub fn is_static_constant_initializer_type(&self) -> bool {
        match self {
            TypeRef::Primitive { primitive } => matches!(
                primitive,
                PrimitiveType::Int
                    | PrimitiveType::Float
                    | PrimitiveType::Long
                    | PrimitiveType::Double
                    | PrimitiveType::Byte
                    | PrimitiveType::Char
                    | PrimitiveType::Short
            ),
            TypeRef::Class { name, .. } => name == names::STRING,
            _ => false,
        }
    }

    /// Number of local variable slots a value of this type occupies.
    #[must_use]
    pub fn slot_size(&self) -> u16 {
        match self.as_primitive() {
            Some(p) if p.is_wide() => 2,
            Some(PrimitiveType::Void) => 0,
            _ => 1,
        }
    }

    /// Human readable name, e.g. `java.lang.String[]`.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Primitive { primitive } => f.write_str(primitive.name()),
            TypeRef::Class { name, .. } => f.write_str(name),
            TypeRef::Array { component } => write!(f, "{component}[]"),
            TypeRef::Placeholder { bound: Some(bound), .. } => write!(f, "{bound}"),
            TypeRef::Placeholder { bound: None, .. } => f.write_str(names::OBJECT),
        }
    }
}

/// A generics type variable declared on a class or method, e.g. `T extends Number`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenericsType {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub upper_bounds: Vec<TypeRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower_bound: Option<TypeRef>,
}

impl GenericsType {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        GenericsType {
            name: name.into(),
            upper_bounds: Vec::new(),
            lower_bound: None,
        }
    }

    #[must_use]
    pub fn bounded(name: impl Into<String>, bound: TypeRef) -> Self {
        GenericsType {
            name: name.into(),
            upper_bounds: vec![bound],
            lower_bound: None,
        }
    }

    /// The placeholder type this variable stands for at use sites.
    #[must_use]
    pub fn as_placeholder(&self) -> TypeRef {
        let bound = self
            .upper_bounds
            .first()
            .or(self.lower_bound.as_ref())
            .cloned();
        TypeRef::placeholder(self.name.clone(), bound)
    }
}
