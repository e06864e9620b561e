//! Class and code trees for the gvy verifier.
//!
//! Declarations (classes, methods, fields, properties, parameters, locals)
//! live in an [`AstArena`] and refer to each other through typed ids.
//! Method bodies are owned [`Stmt`]/[`Expr`] trees that the verifier
//! rewrites in place.

pub mod arena;
pub mod descriptor;
pub mod expr;
pub mod hierarchy;
pub mod ids;
pub mod modifiers;
pub mod nodes;
pub mod stmt;
pub mod types;
pub mod walk;

pub use arena::AstArena;
pub use descriptor::{jvm_method_descriptor, modifiers_text, signature_text};
pub use expr::{
    BinaryOp, ConstantValue, ConstructorTarget, Expr, UnaryOp, UpdateOp, VarTarget,
};
pub use ids::{ClassId, FieldId, LocalId, MethodId, ModuleId, ParamId, PropertyId};
pub use modifiers::{ClassFlags, MemberFlags, Modifiers};
pub use nodes::{
    CONSTRUCTOR_NAME, ClassNode, FieldNode, LocalVariable, MethodKind, MethodNode, ModuleNode,
    Parameter, PropertyNode, STATIC_INITIALIZER_NAME,
};
pub use stmt::{BridgeBody, BytecodeSequence, SlotLoad, Stmt};
pub use types::{GenericsType, PrimitiveType, TypeRef, names};
pub use walk::{NodeMut, NodeRef};

#[cfg(test)]
#[path = "../tests/arena_tests.rs"]
mod arena_tests;

#[cfg(test)]
#[path = "../tests/hierarchy_tests.rs"]
mod hierarchy_tests;

#[cfg(test)]
#[path = "../tests/types_tests.rs"]
mod types_tests;
