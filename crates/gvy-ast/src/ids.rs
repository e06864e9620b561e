//! Typed indices into the [`AstArena`](crate::AstArena).

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
            #[serde(transparent)]
            pub struct $name(pub u32);

            impl $name {
                #[inline]
                #[must_use]
                pub const fn index(self) -> usize {
                    self.0 as usize
                }
            }
        )*
    };
}

define_id! {
    /// Index of a [`ClassNode`](crate::ClassNode).
    ClassId,
    /// Index of a [`MethodNode`](crate::MethodNode); constructors and static
    /// initializers share the method table.
    MethodId,
    /// Index of a [`FieldNode`](crate::FieldNode).
    FieldId,
    /// Index of a [`PropertyNode`](crate::PropertyNode).
    PropertyId,
    /// Index of a [`Parameter`](crate::Parameter).
    ParamId,
    /// Index of a [`LocalVariable`](crate::LocalVariable).
    LocalId,
    /// Index of a [`ModuleNode`](crate::ModuleNode).
    ModuleId,
}
