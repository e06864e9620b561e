//! Access flags and node markers.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// JVM access flags, using the class-file bit values.
    ///
    /// `BRIDGE` shares its bit with `VOLATILE` and `VARARGS` with
    /// `TRANSIENT`, exactly as in the class-file format.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Modifiers: u32 {
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
        const SYNCHRONIZED = 0x0020;
        const VOLATILE = 0x0040;
        const BRIDGE = 0x0040;
        const TRANSIENT = 0x0080;
        const VARARGS = 0x0080;
        const NATIVE = 0x0100;
        const INTERFACE = 0x0200;
        const ABSTRACT = 0x0400;
        const STRICT = 0x0800;
        const SYNTHETIC = 0x1000;
        const ANNOTATION = 0x2000;
        const ENUM = 0x4000;
    }
}

impl Modifiers {
    #[inline]
    #[must_use]
    pub fn is_public(self) -> bool {
        self.contains(Self::PUBLIC)
    }

    #[inline]
    #[must_use]
    pub fn is_private(self) -> bool {
        self.contains(Self::PRIVATE)
    }

    #[inline]
    #[must_use]
    pub fn is_protected(self) -> bool {
        self.contains(Self::PROTECTED)
    }

    #[inline]
    #[must_use]
    pub fn is_static(self) -> bool {
        self.contains(Self::STATIC)
    }

    #[inline]
    #[must_use]
    pub fn is_final(self) -> bool {
        self.contains(Self::FINAL)
    }

    #[inline]
    #[must_use]
    pub fn is_abstract(self) -> bool {
        self.contains(Self::ABSTRACT)
    }

    #[inline]
    #[must_use]
    pub fn is_bridge(self) -> bool {
        self.contains(Self::BRIDGE)
    }

    #[inline]
    #[must_use]
    pub fn is_synthetic(self) -> bool {
        self.contains(Self::SYNTHETIC)
    }
}

bitflags! {
    /// Compiler-side markers on a class.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ClassFlags: u16 {
        /// Declared in a source unit of this compilation.
        const PRIMARY = 1 << 0;
        /// Anonymous inner class.
        const ANONYMOUS = 1 << 1;
        /// Script class wrapping top-level statements.
        const SCRIPT = 1 << 2;
        const TRAIT = 1 << 3;
        /// Opt out of the `__$stMC` fast-path helper field.
        const SKIP_FAST_PATH = 1 << 4;
        /// Set once the verifier has run over the class.
        const VERIFIED = 1 << 5;
    }
}

bitflags! {
    /// Compiler-side markers on methods, constructors, fields and properties.
    ///
    /// `SYNTHETIC` here is the compiler's own notion ("not user authored"),
    /// which is independent of the `ACC_SYNTHETIC` access flag.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct MemberFlags: u16 {
        const SYNTHETIC = 1 << 0;
        /// Added by the verifier (carries the `@Generated` marker).
        const GENERATED = 1 << 1;
        /// Carries the `@Internal` marker.
        const INTERNAL = 1 << 2;
        const DEFAULT_PARAMETER_GENERATED = 1 << 3;
        const SCRIPT_BODY = 1 << 4;
        /// The return type was inferred rather than declared.
        const DYNAMIC_RETURN_TYPE = 1 << 5;
        const NO_REAL_SOURCE_POSITION = 1 << 6;
        /// Constructor body already merged with field and object initializers.
        const INITIALIZATION_ASSEMBLED = 1 << 7;
    }
}
