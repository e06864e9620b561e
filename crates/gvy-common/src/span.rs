//! Source positions carried by AST nodes.
//!
//! Positions are 1-based line/column pairs as produced by the parser. A line
//! of zero marks a node without a real source position (synthesized code).

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub line: u32,
    pub column: u32,
    #[serde(default)]
    pub last_line: u32,
    #[serde(default)]
    pub last_column: u32,
}

impl Span {
    /// Position used by synthesized nodes.
    pub const NONE: Span = Span {
        line: 0,
        column: 0,
        last_line: 0,
        last_column: 0,
    };

    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Span {
            line,
            column,
            last_line: line,
            last_column: column,
        }
    }

    #[must_use]
    pub const fn with_end(line: u32, column: u32, last_line: u32, last_column: u32) -> Self {
        Span {
            line,
            column,
            last_line,
            last_column,
        }
    }

    #[must_use]
    pub const fn has_position(&self) -> bool {
        self.line > 0
    }

    /// Returns `self` when it carries a position, otherwise `fallback`.
    #[must_use]
    pub const fn or(self, fallback: Span) -> Span {
        if self.has_position() { self } else { fallback }
    }
}

/// Trait for nodes that carry a source span.
pub trait Spanned {
    fn span(&self) -> Span;
}
