//! Failures raised by the verifier.
//!
//! A [`VerifyError::Parser`] is a user error tied to a node of the class
//! being verified; it aborts the rest of that class. [`VerifyError::Internal`]
//! signals a broken invariant in the input graph (a compiler bug, not a user
//! mistake).

use gvy_ast::{ClassId, FieldId, MethodId, PropertyId};
use gvy_common::diagnostics::diagnostic_codes;
use gvy_common::{Diagnostic, Span, render_message};
use thiserror::Error;

/// Node an error is reported against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorNode {
    Class(ClassId),
    Method(MethodId),
    Field(FieldId),
    Property(PropertyId),
    /// An expression or statement inside a body; only its span is kept.
    Code,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerifyError {
    #[error("{message}")]
    Parser {
        code: u32,
        message: String,
        node: ErrorNode,
        span: Span,
        /// Other locations involved, e.g. the first of two duplicates.
        related: Vec<(Span, String)>,
    },

    #[error("BUG! {message}")]
    Internal { message: String },
}

impl VerifyError {
    /// Error rendered from the diagnostic table.
    pub fn parser(code: u32, args: &[&str], node: ErrorNode, span: Span) -> Self {
        VerifyError::Parser {
            code,
            message: render_message(code, args),
            node,
            span,
            related: Vec::new(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        VerifyError::Internal {
            message: message.into(),
        }
    }

    /// Attach a node to a parser error raised without a source position.
    #[must_use]
    pub fn or_at(self, fallback_node: ErrorNode, fallback_span: Span) -> Self {
        match self {
            VerifyError::Parser {
                code,
                message,
                span,
                related,
                ..
            } if !span.has_position() => VerifyError::Parser {
                code,
                message,
                node: fallback_node,
                span: fallback_span,
                related,
            },
            other => other,
        }
    }

    /// Point at another location involved in a parser error.
    #[must_use]
    pub fn with_related(mut self, span: Span, message: impl Into<String>) -> Self {
        if let VerifyError::Parser { related, .. } = &mut self {
            related.push((span, message.into()));
        }
        self
    }

    #[must_use]
    pub fn code(&self) -> u32 {
        match self {
            VerifyError::Parser { code, .. } => *code,
            VerifyError::Internal { .. } => diagnostic_codes::INTERNAL_COMPILER_ERROR,
        }
    }

    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            VerifyError::Parser { span, .. } => *span,
            VerifyError::Internal { .. } => Span::NONE,
        }
    }

    #[must_use]
    pub fn is_internal(&self) -> bool {
        matches!(self, VerifyError::Internal { .. })
    }

    #[must_use]
    pub fn to_diagnostic(&self, file: &str) -> Diagnostic {
        let diagnostic = Diagnostic::error(file, self.span(), self.to_string(), self.code());
        match self {
            VerifyError::Parser { related, .. } => related
                .iter()
                .fold(diagnostic, |d, (span, message)| d.with_related(file, *span, message.as_str())),
            VerifyError::Internal { .. } => diagnostic,
        }
    }
}

pub type VerifyResult<T> = Result<T, VerifyError>;
