//! Statement tree and synthesized low-level bodies.

use gvy_common::{Span, Spanned};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::expr::Expr;
use crate::ids::LocalId;
use crate::types::TypeRef;
use crate::walk::{NodeMut, NodeRef};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stmt", rename_all = "snake_case")]
pub enum Stmt {
    Block {
        statements: Vec<Stmt>,
        #[serde(default)]
        span: Span,
    },
    Expression {
        expr: Expr,
        #[serde(default)]
        span: Span,
    },
    Return {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        expr: Option<Expr>,
        #[serde(default)]
        span: Span,
    },
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        else_branch: Option<Box<Stmt>>,
        #[serde(default)]
        span: Span,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
        #[serde(default)]
        span: Span,
    },
    /// `for (x in collection) body`
    ForIn {
        variable: LocalId,
        name: String,
        collection: Expr,
        body: Box<Stmt>,
        #[serde(default)]
        span: Span,
    },
    Throw {
        expr: Expr,
        #[serde(default)]
        span: Span,
    },
    Empty,
    /// Body written directly as instructions by the class generator.
    Bytecode(BytecodeSequence),
}

impl Stmt {
    pub fn block(statements: Vec<Stmt>) -> Self {
        Stmt::Block {
            statements,
            span: Span::NONE,
        }
    }

    pub fn expr(expr: Expr) -> Self {
        Stmt::Expression {
            expr,
            span: Span::NONE,
        }
    }

    pub fn ret(expr: Option<Expr>) -> Self {
        Stmt::Return {
            expr,
            span: Span::NONE,
        }
    }

    pub fn throw(expr: Expr) -> Self {
        Stmt::Throw {
            expr,
            span: Span::NONE,
        }
    }

    /// `return null`
    pub fn return_null() -> Self {
        Stmt::ret(Some(Expr::null()))
    }

    #[must_use]
    pub fn at(mut self, new_span: Span) -> Self {
        match &mut self {
            Stmt::Block { span, .. }
            | Stmt::Expression { span, .. }
            | Stmt::Return { span, .. }
            | Stmt::If { span, .. }
            | Stmt::While { span, .. }
            | Stmt::ForIn { span, .. }
            | Stmt::Throw { span, .. } => *span = new_span,
            Stmt::Empty | Stmt::Bytecode(_) => {}
        }
        self
    }

    #[must_use]
    pub fn is_bytecode(&self) -> bool {
        matches!(self, Stmt::Bytecode(_))
    }

    #[must_use]
    pub fn as_expression(&self) -> Option<&Expr> {
        match self {
            Stmt::Expression { expr, .. } => Some(expr),
            _ => None,
        }
    }

    /// First statement, descending through leading blocks.
    #[must_use]
    pub fn first_statement(&self) -> Option<&Stmt> {
        match self {
            Stmt::Block { statements, .. } => statements.first()?.first_statement(),
            other => Some(other),
        }
    }

    /// Statements of a block, or the statement itself.
    #[must_use]
    pub fn into_statements(self) -> Vec<Stmt> {
        match self {
            Stmt::Block { statements, .. } => statements,
            Stmt::Empty => Vec::new(),
            other => vec![other],
        }
    }

    #[must_use]
    pub fn children(&self) -> SmallVec<[NodeRef<'_>; 4]> {
        let mut out = SmallVec::new();
        match self {
            Stmt::Block { statements, .. } => out.extend(statements.iter().map(NodeRef::Stmt)),
            Stmt::Expression { expr, .. } | Stmt::Throw { expr, .. } => out.push(NodeRef::Expr(expr)),
            Stmt::Return { expr, .. } => {
                if let Some(expr) = expr {
                    out.push(NodeRef::Expr(expr));
                }
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                out.push(NodeRef::Expr(condition));
                out.push(NodeRef::Stmt(then_branch));
                if let Some(else_branch) = else_branch {
                    out.push(NodeRef::Stmt(else_branch));
                }
            }
            Stmt::While {
                condition, body, ..
            } => {
                out.push(NodeRef::Expr(condition));
                out.push(NodeRef::Stmt(body));
            }
            Stmt::ForIn {
                collection, body, ..
            } => {
                out.push(NodeRef::Expr(collection));
                out.push(NodeRef::Stmt(body));
            }
            Stmt::Empty | Stmt::Bytecode(_) => {}
        }
        out
    }

    pub fn children_mut(&mut self) -> SmallVec<[NodeMut<'_>; 4]> {
        let mut out = SmallVec::new();
        match self {
            Stmt::Block { statements, .. } => {
                out.extend(statements.iter_mut().map(NodeMut::Stmt));
            }
            Stmt::Expression { expr, .. } | Stmt::Throw { expr, .. } => out.push(NodeMut::Expr(expr)),
            Stmt::Return { expr, .. } => {
                if let Some(expr) = expr {
                    out.push(NodeMut::Expr(expr));
                }
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                out.push(NodeMut::Expr(condition));
                out.push(NodeMut::Stmt(then_branch));
                if let Some(else_branch) = else_branch {
                    out.push(NodeMut::Stmt(else_branch));
                }
            }
            Stmt::While {
                condition, body, ..
            } => {
                out.push(NodeMut::Expr(condition));
                out.push(NodeMut::Stmt(body));
            }
            Stmt::ForIn {
                collection, body, ..
            } => {
                out.push(NodeMut::Expr(collection));
                out.push(NodeMut::Stmt(body));
            }
            Stmt::Empty | Stmt::Bytecode(_) => {}
        }
        out
    }
}

impl Spanned for Stmt {
    fn span(&self) -> Span {
        match self {
            Stmt::Block { span, .. }
            | Stmt::Expression { span, .. }
            | Stmt::Return { span, .. }
            | Stmt::If { span, .. }
            | Stmt::While { span, .. }
            | Stmt::ForIn { span, .. }
            | Stmt::Throw { span, .. } => *span,
            Stmt::Empty | Stmt::Bytecode(_) => Span::NONE,
        }
    }
}

// =============================================================================
// Synthesized bodies
// =============================================================================

/// Instruction recipe for a body the class generator writes directly.
///
/// Owners are JVM internal names (`pkg/Outer$Inner`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "sequence", rename_all = "snake_case")]
pub enum BytecodeSequence {
    /// `$getStaticMetaClass()`: compare `getClass()` with the class literal,
    /// take `initMetaClass(this)` on mismatch, otherwise memoize
    /// `ClassInfo.getClassInfo(getClass())` in `class_info_field` and return
    /// its meta class.
    StaticMetaClass { owner: String, class_info_field: String },
    /// `getMetaClass()`: return the cached field, computing it through
    /// `$getStaticMetaClass()` on first use.
    GetMetaClass { owner: String, field: String },
    /// `setMetaClass(mc)`: `this.<field> = mc`.
    SetMetaClass { owner: String, field: String },
    /// Property getter reading the backing field.
    FieldGetter {
        owner: String,
        field: String,
        field_type: TypeRef,
        is_static: bool,
    },
    /// Property setter writing argument 1 to the backing field.
    FieldSetter {
        owner: String,
        field: String,
        field_type: TypeRef,
        is_static: bool,
    },
    /// Covariant bridge forwarding to the real override.
    Bridge(BridgeBody),
    /// Call-site array initialization at the start of `__$swapInit`.
    SwapInitCallSites,
    /// `INVOKESTATIC owner.__$swapInit()V` at the start of `<clinit>`.
    InvokeSwapInit { owner: String },
}

/// One argument load inside a bridge body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotLoad {
    /// Local variable slot; slot 0 holds `this`.
    pub slot: u16,
    pub ty: TypeRef,
    /// Checked cast applied when the target parameter type differs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cast_to: Option<TypeRef>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeBody {
    pub owner: String,
    pub target_name: String,
    /// JVM descriptor of the invoked method, e.g. `()Ljava/lang/String;`.
    pub target_descriptor: String,
    pub loads: Vec<SlotLoad>,
    /// Return type the bridge hands back (the overridden method's, erased).
    pub return_type: TypeRef,
}
