//! Expression tree.
//!
//! Expressions are a closed sum type. Passes match on the variants they care
//! about and use [`Expr::children`] / [`Expr::children_mut`] to descend into
//! the rest.

use gvy_common::{Span, Spanned};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::ids::{ClassId, FieldId, LocalId, MethodId, ParamId};
use crate::stmt::Stmt;
use crate::types::{PrimitiveType, TypeRef, names};
use crate::walk::{NodeMut, NodeRef};

/// Value of a literal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ConstantValue {
    Null,
    Boolean(bool),
    Byte(i8),
    Char(char),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
}

impl ConstantValue {
    /// Boxed type of the value; literals are boxed unless marked primitive.
    #[must_use]
    pub fn boxed_type(&self) -> TypeRef {
        match self {
            ConstantValue::Null => TypeRef::object(),
            ConstantValue::Boolean(_) => TypeRef::class(names::BOOLEAN),
            ConstantValue::Byte(_) => TypeRef::class(names::BYTE),
            ConstantValue::Char(_) => TypeRef::class(names::CHARACTER),
            ConstantValue::Short(_) => TypeRef::class(names::SHORT),
            ConstantValue::Int(_) => TypeRef::class(names::INTEGER),
            ConstantValue::Long(_) => TypeRef::class(names::LONG),
            ConstantValue::Float(_) => TypeRef::class(names::FLOAT),
            ConstantValue::Double(_) => TypeRef::class(names::DOUBLE),
            ConstantValue::String(_) => TypeRef::string(),
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, ConstantValue::Null)
    }

    /// Arithmetic negation of numeric values.
    #[must_use]
    pub fn negated(&self) -> Option<ConstantValue> {
        Some(match self {
            ConstantValue::Byte(v) => ConstantValue::Byte(v.checked_neg()?),
            ConstantValue::Short(v) => ConstantValue::Short(v.checked_neg()?),
            ConstantValue::Int(v) => ConstantValue::Int(v.checked_neg()?),
            ConstantValue::Long(v) => ConstantValue::Long(v.checked_neg()?),
            ConstantValue::Float(v) => ConstantValue::Float(-v),
            ConstantValue::Double(v) => ConstantValue::Double(-v),
            _ => return None,
        })
    }

    /// Converts a numeric or char value to the given primitive type, the way a
    /// cast on a literal behaves.
    #[must_use]
    pub fn convert_to(&self, target: PrimitiveType) -> Option<ConstantValue> {
        let wide: f64 = match self {
            ConstantValue::Byte(v) => f64::from(*v),
            ConstantValue::Short(v) => f64::from(*v),
            ConstantValue::Int(v) => f64::from(*v),
            ConstantValue::Char(c) => f64::from(u32::from(*c)),
            ConstantValue::Float(v) => f64::from(*v),
            ConstantValue::Double(v) => *v,
            ConstantValue::Long(v) => {
                return Some(match target {
                    PrimitiveType::Long => ConstantValue::Long(*v),
                    PrimitiveType::Int => ConstantValue::Int(*v as i32),
                    PrimitiveType::Short => ConstantValue::Short(*v as i16),
                    PrimitiveType::Byte => ConstantValue::Byte(*v as i8),
                    PrimitiveType::Float => ConstantValue::Float(*v as f32),
                    PrimitiveType::Double => ConstantValue::Double(*v as f64),
                    _ => return None,
                });
            }
            ConstantValue::Boolean(b) if target == PrimitiveType::Boolean => {
                return Some(ConstantValue::Boolean(*b));
            }
            _ => return None,
        };
        Some(match target {
            PrimitiveType::Byte => ConstantValue::Byte(wide as i8),
            PrimitiveType::Short => ConstantValue::Short(wide as i16),
            PrimitiveType::Int => ConstantValue::Int(wide as i32),
            PrimitiveType::Long => ConstantValue::Long(wide as i64),
            PrimitiveType::Float => ConstantValue::Float(wide as f32),
            PrimitiveType::Double => ConstantValue::Double(wide),
            PrimitiveType::Char => ConstantValue::Char(char::from_u32(wide as u32)?),
            _ => return None,
        })
    }

    #[must_use]
    pub fn text(&self) -> String {
        match self {
            ConstantValue::Null => "null".to_string(),
            ConstantValue::Boolean(v) => v.to_string(),
            ConstantValue::Byte(v) => v.to_string(),
            ConstantValue::Char(v) => v.to_string(),
            ConstantValue::Short(v) => v.to_string(),
            ConstantValue::Int(v) => v.to_string(),
            ConstantValue::Long(v) => v.to_string(),
            ConstantValue::Float(v) => v.to_string(),
            ConstantValue::Double(v) => v.to_string(),
            ConstantValue::String(v) => v.clone(),
        }
    }
}

/// What a variable expression resolved to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum VarTarget {
    This,
    Super,
    Parameter(ParamId),
    Local(LocalId),
    /// Field or property accessed by its simple name through implicit `this`.
    Field(FieldId),
    /// Unresolved name, dispatched at runtime.
    Dynamic,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Assign,
    PlusAssign,
    MinusAssign,
    MultiplyAssign,
    DivideAssign,
    Plus,
    Minus,
    Multiply,
    Divide,
    Remainder,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    LogicalAnd,
    LogicalOr,
    Index,
}

impl BinaryOp {
    #[must_use]
    pub const fn is_assignment(self) -> bool {
        matches!(
            self,
            BinaryOp::Assign
                | BinaryOp::PlusAssign
                | BinaryOp::MinusAssign
                | BinaryOp::MultiplyAssign
                | BinaryOp::DivideAssign
        )
    }

    /// Compound assignments read the target before writing it.
    #[must_use]
    pub const fn is_compound_assignment(self) -> bool {
        self.is_assignment() && !matches!(self, BinaryOp::Assign)
    }

    #[must_use]
    pub const fn is_short_circuit(self) -> bool {
        matches!(self, BinaryOp::LogicalAnd | BinaryOp::LogicalOr)
    }

    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            BinaryOp::Assign => "=",
            BinaryOp::PlusAssign => "+=",
            BinaryOp::MinusAssign => "-=",
            BinaryOp::MultiplyAssign => "*=",
            BinaryOp::DivideAssign => "/=",
            BinaryOp::Plus => "+",
            BinaryOp::Minus => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Remainder => "%",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::Less => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::LogicalAnd => "&&",
            BinaryOp::LogicalOr => "||",
            BinaryOp::Index => "[",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    Not,
    Negate,
    BitwiseNegate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateOp {
    Increment,
    Decrement,
}

/// Target of a constructor call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "type", rename_all = "snake_case")]
pub enum ConstructorTarget {
    New(TypeRef),
    /// `this(...)` delegation to another constructor of the same class.
    This,
    /// `super(...)` call to the superclass constructor.
    Super,
}

/// Expression node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "expr", rename_all = "snake_case")]
pub enum Expr {
    /// Literal value; `ty` is boxed unless the literal was made primitive.
    Constant {
        value: ConstantValue,
        ty: TypeRef,
        #[serde(default)]
        span: Span,
    },
    /// Name reference, including `this` and `super`.
    Variable {
        name: String,
        target: VarTarget,
        #[serde(default)]
        span: Span,
    },
    /// Direct field access that bypasses property dispatch.
    Field {
        field: FieldId,
        name: String,
        #[serde(default)]
        span: Span,
    },
    /// Property access: `object.property`.
    Property {
        object: Box<Expr>,
        property: String,
        #[serde(default)]
        span: Span,
    },
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
        #[serde(default)]
        span: Span,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        #[serde(default)]
        span: Span,
    },
    /// `++x`, `x--` and friends.
    Update {
        op: UpdateOp,
        prefix: bool,
        operand: Box<Expr>,
        #[serde(default)]
        span: Span,
    },
    Cast {
        ty: TypeRef,
        #[serde(rename = "operand")]
        expr: Box<Expr>,
        #[serde(default)]
        span: Span,
    },
    /// Instance method call: `object.method(args)`.
    MethodCall {
        object: Box<Expr>,
        method: String,
        arguments: Vec<Expr>,
        /// Written without a receiver, as `method(args)`.
        #[serde(default)]
        implicit_this: bool,
        /// Statically chosen target, when resolution found one.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<MethodId>,
        #[serde(default)]
        span: Span,
    },
    StaticCall {
        owner: TypeRef,
        method: String,
        arguments: Vec<Expr>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<MethodId>,
        #[serde(default)]
        span: Span,
    },
    ConstructorCall {
        target: ConstructorTarget,
        arguments: Vec<Expr>,
        /// Set when the call instantiates an anonymous inner class.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        anonymous_class: Option<ClassId>,
        #[serde(default)]
        span: Span,
    },
    Closure {
        parameters: Vec<ParamId>,
        code: Box<Stmt>,
        #[serde(default)]
        span: Span,
    },
    List {
        elements: Vec<Expr>,
        #[serde(default)]
        span: Span,
    },
    Map {
        entries: Vec<Expr>,
        #[serde(default)]
        span: Span,
    },
    MapEntry {
        key: Box<Expr>,
        value: Box<Expr>,
        #[serde(default)]
        span: Span,
    },
    Ternary {
        condition: Box<Expr>,
        when_true: Box<Expr>,
        when_false: Box<Expr>,
        #[serde(default)]
        span: Span,
    },
    /// Local variable declaration: `def x = init`.
    Declaration {
        local: LocalId,
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        initializer: Option<Box<Expr>>,
        #[serde(default)]
        span: Span,
    },
    ClassLiteral {
        ty: TypeRef,
        #[serde(default)]
        span: Span,
    },
}

impl Expr {
    // =========================================================================
    // Builders
    // =========================================================================

    /// Literal with its boxed type.
    pub fn constant(value: ConstantValue) -> Self {
        let ty = value.boxed_type();
        Expr::Constant {
            value,
            ty,
            span: Span::NONE,
        }
    }

    pub fn int(value: i32) -> Self {
        Expr::constant(ConstantValue::Int(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::constant(ConstantValue::String(value.into()))
    }

    pub fn null() -> Self {
        Expr::constant(ConstantValue::Null)
    }

    pub fn this() -> Self {
        Expr::Variable {
            name: "this".to_string(),
            target: VarTarget::This,
            span: Span::NONE,
        }
    }

    pub fn super_ref() -> Self {
        Expr::Variable {
            name: "super".to_string(),
            target: VarTarget::Super,
            span: Span::NONE,
        }
    }

    pub fn var(name: impl Into<String>, target: VarTarget) -> Self {
        Expr::Variable {
            name: name.into(),
            target,
            span: Span::NONE,
        }
    }

    pub fn field(field: FieldId, name: impl Into<String>) -> Self {
        Expr::Field {
            field,
            name: name.into(),
            span: Span::NONE,
        }
    }

    pub fn binary(left: Expr, op: BinaryOp, right: Expr) -> Self {
        Expr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
            span: Span::NONE,
        }
    }

    pub fn assign(target: Expr, value: Expr) -> Self {
        Expr::binary(target, BinaryOp::Assign, value)
    }

    pub fn cast(ty: TypeRef, expr: Expr) -> Self {
        Expr::Cast {
            ty,
            expr: Box::new(expr),
            span: Span::NONE,
        }
    }

    /// `this.method(args)` written without a receiver.
    pub fn call_this(method: impl Into<String>, arguments: Vec<Expr>) -> Self {
        Expr::MethodCall {
            object: Box::new(Expr::this()),
            method: method.into(),
            arguments,
            implicit_this: true,
            target: None,
            span: Span::NONE,
        }
    }

    pub fn call(object: Expr, method: impl Into<String>, arguments: Vec<Expr>) -> Self {
        Expr::MethodCall {
            object: Box::new(object),
            method: method.into(),
            arguments,
            implicit_this: false,
            target: None,
            span: Span::NONE,
        }
    }

    pub fn new_instance(ty: TypeRef, arguments: Vec<Expr>) -> Self {
        Expr::ConstructorCall {
            target: ConstructorTarget::New(ty),
            arguments,
            anonymous_class: None,
            span: Span::NONE,
        }
    }

    pub fn this_call(arguments: Vec<Expr>) -> Self {
        Expr::ConstructorCall {
            target: ConstructorTarget::This,
            arguments,
            anonymous_class: None,
            span: Span::NONE,
        }
    }

    pub fn super_call(arguments: Vec<Expr>) -> Self {
        Expr::ConstructorCall {
            target: ConstructorTarget::Super,
            arguments,
            anonymous_class: None,
            span: Span::NONE,
        }
    }

    pub fn closure(parameters: Vec<ParamId>, code: Stmt) -> Self {
        Expr::Closure {
            parameters,
            code: Box::new(code),
            span: Span::NONE,
        }
    }

    pub fn declare(local: LocalId, name: impl Into<String>, initializer: Option<Expr>) -> Self {
        Expr::Declaration {
            local,
            name: name.into(),
            initializer: initializer.map(Box::new),
            span: Span::NONE,
        }
    }

    /// Replace the span, builder style.
    #[must_use]
    pub fn at(mut self, new_span: Span) -> Self {
        *self.span_mut() = new_span;
        self
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn span_mut(&mut self) -> &mut Span {
        match self {
            Expr::Constant { span, .. }
            | Expr::Variable { span, .. }
            | Expr::Field { span, .. }
            | Expr::Property { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Unary { span, .. }
            | Expr::Update { span, .. }
            | Expr::Cast { span, .. }
            | Expr::MethodCall { span, .. }
            | Expr::StaticCall { span, .. }
            | Expr::ConstructorCall { span, .. }
            | Expr::Closure { span, .. }
            | Expr::List { span, .. }
            | Expr::Map { span, .. }
            | Expr::MapEntry { span, .. }
            | Expr::Ternary { span, .. }
            | Expr::Declaration { span, .. }
            | Expr::ClassLiteral { span, .. } => span,
        }
    }

    #[must_use]
    pub fn is_this(&self) -> bool {
        matches!(self, Expr::Variable { target: VarTarget::This, .. })
    }

    #[must_use]
    pub fn is_super(&self) -> bool {
        matches!(self, Expr::Variable { target: VarTarget::Super, .. })
    }

    /// `this(...)` or `super(...)`.
    #[must_use]
    pub fn is_special_constructor_call(&self) -> bool {
        matches!(
            self,
            Expr::ConstructorCall {
                target: ConstructorTarget::This | ConstructorTarget::Super,
                ..
            }
        )
    }

    #[must_use]
    pub fn as_constant(&self) -> Option<&ConstantValue> {
        match self {
            Expr::Constant { value, .. } => Some(value),
            _ => None,
        }
    }

    /// The expression with one level of cast removed.
    #[must_use]
    pub fn strip_cast(&self) -> &Expr {
        match self {
            Expr::Cast { expr, .. } => expr,
            other => other,
        }
    }

    /// Short source-like rendering used in diagnostics.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Expr::Constant { value, .. } => value.text(),
            Expr::Variable { name, .. } | Expr::Field { name, .. } => name.clone(),
            Expr::Property {
                object, property, ..
            } => format!("{}.{property}", object.text()),
            Expr::Binary {
                left, op, right, ..
            } => format!("({} {} {})", left.text(), op.text(), right.text()),
            Expr::Cast { ty, expr, .. } => format!("({ty}) {}", expr.text()),
            Expr::MethodCall {
                object, method, ..
            } => format!("{}.{method}(...)", object.text()),
            Expr::Declaration { name, .. } => name.clone(),
            _ => String::new(),
        }
    }

    /// Direct children in evaluation order.
    #[must_use]
    pub fn children(&self) -> SmallVec<[NodeRef<'_>; 4]> {
        let mut out = SmallVec::new();
        match self {
            Expr::Constant { .. }
            | Expr::Variable { .. }
            | Expr::Field { .. }
            | Expr::ClassLiteral { .. } => {}
            Expr::Property { object, .. } => out.push(NodeRef::Expr(object)),
            Expr::Binary { left, right, .. } => {
                out.push(NodeRef::Expr(left));
                out.push(NodeRef::Expr(right));
            }
            Expr::Unary { operand, .. } | Expr::Update { operand, .. } => {
                out.push(NodeRef::Expr(operand));
            }
            Expr::Cast { expr, .. } => out.push(NodeRef::Expr(expr)),
            Expr::MethodCall {
                object, arguments, ..
            } => {
                out.push(NodeRef::Expr(object));
                out.extend(arguments.iter().map(NodeRef::Expr));
            }
            Expr::StaticCall { arguments, .. } | Expr::ConstructorCall { arguments, .. } => {
                out.extend(arguments.iter().map(NodeRef::Expr));
            }
            Expr::Closure { code, .. } => out.push(NodeRef::Stmt(code)),
            Expr::List { elements, .. } => out.extend(elements.iter().map(NodeRef::Expr)),
            Expr::Map { entries, .. } => out.extend(entries.iter().map(NodeRef::Expr)),
            Expr::MapEntry { key, value, .. } => {
                out.push(NodeRef::Expr(key));
                out.push(NodeRef::Expr(value));
            }
            Expr::Ternary {
                condition,
                when_true,
                when_false,
                ..
            } => {
                out.push(NodeRef::Expr(condition));
                out.push(NodeRef::Expr(when_true));
                out.push(NodeRef::Expr(when_false));
            }
            Expr::Declaration { initializer, .. } => {
                if let Some(init) = initializer {
                    out.push(NodeRef::Expr(init));
                }
            }
        }
        out
    }

    /// Mutable direct children in evaluation order.
    pub fn children_mut(&mut self) -> SmallVec<[NodeMut<'_>; 4]> {
        let mut out = SmallVec::new();
        match self {
            Expr::Constant { .. }
            | Expr::Variable { .. }
            | Expr::Field { .. }
            | Expr::ClassLiteral { .. } => {}
            Expr::Property { object, .. } => out.push(NodeMut::Expr(object)),
            Expr::Binary { left, right, .. } => {
                out.push(NodeMut::Expr(left));
                out.push(NodeMut::Expr(right));
            }
            Expr::Unary { operand, .. } | Expr::Update { operand, .. } => {
                out.push(NodeMut::Expr(operand));
            }
            Expr::Cast { expr, .. } => out.push(NodeMut::Expr(expr)),
            Expr::MethodCall {
                object, arguments, ..
            } => {
                out.push(NodeMut::Expr(object));
                out.extend(arguments.iter_mut().map(NodeMut::Expr));
            }
            Expr::StaticCall { arguments, .. } | Expr::ConstructorCall { arguments, .. } => {
                out.extend(arguments.iter_mut().map(NodeMut::Expr));
            }
            Expr::Closure { code, .. } => out.push(NodeMut::Stmt(code)),
            Expr::List { elements, .. } => out.extend(elements.iter_mut().map(NodeMut::Expr)),
            Expr::Map { entries, .. } => out.extend(entries.iter_mut().map(NodeMut::Expr)),
            Expr::MapEntry { key, value, .. } => {
                out.push(NodeMut::Expr(key));
                out.push(NodeMut::Expr(value));
            }
            Expr::Ternary {
                condition,
                when_true,
                when_false,
                ..
            } => {
                out.push(NodeMut::Expr(condition));
                out.push(NodeMut::Expr(when_true));
                out.push(NodeMut::Expr(when_false));
            }
            Expr::Declaration { initializer, .. } => {
                if let Some(init) = initializer {
                    out.push(NodeMut::Expr(init));
                }
            }
        }
        out
    }
}

impl Spanned for Expr {
    fn span(&self) -> Span {
        match self {
            Expr::Constant { span, .. }
            | Expr::Variable { span, .. }
            | Expr::Field { span, .. }
            | Expr::Property { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Unary { span, .. }
            | Expr::Update { span, .. }
            | Expr::Cast { span, .. }
            | Expr::MethodCall { span, .. }
            | Expr::StaticCall { span, .. }
            | Expr::ConstructorCall { span, .. }
            | Expr::Closure { span, .. }
            | Expr::List { span, .. }
            | Expr::Map { span, .. }
            | Expr::MapEntry { span, .. }
            | Expr::Ternary { span, .. }
            | Expr::Declaration { span, .. }
            | Expr::ClassLiteral { span, .. } => *span,
        }
    }
}
