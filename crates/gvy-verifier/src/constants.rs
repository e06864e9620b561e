//! Constant folding for static field initializers.
//!
//! Only what decides whether a `static final` field can be initialized
//! through the class file's constant pool: literals, casts of literals to
//! primitives, negation, same-kind arithmetic, string concatenation and
//! references to other constant `static final` fields.

use gvy_ast::{AstArena, BinaryOp, ConstantValue, Expr, TypeRef, UnaryOp, VarTarget};
use gvy_common::limits::MAX_AST_WALK_DEPTH;

/// Fold `expr` to a constant when possible; otherwise return it unchanged.
pub fn transform_inline_constants(arena: &AstArena, expr: &Expr) -> Expr {
    fold(arena, expr, 0).unwrap_or_else(|| expr.clone())
}

fn fold(arena: &AstArena, expr: &Expr, depth: usize) -> Option<Expr> {
    if depth > MAX_AST_WALK_DEPTH {
        return None;
    }
    match expr {
        Expr::Constant { .. } => Some(expr.clone()),
        Expr::Cast { ty, expr: inner, span } => {
            let primitive = ty.as_primitive()?;
            let value = fold(arena, inner, depth + 1)?;
            let converted = value.as_constant()?.convert_to(primitive)?;
            Some(Expr::Constant {
                value: converted,
                ty: ty.clone(),
                span: *span,
            })
        }
        Expr::Unary {
            op: UnaryOp::Negate,
            operand,
            span,
        } => {
            let value = fold(arena, operand, depth + 1)?;
            let Expr::Constant { value, ty, .. } = value else {
                return None;
            };
            Some(Expr::Constant {
                value: value.negated()?,
                ty,
                span: *span,
            })
        }
        Expr::Binary {
            left,
            op,
            right,
            span,
        } => {
            let left = fold(arena, left, depth + 1)?;
            let right = fold(arena, right, depth + 1)?;
            let value = fold_binary(left.as_constant()?, *op, right.as_constant()?)?;
            let ty = match (&left, &right, &value) {
                (_, _, ConstantValue::String(_)) => TypeRef::string(),
                (Expr::Constant { ty, .. }, _, _) => ty.clone(),
                _ => value.boxed_type(),
            };
            Some(Expr::Constant {
                value,
                ty,
                span: *span,
            })
        }
        Expr::Variable {
            target: VarTarget::Field(field),
            ..
        }
        | Expr::Field { field, .. } => {
            let node = arena.field(*field);
            if !node.is_static() || !node.is_final() {
                return None;
            }
            fold(arena, node.initial_expression.as_ref()?, depth + 1)
        }
        _ => None,
    }
}

fn fold_binary(left: &ConstantValue, op: BinaryOp, right: &ConstantValue) -> Option<ConstantValue> {
    use ConstantValue as C;

    if op == BinaryOp::Plus {
        if let C::String(l) = left {
            return Some(C::String(format!("{l}{}", right.text())));
        }
        if let C::String(r) = right {
            return Some(C::String(format!("{}{r}", left.text())));
        }
    }
    Some(match (left, right) {
        (C::Int(l), C::Int(r)) => C::Int(match op {
            BinaryOp::Plus => l.checked_add(*r)?,
            BinaryOp::Minus => l.checked_sub(*r)?,
            BinaryOp::Multiply => l.checked_mul(*r)?,
            _ => return None,
        }),
        (C::Long(l), C::Long(r)) => C::Long(match op {
            BinaryOp::Plus => l.checked_add(*r)?,
            BinaryOp::Minus => l.checked_sub(*r)?,
            BinaryOp::Multiply => l.checked_mul(*r)?,
            _ => return None,
        }),
        (C::Double(l), C::Double(r)) => C::Double(match op {
            BinaryOp::Plus => l + r,
            BinaryOp::Minus => l - r,
            BinaryOp::Multiply => l * r,
            _ => return None,
        }),
        _ => return None,
    })
}

/// A literal typed the way the class file stores it: a one-character string
/// becomes a `char`, boxed numeric types become primitives.
pub fn to_primitive_constant(expr: Expr) -> Expr {
    match expr {
        Expr::Constant { value, ty, span } => {
            if value.is_null() || ty.is_primitive() {
                return Expr::Constant { value, ty, span };
            }
            if let ConstantValue::String(text) = &value {
                let mut chars = text.chars();
                if let (Some(c), None) = (chars.next(), chars.next()) {
                    return Expr::Constant {
                        value: ConstantValue::Char(c),
                        ty: TypeRef::primitive(gvy_ast::PrimitiveType::Char),
                        span,
                    };
                }
            }
            let ty = ty.unwrapped();
            Expr::Constant { value, ty, span }
        }
        other => other,
    }
}
