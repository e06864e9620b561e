//! Constructor and static initializer assembly.
//!
//! Each constructor that does not delegate through `this(...)` ends up as
//!
//! ```text
//! this$0 = ...            // inner classes: outer instance capture
//! <captured locals>       // anonymous classes
//! super(...)              // explicit special constructor call, if any
//! <instance field initializers, declaration order>
//! <object initializer blocks, source order>
//! <rest of the authored body>
//! ```
//!
//! Static field initializers go to `<clinit>`; constant `static final`
//! fields keep their value on the declaration instead.

use gvy_ast::{
    BinaryOp, BytecodeSequence, ClassId, Expr, FieldId, MemberFlags, MethodId,
    MethodNode, Modifiers, Stmt, TypeRef, VarTarget,
};
use gvy_common::Spanned;

use crate::constants::{to_primitive_constant, transform_inline_constants};
use crate::error::{VerifyError, VerifyResult};
use crate::verifier::Verifier;

pub const SWAP_INIT_METHOD: &str = "__$swapInit";
const OPTIMIZED_CONSTANT_PREFIX: &str = "$const$";
const OUTER_INSTANCE_FIELD: &str = "this$0";
const ENUM_VALUES_FIELD: &str = "$VALUES";

/// Statements collected for one constructor.
#[derive(Default)]
struct InitStatements {
    instance: Vec<Stmt>,
    static_: Vec<Stmt>,
    /// Enum statics that must run after `$VALUES` is set.
    after_enum_values: Vec<Stmt>,
}

impl Verifier<'_> {
    /// Assemble every constructor and `<clinit>` of a class.
    pub(crate) fn add_initialization(&mut self, class: ClassId) -> VerifyResult<()> {
        let swap_init = self.move_optimized_constants_initialization(class)?;

        let constructors = self.arena.class(class).constructors.clone();
        for constructor in constructors {
            self.add_constructor_initialization(class, Some(constructor));
        }

        if swap_init {
            let owner = self.arena.class(class).internal_name();
            self.prepend_static_statements(
                class,
                vec![Stmt::Bytecode(BytecodeSequence::InvokeSwapInit { owner })],
            );
        }
        Ok(())
    }

    /// Interfaces and traits: only the static part is kept, collected as if
    /// for a constructor that is never added to the class.
    pub(crate) fn add_interface_initialization(&mut self, class: ClassId) -> VerifyResult<()> {
        self.add_constructor_initialization(class, None);
        Ok(())
    }

    /// Move `$const$*` initializers into `__$swapInit()`. Returns whether the
    /// method was added.
    fn move_optimized_constants_initialization(&mut self, class: ClassId) -> VerifyResult<bool> {
        let node = self.arena.class(class);
        if node.is_interface() && !node.is_trait() {
            return Ok(false);
        }

        let candidates: Vec<FieldId> = node
            .fields
            .iter()
            .copied()
            .filter(|&f| {
                let field = self.arena.field(f);
                field.is_static()
                    && (field.is_synthetic() || field.modifiers.is_synthetic())
                    && field.name.starts_with(OPTIMIZED_CONSTANT_PREFIX)
                    && field.initial_expression.is_some()
            })
            .collect();
        if candidates.is_empty() {
            return Ok(false);
        }

        let mut statements = vec![Stmt::Bytecode(BytecodeSequence::SwapInitCallSites)];
        for field in candidates {
            let node = self.arena.field_mut(field);
            let Some(Expr::Constant { value, ty, span }) = node.initial_expression.take() else {
                return Err(VerifyError::internal(format!(
                    "Initial value of optimized constant {} is not a constant",
                    node.name
                )));
            };
            let constant = Expr::Constant {
                value,
                ty: ty.unwrapped(),
                span,
            };
            statements.push(Stmt::expr(Expr::assign(self.arena.field_expr(field), constant)));
        }

        let mut method = MethodNode::new(
            SWAP_INIT_METHOD,
            Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::SYNTHETIC,
            TypeRef::void(),
            Vec::new(),
            Some(Stmt::block(statements)),
            class,
        );
        method.flags |= MemberFlags::SYNTHETIC;
        self.arena.add_method(method);
        tracing::debug!("added swap init method");
        Ok(true)
    }

    fn add_constructor_initialization(&mut self, class: ClassId, constructor: Option<MethodId>) {
        let code = match constructor {
            Some(c) => {
                let node = self.arena.method(c);
                if node.flags.contains(MemberFlags::INITIALIZATION_ASSEMBLED) {
                    return;
                }
                node.code.clone()
            }
            None => None,
        };

        let first = code.as_ref().and_then(Stmt::first_statement);
        if first.is_some_and(Stmt::is_bytecode) {
            return;
        }
        let first_call = first.and_then(Stmt::as_expression);
        let special_call = first_call.is_some_and(Expr::is_special_constructor_call);
        if first_call.is_some_and(|e| {
            matches!(
                e,
                Expr::ConstructorCall {
                    target: gvy_ast::ConstructorTarget::This,
                    ..
                }
            )
        }) {
            return;
        }

        let node = self.arena.class(class);
        let is_enum = node.is_enum();
        let is_trait = node.is_trait();
        let explicit_static_names = if is_enum {
            self.explicit_enum_static_names(class)
        } else {
            Vec::new()
        };

        let mut init = InitStatements::default();
        if !is_trait {
            let fields = self.arena.class(class).fields.clone();
            for field in fields {
                self.add_field_initialization(class, field, &explicit_static_names, &mut init);
            }
        }
        init.instance
            .extend(self.arena.class(class).object_initializers.iter().cloned());

        let (mut other, span) = match code {
            Some(Stmt::Block { statements, span }) => (statements, span),
            Some(stmt) => {
                let span = stmt.span();
                (stmt.into_statements(), span)
            }
            None => (Vec::new(), gvy_common::Span::NONE),
        };

        let mut head = Vec::new();
        if !other.is_empty() {
            if special_call {
                if let Some(call) = take_first_statement(&mut other) {
                    init.instance.insert(0, call);
                }
            }
            if self.arena.class(class).outer_class.is_some() {
                if let Some(capture) = take_outer_instance_capture(&mut other) {
                    head.push(capture);
                }
            }
            if self.arena.class(class).is_anonymous() {
                head.extend(self.take_captured_locals(&mut other));
            }
        }
        let mut statements = head;
        statements.append(&mut init.instance);
        statements.append(&mut other);

        if let Some(c) = constructor {
            let node = self.arena.method_mut(c);
            node.code = Some(Stmt::Block { statements, span });
            node.flags |= MemberFlags::INITIALIZATION_ASSEMBLED;
        }

        if !init.static_.is_empty() || !init.after_enum_values.is_empty() {
            self.prepend_static_statements(class, init.static_);
            if is_enum && !init.after_enum_values.is_empty() {
                self.position_after_enum_values(class, init.after_enum_values);
            }
        }
        tracing::trace!(constructor = ?constructor, "assembled initialization");
    }

    /// Static members of an enum that the user declared; their initializers
    /// must observe the populated `$VALUES`.
    fn explicit_enum_static_names(&self, class: ClassId) -> Vec<String> {
        let node = self.arena.class(class);
        let class_type = node.as_type();
        let mut names: Vec<String> = node
            .properties
            .iter()
            .map(|&p| self.arena.property(p))
            .filter(|p| !p.flags.contains(MemberFlags::SYNTHETIC) && self.arena.field(p.field).is_static())
            .map(|p| p.name.clone())
            .collect();
        names.extend(
            node.fields
                .iter()
                .map(|&f| self.arena.field(f))
                .filter(|f| !f.is_synthetic() && f.is_static() && !f.ty.same_erasure(&class_type))
                .map(|f| f.name.clone()),
        );
        names
    }

    fn add_field_initialization(
        &mut self,
        class: ClassId,
        field: FieldId,
        explicit_static_names: &[String],
        init: &mut InitStatements,
    ) {
        let node = self.arena.field(field);
        let Some(expression) = node.initial_expression.clone() else {
            return;
        };
        let span = node.span;
        let statement = Stmt::Expression {
            expr: Expr::assign(self.arena.field_expr(field).at(span), expression.clone()).at(span),
            span,
        };

        if !node.is_static() {
            init.instance.push(statement);
            return;
        }
        if !self.options.inline_static_field_initializers_into_clinit {
            return;
        }

        let is_final = node.is_final();
        let field_type = node.ty.clone();
        let deferred = self.arena.class(class).is_enum()
            && explicit_static_names.iter().any(|n| *n == node.name);

        let transformed = transform_inline_constants(self.arena, &expression);
        if let Expr::Constant { .. } = transformed {
            let primitive = to_primitive_constant(transformed.clone());
            if let Expr::Constant { ty, .. } = &primitive {
                if is_final && ty.is_static_constant_initializer_type() && *ty == field_type {
                    self.arena.field_mut(field).initial_expression = Some(transformed);
                    return;
                }
            }
            if deferred {
                init.after_enum_values.push(statement);
            } else {
                init.static_.insert(0, statement);
            }
        } else if deferred {
            init.after_enum_values.push(statement);
        } else {
            init.static_.push(statement);
        }
        self.arena.field_mut(field).initial_expression = None;
    }

    fn prepend_static_statements(&mut self, class: ClassId, mut statements: Vec<Stmt>) {
        if statements.is_empty() {
            return;
        }
        let clinit = self.arena.get_or_add_static_initializer(class);
        let node = self.arena.method_mut(clinit);
        match node.code.take() {
            Some(Stmt::Block {
                statements: existing,
                span,
            }) => {
                statements.extend(existing);
                node.code = Some(Stmt::Block { statements, span });
            }
            Some(other) => {
                statements.extend(other.into_statements());
                node.code = Some(Stmt::block(statements));
            }
            None => node.code = Some(Stmt::block(statements)),
        }
    }

    /// Insert enum statics right after the `$VALUES = ...` assignment, or at
    /// the end of `<clinit>` when there is none.
    fn position_after_enum_values(&mut self, class: ClassId, statements: Vec<Stmt>) {
        let clinit = self.arena.get_or_add_static_initializer(class);
        let node = self.arena.method_mut(clinit);
        let mut body = node.code.take().map(Stmt::into_statements).unwrap_or_default();
        let position = body
            .iter()
            .position(is_enum_values_assignment)
            .map_or(body.len(), |i| i + 1);
        body.splice(position..position, statements);
        node.code = Some(Stmt::block(body));
    }

    /// Assignments of synthetic fields from constructor parameters: the
    /// locals an anonymous class captured.
    fn take_captured_locals(&self, statements: &mut Vec<Stmt>) -> Vec<Stmt> {
        let is_capture = |stmt: &Stmt| match stmt.as_expression() {
            Some(Expr::Binary {
                left,
                op: BinaryOp::Assign,
                right,
                ..
            }) => {
                let captured_field = match left.as_ref() {
                    Expr::Field { field, name, .. } => {
                        name != OUTER_INSTANCE_FIELD && self.arena.field(*field).is_synthetic()
                    }
                    _ => false,
                };
                captured_field
                    && matches!(
                        right.as_ref(),
                        Expr::Variable {
                            target: VarTarget::Parameter(_),
                            ..
                        }
                    )
            }
            _ => false,
        };
        take_matching(statements, is_capture)
    }
}

/// Remove the first statement, descending into a leading block.
fn take_first_statement(statements: &mut Vec<Stmt>) -> Option<Stmt> {
    match statements.first_mut()? {
        Stmt::Block {
            statements: inner, ..
        } if !inner.is_empty() => take_first_statement(inner),
        _ => Some(statements.remove(0)),
    }
}

fn is_outer_instance_capture(stmt: &Stmt) -> bool {
    matches!(
        stmt.as_expression(),
        Some(Expr::Binary { left, op: BinaryOp::Assign, .. })
            if matches!(left.as_ref(), Expr::Field { name, .. } if name == OUTER_INSTANCE_FIELD)
    )
}

/// `this$0 = ...`, searched at the top level and one block deep.
fn take_outer_instance_capture(statements: &mut Vec<Stmt>) -> Option<Stmt> {
    for index in 0..statements.len() {
        if is_outer_instance_capture(&statements[index]) {
            return Some(statements.remove(index));
        }
        if let Stmt::Block {
            statements: inner, ..
        } = &mut statements[index]
        {
            if let Some(position) = inner.iter().position(is_outer_instance_capture) {
                return Some(inner.remove(position));
            }
        }
    }
    None
}

/// Remove every statement matching `pred` from the top level and from
/// directly nested blocks, preserving order.
fn take_matching(statements: &mut Vec<Stmt>, pred: impl Fn(&Stmt) -> bool) -> Vec<Stmt> {
    let mut taken = Vec::new();
    let mut kept = Vec::with_capacity(statements.len());
    for stmt in statements.drain(..) {
        match stmt {
            Stmt::Block {
                statements: inner,
                span,
            } => {
                let mut inner_kept = Vec::with_capacity(inner.len());
                for s in inner {
                    if pred(&s) {
                        taken.push(s);
                    } else {
                        inner_kept.push(s);
                    }
                }
                kept.push(Stmt::Block {
                    statements: inner_kept,
                    span,
                });
            }
            s if pred(&s) => taken.push(s),
            s => kept.push(s),
        }
    }
    *statements = kept;
    taken
}

fn is_enum_values_assignment(stmt: &Stmt) -> bool {
    matches!(
        stmt.as_expression(),
        Some(Expr::Binary { left, op: BinaryOp::Assign, .. })
            if matches!(left.as_ref(), Expr::Field { name, .. } if name == ENUM_VALUES_FIELD)
    )
}
