//! Definite assignment for `final` locals and parameters.
//!
//! A final may be assigned once on every path and read only once it is
//! definitely assigned. Branches are analyzed separately and merged; loop
//! bodies are analyzed twice so an assignment that would run on a second
//! iteration is caught; closures see a copy of the enclosing state and may
//! not assign finals they capture.

use gvy_ast::{AstArena, BinaryOp, ClassId, Expr, LocalId, MethodId, ParamId, Stmt, VarTarget};
use gvy_common::diagnostics::diagnostic_codes;
use gvy_common::limits::MAX_AST_WALK_DEPTH;
use gvy_common::Span;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{ErrorNode, VerifyError, VerifyResult};
use crate::verifier::Verifier;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Assignment {
    Unassigned,
    MaybeAssigned,
    Assigned,
}

impl Assignment {
    fn merge(self, other: Assignment) -> Assignment {
        if self == other {
            self
        } else {
            Assignment::MaybeAssigned
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum FinalVariable {
    Local(LocalId),
    Parameter(ParamId),
}

#[derive(Clone, Debug)]
struct FlowState {
    finals: FxHashMap<FinalVariable, Assignment>,
    alive: bool,
}

impl FlowState {
    fn new() -> Self {
        FlowState {
            finals: FxHashMap::default(),
            alive: true,
        }
    }

    /// Join of two paths. A dead path contributes nothing; variables known
    /// on only one path went out of scope.
    fn merge(a: FlowState, b: FlowState) -> FlowState {
        if !a.alive {
            return b;
        }
        if !b.alive {
            return a;
        }
        let finals = a
            .finals
            .iter()
            .filter_map(|(var, left)| b.finals.get(var).map(|right| (*var, left.merge(*right))))
            .collect();
        FlowState { finals, alive: true }
    }
}

impl Verifier<'_> {
    pub(crate) fn check_final_variables(&self, class: ClassId) -> VerifyResult<()> {
        let node = self.arena.class(class);
        let members: Vec<MethodId> = node.constructors.iter().chain(&node.methods).copied().collect();
        for member in members {
            let method = self.arena.method(member);
            let Some(code) = method.code.as_ref().filter(|code| !code.is_bytecode()) else {
                continue;
            };
            let mut analyzer = FinalVariableAnalyzer {
                arena: self.arena,
                closure_captures: Vec::new(),
            };
            let mut state = FlowState::new();
            analyzer.declare_parameters(&method.parameters, &mut state);
            analyzer.stmt(code, &mut state, 0).map_err(|err| {
                let (node, span) = self.source_of(member);
                err.or_at(node, span)
            })?;
        }
        Ok(())
    }
}

struct FinalVariableAnalyzer<'a> {
    arena: &'a AstArena,
    /// Finals visible where each enclosing closure was created.
    closure_captures: Vec<FxHashSet<FinalVariable>>,
}

impl FinalVariableAnalyzer<'_> {
    fn declare_parameters(&self, parameters: &[ParamId], state: &mut FlowState) {
        for &parameter in parameters {
            if self.arena.param(parameter).modifiers.is_final() {
                state
                    .finals
                    .insert(FinalVariable::Parameter(parameter), Assignment::Assigned);
            }
        }
    }

    fn stmt(&mut self, stmt: &Stmt, state: &mut FlowState, depth: usize) -> VerifyResult<()> {
        if depth > MAX_AST_WALK_DEPTH {
            return Ok(());
        }
        match stmt {
            Stmt::Block { statements, .. } => {
                for statement in statements {
                    if !state.alive {
                        break;
                    }
                    self.stmt(statement, state, depth + 1)?;
                }
            }
            Stmt::Expression { expr, .. } => self.expr(expr, state, depth + 1)?,
            Stmt::Return { expr, .. } => {
                if let Some(expr) = expr {
                    self.expr(expr, state, depth + 1)?;
                }
                state.alive = false;
            }
            Stmt::Throw { expr, .. } => {
                self.expr(expr, state, depth + 1)?;
                state.alive = false;
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                self.expr(condition, state, depth + 1)?;
                let mut then_state = state.clone();
                self.stmt(then_branch, &mut then_state, depth + 1)?;
                let mut else_state = state.clone();
                if let Some(else_branch) = else_branch {
                    self.stmt(else_branch, &mut else_state, depth + 1)?;
                }
                *state = FlowState::merge(then_state, else_state);
            }
            Stmt::While { condition, body, .. } => {
                self.expr(condition, state, depth + 1)?;
                self.loop_body(body, None, state, depth)?;
            }
            Stmt::ForIn {
                variable,
                collection,
                body,
                ..
            } => {
                self.expr(collection, state, depth + 1)?;
                let loop_variable = self
                    .arena
                    .local(*variable)
                    .modifiers
                    .is_final()
                    .then_some(FinalVariable::Local(*variable));
                self.loop_body(body, loop_variable, state, depth)?;
            }
            Stmt::Empty | Stmt::Bytecode(_) => {}
        }
        Ok(())
    }

    /// The body may run zero, one or more times.
    fn loop_body(
        &mut self,
        body: &Stmt,
        loop_variable: Option<FinalVariable>,
        state: &mut FlowState,
        depth: usize,
    ) -> VerifyResult<()> {
        let entry = state.clone();

        let mut first = entry.clone();
        if let Some(var) = loop_variable {
            first.finals.insert(var, Assignment::Assigned);
        }
        self.stmt(body, &mut first, depth + 1)?;

        let mut second = FlowState::merge(entry.clone(), first);
        if let Some(var) = loop_variable {
            second.finals.insert(var, Assignment::Assigned);
        }
        self.stmt(body, &mut second, depth + 1)?;

        *state = FlowState::merge(entry, second);
        state.alive = true;
        Ok(())
    }

    fn expr(&mut self, expr: &Expr, state: &mut FlowState, depth: usize) -> VerifyResult<()> {
        if depth > MAX_AST_WALK_DEPTH {
            return Ok(());
        }
        match expr {
            Expr::Declaration {
                local, initializer, ..
            } => {
                if let Some(initializer) = initializer {
                    self.expr(initializer, state, depth + 1)?;
                }
                if self.arena.local(*local).modifiers.is_final() {
                    let assignment = if initializer.is_some() {
                        Assignment::Assigned
                    } else {
                        Assignment::Unassigned
                    };
                    state.finals.insert(FinalVariable::Local(*local), assignment);
                }
            }
            Expr::Binary {
                left,
                op,
                right,
                span,
            } if op.is_assignment() => {
                let target = final_target(left);
                if op.is_compound_assignment() || target.is_none() {
                    self.expr(left, state, depth + 1)?;
                }
                self.expr(right, state, depth + 1)?;
                if let Some((var, name)) = target {
                    self.assign(var, name, op.is_compound_assignment(), *span, state)?;
                }
            }
            Expr::Binary {
                left,
                op: BinaryOp::LogicalAnd | BinaryOp::LogicalOr,
                right,
                ..
            } => {
                self.expr(left, state, depth + 1)?;
                let mut right_state = state.clone();
                self.expr(right, &mut right_state, depth + 1)?;
                *state = FlowState::merge(state.clone(), right_state);
            }
            Expr::Ternary {
                condition,
                when_true,
                when_false,
                ..
            } => {
                self.expr(condition, state, depth + 1)?;
                let mut true_state = state.clone();
                self.expr(when_true, &mut true_state, depth + 1)?;
                let mut false_state = state.clone();
                self.expr(when_false, &mut false_state, depth + 1)?;
                *state = FlowState::merge(true_state, false_state);
            }
            // `x++` writes `x` even when it was never assigned.
            Expr::Update { operand, span, .. } => match final_target(operand) {
                Some((var, name)) => self.assign(var, name, true, *span, state)?,
                None => self.expr(operand, state, depth + 1)?,
            },
            Expr::Variable {
                name,
                target: VarTarget::Local(local),
                span,
            } => {
                let assignment = state.finals.get(&FinalVariable::Local(*local));
                if matches!(assignment, Some(Assignment::Unassigned | Assignment::MaybeAssigned)) {
                    return Err(VerifyError::parser(
                        diagnostic_codes::FINAL_VARIABLE_MAY_BE_UNINITIALIZED,
                        &[name],
                        ErrorNode::Code,
                        *span,
                    ));
                }
            }
            Expr::Closure { parameters, code, .. } => {
                let mut inner = state.clone();
                inner.alive = true;
                self.closure_captures.push(state.finals.keys().copied().collect());
                self.declare_parameters(parameters, &mut inner);
                let result = self.stmt(code, &mut inner, depth + 1);
                self.closure_captures.pop();
                result?;
            }
            _ => {
                for child in expr.children() {
                    if let gvy_ast::NodeRef::Expr(child) = child {
                        self.expr(child, state, depth + 1)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn assign(
        &mut self,
        var: FinalVariable,
        name: &str,
        compound: bool,
        span: Span,
        state: &mut FlowState,
    ) -> VerifyResult<()> {
        let Some(current) = state.finals.get(&var).copied() else {
            return Ok(());
        };
        let captured = self
            .closure_captures
            .last()
            .is_some_and(|captures| captures.contains(&var));
        if compound || captured || current != Assignment::Unassigned {
            let kind = match var {
                FinalVariable::Local(_) => "variable",
                FinalVariable::Parameter(_) => "parameter",
            };
            return Err(VerifyError::parser(
                diagnostic_codes::FINAL_VARIABLE_REASSIGNED,
                &[kind, name],
                ErrorNode::Code,
                span,
            ));
        }
        state.finals.insert(var, Assignment::Assigned);
        Ok(())
    }
}

/// The local or parameter an assignment writes, if it is a plain name.
fn final_target(target: &Expr) -> Option<(FinalVariable, &str)> {
    match target {
        Expr::Variable {
            name,
            target: VarTarget::Local(local),
            ..
        } => Some((FinalVariable::Local(*local), name)),
        Expr::Variable {
            name,
            target: VarTarget::Parameter(parameter),
            ..
        } => Some((FinalVariable::Parameter(*parameter), name)),
        _ => None,
    }
}
