//! Expressions and their evaluator.
//!
//! Expressions are evaluated inside operators against the executor's
//! current assignment row plus a caller-supplied parameter table. The
//! arithmetic semantics (string concatenation, numeric widening, null
//! propagation) live on [`Value`]; this module only wires them to the
//! row.

use std::collections::HashMap;

use quiver_core::Value;

use crate::error::QueryError;
use crate::plan::Ident;

/// Query parameters, addressed by name.
pub type Params = HashMap<String, Value>;

/// A binary operator in an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// Addition or string concatenation.
    Add,
    /// Subtraction.
    Sub,
    /// Equality with numeric promotion.
    Eq,
}

/// An expression evaluated against the current assignment row.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value.
    Literal(Value),
    /// The current value of an identifier.
    Ident(Ident),
    /// A named query parameter.
    Parameter(String),
    /// A binary operation over two subexpressions.
    Binary {
        /// The operator.
        op: BinaryOp,
        /// Left operand.
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
    },
}

impl Expr {
    /// Shorthand for a literal expression.
    #[must_use]
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    /// Shorthand for an identifier expression.
    #[must_use]
    pub const fn ident(ident: Ident) -> Self {
        Self::Ident(ident)
    }

    /// Shorthand for a parameter expression.
    #[must_use]
    pub fn param(name: impl Into<String>) -> Self {
        Self::Parameter(name.into())
    }

    /// Shorthand for an addition.
    #[must_use]
    pub fn add(lhs: Self, rhs: Self) -> Self {
        Self::Binary { op: BinaryOp::Add, lhs: Box::new(lhs), rhs: Box::new(rhs) }
    }

    /// Shorthand for a subtraction.
    #[must_use]
    pub fn sub(lhs: Self, rhs: Self) -> Self {
        Self::Binary { op: BinaryOp::Sub, lhs: Box::new(lhs), rhs: Box::new(rhs) }
    }

    /// Shorthand for an equality comparison.
    #[must_use]
    pub fn eq(lhs: Self, rhs: Self) -> Self {
        Self::Binary { op: BinaryOp::Eq, lhs: Box::new(lhs), rhs: Box::new(rhs) }
    }

    /// The largest identifier referenced by this expression, if any.
    #[must_use]
    pub fn max_ident(&self) -> Option<Ident> {
        match self {
            Self::Literal(_) | Self::Parameter(_) => None,
            Self::Ident(i) => Some(*i),
            Self::Binary { lhs, rhs, .. } => match (lhs.max_ident(), rhs.max_ident()) {
                (Some(a), Some(b)) => Some(a.max(b)),
                (a, b) => a.or(b),
            },
        }
    }

    /// Evaluates this expression against a row and parameter table.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::UnknownParameter`] for an unbound parameter
    /// and propagates arithmetic errors.
    pub fn eval(&self, row: &[Value], params: &Params) -> Result<Value, QueryError> {
        match self {
            Self::Literal(value) => Ok(value.clone()),
            Self::Ident(i) => Ok(row[*i].clone()),
            Self::Parameter(name) => params
                .get(name)
                .cloned()
                .ok_or_else(|| QueryError::UnknownParameter(name.clone())),
            Self::Binary { op, lhs, rhs } => {
                let lhs = lhs.eval(row, params)?;
                let rhs = rhs.eval(row, params)?;
                Ok(match op {
                    BinaryOp::Add => lhs.add(&rhs)?,
                    BinaryOp::Sub => lhs.sub(&rhs)?,
                    BinaryOp::Eq => Value::Bool(lhs.eql(&rhs)),
                })
            }
        }
    }
}
