//! Human-readable plan rendering.
//!
//! Plans print as a numbered post-order listing, one operator per line,
//! with subquery operators indented under their consuming join-like. The
//! output is meant for logs and debugging, not for parsing.
//!
//! ```text
//!  0 NodeScan(@0: Person)
//!  1 | Begin
//!  2 | Step(@0 -[@1]-> @2, right)
//!  3 Join
//! results: [@0, @1, @2]
//! ```

use std::fmt;

use crate::expr::{BinaryOp, Expr};

use super::{FilterClause, Operator, Plan, ProjectClause, StepDirection};

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "+"),
            Self::Sub => write!(f, "-"),
            Self::Eq => write!(f, "="),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => write!(f, "{value}"),
            Self::Ident(i) => write!(f, "@{i}"),
            Self::Parameter(name) => write!(f, "${name}"),
            Self::Binary { op, lhs, rhs } => write!(f, "({lhs} {op} {rhs})"),
        }
    }
}

impl fmt::Display for StepDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Undirected => "undirected",
            Self::LeftOrUndirected => "left_or_undirected",
            Self::RightOrUndirected => "right_or_undirected",
            Self::LeftOrRight => "left_or_right",
            Self::Any => "any",
        };
        write!(f, "{name}")
    }
}

/// Writes `@i` or `_` for an optional output slot.
fn write_slot(f: &mut fmt::Formatter<'_>, slot: Option<usize>) -> fmt::Result {
    match slot {
        Some(i) => write!(f, "@{i}"),
        None => write!(f, "_"),
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NodeScan { ident, label } => {
                write!(f, "NodeScan(@{ident}")?;
                if let Some(label) = label {
                    write!(f, ": {label}")?;
                }
                write!(f, ")")
            }
            Self::EdgeScan { ident, label } => {
                write!(f, "EdgeScan(@{ident}")?;
                if let Some(label) = label {
                    write!(f, ": {label}")?;
                }
                write!(f, ")")
            }
            Self::NodeById { ident, id } => write!(f, "NodeById(@{ident} <- @{id})"),
            Self::EdgeById { ident, id } => write!(f, "EdgeById(@{ident} <- @{id})"),
            Self::Step { src, edge, dst, direction, edge_label } => {
                write!(f, "Step(@{src} -[")?;
                write_slot(f, *edge)?;
                if let Some(label) = edge_label {
                    write!(f, ": {label}")?;
                }
                write!(f, "]-> ")?;
                write_slot(f, *dst)?;
                write!(f, ", {direction})")
            }
            Self::Begin => write!(f, "Begin"),
            Self::Argument(ident) => write!(f, "Argument(@{ident})"),
            Self::Join => write!(f, "Join"),
            Self::SemiJoin => write!(f, "SemiJoin"),
            Self::Anti => write!(f, "Anti"),
            Self::UnionAll => write!(f, "UnionAll"),
            Self::Project(clauses) => {
                write!(f, "Project(")?;
                for (i, ProjectClause { target, expr }) in clauses.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "@{target} = {expr}")?;
                }
                write!(f, ")")
            }
            Self::Filter(clauses) => {
                write!(f, "Filter(")?;
                for (i, clause) in clauses.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    match clause {
                        FilterClause::Expr(expr) => write!(f, "{expr}")?,
                        FilterClause::IdentLabel { ident, label } => {
                            write!(f, "@{ident}:{label}")?;
                        }
                    }
                }
                write!(f, ")")
            }
            Self::Limit(n) => write!(f, "Limit({n})"),
            Self::Skip(n) => write!(f, "Skip({n})"),
            Self::EmptyResult => write!(f, "EmptyResult"),
            Self::InsertNode { ident, labels, properties } => {
                write!(f, "InsertNode(")?;
                write_slot(f, *ident)?;
                for label in labels {
                    write!(f, ": {label}")?;
                }
                for (key, expr) in properties {
                    write!(f, ", {key} = {expr}")?;
                }
                write!(f, ")")
            }
            Self::InsertEdge { ident, src, dst, directed, labels, properties } => {
                write!(f, "InsertEdge(")?;
                write_slot(f, *ident)?;
                let arrow = if *directed { "->" } else { "~" };
                write!(f, " = @{src} {arrow} @{dst}")?;
                for label in labels {
                    write!(f, ": {label}")?;
                }
                for (key, expr) in properties {
                    write!(f, ", {key} = {expr}")?;
                }
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Indent each operator by how many unclosed subqueries enclose
        // it: depth rises after a Begin and falls at its join-like.
        let mut depth = vec![0usize; self.len()];
        for (j, op) in self.ops().iter().enumerate() {
            if op.is_join_like() {
                let begin = self.subquery_begin(j);
                for d in &mut depth[begin..j] {
                    *d += 1;
                }
            }
        }

        for (i, op) in self.ops().iter().enumerate() {
            write!(f, "{i:2} ")?;
            for _ in 0..depth[i] {
                write!(f, "| ")?;
            }
            writeln!(f, "{op}")?;
        }
        write!(f, "results: [")?;
        for (i, ident) in self.results().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "@{ident}")?;
        }
        write!(f, "]")
    }
}
