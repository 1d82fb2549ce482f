//! Per-operator execution state.
//!
//! Every operator owns one state slot of a shape fixed by its tag; the
//! executor's dispatch matches on the operator and mutates the matching
//! variant. Iterator-holding states borrow the transaction, which is why
//! the executor borrows rather than owns it.

use quiver_graph::{AdjIter, EdgeIter, NodeIter};

use crate::plan::Operator;

/// Which input a join is currently pulling from.
#[derive(Debug, Clone, Copy)]
pub(crate) enum JoinSide {
    /// Pulling the next left row from below the subquery's `Begin`.
    Left,
    /// Draining the subquery for the current left row.
    Right,
}

/// State of a `Step` operator.
pub(crate) struct StepState<'txn, 'db> {
    /// The active adjacency scan, absent between source rows.
    pub iter: Option<AdjIter<'txn, 'db>>,
    /// A `left_or_right` step still owes the `in` scan for the current
    /// source row.
    pub in_pass_pending: bool,
}

/// The state slot of one operator.
pub(crate) enum OpState<'txn, 'db> {
    /// The operator keeps no state.
    None,
    /// A node scan, opened on first pull.
    NodeScan(Option<NodeIter<'txn, 'db>>),
    /// An edge scan, opened on first pull.
    EdgeScan(Option<EdgeIter<'txn, 'db>>),
    /// A step's adjacency scan state machine.
    Step(StepState<'txn, 'db>),
    /// Rows emitted so far by a `Limit`.
    Limit {
        /// Rows already emitted.
        returned: u64,
    },
    /// One-bit state for `Begin`, `Skip`, `Anti`, and `UnionAll`.
    Flag(bool),
    /// A join's input side.
    Join(JoinSide),
}

impl OpState<'_, '_> {
    /// The initial state for an operator, also used when a join-like
    /// resets its subquery range.
    pub(crate) fn initial(op: &Operator) -> Self {
        match op {
            Operator::NodeScan { .. } => Self::NodeScan(None),
            Operator::EdgeScan { .. } => Self::EdgeScan(None),
            Operator::Step { .. } => Self::Step(StepState { iter: None, in_pass_pending: false }),
            Operator::Limit(_) => Self::Limit { returned: 0 },
            Operator::Begin | Operator::Skip(_) | Operator::Anti | Operator::UnionAll => {
                Self::Flag(false)
            }
            Operator::Join => Self::Join(JoinSide::Left),
            Operator::NodeById { .. }
            | Operator::EdgeById { .. }
            | Operator::Argument(_)
            | Operator::SemiJoin
            | Operator::Project(_)
            | Operator::Filter(_)
            | Operator::EmptyResult
            | Operator::InsertNode { .. }
            | Operator::InsertEdge { .. } => Self::None,
        }
    }
}
