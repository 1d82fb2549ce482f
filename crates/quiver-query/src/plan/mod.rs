//! The query plan model.
//!
//! A plan is a flat post-order sequence of operators: every operator's
//! inputs occur earlier in the sequence, and a [`Operator::Begin`] marker
//! delimits the start of the subquery consumed by a join-like operator
//! ([`Join`](Operator::Join), [`SemiJoin`](Operator::SemiJoin),
//! [`UnionAll`](Operator::UnionAll)). Identifiers are indices into a flat
//! assignment row; the plan's width is one plus the largest identifier it
//! references.
//!
//! Planned but not yet executable operator names (`Repeat`,
//! `ShortestPath`, `Distinct`, `Sort`, `Top`, `GroupAggregate`,
//! `Aggregate`, `Update`, `Delete`, `ProjectEndpoints`, `StepBetween`)
//! are deliberately absent from [`Operator`], so a plan that would need
//! them fails at construction rather than at runtime.

mod display;

use quiver_core::Dir;

use crate::error::QueryError;
use crate::expr::Expr;

/// An identifier: an index into the executor's flat assignment row.
pub type Ident = usize;

/// The direction selector of a [`Operator::Step`].
///
/// `Left` and `Right` are relative to the pattern: a `right` step walks
/// edges leaving the source node, a `left` step walks edges entering it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    /// Incoming directed edges.
    Left,
    /// Outgoing directed edges.
    Right,
    /// Undirected edges only.
    Undirected,
    /// Incoming or undirected edges.
    LeftOrUndirected,
    /// Outgoing or undirected edges.
    RightOrUndirected,
    /// Directed edges in either direction, but no undirected ones.
    LeftOrRight,
    /// Any incident edge.
    Any,
}

impl StepDirection {
    /// Returns the contiguous adjacency scan bounds for this selector.
    ///
    /// `LeftOrRight` is the one selector whose two directions are not
    /// adjacent in the index order; it returns `None` and runs as two
    /// scans (`out` then `in`).
    #[must_use]
    pub const fn scan_bounds(self) -> Option<(Dir, Dir)> {
        match self {
            Self::Left => Some((Dir::In, Dir::In)),
            Self::Right => Some((Dir::Out, Dir::Out)),
            Self::Undirected => Some((Dir::Simple, Dir::Simple)),
            Self::LeftOrUndirected => Some((Dir::Simple, Dir::In)),
            Self::RightOrUndirected => Some((Dir::Out, Dir::Simple)),
            Self::Any => Some((Dir::Out, Dir::In)),
            Self::LeftOrRight => None,
        }
    }
}

/// One clause of a [`Operator::Project`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectClause {
    /// The identifier the result is written to.
    pub target: Ident,
    /// The expression evaluated against the current row.
    pub expr: Expr,
}

impl ProjectClause {
    /// Creates a projection clause.
    #[must_use]
    pub fn new(target: Ident, expr: Expr) -> Self {
        Self { target, expr }
    }
}

/// One clause of a [`Operator::Filter`]. A row passes the filter iff it
/// passes every clause.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterClause {
    /// Keep rows for which the expression is truthy.
    Expr(Expr),
    /// Keep rows whose referenced entity carries the label.
    ///
    /// The identifier must hold a node or edge reference; anything else
    /// is a hard type error.
    IdentLabel {
        /// The identifier holding the reference.
        ident: Ident,
        /// The label to require.
        label: String,
    },
}

/// A plan operator.
///
/// Operators are listed in post-order within a [`Plan`]. Each pulls rows
/// from the operators before it and publishes into the flat assignment
/// row.
#[derive(Debug, Clone, PartialEq)]
pub enum Operator {
    /// Emits every node in the graph, optionally filtered by label.
    NodeScan {
        /// Output identifier receiving a node reference.
        ident: Ident,
        /// Keep only nodes carrying this label.
        label: Option<String>,
    },
    /// Emits every edge in the graph, optionally filtered by label.
    EdgeScan {
        /// Output identifier receiving an edge reference.
        ident: Ident,
        /// Keep only edges carrying this label.
        label: Option<String>,
    },
    /// Looks a node up by the id held in `id`; rows whose id value has
    /// the wrong tag or addresses no node are dropped.
    NodeById {
        /// Output identifier receiving the node reference.
        ident: Ident,
        /// Input identifier holding an id value.
        id: Ident,
    },
    /// Looks an edge up by the id held in `id`; rows whose id value has
    /// the wrong tag or addresses no edge are dropped.
    EdgeById {
        /// Output identifier receiving the edge reference.
        ident: Ident,
        /// Input identifier holding an id value.
        id: Ident,
    },
    /// Walks the adjacency index from a source node.
    Step {
        /// Input identifier holding the source node reference.
        src: Ident,
        /// Output identifier receiving the traversed edge, if wanted.
        edge: Option<Ident>,
        /// Output identifier receiving the opposite endpoint, if wanted.
        dst: Option<Ident>,
        /// Which incident edges to walk.
        direction: StepDirection,
        /// Keep only edges carrying this label.
        edge_label: Option<String>,
    },
    /// Subquery sentinel: emits one row per reset, then exhausts.
    Begin,
    /// Pass-through declaring that the identifier is supplied from
    /// outside the subquery by a join-like operator.
    Argument(Ident),
    /// Cartesian product; the subquery is re-evaluated per left row.
    Join,
    /// Emits left rows for which the subquery yields at least one row.
    SemiJoin,
    /// Emits exactly one row iff the input yields none.
    Anti,
    /// Emits the subquery's rows, then the input's rows.
    UnionAll,
    /// Evaluates expressions clause by clause into target identifiers.
    Project(Vec<ProjectClause>),
    /// Keeps rows satisfying all clauses.
    Filter(Vec<FilterClause>),
    /// Emits the first `n` rows.
    Limit(u64),
    /// Drops the first `n` rows.
    Skip(u64),
    /// Drains the input and emits nothing.
    EmptyResult,
    /// Creates a node per input row.
    InsertNode {
        /// Output identifier receiving the new node reference, if wanted.
        ident: Option<Ident>,
        /// Labels for the new node.
        labels: Vec<String>,
        /// Property expressions, evaluated per row.
        properties: Vec<(String, Expr)>,
    },
    /// Creates an edge per input row between two bound nodes.
    InsertEdge {
        /// Output identifier receiving the new edge reference, if wanted.
        ident: Option<Ident>,
        /// Input identifier holding the source node reference.
        src: Ident,
        /// Input identifier holding the destination node reference.
        dst: Ident,
        /// Whether the new edge is directed.
        directed: bool,
        /// Labels for the new edge.
        labels: Vec<String>,
        /// Property expressions, evaluated per row.
        properties: Vec<(String, Expr)>,
    },
}

impl Operator {
    /// Shorthand for an unlabelled [`Operator::NodeScan`].
    #[must_use]
    pub const fn node_scan(ident: Ident) -> Self {
        Self::NodeScan { ident, label: None }
    }

    /// Shorthand for a labelled [`Operator::NodeScan`].
    #[must_use]
    pub fn node_scan_by_label(ident: Ident, label: impl Into<String>) -> Self {
        Self::NodeScan { ident, label: Some(label.into()) }
    }

    /// Shorthand for an unlabelled [`Operator::EdgeScan`].
    #[must_use]
    pub const fn edge_scan(ident: Ident) -> Self {
        Self::EdgeScan { ident, label: None }
    }

    /// Shorthand for a rightward [`Operator::Step`] with no edge label.
    #[must_use]
    pub const fn step_right(src: Ident, edge: Option<Ident>, dst: Option<Ident>) -> Self {
        Self::Step { src, edge, dst, direction: StepDirection::Right, edge_label: None }
    }

    /// Returns `true` for operators that consume a `Begin`-delimited
    /// subquery.
    #[must_use]
    pub const fn is_join_like(&self) -> bool {
        matches!(self, Self::Join | Self::SemiJoin | Self::UnionAll)
    }

    /// The largest identifier this operator references, if any.
    fn max_ident(&self) -> Option<Ident> {
        fn fold(acc: Option<Ident>, next: Option<Ident>) -> Option<Ident> {
            match (acc, next) {
                (Some(a), Some(b)) => Some(a.max(b)),
                (a, b) => a.or(b),
            }
        }

        match self {
            Self::NodeScan { ident, .. } | Self::EdgeScan { ident, .. } => Some(*ident),
            Self::NodeById { ident, id } | Self::EdgeById { ident, id } => Some(*ident.max(id)),
            Self::Step { src, edge, dst, .. } => {
                fold(fold(Some(*src), *edge), *dst)
            }
            Self::Argument(ident) => Some(*ident),
            Self::Project(clauses) => clauses
                .iter()
                .map(|c| fold(Some(c.target), c.expr.max_ident()))
                .fold(None, fold),
            Self::Filter(clauses) => clauses
                .iter()
                .map(|c| match c {
                    FilterClause::Expr(e) => e.max_ident(),
                    FilterClause::IdentLabel { ident, .. } => Some(*ident),
                })
                .fold(None, fold),
            Self::InsertNode { ident, properties, .. } => properties
                .iter()
                .map(|(_, e)| e.max_ident())
                .fold(*ident, fold),
            Self::InsertEdge { ident, src, dst, properties, .. } => properties
                .iter()
                .map(|(_, e)| e.max_ident())
                .fold(fold(fold(*ident, Some(*src)), Some(*dst)), fold),
            Self::Begin
            | Self::Join
            | Self::SemiJoin
            | Self::Anti
            | Self::UnionAll
            | Self::Limit(_)
            | Self::Skip(_)
            | Self::EmptyResult => None,
        }
    }
}

/// A validated query plan.
///
/// Construction derives the assignment width, locates the `Begin` marker
/// of every join-like operator, and rejects structurally invalid
/// sequences with [`QueryError::MalformedPlan`].
#[derive(Debug, Clone)]
pub struct Plan {
    ops: Vec<Operator>,
    results: Vec<Ident>,
    width: usize,
    /// Cached subquery start per operator; `Some` only for join-likes.
    begins: Vec<Option<usize>>,
}

impl Plan {
    /// Builds and validates a plan from a post-order operator sequence
    /// and the identifiers to return per row.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::MalformedPlan`] when a join-like operator
    /// has no matching `Begin` at its nesting depth.
    pub fn new(ops: Vec<Operator>, results: Vec<Ident>) -> Result<Self, QueryError> {
        let mut begins = vec![None; ops.len()];
        for (j, op) in ops.iter().enumerate() {
            if op.is_join_like() {
                let begin = find_subquery_begin(&ops, j).ok_or_else(|| {
                    QueryError::MalformedPlan(format!(
                        "operator {j} ({op:?}) has no matching Begin"
                    ))
                })?;
                begins[j] = Some(begin);
            }
        }

        let width = ops
            .iter()
            .filter_map(Operator::max_ident)
            .chain(results.iter().copied())
            .max()
            .map_or(0, |max| max + 1);

        Ok(Self { ops, results, width, begins })
    }

    /// The operator sequence.
    #[inline]
    #[must_use]
    pub fn ops(&self) -> &[Operator] {
        &self.ops
    }

    /// Number of operators.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Returns `true` for the empty plan.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Width of the assignment row: one plus the largest identifier
    /// referenced anywhere in the plan.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// The identifiers snapshotted into each result row.
    #[inline]
    #[must_use]
    pub fn results(&self) -> &[Ident] {
        &self.results
    }

    /// The cached `Begin` index of the join-like operator at `j`.
    ///
    /// # Panics
    ///
    /// Panics if `j` is not a join-like operator; plan validation
    /// guarantees the index exists for every join-like.
    #[must_use]
    pub fn subquery_begin(&self, j: usize) -> usize {
        match self.begins[j] {
            Some(begin) => begin,
            None => panic!("operator {j} is not join-like"),
        }
    }
}

/// Locates the `Begin` marker opening the subquery of the join-like
/// operator at `j`, skipping the subqueries of nested join-likes.
fn find_subquery_begin(ops: &[Operator], j: usize) -> Option<usize> {
    let mut depth = 0usize;
    for i in (0..j).rev() {
        match &ops[i] {
            Operator::Begin => {
                if depth == 0 {
                    return Some(i);
                }
                depth -= 1;
            }
            op if op.is_join_like() => depth += 1,
            _ => {}
        }
    }
    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use quiver_core::Value;

    #[test]
    fn width_is_one_plus_max_ident() {
        let plan = Plan::new(
            vec![Operator::node_scan(0), Operator::step_right(0, Some(3), Some(1))],
            vec![0],
        )
        .unwrap();
        assert_eq!(plan.width(), 4);
    }

    #[test]
    fn width_includes_result_idents() {
        let plan = Plan::new(vec![Operator::node_scan(0)], vec![0, 5]).unwrap();
        assert_eq!(plan.width(), 6);
    }

    #[test]
    fn width_of_empty_plan_is_zero() {
        let plan = Plan::new(vec![], vec![]).unwrap();
        assert_eq!(plan.width(), 0);
        assert!(plan.is_empty());
    }

    #[test]
    fn width_covers_expression_idents() {
        let plan = Plan::new(
            vec![
                Operator::node_scan(0),
                Operator::Project(vec![ProjectClause::new(
                    1,
                    Expr::add(Expr::ident(7), Expr::literal(Value::Int(1))),
                )]),
            ],
            vec![1],
        )
        .unwrap();
        assert_eq!(plan.width(), 8);
    }

    #[test]
    fn join_finds_its_begin() {
        let plan = Plan::new(
            vec![
                Operator::node_scan(0),
                Operator::Begin,
                Operator::node_scan(1),
                Operator::Join,
            ],
            vec![0, 1],
        )
        .unwrap();
        assert_eq!(plan.subquery_begin(3), 1);
    }

    #[test]
    fn nested_joins_find_their_begins() {
        let plan = Plan::new(
            vec![
                Operator::node_scan(0),     // 0
                Operator::Begin,            // 1 (outer)
                Operator::node_scan(1),     // 2
                Operator::Begin,            // 3 (inner)
                Operator::node_scan(2),     // 4
                Operator::Join,             // 5 (inner)
                Operator::Join,             // 6 (outer)
            ],
            vec![0, 1, 2],
        )
        .unwrap();
        assert_eq!(plan.subquery_begin(5), 3);
        assert_eq!(plan.subquery_begin(6), 1);
    }

    #[test]
    fn join_without_begin_is_malformed() {
        let err = Plan::new(vec![Operator::node_scan(0), Operator::Join], vec![0]).unwrap_err();
        assert!(matches!(err, QueryError::MalformedPlan(_)));
    }

    #[test]
    fn inner_begin_is_not_stolen() {
        // The only Begin belongs to the inner join; the outer one must
        // fail validation.
        let err = Plan::new(
            vec![
                Operator::Begin,
                Operator::node_scan(0),
                Operator::Join,
                Operator::Join,
            ],
            vec![0],
        )
        .unwrap_err();
        assert!(matches!(err, QueryError::MalformedPlan(_)));
    }

    #[test]
    fn step_direction_bounds() {
        use quiver_core::Dir;
        assert_eq!(StepDirection::Left.scan_bounds(), Some((Dir::In, Dir::In)));
        assert_eq!(StepDirection::Right.scan_bounds(), Some((Dir::Out, Dir::Out)));
        assert_eq!(StepDirection::Undirected.scan_bounds(), Some((Dir::Simple, Dir::Simple)));
        assert_eq!(StepDirection::LeftOrUndirected.scan_bounds(), Some((Dir::Simple, Dir::In)));
        assert_eq!(StepDirection::RightOrUndirected.scan_bounds(), Some((Dir::Out, Dir::Simple)));
        assert_eq!(StepDirection::Any.scan_bounds(), Some((Dir::Out, Dir::In)));
        assert_eq!(StepDirection::LeftOrRight.scan_bounds(), None);
    }
}
