//! Plan execution.
//!
//! The executor advances a flat post-order plan one row at a time. Its
//! single primitive is [`next(end_index)`](Executor::next): advance the
//! operator prefix `[0, end_index)` by one row. `end_index == 0` is the
//! implicit root row, emitted exactly once. Every other call dispatches
//! on the operator at `end_index - 1`, which pulls from its own prefix
//! and publishes into the flat assignment row.
//!
//! Join-like operators pull their subquery through the same primitive:
//! the `Begin` marker at the bottom of the subquery yields one sentinel
//! row per reset and never pulls further down, so a subquery pull stops
//! at its `Begin` instead of re-running the left side.

use quiver_core::{Dir, Edge, ElementId, Label, Node, Value};
use quiver_graph::{GraphError, GraphTransaction};

use crate::error::{QueryError, QueryResult};
use crate::expr::{Expr, Params};
use crate::plan::{FilterClause, Ident, Operator, Plan, ProjectClause, StepDirection};

use super::state::{JoinSide, OpState, StepState};

/// Tuning knobs for one executor.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecOptions {
    /// Abort with [`QueryError::BudgetExhausted`] after this many pulls.
    ///
    /// Each operator advancement counts as one pull, so the budget bounds
    /// total work, not just result rows. `None` runs unbounded.
    pub pull_budget: Option<u64>,
}

impl ExecOptions {
    /// Creates options with no budget.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the pull budget.
    #[must_use]
    pub const fn pull_budget(mut self, budget: u64) -> Self {
        self.pull_budget = Some(budget);
        self
    }
}

/// A streaming plan executor.
///
/// The executor borrows the plan and a transaction, owns the assignment
/// row and one state slot per operator, and yields result rows through
/// [`run`](Self::run). The caller commits or rolls the transaction back
/// after the executor is done; cancellation is cooperative, the caller
/// simply stops pulling.
///
/// Peak memory beyond storage state is the assignment row plus operator
/// state; no operator buffers rows.
pub struct Executor<'p, 'txn, 'db> {
    plan: &'p Plan,
    txn: &'txn GraphTransaction<'db>,
    /// The flat assignment row, one slot per identifier.
    row: Vec<Value>,
    /// One state slot per operator, parallel to the plan.
    states: Vec<OpState<'txn, 'db>>,
    /// The implicit root row, consumed by the first `next(0)`.
    initial: bool,
    params: Params,
    pulls: u64,
    budget: Option<u64>,
}

impl<'p, 'txn, 'db> Executor<'p, 'txn, 'db> {
    /// Creates an executor with no parameters and no budget.
    #[must_use]
    pub fn new(plan: &'p Plan, txn: &'txn GraphTransaction<'db>) -> Self {
        Self::with_options(plan, txn, Params::new(), ExecOptions::default())
    }

    /// Creates an executor with parameters and options.
    #[must_use]
    pub fn with_options(
        plan: &'p Plan,
        txn: &'txn GraphTransaction<'db>,
        params: Params,
        options: ExecOptions,
    ) -> Self {
        let states = plan.ops().iter().map(OpState::initial).collect();
        Self {
            plan,
            txn,
            row: vec![Value::Null; plan.width()],
            states,
            initial: true,
            params,
            pulls: 0,
            budget: options.pull_budget,
        }
    }

    /// Produces the next result row, or `None` on exhaustion.
    ///
    /// The returned row snapshots the plan's result identifiers; it is
    /// owned by the caller.
    ///
    /// # Errors
    ///
    /// Propagates operator errors; partial operator state is left intact.
    pub fn run(&mut self) -> QueryResult<Option<Vec<Value>>> {
        if !self.next(self.plan.len())? {
            return Ok(None);
        }
        Ok(Some(self.plan.results().iter().map(|&i| self.row[i].clone()).collect()))
    }

    /// Runs the plan to exhaustion and collects all result rows.
    ///
    /// # Errors
    ///
    /// Propagates operator errors.
    pub fn rows(&mut self) -> QueryResult<Vec<Vec<Value>>> {
        let mut rows = Vec::new();
        while let Some(row) = self.run()? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Number of pulls charged so far.
    #[must_use]
    pub const fn pulls(&self) -> u64 {
        self.pulls
    }

    /// Advances the operator prefix `[0, end)` by one row.
    ///
    /// # Errors
    ///
    /// Propagates operator errors and budget exhaustion.
    pub fn next(&mut self, end: usize) -> QueryResult<bool> {
        self.charge_pull()?;
        if end == 0 {
            let first = self.initial;
            self.initial = false;
            return Ok(first);
        }

        let plan = self.plan;
        let idx = end - 1;
        match &plan.ops()[idx] {
            Operator::NodeScan { ident, label } => {
                self.run_node_scan(idx, *ident, label.as_deref())
            }
            Operator::EdgeScan { ident, label } => {
                self.run_edge_scan(idx, *ident, label.as_deref())
            }
            Operator::NodeById { ident, id } => self.run_node_by_id(idx, *ident, *id),
            Operator::EdgeById { ident, id } => self.run_edge_by_id(idx, *ident, *id),
            Operator::Step { src, edge, dst, direction, edge_label } => {
                self.run_step(idx, *src, *edge, *dst, *direction, edge_label.as_deref())
            }
            Operator::Begin => self.run_begin(idx),
            Operator::Argument(_) => self.next(idx),
            Operator::Join => self.run_join(idx),
            Operator::SemiJoin => self.run_semi_join(idx),
            Operator::Anti => self.run_anti(idx),
            Operator::UnionAll => self.run_union_all(idx),
            Operator::Project(clauses) => self.run_project(idx, clauses),
            Operator::Filter(clauses) => self.run_filter(idx, clauses),
            Operator::Limit(n) => self.run_limit(idx, *n),
            Operator::Skip(n) => self.run_skip(idx, *n),
            Operator::EmptyResult => {
                while self.next(idx)? {}
                Ok(false)
            }
            Operator::InsertNode { ident, labels, properties } => {
                self.run_insert_node(idx, *ident, labels, properties)
            }
            Operator::InsertEdge { ident, src, dst, directed, labels, properties } => {
                self.run_insert_edge(idx, *ident, *src, *dst, *directed, labels, properties)
            }
        }
    }

    fn charge_pull(&mut self) -> QueryResult<()> {
        if let Some(budget) = self.budget {
            if self.pulls >= budget {
                return Err(QueryError::BudgetExhausted);
            }
        }
        self.pulls += 1;
        Ok(())
    }

    /// Reinitializes the state slots in `[start, end)`, used before each
    /// right-side pass of a join-like operator.
    fn reset_state_range(&mut self, start: usize, end: usize) {
        let plan = self.plan;
        for i in start..end {
            self.states[i] = OpState::initial(&plan.ops()[i]);
        }
    }

    // ========================================================================
    // Scans and lookups
    // ========================================================================

    fn run_node_scan(&mut self, idx: usize, ident: Ident, label: Option<&str>) -> QueryResult<bool> {
        if matches!(&self.states[idx], OpState::NodeScan(None)) {
            // One row from the prefix opens the scan.
            if !self.next(idx)? {
                return Ok(false);
            }
            let iter = self.txn.nodes()?;
            self.states[idx] = OpState::NodeScan(Some(iter));
        }
        let OpState::NodeScan(Some(iter)) = &mut self.states[idx] else {
            unreachable!("node scan state")
        };
        while let Some(node) = iter.next_node()? {
            if label.map_or(true, |l| node.has_label(l)) {
                self.row[ident] = Value::NodeRef(node.id);
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn run_edge_scan(&mut self, idx: usize, ident: Ident, label: Option<&str>) -> QueryResult<bool> {
        if matches!(&self.states[idx], OpState::EdgeScan(None)) {
            if !self.next(idx)? {
                return Ok(false);
            }
            let iter = self.txn.edges()?;
            self.states[idx] = OpState::EdgeScan(Some(iter));
        }
        let OpState::EdgeScan(Some(iter)) = &mut self.states[idx] else {
            unreachable!("edge scan state")
        };
        while let Some(edge) = iter.next_edge()? {
            if label.map_or(true, |l| edge.has_label(l)) {
                self.row[ident] = Value::EdgeRef(edge.id);
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn run_node_by_id(&mut self, idx: usize, ident: Ident, id: Ident) -> QueryResult<bool> {
        loop {
            if !self.next(idx)? {
                return Ok(false);
            }
            // Rows whose id slot has the wrong tag are dropped.
            let Some(element) = self.row[id].as_id() else { continue };
            if !self.txn.node_exists(element)? {
                continue;
            }
            self.row[ident] = Value::NodeRef(element);
            return Ok(true);
        }
    }

    fn run_edge_by_id(&mut self, idx: usize, ident: Ident, id: Ident) -> QueryResult<bool> {
        loop {
            if !self.next(idx)? {
                return Ok(false);
            }
            let Some(element) = self.row[id].as_id() else { continue };
            if !self.txn.edge_exists(element)? {
                continue;
            }
            self.row[ident] = Value::EdgeRef(element);
            return Ok(true);
        }
    }

    // ========================================================================
    // Traversal
    // ========================================================================

    #[allow(clippy::too_many_arguments)]
    fn run_step(
        &mut self,
        idx: usize,
        src: Ident,
        edge_out: Option<Ident>,
        dst_out: Option<Ident>,
        direction: StepDirection,
        edge_label: Option<&str>,
    ) -> QueryResult<bool> {
        loop {
            let has_iter = matches!(&self.states[idx], OpState::Step(s) if s.iter.is_some());
            if !has_iter {
                // Pull the next source row and open its adjacency scan.
                if !self.next(idx)? {
                    return Ok(false);
                }
                let Some(node) = self.row[src].as_node_ref() else {
                    // A non-node source ends this pull with no match.
                    return Ok(false);
                };
                let (iter, in_pass_pending) = match direction.scan_bounds() {
                    Some((min, max)) => (self.txn.iterate_adj(node, min, max)?, false),
                    // left_or_right runs as two scans: out now, in later.
                    None => (self.txn.iterate_adj(node, Dir::Out, Dir::Out)?, true),
                };
                self.states[idx] = OpState::Step(StepState { iter: Some(iter), in_pass_pending });
            }

            // Advance the active scan until an entry is accepted.
            loop {
                let OpState::Step(state) = &mut self.states[idx] else {
                    unreachable!("step state")
                };
                let Some(iter) = state.iter.as_mut() else { unreachable!("active step scan") };
                let Some(entry) = iter.next_entry()? else { break };

                if let Some(label) = edge_label {
                    let Some(edge) = self.txn.get_edge(entry.edge)? else {
                        return Err(GraphError::CorruptedIndex(format!(
                            "adjacency entry refers to missing edge {}",
                            entry.edge
                        ))
                        .into());
                    };
                    if !edge.has_label(label) {
                        continue;
                    }
                }

                if let Some(i) = edge_out {
                    self.row[i] = Value::EdgeRef(entry.edge);
                }
                if let Some(i) = dst_out {
                    self.row[i] = Value::NodeRef(entry.dst);
                }
                return Ok(true);
            }

            // Scan exhausted: second pass for left_or_right, otherwise a
            // fresh source row.
            let OpState::Step(state) = &mut self.states[idx] else { unreachable!("step state") };
            if state.in_pass_pending {
                state.in_pass_pending = false;
                let Some(node) = self.row[src].as_node_ref() else { return Ok(false) };
                state.iter = Some(self.txn.iterate_adj(node, Dir::In, Dir::In)?);
            } else {
                state.iter = None;
            }
        }
    }

    // ========================================================================
    // Subquery composition
    // ========================================================================

    fn run_begin(&mut self, idx: usize) -> QueryResult<bool> {
        if matches!(self.states[idx], OpState::Flag(true)) {
            return Ok(false);
        }
        self.states[idx] = OpState::Flag(true);
        Ok(true)
    }

    fn run_join(&mut self, idx: usize) -> QueryResult<bool> {
        let begin = self.plan.subquery_begin(idx);
        loop {
            let side = match &self.states[idx] {
                OpState::Join(side) => *side,
                _ => unreachable!("join state"),
            };
            match side {
                JoinSide::Left => {
                    if !self.next(begin)? {
                        return Ok(false);
                    }
                    self.reset_state_range(begin, idx);
                    self.states[idx] = OpState::Join(JoinSide::Right);
                }
                JoinSide::Right => {
                    if self.next(idx)? {
                        return Ok(true);
                    }
                    self.states[idx] = OpState::Join(JoinSide::Left);
                }
            }
        }
    }

    fn run_semi_join(&mut self, idx: usize) -> QueryResult<bool> {
        let begin = self.plan.subquery_begin(idx);
        loop {
            if !self.next(begin)? {
                return Ok(false);
            }
            self.reset_state_range(begin, idx);
            if self.next(idx)? {
                return Ok(true);
            }
        }
    }

    fn run_anti(&mut self, idx: usize) -> QueryResult<bool> {
        if matches!(self.states[idx], OpState::Flag(true)) {
            return Ok(false);
        }
        self.states[idx] = OpState::Flag(true);
        let produced = self.next(idx)?;
        Ok(!produced)
    }

    fn run_union_all(&mut self, idx: usize) -> QueryResult<bool> {
        let begin = self.plan.subquery_begin(idx);
        if matches!(self.states[idx], OpState::Flag(false)) {
            // Drain the subquery first.
            if self.next(idx)? {
                return Ok(true);
            }
            self.states[idx] = OpState::Flag(true);
        }
        self.next(begin)
    }

    // ========================================================================
    // Row shaping
    // ========================================================================

    fn run_project(&mut self, idx: usize, clauses: &[ProjectClause]) -> QueryResult<bool> {
        if !self.next(idx)? {
            return Ok(false);
        }
        // Clause order matters: later clauses observe earlier outputs.
        for clause in clauses {
            let value = clause.expr.eval(&self.row, &self.params)?;
            self.row[clause.target] = value;
        }
        Ok(true)
    }

    fn run_filter(&mut self, idx: usize, clauses: &[FilterClause]) -> QueryResult<bool> {
        'rows: loop {
            if !self.next(idx)? {
                return Ok(false);
            }
            for clause in clauses {
                match clause {
                    FilterClause::Expr(expr) => {
                        if !expr.eval(&self.row, &self.params)?.is_truthy() {
                            continue 'rows;
                        }
                    }
                    FilterClause::IdentLabel { ident, label } => {
                        let passes = match &self.row[*ident] {
                            Value::NodeRef(id) => {
                                self.txn.get_node(*id)?.is_some_and(|n| n.has_label(label))
                            }
                            Value::EdgeRef(id) => {
                                self.txn.get_edge(*id)?.is_some_and(|e| e.has_label(label))
                            }
                            other => {
                                return Err(QueryError::WrongType {
                                    expected: "node or edge reference",
                                    got: other.kind(),
                                })
                            }
                        };
                        if !passes {
                            continue 'rows;
                        }
                    }
                }
            }
            return Ok(true);
        }
    }

    fn run_limit(&mut self, idx: usize, n: u64) -> QueryResult<bool> {
        let returned = match self.states[idx] {
            OpState::Limit { returned } => returned,
            _ => unreachable!("limit state"),
        };
        if returned >= n {
            return Ok(false);
        }
        if !self.next(idx)? {
            return Ok(false);
        }
        self.states[idx] = OpState::Limit { returned: returned + 1 };
        Ok(true)
    }

    fn run_skip(&mut self, idx: usize, n: u64) -> QueryResult<bool> {
        if matches!(self.states[idx], OpState::Flag(false)) {
            self.states[idx] = OpState::Flag(true);
            for _ in 0..n {
                if !self.next(idx)? {
                    return Ok(false);
                }
            }
        }
        self.next(idx)
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    fn run_insert_node(
        &mut self,
        idx: usize,
        ident: Option<Ident>,
        labels: &[String],
        properties: &[(String, Expr)],
    ) -> QueryResult<bool> {
        if !self.next(idx)? {
            return Ok(false);
        }
        let mut node = Node::new(ElementId::random());
        for label in labels {
            node.labels.push(Label::new(label.clone()));
        }
        for (key, expr) in properties {
            let value = expr.eval(&self.row, &self.params)?;
            node.properties.insert(key.clone(), value);
        }
        self.txn.put_node(&node)?;
        if let Some(i) = ident {
            self.row[i] = Value::NodeRef(node.id);
        }
        Ok(true)
    }

    #[allow(clippy::too_many_arguments)]
    fn run_insert_edge(
        &mut self,
        idx: usize,
        ident: Option<Ident>,
        src: Ident,
        dst: Ident,
        directed: bool,
        labels: &[String],
        properties: &[(String, Expr)],
    ) -> QueryResult<bool> {
        if !self.next(idx)? {
            return Ok(false);
        }
        // Mutation is user-visible, so a bad endpoint is a hard error.
        let src_id = self.row[src].as_node_ref().ok_or(QueryError::WrongType {
            expected: "node reference",
            got: self.row[src].kind(),
        })?;
        let dst_id = self.row[dst].as_node_ref().ok_or(QueryError::WrongType {
            expected: "node reference",
            got: self.row[dst].kind(),
        })?;

        let id = ElementId::random();
        let mut edge =
            if directed { Edge::new(id, src_id, dst_id) } else { Edge::undirected(id, src_id, dst_id) };
        for label in labels {
            edge.labels.push(Label::new(label.clone()));
        }
        for (key, expr) in properties {
            let value = expr.eval(&self.row, &self.params)?;
            edge.properties.insert(key.clone(), value);
        }
        self.txn.put_edge(&edge)?;
        if let Some(i) = ident {
            self.row[i] = Value::EdgeRef(id);
        }
        Ok(true)
    }
}
