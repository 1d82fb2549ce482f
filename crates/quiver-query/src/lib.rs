//! `QuiverDB` Query
//!
//! This crate provides the query plan model and the pull-based streaming
//! executor that evaluates plans against a graph transaction.
//!
//! # Overview
//!
//! A [`Plan`] is a flat post-order sequence of [`Operator`]s: every
//! operator's inputs precede it, and [`Operator::Begin`] markers delimit
//! the subqueries of join-like operators. The [`Executor`] drives the
//! plan one row at a time over a flat array of value assignments,
//! holding one state slot per operator; callers pull rows until
//! exhaustion and then commit or roll back the transaction themselves.
//!
//! # Example
//!
//! ```no_run
//! use quiver_graph::GraphStore;
//! use quiver_query::{Executor, Operator, Plan};
//!
//! # fn main() -> Result<(), quiver_query::QueryError> {
//! # let store = GraphStore::open("graph.db").map_err(quiver_query::QueryError::from)?;
//! // MATCH (a)-[e]->(b) RETURN a, e, b
//! let plan = Plan::new(
//!     vec![
//!         Operator::node_scan(0),
//!         Operator::step_right(0, Some(1), Some(2)),
//!     ],
//!     vec![0, 1, 2],
//! )?;
//!
//! let tx = store.begin();
//! let mut exec = Executor::new(&plan, &tx);
//! while let Some(row) = exec.run()? {
//!     println!("{row:?}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`plan`] - Operators, plan construction, and validation
//! - [`expr`] - Expressions and their evaluator
//! - [`exec`] - The executor
//! - [`error`] - Error types for planning and execution

// Deny unwrap in library code to ensure proper error handling
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod exec;
pub mod expr;
pub mod plan;

pub use error::{QueryError, QueryResult};
pub use exec::{ExecOptions, Executor};
pub use expr::{BinaryOp, Expr, Params};
pub use plan::{FilterClause, Ident, Operator, Plan, ProjectClause, StepDirection};
