//! `QuiverDB`
//!
//! A small embedded property-graph database. Nodes and edges with labels
//! and properties live in a durable key-value backend; queries are flat
//! post-order operator plans evaluated by a pull-based streaming
//! executor; concurrent clients are isolated by snapshot transactions
//! with optimistic conflict detection.
//!
//! # Example
//!
//! ```no_run
//! use quiver::{Database, Edge, ElementId, Node, Operator, Plan};
//!
//! # fn main() -> Result<(), quiver::Error> {
//! let db = Database::open("social.db")?;
//!
//! // Build a two-node graph.
//! let tx = db.begin();
//! let ada = Node::new(ElementId::random()).with_label("Person").with_property("name", "Ada");
//! let bob = Node::new(ElementId::random()).with_label("Person").with_property("name", "Bob");
//! tx.put_node(&ada)?;
//! tx.put_node(&bob)?;
//! tx.put_edge(&Edge::new(ElementId::random(), ada.id, bob.id).with_label("KNOWS"))?;
//! tx.commit()?;
//!
//! // MATCH (a)-[e]->(b) RETURN a, b
//! let plan = Plan::new(
//!     vec![Operator::node_scan(0), Operator::step_right(0, Some(1), Some(2))],
//!     vec![0, 2],
//! )?;
//! for row in db.execute(&plan)? {
//!     println!("{row:?}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Crates
//!
//! The facade re-exports the public surface of the underlying layers:
//! the core data model, the storage adapter's configuration, the graph
//! transaction, and the plan/executor types.

pub mod config;
pub mod database;
pub mod error;
pub mod retry;

pub use config::Config;
pub use database::Database;
pub use error::Error;
pub use retry::with_write_retry;

// Re-export the data model.
pub use quiver_core::{AdjEntry, Dir, Edge, ElementId, Label, Node, PropertyMap, Value};

// Re-export the transactional surface.
pub use quiver_graph::{GraphStore, GraphTransaction};
pub use quiver_storage::{ColumnFamily, StoreConfig};

// Re-export the query surface.
pub use quiver_query::{
    ExecOptions, Executor, Expr, FilterClause, Operator, Params, Plan, ProjectClause, QueryError,
    StepDirection,
};
