//! `QuiverDB` Graph
//!
//! This crate maps graph entities onto the key-value store and keeps the
//! adjacency index consistent with the primary data.
//!
//! # Overview
//!
//! A [`GraphStore`] wraps the key-value store; every mutation goes
//! through a [`GraphTransaction`], which is the only mutation surface of
//! the system. Node and edge records live in their own column families
//! keyed by element id, and each stored edge is mirrored by a pair of
//! adjacency entries so that traversal is a prefix scan.
//!
//! # Modules
//!
//! - [`store`] - The store handle and transactional entity operations
//! - [`index`] - Adjacency index iteration
//! - [`error`] - Error types for graph operations

// Deny unwrap in library code to ensure proper error handling
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod index;
pub mod store;

pub use error::{GraphError, GraphResult};
pub use index::AdjIter;
pub use store::{EdgeIter, GraphStore, GraphTransaction, NodeIter};
