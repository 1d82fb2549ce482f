//! `QuiverDB` Core
//!
//! This crate provides the data model and binary codec shared by every
//! layer of `QuiverDB`: element identifiers, tagged property values,
//! nodes, edges, adjacency entries, and the key/payload encodings that
//! define the persistent format.
//!
//! # Modules
//!
//! - [`types`] - `ElementId`, `Value`, `Node`, `Edge`, `AdjEntry`, `Dir`
//! - [`encoding`] - Binary value/entity codecs and storage key layouts
//! - [`error`] - Error types for decoding and value arithmetic

// Deny unwrap in library code to ensure proper error handling
#![deny(clippy::unwrap_used)]

pub mod encoding;
pub mod error;
pub mod types;

pub use error::CoreError;
pub use types::{AdjEntry, Dir, Edge, ElementId, Label, Node, PropertyMap, Value};
