//! Adjacency index iteration.

mod adjacency;

pub use adjacency::AdjIter;
