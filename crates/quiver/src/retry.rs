//! Commit retry for optimistic conflicts.
//!
//! Optimistic transactions fail their commit when a conflicting
//! transaction committed first. The failure is retryable by
//! construction: the caller throws the transaction away, backs off, and
//! reruns its writes against a fresh snapshot. This module packages that
//! loop.

use std::thread;
use std::time::Duration;

use quiver_graph::GraphTransaction;
use tracing::warn;

use crate::database::Database;
use crate::error::Error;

/// Default number of attempts made by [`Database`] write helpers.
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 8;

/// Initial backoff between attempts; doubles per retry.
const INITIAL_BACKOFF: Duration = Duration::from_millis(1);

/// Longest sleep between attempts.
const MAX_BACKOFF: Duration = Duration::from_millis(64);

/// Runs `f` inside a fresh write transaction, committing on success and
/// retrying on optimistic conflicts.
///
/// `f` may run several times and must be idempotent from the database's
/// point of view: each attempt sees a fresh snapshot and either commits
/// in full or leaves no trace. Non-retryable errors abort immediately.
///
/// # Example
///
/// ```no_run
/// use quiver::{with_write_retry, Database, ElementId, Node};
///
/// # fn main() -> Result<(), quiver::Error> {
/// let db = Database::open("graph.db")?;
/// let id = with_write_retry(&db, 8, |tx| {
///     let node = Node::new(ElementId::random()).with_label("Person");
///     tx.put_node(&node)?;
///     Ok(node.id)
/// })?;
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns the first non-retryable error, or
/// [`Error::RetriesExhausted`] after `max_attempts` conflicting commits.
pub fn with_write_retry<T, F>(db: &Database, max_attempts: u32, mut f: F) -> Result<T, Error>
where
    F: FnMut(&GraphTransaction<'_>) -> Result<T, Error>,
{
    let mut backoff = INITIAL_BACKOFF;
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        let tx = db.begin();

        let retryable = match f(&tx) {
            Ok(value) => match tx.commit() {
                Ok(()) => return Ok(value),
                Err(e) if e.is_retryable() => true,
                Err(e) => return Err(e.into()),
            },
            Err(e) if e.is_retryable() => {
                // The transaction is dropped here, rolling it back.
                true
            }
            Err(e) => return Err(e),
        };

        debug_assert!(retryable);
        if attempt >= max_attempts {
            return Err(Error::RetriesExhausted { attempts: attempt });
        }
        warn!(attempt, backoff_ms = backoff.as_millis() as u64, "commit conflict, retrying");
        thread::sleep(backoff);
        backoff = (backoff * 2).min(MAX_BACKOFF);
    }
}
