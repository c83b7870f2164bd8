/// Transaction helper for multi-statement writes
///
/// The transaction rolls back when dropped without a commit, so an error
/// returned from the closure leaves the database untouched.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::storage::StorageError;

/// Run `operation` inside a transaction, committing only if it succeeds
pub fn execute_in_transaction<F, T>(
    conn: &mut Connection,
    behavior: TransactionBehavior,
    operation: F,
) -> Result<T, StorageError>
where
    F: FnOnce(&Transaction) -> Result<T, StorageError>,
{
    let tx = conn.transaction_with_behavior(behavior)?;
    let result = operation(&tx)?;
    tx.commit()?;
    Ok(result)
}
