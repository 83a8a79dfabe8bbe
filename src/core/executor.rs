// QueryBench - core/executor.rs
//
// The seam between the replay loop and whatever actually runs a statement.
// Connection lifecycle belongs to the implementation, not to this trait.

use crate::util::error::ExecutionError;

/// What a successful statement produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecutionOutcome {
    /// Rows returned (for queries) or affected (for writes).
    pub rows: u64,
}

/// Runs one SQL statement at a time against an already open session.
pub trait StatementExecutor {
    fn execute(&mut self, sql: &str) -> Result<ExecutionOutcome, ExecutionError>;
}

impl<E: StatementExecutor + ?Sized> StatementExecutor for &mut E {
    fn execute(&mut self, sql: &str) -> Result<ExecutionOutcome, ExecutionError> {
        (**self).execute(sql)
    }
}
