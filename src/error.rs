use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Failures surfaced by ledger operations.
///
/// Variants stay distinguishable so a caller can pick user-facing copy
/// ("Invalid Code" vs. "Payment Failed, try again") instead of collapsing
/// everything into one generic error.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// The tenant has no active ledger. Recoverable via `link`.
    #[error("tenant {0} is not linked to a property")]
    NotLinked(String),
    /// A property code that resolves to nothing. Surfaced verbatim.
    #[error("invalid property code: {0}")]
    InvalidCode(String),
    /// Exclusive access could not be obtained for a mutating call. No partial
    /// mutation is visible; the caller may retry.
    #[error("concurrent update rejected for tenant {0}")]
    ConcurrencyConflict(String),
    /// Lower-layer storage error. Fatal for the current call.
    #[error("storage failure: {0}")]
    PersistenceFailure(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// An operation row that cannot be applied as written.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for LedgerError {
    fn from(err: rocksdb::Error) -> Self {
        LedgerError::PersistenceFailure(Box::new(err))
    }
}
