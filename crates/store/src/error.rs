use thiserror::Error;

/// Convenience alias for store operation results.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by store operations.
///
/// A missing id is not an error; lookup and mutation operations signal it
/// with `Option` so callers can map it to their own not-found handling.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid query pattern '{pattern}': {source}")]
    InvalidQuery {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
