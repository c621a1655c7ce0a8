// errors.rs
use std::fmt;

/// Errors that can escape this crate.
///
/// The query/consolidation core itself is total over any syntactically valid
/// `FilterSpec`: bad filter values drop their predicate, unknown sort keys
/// fall back to a default ordering, malformed stored JSON becomes an empty
/// sequence. Only the store layer (opening the snapshot, executing a query)
/// can fail hard.
#[derive(Debug)]
pub enum CatalogError {
    DbError(String),
    Internal,
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::DbError(msg) => write!(f, "Database Error: {msg}"),
            CatalogError::Internal => write!(f, "Internal Error"),
        }
    }
}

impl std::error::Error for CatalogError {}
