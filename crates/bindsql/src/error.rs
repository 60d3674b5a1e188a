//! Errors returned when a built statement runs against a client.

use thiserror::Error;

/// `Result` of executing a [`Builder`](crate::Builder) or pooling connections.
pub type SqlResult<T> = Result<T, SqlError>;

/// Errors raised when a built statement is executed.
///
/// Building itself never returns an error: a template with more placeholders
/// than supplied parameters is a caller defect and panics (see
/// [`Builder::writep`](crate::Builder::writep)).
#[derive(Debug, Error)]
pub enum SqlError {
    /// The pool could not be configured for the given URL.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The server rejected the statement, or the connection failed mid-call.
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// `fetch_one` or `fetch_scalar` received zero rows.
    #[error("Not found: {0}")]
    NotFound(String),

    /// SQLSTATE 23505, carrying `constraint: message`.
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// SQLSTATE 23503, carrying `constraint: message`.
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// SQLSTATE 23514, carrying `constraint: message`.
    #[error("Check constraint violation: {0}")]
    CheckViolation(String),

    /// A column of the returned row did not decode into the requested Rust
    /// type, e.g. the first column read by `fetch_scalar`.
    #[error("Decode error on column {column}: {message}")]
    Decode { column: usize, message: String },

    /// No pooled connection could be handed out.
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),
}

impl SqlError {
    /// Decode failure of the column at `column` (zero based).
    pub fn decode(column: usize, message: impl Into<String>) -> Self {
        Self::Decode {
            column,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// True if an insert or update hit a unique index.
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation(_))
    }

    /// True if a single-row fetch came back empty.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Map a client error to a constraint variant by SQLSTATE; anything else
    /// stays a [`SqlError::Query`].
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        let Some(db) = err.as_db_error() else {
            return Self::Query(err);
        };
        let detail = format!("{}: {}", db.constraint().unwrap_or("unknown"), db.message());
        match db.code().code() {
            "23505" => Self::UniqueViolation(detail),
            "23503" => Self::ForeignKeyViolation(detail),
            "23514" => Self::CheckViolation(detail),
            _ => Self::Query(err),
        }
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for SqlError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_classified() {
        let err = SqlError::not_found("Expected one row, got none");
        assert!(err.is_not_found());
        assert!(!err.is_unique_violation());
        assert_eq!(err.to_string(), "Not found: Expected one row, got none");
    }

    #[test]
    fn decode_names_column_index() {
        let err = SqlError::decode(0, "unexpected NULL");
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "Decode error on column 0: unexpected NULL");
    }
}
