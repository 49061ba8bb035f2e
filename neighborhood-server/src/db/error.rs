//! Gateway error type
//!
//! The Gateway never logs; it returns one of these and lets the HTTP layer
//! decide what the caller sees.

/// Coarse classification used by callers to pick a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A tree already grows at the same house and coordinates
    DuplicateTree,
    /// Lookup by identifier matched nothing
    NoSuchRecord,
    /// Storm found no candidate trees
    NoTreesAtHouse,
    /// Connection, query, transaction, or row-count failure
    Persistence,
}

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("tree already growing at house {house_id} ({x}, {y})")]
    DuplicateTree { house_id: i32, x: i32, y: i32 },

    #[error("no {resource} matching ID {id}")]
    NoSuchRecord { resource: &'static str, id: i32 },

    #[error("no trees at house {house_id}")]
    NoTreesAtHouse { house_id: i32 },

    #[error("{operation}: expected {expected} row(s) affected, got {actual}")]
    UnexpectedRowCount {
        operation: &'static str,
        expected: u64,
        actual: u64,
    },

    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateTree { .. } => ErrorKind::DuplicateTree,
            Self::NoSuchRecord { .. } => ErrorKind::NoSuchRecord,
            Self::NoTreesAtHouse { .. } => ErrorKind::NoTreesAtHouse,
            Self::UnexpectedRowCount { .. } | Self::Sqlx(_) => ErrorKind::Persistence,
        }
    }
}

/// PostgreSQL unique_violation
const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL foreign_key_violation
const FOREIGN_KEY_VIOLATION: &str = "23503";

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    has_code(err, UNIQUE_VIOLATION)
}

pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    has_code(err, FOREIGN_KEY_VIOLATION)
}

fn has_code(err: &sqlx::Error, code: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(code),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_checks_ignore_non_db_errors() {
        let err = sqlx::Error::RowNotFound;
        assert!(!is_unique_violation(&err));
        assert!(!is_foreign_key_violation(&err));
    }

    #[test]
    fn kinds() {
        assert_eq!(
            GatewayError::DuplicateTree { house_id: 1, x: 2, y: 3 }.kind(),
            ErrorKind::DuplicateTree
        );
        assert_eq!(
            GatewayError::NoTreesAtHouse { house_id: 1 }.kind(),
            ErrorKind::NoTreesAtHouse
        );
        assert_eq!(
            GatewayError::UnexpectedRowCount {
                operation: "DELETE tree",
                expected: 1,
                actual: 0
            }
            .kind(),
            ErrorKind::Persistence
        );
        assert_eq!(
            GatewayError::from(sqlx::Error::PoolClosed).kind(),
            ErrorKind::Persistence
        );
    }

    #[test]
    fn messages() {
        let err = GatewayError::NoSuchRecord { resource: "tree", id: 9 };
        assert_eq!(err.to_string(), "no tree matching ID 9");
        let err = GatewayError::DuplicateTree { house_id: 3, x: 10, y: 20 };
        assert_eq!(err.to_string(), "tree already growing at house 3 (10, 20)");
    }
}
