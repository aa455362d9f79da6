//! Repository Module
//!
//! Store contract for client records and its SQLite implementation.

pub mod client;

pub use client::SqliteClientStore;

use async_trait::async_trait;
use shared::models::{ClientDraft, ClientRecord, DeletedClient};
use thiserror::Error;

use crate::utils::AppError;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unique index violated; `field` is the colliding column
    #[error("Duplicate: {field}")]
    Duplicate { field: String },

    /// Store unreachable or not yet set up; retry later
    #[error("Unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => RepoError::NotFound("row not found".into()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                RepoError::Duplicate {
                    field: unique_violation_field(db_err.message()),
                }
            }
            sqlx::Error::Database(db_err) if is_transient_sqlite_code(db_err.code().as_deref()) => {
                RepoError::Unavailable(db_err.message().to_string())
            }
            transient @ (sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)) => RepoError::Unavailable(transient.to_string()),
            other => RepoError::Database(other.to_string()),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::not_found(msg),
            RepoError::Duplicate { field } => AppError::duplicate(&field),
            RepoError::Unavailable(msg) => {
                tracing::warn!(error = %msg, "Record store unavailable");
                AppError::service_unavailable("Record store is unavailable, please retry")
            }
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

/// SQLITE_BUSY (5), SQLITE_LOCKED (6), SQLITE_CANTOPEN (14) and their extended codes
fn is_transient_sqlite_code(code: Option<&str>) -> bool {
    let Some(code) = code.and_then(|c| c.parse::<i32>().ok()) else {
        return false;
    };
    matches!(code & 0xff, 5 | 6 | 14)
}

/// "UNIQUE constraint failed: client.contact" -> "contact"
fn unique_violation_field(message: &str) -> String {
    message
        .rsplit_once(':')
        .map(|(_, cols)| cols)
        .and_then(|cols| cols.split(',').next())
        .map(|col| col.trim())
        .map(|col| col.rsplit('.').next().unwrap_or(col).to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence contract for client records
///
/// `replace_by_id` / `delete_by_id` on an absent id return
/// [`RepoError::NotFound`]; uniqueness violations return
/// [`RepoError::Duplicate`] naming the field.
#[async_trait]
pub trait ClientStore: Send + Sync + std::fmt::Debug {
    async fn find_all(&self) -> RepoResult<Vec<ClientRecord>>;
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<ClientRecord>>;
    async fn insert(&self, draft: ClientDraft) -> RepoResult<ClientRecord>;
    async fn replace_by_id(&self, id: i64, draft: ClientDraft) -> RepoResult<ClientRecord>;
    async fn delete_by_id(&self, id: i64) -> RepoResult<DeletedClient>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_from_sqlite_message() {
        assert_eq!(
            unique_violation_field("UNIQUE constraint failed: client.contact"),
            "contact"
        );
        assert_eq!(
            unique_violation_field("UNIQUE constraint failed: client.aadhaar"),
            "aadhaar"
        );
        assert_eq!(unique_violation_field("garbled"), "unknown");
    }

    #[test]
    fn transient_codes() {
        assert!(is_transient_sqlite_code(Some("5")));
        assert!(is_transient_sqlite_code(Some("517"))); // SQLITE_BUSY_SNAPSHOT
        assert!(is_transient_sqlite_code(Some("14")));
        assert!(!is_transient_sqlite_code(Some("2067"))); // SQLITE_CONSTRAINT_UNIQUE
        assert!(!is_transient_sqlite_code(None));
    }

    #[test]
    fn repo_errors_translate_to_app_errors() {
        use shared::error::ErrorCode;

        let err: AppError = RepoError::Duplicate { field: "contact".into() }.into();
        assert_eq!(err.code, ErrorCode::ContactExists);

        let err: AppError = RepoError::Unavailable("pool timed out".into()).into();
        assert_eq!(err.code, ErrorCode::ServiceUnavailable);

        let err: AppError = RepoError::Database("boom".into()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);

        let err: AppError = RepoError::NotFound("Client 1".into()).into();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn pool_errors_are_unavailable() {
        assert!(matches!(
            RepoError::from(sqlx::Error::PoolTimedOut),
            RepoError::Unavailable(_)
        ));
        assert!(matches!(
            RepoError::from(sqlx::Error::PoolClosed),
            RepoError::Unavailable(_)
        ));
        assert!(matches!(
            RepoError::from(sqlx::Error::RowNotFound),
            RepoError::NotFound(_)
        ));
    }
}
