use async_trait::async_trait;

use crate::domain::entities::shared_file::SharedFile;
use crate::common::errors::{DomainError, ErrorKind};

/// Hard cap on search results, regardless of caller input
pub const SEARCH_RESULT_LIMIT: i64 = 20;

/// Error types for shared-file repository operations.
#[derive(Debug, thiserror::Error)]
pub enum SharedFileRepositoryError {
    /// Returned when the requested file row does not exist
    #[error("Shared file not found: {0}")]
    NotFound(String),

    /// Returned on a unique-constraint violation for the file id
    #[error("Shared file already exists: {0}")]
    AlreadyExists(String),

    /// Wraps storage-engine failures; never retried internally
    #[error("Database error: {0}")]
    DatabaseError(String),
}

pub type SharedFileRepositoryResult<T> = Result<T, SharedFileRepositoryError>;

impl From<SharedFileRepositoryError> for DomainError {
    fn from(err: SharedFileRepositoryError) -> Self {
        match err {
            SharedFileRepositoryError::NotFound(id) => DomainError::not_found("SharedFile", id),
            SharedFileRepositoryError::AlreadyExists(id) => DomainError::conflict("SharedFile", id),
            SharedFileRepositoryError::DatabaseError(msg) => {
                DomainError::new(ErrorKind::Unavailable, "SharedFile", msg)
            }
        }
    }
}

/// Agregados por propietario; todo a cero cuando no tiene archivos
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OwnerStats {
    pub file_count: u64,
    pub total_bytes: u64,
    pub total_downloads: u64,
}

/**
 * Repository interface for shared-file metadata rows.
 *
 * This trait owns every query and mutation against the shared_files table.
 * Listing order is newest-first (created_at descending) with the
 * auto-increment row id ascending as the stable tie-breaker, so concurrent
 * uploads within the same instant keep their insertion order.
 *
 * Delete and download accounting report whether a row was affected instead
 * of failing on absence: a zero-row outcome is a normal result under
 * concurrent operations on the same id.
 */
#[async_trait]
pub trait SharedFileRepository: Send + Sync + 'static {
    /**
     * Persists a freshly created file row.
     *
     * @param file The entity to insert
     * @return The inserted entity on success, AlreadyExists on id collision
     */
    async fn create_file(&self, file: SharedFile) -> SharedFileRepositoryResult<SharedFile>;

    /**
     * Looks up a file row by its opaque identifier.
     *
     * @param id The file identifier
     * @return The file if the row exists, None otherwise
     */
    async fn get_file_by_id(&self, id: &str) -> SharedFileRepositoryResult<Option<SharedFile>>;

    /**
     * Lists the files of one owner, newest first, with caller-controlled
     * paging. The repository enforces no upper bound on `limit`.
     *
     * @param owner_id The owner whose files to list
     * @param limit Maximum rows to return
     * @param offset Rows to skip from the top
     */
    async fn list_by_owner(
        &self,
        owner_id: &str,
        limit: i64,
        offset: i64,
    ) -> SharedFileRepositoryResult<Vec<SharedFile>>;

    /**
     * Case-insensitive substring search over the original name, the
     * description and the category tag, scoped to one owner. Same ordering
     * as list_by_owner, hard-capped at SEARCH_RESULT_LIMIT rows.
     *
     * @param owner_id The owner whose files to search
     * @param term The substring to match
     */
    async fn search_by_owner(
        &self,
        owner_id: &str,
        term: &str,
    ) -> SharedFileRepositoryResult<Vec<SharedFile>>;

    /**
     * Aggregate statistics for one owner. All three counters are zero
     * (never absent) when the owner has no files.
     *
     * @param owner_id The owner to aggregate over
     */
    async fn stats_by_owner(&self, owner_id: &str) -> SharedFileRepositoryResult<OwnerStats>;

    /**
     * Bumps the download counter by exactly one and refreshes
     * last_accessed_at, in a single UPDATE.
     *
     * @param file_id The file whose counter to bump
     * @return true iff exactly one row was affected
     */
    async fn increment_download(&self, file_id: &str) -> SharedFileRepositoryResult<bool>;

    /**
     * Deletes a file row.
     *
     * @param file_id The file to delete
     * @return true iff a row was deleted; false is a normal outcome for a
     * concurrent or repeated delete
     */
    async fn delete_file(&self, file_id: &str) -> SharedFileRepositoryResult<bool>;
}
