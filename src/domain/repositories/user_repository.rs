use async_trait::async_trait;

use crate::domain::entities::user::User;
use crate::common::errors::{DomainError, ErrorKind};

/// Error types for user repository operations.
#[derive(Debug, thiserror::Error)]
pub enum UserRepositoryError {
    /// Returned when the requested user row does not exist
    #[error("User not found: {0}")]
    NotFound(String),

    /// Returned on a unique-constraint violation for the user id
    #[error("User already exists: {0}")]
    AlreadyExists(String),

    /// Wraps storage-engine failures; never retried internally
    #[error("Database error: {0}")]
    DatabaseError(String),
}

pub type UserRepositoryResult<T> = Result<T, UserRepositoryError>;

impl From<UserRepositoryError> for DomainError {
    fn from(err: UserRepositoryError) -> Self {
        match err {
            UserRepositoryError::NotFound(id) => DomainError::not_found("User", id),
            UserRepositoryError::AlreadyExists(id) => DomainError::conflict("User", id),
            UserRepositoryError::DatabaseError(msg) => {
                DomainError::new(ErrorKind::Unavailable, "User", msg)
            }
        }
    }
}

/**
 * Repository interface for user profile rows.
 *
 * Users are keyed by a caller-supplied identity and are never hard-deleted;
 * profile synchronization and picture changes go through insert-or-replace
 * semantics. The repository performs no implicit merging: callers carry
 * existing picture fields forward when replacing a row.
 */
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /**
     * Inserts or fully replaces the row for `user.id()`.
     *
     * @param user The complete user state to persist
     * @return The persisted user on success
     */
    async fn upsert_user(&self, user: User) -> UserRepositoryResult<User>;

    /**
     * Looks up a user by their caller-supplied identifier.
     *
     * @param id The user identifier
     * @return The user if the row exists, None otherwise
     */
    async fn get_user_by_id(&self, id: &str) -> UserRepositoryResult<Option<User>>;
}
