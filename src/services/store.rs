use async_trait::async_trait;
use thiserror::Error;
use crate::core::email::UserLookup;
use crate::models::{MatchFilter, User, UserFields, UserId};

/// Errors that can occur when reading or writing user records
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    /// Unique email constraint rejected the write
    #[error("Email already taken: {0}")]
    EmailTaken(String),
}

/// Persistent record store for user profiles
///
/// Implementations must reject a write that would leave two records with
/// the same email, reporting it as [`StoreError::EmailTaken`].
#[async_trait]
pub trait UserStore: UserLookup<Error = StoreError> {
    /// Insert one record and return it with its assigned id
    async fn insert(&self, fields: UserFields) -> Result<User, StoreError>;

    /// Insert every record or none of them, preserving input order
    async fn insert_many(&self, batch: Vec<UserFields>) -> Result<Vec<User>, StoreError>;

    /// Records in storage order
    async fn list(&self, skip: u32, limit: u32) -> Result<Vec<User>, StoreError>;

    async fn get(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// Overwrite all fields; `None` when the id does not exist
    async fn update(&self, id: UserId, fields: UserFields) -> Result<Option<User>, StoreError>;

    /// Remove and return the pre-deletion snapshot
    async fn delete(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// Every record except the requester, in storage order
    ///
    /// The store may narrow the scan with the filter's city, gender and age
    /// constraints but never with interests.
    async fn list_candidates(
        &self,
        requester: UserId,
        filter: &MatchFilter,
    ) -> Result<Vec<User>, StoreError>;

    /// Health check for the backing storage
    async fn health_check(&self) -> Result<bool, StoreError>;
}
