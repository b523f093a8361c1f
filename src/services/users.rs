use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use crate::core::{find_matches, validate_email, ValidationResult};
use crate::models::{MatchFilter, User, UserFields, UserId};
use crate::services::store::{StoreError, UserStore};

/// Errors surfaced by user operations
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("User not found: {0}")]
    NotFound(UserId),

    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Duplicate email: {email} is already used by user {owner}")]
    DuplicateEmail { email: String, owner: UserId },

    #[error("Duplicate email within batch: {0}")]
    DuplicateInBatch(String),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// CRUD and matching operations over a user store
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Standalone email check, never rejects
    pub async fn validate_email(&self, email: &str) -> Result<ValidationResult, ServiceError> {
        Ok(validate_email(email, self.store.as_ref()).await?)
    }

    pub async fn create_user(&self, fields: UserFields) -> Result<User, ServiceError> {
        self.check_new_user(&fields).await?;

        let user = match self.store.insert(fields).await {
            Ok(user) => user,
            Err(e) => return Err(self.resolve_conflict(e).await),
        };

        tracing::info!("Created user {}", user.id);
        Ok(user)
    }

    /// Validate the whole batch first, then insert it atomically
    pub async fn create_users(&self, batch: Vec<UserFields>) -> Result<Vec<User>, ServiceError> {
        {
            let mut emails = HashSet::with_capacity(batch.len());
            for fields in &batch {
                self.check_new_user(fields).await?;
                if !emails.insert(fields.email.as_str()) {
                    return Err(ServiceError::DuplicateInBatch(fields.email.clone()));
                }
            }
        }

        let users = match self.store.insert_many(batch).await {
            Ok(users) => users,
            Err(e) => return Err(self.resolve_conflict(e).await),
        };

        tracing::info!("Created {} users in bulk", users.len());
        Ok(users)
    }

    pub async fn list_users(&self, skip: u32, limit: u32) -> Result<Vec<User>, ServiceError> {
        Ok(self.store.list(skip, limit).await?)
    }

    pub async fn get_user(&self, id: UserId) -> Result<User, ServiceError> {
        self.store
            .get(id)
            .await?
            .ok_or(ServiceError::NotFound(id))
    }

    /// Replace every field of an existing user
    ///
    /// Keeping the user's own email is allowed; taking another user's is not.
    pub async fn update_user(&self, id: UserId, fields: UserFields) -> Result<User, ServiceError> {
        let conflict = match validate_email(&fields.email, self.store.as_ref()).await? {
            ValidationResult::InvalidSyntax => {
                return Err(ServiceError::InvalidEmail(fields.email));
            }
            ValidationResult::DuplicateEmail(owner) if owner != id => Some(owner),
            _ => None,
        };

        // Existence wins over the duplicate classification
        self.get_user(id).await?;

        if let Some(owner) = conflict {
            return Err(ServiceError::DuplicateEmail {
                email: fields.email,
                owner,
            });
        }

        let user = match self.store.update(id, fields).await {
            Ok(Some(user)) => user,
            Ok(None) => return Err(ServiceError::NotFound(id)),
            Err(e) => return Err(self.resolve_conflict(e).await),
        };

        tracing::info!("Updated user {}", id);
        Ok(user)
    }

    /// Returns the record as it was before deletion
    pub async fn delete_user(&self, id: UserId) -> Result<User, ServiceError> {
        let user = self
            .store
            .delete(id)
            .await?
            .ok_or(ServiceError::NotFound(id))?;

        tracing::info!("Deleted user {}", id);
        Ok(user)
    }

    /// Users matching the filter and sharing an interest with the requester
    pub async fn match_users(
        &self,
        requester_id: UserId,
        filter: &MatchFilter,
    ) -> Result<Vec<User>, ServiceError> {
        let requester = self.get_user(requester_id).await?;

        let candidates = self.store.list_candidates(requester_id, filter).await?;
        let total_candidates = candidates.len();

        let matches = find_matches(&requester, candidates, filter);

        tracing::info!(
            "Returning {} matches for user {} (from {} candidates)",
            matches.len(),
            requester_id,
            total_candidates
        );

        Ok(matches)
    }

    pub async fn health_check(&self) -> bool {
        match self.store.health_check().await {
            Ok(healthy) => healthy,
            Err(e) => {
                tracing::warn!("Store health check failed: {}", e);
                false
            }
        }
    }

    /// Email syntax and uniqueness for a user about to be created
    async fn check_new_user(&self, fields: &UserFields) -> Result<(), ServiceError> {
        match validate_email(&fields.email, self.store.as_ref()).await? {
            ValidationResult::Valid => Ok(()),
            ValidationResult::InvalidSyntax => Err(ServiceError::InvalidEmail(fields.email.clone())),
            ValidationResult::DuplicateEmail(owner) => Err(ServiceError::DuplicateEmail {
                email: fields.email.clone(),
                owner,
            }),
        }
    }

    /// A unique constraint can still fire when a concurrent write won the race
    async fn resolve_conflict(&self, err: StoreError) -> ServiceError {
        let StoreError::EmailTaken(email) = err else {
            return ServiceError::Store(err);
        };

        tracing::warn!("Email {} was taken by a concurrent write", email);

        match self.store.find_owner_by_email(&email).await {
            Ok(Some(owner)) => ServiceError::DuplicateEmail { email, owner },
            // owner already gone again; still reported as a conflict
            Ok(None) => ServiceError::Store(StoreError::EmailTaken(email)),
            Err(e) => ServiceError::Store(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::UserLookup;
    use crate::services::memory::InMemoryUserStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Store whose pre-insert lookup misses, as if a concurrent write
    /// committed the same email between the check and the insert
    struct RacingStore {
        lookups: AtomicUsize,
        winner: Option<UserId>,
    }

    impl RacingStore {
        fn new(winner: Option<UserId>) -> Self {
            Self {
                lookups: AtomicUsize::new(0),
                winner,
            }
        }
    }

    #[async_trait]
    impl UserLookup for RacingStore {
        type Error = StoreError;

        async fn find_owner_by_email(&self, _email: &str) -> Result<Option<UserId>, StoreError> {
            if self.lookups.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(None)
            } else {
                Ok(self.winner)
            }
        }
    }

    #[async_trait]
    impl UserStore for RacingStore {
        async fn insert(&self, fields: UserFields) -> Result<User, StoreError> {
            Err(StoreError::EmailTaken(fields.email))
        }

        async fn insert_many(&self, batch: Vec<UserFields>) -> Result<Vec<User>, StoreError> {
            let email = batch.into_iter().next().map(|f| f.email).unwrap_or_default();
            Err(StoreError::EmailTaken(email))
        }

        async fn list(&self, _skip: u32, _limit: u32) -> Result<Vec<User>, StoreError> {
            Ok(Vec::new())
        }

        async fn get(&self, _id: UserId) -> Result<Option<User>, StoreError> {
            Ok(None)
        }

        async fn update(&self, _id: UserId, _fields: UserFields) -> Result<Option<User>, StoreError> {
            Ok(None)
        }

        async fn delete(&self, _id: UserId) -> Result<Option<User>, StoreError> {
            Ok(None)
        }

        async fn list_candidates(
            &self,
            _requester: UserId,
            _filter: &MatchFilter,
        ) -> Result<Vec<User>, StoreError> {
            Ok(Vec::new())
        }

        async fn health_check(&self) -> Result<bool, StoreError> {
            Ok(true)
        }
    }

    fn service() -> UserService {
        UserService::new(Arc::new(InMemoryUserStore::new()))
    }

    fn fields(name: &str, email: &str) -> UserFields {
        UserFields {
            name: name.to_string(),
            age: 25,
            gender: "female".to_string(),
            email: email.to_string(),
            city: "Delhi".to_string(),
            interests: vec!["music".to_string(), "reading".to_string()],
        }
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_email() {
        let service = service();
        let err = service.create_user(fields("Sanam", "invalidexamplecom")).await.unwrap_err();

        assert!(matches!(err, ServiceError::InvalidEmail(_)));
        assert!(service.list_users(0, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_with_owner() {
        let service = service();
        let owner = service.create_user(fields("Rohan", "rohan@example.com")).await.unwrap();

        let err = service.create_user(fields("Other", "rohan@example.com")).await.unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateEmail { owner: id, .. } if id == owner.id));
    }

    #[tokio::test]
    async fn test_create_accepts_any_name_and_age() {
        let service = service();

        let mut negative_age = fields("Sanam", "sanam@example.com");
        negative_age.age = -3;
        let created = service.create_user(negative_age).await.unwrap();
        assert_eq!(created.age, -3);

        let created = service.create_user(fields("", "blank@example.com")).await.unwrap();
        assert_eq!(created.name, "");

        assert_eq!(service.list_users(0, 10).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unique_violation_reports_winning_owner() {
        let service = UserService::new(Arc::new(RacingStore::new(Some(11))));

        let err = service.create_user(fields("Late", "race@example.com")).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::DuplicateEmail { ref email, owner: 11 } if email == "race@example.com"
        ));
    }

    #[tokio::test]
    async fn test_unique_violation_in_bulk_reports_winning_owner() {
        let service = UserService::new(Arc::new(RacingStore::new(Some(4))));

        let err = service
            .create_users(vec![fields("Late", "race@example.com")])
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateEmail { owner: 4, .. }));
    }

    #[tokio::test]
    async fn test_unique_violation_without_owner_is_still_a_conflict() {
        use actix_web::{http::StatusCode, ResponseError};

        let service = UserService::new(Arc::new(RacingStore::new(None)));

        let err = service.create_user(fields("Late", "race@example.com")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Store(StoreError::EmailTaken(_))));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.kind(), "duplicate_email");
    }

    #[tokio::test]
    async fn test_bulk_rejects_duplicate_within_batch() {
        let service = service();
        let batch = vec![
            fields("A", "same@example.com"),
            fields("B", "same@example.com"),
        ];

        let err = service.create_users(batch).await.unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateInBatch(email) if email == "same@example.com"));
        assert!(service.list_users(0, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let service = service();
        let err = service.update_user(42, fields("Ghost", "ghost@example.com")).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(42)));
    }

    #[tokio::test]
    async fn test_update_self_duplicate_allowed() {
        let service = service();
        let user = service.create_user(fields("Sanam", "sanam@example.com")).await.unwrap();

        let mut changed = fields("Sanam K", "sanam@example.com");
        changed.city = "Mumbai".to_string();
        let updated = service.update_user(user.id, changed).await.unwrap();

        assert_eq!(updated.name, "Sanam K");
        assert_eq!(updated.city, "Mumbai");
    }

    #[tokio::test]
    async fn test_update_other_users_email_rejected() {
        let service = service();
        let sanam = service.create_user(fields("Sanam", "sanam@example.com")).await.unwrap();
        let rohan = service.create_user(fields("Rohan", "rohan@example.com")).await.unwrap();

        let err = service
            .update_user(sanam.id, fields("Sanam", "rohan@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateEmail { owner, .. } if owner == rohan.id));

        let unchanged = service.get_user(sanam.id).await.unwrap();
        assert_eq!(unchanged.email, "sanam@example.com");
    }

    #[tokio::test]
    async fn test_delete_returns_snapshot() {
        let service = service();
        let user = service.create_user(fields("Sanam", "sanam@example.com")).await.unwrap();

        let deleted = service.delete_user(user.id).await.unwrap();
        assert_eq!(deleted, user);
        assert!(matches!(service.get_user(user.id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(service.delete_user(user.id).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_match_unknown_requester() {
        let service = service();
        let err = service.match_users(7, &MatchFilter::default()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(7)));
    }
}
