use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use tokio::sync::RwLock;
use crate::core::email::UserLookup;
use crate::models::{MatchFilter, User, UserFields, UserId};
use crate::services::store::{StoreError, UserStore};

/// Volatile user store kept in process memory
///
/// Ids start at 1 and are never reused. Storage order is id order.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    state: RwLock<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    last_id: UserId,
    users: BTreeMap<UserId, User>,
}

impl MemoryState {
    fn owner_of(&self, email: &str) -> Option<UserId> {
        self.users
            .values()
            .find(|user| user.email == email)
            .map(|user| user.id)
    }

    fn next_id(&mut self) -> UserId {
        self.last_id += 1;
        self.last_id
    }

    fn push(&mut self, fields: UserFields) -> User {
        let user = User::from_fields(self.next_id(), fields);
        self.users.insert(user.id, user.clone());
        user
    }
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserLookup for InMemoryUserStore {
    type Error = StoreError;

    async fn find_owner_by_email(&self, email: &str) -> Result<Option<UserId>, StoreError> {
        Ok(self.state.read().await.owner_of(email))
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, fields: UserFields) -> Result<User, StoreError> {
        let mut state = self.state.write().await;
        if state.owner_of(&fields.email).is_some() {
            return Err(StoreError::EmailTaken(fields.email));
        }
        Ok(state.push(fields))
    }

    async fn insert_many(&self, batch: Vec<UserFields>) -> Result<Vec<User>, StoreError> {
        let mut state = self.state.write().await;

        {
            let mut emails = HashSet::with_capacity(batch.len());
            for fields in &batch {
                if state.owner_of(&fields.email).is_some() || !emails.insert(fields.email.as_str()) {
                    return Err(StoreError::EmailTaken(fields.email.clone()));
                }
            }
        }

        Ok(batch.into_iter().map(|fields| state.push(fields)).collect())
    }

    async fn list(&self, skip: u32, limit: u32) -> Result<Vec<User>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .skip(skip as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn get(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn update(&self, id: UserId, fields: UserFields) -> Result<Option<User>, StoreError> {
        let mut state = self.state.write().await;

        if matches!(state.owner_of(&fields.email), Some(owner) if owner != id) {
            return Err(StoreError::EmailTaken(fields.email));
        }

        Ok(state.users.get_mut(&id).map(|user| {
            user.overwrite(fields);
            user.clone()
        }))
    }

    async fn delete(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.state.write().await.users.remove(&id))
    }

    async fn list_candidates(
        &self,
        requester: UserId,
        _filter: &MatchFilter,
    ) -> Result<Vec<User>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .filter(|user| user.id != requester)
            .cloned()
            .collect())
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}
