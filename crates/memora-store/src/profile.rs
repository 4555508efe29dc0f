//! User profile repository contract and in-memory implementation.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use memora_core::UserProfile;

use crate::error::StoreError;

/// Read/write contract for user profiles.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a profile by user id, if one exists.
    async fn get_by_id(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError>;

    /// Write a profile, creating or replacing the stored record.
    async fn update(&self, profile: UserProfile) -> Result<(), StoreError>;
}

/// In-memory [`UserRepository`] keyed by user id.
#[derive(Default)]
pub struct MemoryUserRepository {
    profiles: Mutex<HashMap<String, UserProfile>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn get_by_id(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError> {
        let profiles = self
            .profiles
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        Ok(profiles.get(user_id).cloned())
    }

    async fn update(&self, profile: UserProfile) -> Result<(), StoreError> {
        let mut profiles = self
            .profiles
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        profiles.insert(profile.id.clone(), profile);
        Ok(())
    }
}
