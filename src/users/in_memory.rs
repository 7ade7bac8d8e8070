use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use super::{page_limit, UserDirectory, UserPage, UserRecord};
use crate::store::StoreError;

/// In-memory user directory. Clones share storage.
#[derive(Clone, Default)]
pub struct InMemoryUserDirectory {
    users: Arc<RwLock<Vec<UserRecord>>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, user: UserRecord) -> Result<(), StoreError> {
        self.users
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))?
            .push(user);
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn list_users(&self, limit: usize) -> Result<UserPage, StoreError> {
        let limit = page_limit(limit);
        let users = self
            .users
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))?;
        let page: Vec<UserRecord> = users.iter().take(limit).cloned().collect();
        Ok(UserPage::new(page, users.len() > limit))
    }
}
