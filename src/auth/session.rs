//! Session storage for the login flag.

use std::collections::HashMap;
use std::sync::RwLock;

use super::AuthError;

/// Key/value storage that survives between page loads. No expiry.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, AuthError>;
    fn set(&self, key: &str, value: &str) -> Result<(), AuthError>;
    fn remove(&self, key: &str) -> Result<(), AuthError>;
}

/// Session variables held in memory.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    variables: RwLock<HashMap<String, String>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session from a map of variables.
    pub fn from_map(variables: HashMap<String, String>) -> Self {
        Self {
            variables: RwLock::new(variables),
        }
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, AuthError> {
        let variables = self
            .variables
            .read()
            .map_err(|_| AuthError::Storage("session lock poisoned".into()))?;
        Ok(variables.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AuthError> {
        self.variables
            .write()
            .map_err(|_| AuthError::Storage("session lock poisoned".into()))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), AuthError> {
        self.variables
            .write()
            .map_err(|_| AuthError::Storage("session lock poisoned".into()))?
            .remove(key);
        Ok(())
    }
}
