//! User directory - read-only listing of the site's sign-in accounts.

mod in_memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::StoreError;

pub use in_memory::InMemoryUserDirectory;

/// Largest page a single `list_users` call returns.
pub const MAX_USERS_PAGE: usize = 1000;

/// A sign-in provider linked to an account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfo {
    pub provider_id: String,
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
}

/// One account as shown on the users page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
    pub email_verified: bool,
    pub disabled: bool,
    pub creation_time: Option<DateTime<Utc>>,
    pub last_sign_in_time: Option<DateTime<Utc>>,
    #[serde(rename = "providerData")]
    pub providers: Vec<ProviderInfo>,
}

/// One page of accounts. Further pages are never fetched automatically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPage {
    pub users: Vec<UserRecord>,
    pub total_users: usize,
    /// More accounts exist past this page.
    pub has_more: bool,
}

impl UserPage {
    pub fn new(users: Vec<UserRecord>, has_more: bool) -> Self {
        Self {
            total_users: users.len(),
            users,
            has_more,
        }
    }
}

/// Clamp a requested page size to `1..=MAX_USERS_PAGE`.
pub fn page_limit(requested: usize) -> usize {
    requested.clamp(1, MAX_USERS_PAGE)
}

/// Read-only access to the account directory.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// List up to `limit` accounts, capped at [`MAX_USERS_PAGE`].
    async fn list_users(&self, limit: usize) -> Result<UserPage, StoreError>;
}
