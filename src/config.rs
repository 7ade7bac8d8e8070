//! Dashboard configuration, read from the environment.

use std::{env, fmt::Display, str::FromStr};

use thiserror::Error;
use tracing::{info, warn};

use crate::auth::Credentials;
use crate::users::{page_limit, MAX_USERS_PAGE};

pub const BIND_ADDR_VAR: &str = "ADMIN_BIND_ADDR";
pub const USERNAME_VAR: &str = "ADMIN_USERNAME";
pub const PASSWORD_VAR: &str = "ADMIN_PASSWORD";
pub const USERS_PAGE_VAR: &str = "ADMIN_USERS_PAGE";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_USERNAME: &str = "admin";
const DEFAULT_PASSWORD: &str = "admin";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub bind_addr: String,
    pub credentials: Credentials,
    /// Accounts fetched per users-page load.
    pub users_page: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            credentials: Credentials::new(DEFAULT_USERNAME, DEFAULT_PASSWORD),
            users_page: MAX_USERS_PAGE,
        }
    }
}

impl DashboardConfig {
    /// Load from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load using `lookup` to resolve variable names.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup(BIND_ADDR_VAR).unwrap_or_else(|| {
            info!("{BIND_ADDR_VAR} not set, using default: {DEFAULT_BIND_ADDR}");
            DEFAULT_BIND_ADDR.to_string()
        });

        let username = lookup(USERNAME_VAR);
        let password = lookup(PASSWORD_VAR);
        if username.is_none() || password.is_none() {
            warn!("{USERNAME_VAR}/{PASSWORD_VAR} not set, falling back to default credentials");
        }
        let credentials = Credentials::new(
            username.unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
            password.unwrap_or_else(|| DEFAULT_PASSWORD.to_string()),
        );

        let users_page = match lookup(USERS_PAGE_VAR) {
            Some(raw) => page_limit(parse(USERS_PAGE_VAR, &raw)?),
            None => MAX_USERS_PAGE,
        };

        Ok(Self {
            bind_addr,
            credentials,
            users_page,
        })
    }
}

fn parse<T: FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    raw.trim().parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError::Invalid {
            key,
            value: raw.to_string(),
            reason: e.to_string(),
        }
    })
}
