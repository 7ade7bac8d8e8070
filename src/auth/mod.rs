//! Login gate - a single shared credential in front of the dashboard.
//!
//! The gate checks a username/password pair from configuration and records a
//! session flag in a [`SessionStore`]. The flag has no expiry. Pages call
//! [`LoginGate::require`] and send the operator to the login screen when it
//! fails.
//!
//! Remote clients use token sessions instead: [`LoginGate::open_session`]
//! returns a random token that [`LoginGate::verify_session`] accepts until
//! [`LoginGate::close_session`].

mod session;

use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::DashboardConfig;

pub use session::{InMemorySessionStore, SessionStore};

/// Session key holding the login flag.
pub const SESSION_FLAG: &str = "authenticated";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("not logged in")]
    Unauthenticated,
    #[error("session storage error: {0}")]
    Storage(String),
}

impl AuthError {
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::InvalidCredentials | AuthError::Unauthenticated => 401,
            AuthError::Storage(_) => 500,
        }
    }
}

/// The one username/password pair the dashboard accepts.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Checks credentials and tracks the logged-in flag.
pub struct LoginGate<S> {
    credentials: Credentials,
    sessions: S,
}

impl<S: SessionStore> LoginGate<S> {
    pub fn new(credentials: Credentials, sessions: S) -> Self {
        Self {
            credentials,
            sessions,
        }
    }

    /// A gate accepting the configured credentials.
    pub fn from_config(config: &DashboardConfig, sessions: S) -> Self {
        Self::new(config.credentials.clone(), sessions)
    }

    pub fn sessions(&self) -> &S {
        &self.sessions
    }

    pub fn login(&self, username: &str, password: &str) -> Result<(), AuthError> {
        self.check(username, password)?;
        self.sessions.set(SESSION_FLAG, "true")?;
        info!(%username, "logged in");
        Ok(())
    }

    pub fn logout(&self) -> Result<(), AuthError> {
        self.sessions.remove(SESSION_FLAG)?;
        info!("logged out");
        Ok(())
    }

    pub fn is_authenticated(&self) -> Result<bool, AuthError> {
        Ok(self.sessions.get(SESSION_FLAG)?.as_deref() == Some("true"))
    }

    /// Fails with [`AuthError::Unauthenticated`] when no one is logged in.
    pub fn require(&self) -> Result<(), AuthError> {
        if self.is_authenticated()? {
            Ok(())
        } else {
            Err(AuthError::Unauthenticated)
        }
    }

    /// Check credentials and open a session. Returns its token.
    pub fn open_session(&self, username: &str, password: &str) -> Result<String, AuthError> {
        self.check(username, password)?;
        let token = Uuid::new_v4().simple().to_string();
        self.sessions.set(&session_key(&token), "true")?;
        info!(%username, "opened session");
        Ok(token)
    }

    /// Fails with [`AuthError::Unauthenticated`] unless `token` names an open
    /// session.
    pub fn verify_session(&self, token: &str) -> Result<(), AuthError> {
        match self.sessions.get(&session_key(token))?.as_deref() {
            Some("true") => Ok(()),
            _ => Err(AuthError::Unauthenticated),
        }
    }

    pub fn close_session(&self, token: &str) -> Result<(), AuthError> {
        self.sessions.remove(&session_key(token))?;
        info!("closed session");
        Ok(())
    }

    fn check(&self, username: &str, password: &str) -> Result<(), AuthError> {
        if self.credentials.matches(username, password) {
            Ok(())
        } else {
            warn!(%username, "rejected login");
            Err(AuthError::InvalidCredentials)
        }
    }
}

fn session_key(token: &str) -> String {
    format!("{SESSION_FLAG}:{token}")
}
