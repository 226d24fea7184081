//! Authentication
//!
//! The OAuth2/OIDC sign-in flow belongs to the external identity provider.
//! This module only consumes its result: an account plus an access token,
//! behind the [`IdentityProvider`] trait.

use crate::error::{DpwError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::{debug, info};

pub const ACCOUNT_ENV: &str = "DPW_ACCOUNT";
pub const ACCOUNT_NAME_ENV: &str = "DPW_ACCOUNT_NAME";
pub const ACCESS_TOKEN_ENV: &str = "DPW_ACCESS_TOKEN";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CacheLocation {
    /// Sign in again after the client exits
    SessionStorage,
    LocalStorage,
}

/// Identity provider registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub authority: String,
    #[serde(default)]
    pub redirect_uri: String,
    #[serde(default = "default_cache_location")]
    pub cache_location: CacheLocation,
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
}

fn default_cache_location() -> CacheLocation {
    CacheLocation::SessionStorage
}

fn default_scopes() -> Vec<String> {
    vec!["User.Read".to_string()]
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            authority: String::new(),
            redirect_uri: String::new(),
            cache_location: default_cache_location(),
            scopes: default_scopes(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    /// Human name, when the provider knows it
    pub name: Option<String>,
    /// Sign-in name, usually an email address
    pub username: String,
}

impl Account {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.username)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthSession {
    Unauthenticated,
    Authenticated(Account),
}

impl AuthSession {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthSession::Authenticated(_))
    }

    pub fn account(&self) -> Option<&Account> {
        match self {
            AuthSession::Authenticated(account) => Some(account),
            AuthSession::Unauthenticated => None,
        }
    }
}

/// Source of the signed-in account and its tokens
pub trait IdentityProvider: Send + Sync {
    fn active_account(&self) -> Option<Account>;

    /// Pick up a session established by the provider's sign-in flow.
    fn login(&self) -> Result<Account>;

    fn logout(&self) -> Result<()>;

    /// Access token for `scopes`, without user interaction.
    fn acquire_token_silent(&self, scopes: &[String]) -> Result<String>;

    fn session(&self) -> AuthSession {
        match self.active_account() {
            Some(account) => AuthSession::Authenticated(account),
            None => AuthSession::Unauthenticated,
        }
    }
}

#[derive(Debug, Clone)]
struct CachedSession {
    account: Account,
    access_token: Option<String>,
}

/// Session handed over through environment variables
/// (`DPW_ACCOUNT`, `DPW_ACCOUNT_NAME`, `DPW_ACCESS_TOKEN`) by whatever ran the
/// sign-in flow.
#[derive(Debug, Default)]
pub struct EnvironmentIdentity {
    session: Mutex<Option<CachedSession>>,
}

impl EnvironmentIdentity {
    /// Build and pick up an existing session if one is present.
    pub fn from_env() -> Self {
        let identity = Self::default();
        if let Some(session) = read_env_session() {
            debug!(username = %session.account.username, "Existing session found");
            *identity.lock() = Some(session);
        }
        identity
    }

    /// Build with an explicit session; used by tests and embedding callers.
    pub fn with_session(account: Account, access_token: Option<String>) -> Self {
        Self {
            session: Mutex::new(Some(CachedSession { account, access_token })),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<CachedSession>> {
        match self.session.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn read_env_session() -> Option<CachedSession> {
    let username = std::env::var(ACCOUNT_ENV).ok().filter(|v| !v.trim().is_empty())?;
    let name = std::env::var(ACCOUNT_NAME_ENV).ok().filter(|v| !v.trim().is_empty());
    let access_token = std::env::var(ACCESS_TOKEN_ENV).ok().filter(|v| !v.trim().is_empty());
    Some(CachedSession {
        account: Account { name, username },
        access_token,
    })
}

impl IdentityProvider for EnvironmentIdentity {
    fn active_account(&self) -> Option<Account> {
        self.lock().as_ref().map(|s| s.account.clone())
    }

    fn login(&self) -> Result<Account> {
        let session = read_env_session().ok_or_else(|| {
            DpwError::Auth(format!(
                "No session available. Complete sign-in and export {}.",
                ACCOUNT_ENV
            ))
        })?;
        let account = session.account.clone();
        *self.lock() = Some(session);
        info!(username = %account.username, "Signed in");
        Ok(account)
    }

    fn logout(&self) -> Result<()> {
        if let Some(session) = self.lock().take() {
            info!(username = %session.account.username, "Signed out");
        }
        Ok(())
    }

    fn acquire_token_silent(&self, scopes: &[String]) -> Result<String> {
        let guard = self.lock();
        let session = guard
            .as_ref()
            .ok_or_else(|| DpwError::Auth("No signed-in account".to_string()))?;
        session.access_token.clone().ok_or_else(|| {
            DpwError::Auth(format!("No access token cached for scopes {}", scopes.join(" ")))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Account {
        Account {
            name: Some("Alice Example".into()),
            username: "alice@example.com".into(),
        }
    }

    #[test]
    fn test_session_lifecycle() {
        let identity = EnvironmentIdentity::with_session(account(), Some("tok".into()));
        assert!(identity.session().is_authenticated());
        assert_eq!(identity.acquire_token_silent(&default_scopes()).unwrap(), "tok");

        identity.logout().unwrap();
        assert_eq!(identity.session(), AuthSession::Unauthenticated);
        assert!(identity.acquire_token_silent(&default_scopes()).is_err());
    }

    #[test]
    fn test_missing_token_is_auth_error() {
        let identity = EnvironmentIdentity::with_session(account(), None);
        let err = identity.acquire_token_silent(&default_scopes()).unwrap_err();
        assert!(matches!(err, DpwError::Auth(_)));
    }

    #[test]
    fn test_display_name_falls_back_to_username() {
        let anonymous = Account {
            name: None,
            username: "bob@example.com".into(),
        };
        assert_eq!(anonymous.display_name(), "bob@example.com");
        assert_eq!(account().display_name(), "Alice Example");
    }

    #[test]
    fn test_auth_config_defaults_from_toml() {
        let config: AuthConfig = toml::from_str("client_id = \"abc\"").unwrap();
        assert_eq!(config.client_id, "abc");
        assert_eq!(config.cache_location, CacheLocation::SessionStorage);
        assert_eq!(config.scopes, vec!["User.Read".to_string()]);
    }
}
