//! Directory profile of the signed-in user

use crate::auth::{Account, IdentityProvider};
use crate::error::{DpwError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const DEFAULT_GRAPH_BASE: &str = "https://graph.microsoft.com/v1.0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub display_name: String,
    pub job_title: Option<String>,
    pub department: Option<String>,
    pub mail: String,
}

impl UserProfile {
    /// Profile built only from the account, used when the directory is unreachable
    pub fn from_account(account: &Account) -> Self {
        Self {
            display_name: account.name.clone().unwrap_or_else(|| "User".to_string()),
            job_title: None,
            department: None,
            mail: account.username.clone(),
        }
    }
}

/// Subset of the directory's `/me` document
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DirectoryUser {
    display_name: Option<String>,
    job_title: Option<String>,
    department: Option<String>,
    mail: Option<String>,
    user_principal_name: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[derive(Clone)]
pub struct UserProfileService {
    http: reqwest::Client,
    graph_base: String,
    scopes: Vec<String>,
}

impl UserProfileService {
    pub fn new(http: reqwest::Client, graph_base: &str, scopes: Vec<String>) -> Self {
        Self {
            http,
            graph_base: graph_base.trim_end_matches('/').to_string(),
            scopes,
        }
    }

    /// Profile of the active account; `None` when nobody is signed in.
    ///
    /// Any token or directory failure falls back to the account's own data.
    pub async fn fetch(&self, identity: &dyn IdentityProvider) -> Option<UserProfile> {
        let account = identity.active_account()?;
        match self.fetch_remote(identity, &account).await {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!(error = %e, "Error fetching user profile, using account info");
                Some(UserProfile::from_account(&account))
            }
        }
    }

    async fn fetch_remote(&self, identity: &dyn IdentityProvider, account: &Account) -> Result<UserProfile> {
        let token = identity.acquire_token_silent(&self.scopes)?;
        let url = format!("{}/me", self.graph_base);
        debug!(url = %url, "Fetching directory profile");

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| DpwError::network(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DpwError::Http { status });
        }

        let user: DirectoryUser = response.json().await.map_err(|e| DpwError::decode(&url, e))?;

        Ok(UserProfile {
            display_name: non_empty(user.display_name)
                .or_else(|| account.name.clone())
                .unwrap_or_else(|| "User".to_string()),
            job_title: non_empty(user.job_title),
            department: non_empty(user.department),
            mail: non_empty(user.mail)
                .or_else(|| non_empty(user.user_principal_name))
                .unwrap_or_else(|| account.username.clone()),
        })
    }
}
