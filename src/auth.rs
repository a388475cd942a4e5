//! Token lookups against the hosted identity service.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::constants::OUTBOUND_TIMEOUT;

/// Errors from the identity service.
#[derive(Error, Debug)]
pub enum IdentityError {
    /// Couldn't reach the service or read its response.
    #[error("identity request failed: {0}")]
    Transport(String),

    /// The service answered with an unexpected status.
    #[error("identity service returned status {0}")]
    Status(u16),
}

impl From<reqwest::Error> for IdentityError {
    fn from(err: reqwest::Error) -> Self {
        IdentityError::Transport(err.to_string())
    }
}

/// Resolves bearer tokens to user ids.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Returns the user id for a token, `None` if the token isn't valid.
    async fn user_for_token(&self, token: &str) -> Result<Option<String>, IdentityError>;
}

#[derive(Deserialize, Debug)]
struct HostedUser {
    id: String,
}

/// Asks the hosted auth service (`GET {auth_url}/auth/v1/user`) who owns a token.
#[derive(Clone, Debug)]
pub struct HostedIdentity {
    client: reqwest::Client,
    auth_url: String,
    anon_key: String,
}

impl HostedIdentity {
    /// Builds a client for the given service URL and public key.
    pub fn new(auth_url: &str, anon_key: &str) -> Result<Self, IdentityError> {
        let client = reqwest::Client::builder()
            .timeout(OUTBOUND_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            auth_url: auth_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        })
    }
}

#[async_trait]
impl IdentityProvider for HostedIdentity {
    async fn user_for_token(&self, token: &str) -> Result<Option<String>, IdentityError> {
        let resp = self
            .client
            .get(format!("{}/auth/v1/user", self.auth_url))
            .bearer_auth(token)
            .header("apikey", &self.anon_key)
            .send()
            .await?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(IdentityError::Status(status.as_u16()));
        }
        let user: HostedUser = resp.json().await?;
        Ok(Some(user.id))
    }
}
