//! Firebase Identity Toolkit REST client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::identity::{AuthSession, Credentials, IdentityProvider};
use crate::error::AuthError;

pub const DEFAULT_IDENTITY_URL: &str = "https://identitytoolkit.googleapis.com";

const DEFAULT_EXPIRES_IN: u64 = 3600;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<&'a str>,
    return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PasswordResponse {
    local_id: String,
    email: String,
    #[serde(default)]
    display_name: Option<String>,
    id_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Email/password accounts against the Identity Toolkit (or its emulator)
#[derive(Debug, Clone)]
pub struct FirebaseIdentity {
    client: Client,
    api_key: String,
    base_url: String,
}

impl FirebaseIdentity {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(Duration::from_secs(15)).build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/v1/accounts:{}", self.base_url, method)
    }

    async fn call(&self, method: &str, request: PasswordRequest<'_>) -> Result<AuthSession, AuthError> {
        debug!("Identity toolkit call: accounts:{}", method);

        let response = self
            .client
            .post(self.endpoint(method))
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = classify_error_body(&body);
            warn!("accounts:{} failed with {}: {}", method, status, err.code());
            return Err(err);
        }

        let body: PasswordResponse = response.json().await?;
        Ok(AuthSession {
            uid: body.local_id,
            email: body.email,
            display_name: body.display_name.filter(|n| !n.is_empty()),
            id_token: body.id_token,
            refresh_token: body.refresh_token,
            expires_in_seconds: body
                .expires_in
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_EXPIRES_IN),
        })
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentity {
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSession, AuthError> {
        let session = self
            .call(
                "signInWithPassword",
                PasswordRequest {
                    email: credentials.email(),
                    password: credentials.password(),
                    display_name: None,
                    return_secure_token: true,
                },
            )
            .await?;

        info!("Signed in {} via identity toolkit", session.uid);
        Ok(session)
    }

    async fn sign_up(
        &self,
        credentials: &Credentials,
        display_name: Option<&str>,
    ) -> Result<AuthSession, AuthError> {
        let session = self
            .call(
                "signUp",
                PasswordRequest {
                    email: credentials.email(),
                    password: credentials.password(),
                    display_name,
                    return_secure_token: true,
                },
            )
            .await?;

        info!("Created account {} via identity toolkit", session.uid);
        Ok(session)
    }

    fn name(&self) -> &'static str {
        "firebase"
    }
}

/// Classify an Identity Toolkit error body; unparseable bodies are `Unknown`
pub fn classify_error_body(body: &str) -> AuthError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => AuthError::from_code(&envelope.error.message),
        Err(_) => AuthError::Unknown(body.chars().take(200).collect()),
    }
}
