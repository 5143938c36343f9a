//! HTTP client for the `/api/auth/*` endpoints.

use crate::error::api::ApiError;

use common::RedactedToken;
use models::{ApiResponse, AuthMode, Credentials, ProfileUpdate, UserProfile};

use std::time::Duration;

use const_format::concatcp;
use log::debug;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_TIMEOUT_DURATION: Duration = Duration::from_secs(30);

/// Header the server reads the session token from.
pub const TOKEN_HEADER_KEY: &str = "token";

const AUTH_ENDPOINT_PREFIX: &str = "api/auth/";
const CHECK_ENDPOINT: &str = concatcp!(AUTH_ENDPOINT_PREFIX, "check");
const UPDATE_PROFILE_ENDPOINT: &str = concatcp!(AUTH_ENDPOINT_PREFIX, "update-profile");

/// Result of a successful signup/login.
#[derive(Debug, Clone)]
pub struct AuthGrant {
    pub user: UserProfile,
    pub token: RedactedToken,
    pub message: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Auth API client.
///
/// The client holds no credential of its own: callers pass the session token
/// per request, so the header can never outlive the session that owns it.
#[derive(Clone)]
pub struct AuthClient {
    base_url: Url,
    client: Client,
}

impl AuthClient {
    pub fn new(base_url_str: &str) -> Result<Self, ApiError> {
        Self::with_timeout(base_url_str, DEFAULT_TIMEOUT_DURATION)
    }

    pub fn with_timeout(base_url_str: &str, timeout: Duration) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(base_url_str)?;

        // Url::join replaces the last segment unless the base ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn prepare_request(
        &self,
        request: RequestBuilder,
        token: Option<&RedactedToken>,
    ) -> RequestBuilder {
        match token {
            Some(token) => request.header(TOKEN_HEADER_KEY, token.as_str()),
            None => request,
        }
    }

    /// `GET /api/auth/check`: ask the server whether `token` is still valid.
    pub async fn check(&self, token: &RedactedToken) -> Result<UserProfile, ApiError> {
        let url = self.base_url.join(CHECK_ENDPOINT)?;

        let response = self
            .prepare_request(self.client.get(url), Some(token))
            .send()
            .await?;
        let envelope = read_envelope(response).await?;

        envelope
            .user
            .ok_or_else(|| ApiError::malformed("Auth check response did not include a user"))
    }

    /// `POST /api/auth/{signup|login}`.
    pub async fn authenticate(
        &self,
        mode: AuthMode,
        credentials: &Credentials,
    ) -> Result<AuthGrant, ApiError> {
        let url = self
            .base_url
            .join(&format!("{AUTH_ENDPOINT_PREFIX}{}", mode.path_segment()))?;

        debug!("Submitting {mode} for {}", credentials.email);

        let response = self
            .prepare_request(self.client.post(url), None)
            .json(credentials)
            .send()
            .await?;
        let envelope = read_envelope(response).await?;

        let user = envelope
            .user
            .ok_or_else(|| ApiError::malformed(format!("{mode} response did not include a user")))?;

        let token = envelope
            .token
            .filter(|t| !t.is_empty())
            .map(RedactedToken::new)
            .ok_or_else(|| ApiError::malformed(format!("{mode} response did not include a token")))?;

        Ok(AuthGrant {
            user,
            token,
            message: envelope.message,
        })
    }

    /// `PUT /api/auth/update-profile`.
    ///
    /// Without a token the server answers 401, which surfaces as
    /// [`ApiError::Rejected`] carrying the server's message.
    pub async fn update_profile(
        &self,
        token: Option<&RedactedToken>,
        update: &ProfileUpdate,
    ) -> Result<UserProfile, ApiError> {
        let url = self.base_url.join(UPDATE_PROFILE_ENDPOINT)?;

        let response = self
            .prepare_request(self.client.put(url), token)
            .json(update)
            .send()
            .await?;
        let envelope = read_envelope(response).await?;

        envelope
            .user
            .ok_or_else(|| ApiError::malformed("Profile update response did not include a user"))
    }
}

/// Turns an HTTP response into an envelope, mapping every refusal to
/// [`ApiError::Rejected`] with the server's own message when it sent one.
async fn read_envelope(response: Response) -> Result<ApiResponse, ApiError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()));

        return Err(ApiError::rejected(status.as_u16(), message));
    }

    let envelope: ApiResponse = serde_json::from_str(&body)?;

    if !envelope.success {
        return Err(ApiError::rejected(
            status.as_u16(),
            envelope.message_or("Request was not successful"),
        ));
    }

    Ok(envelope)
}
