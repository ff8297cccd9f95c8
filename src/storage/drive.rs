use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::core::{CoreError, CoreResult, DriveConfig};

use super::credentials::CredentialStore;

/// Margin subtracted from the provider's token lifetime so a token is
/// never used right at its expiry edge.
const TOKEN_EXPIRY_SLACK_SECS: u64 = 60;
const DEFAULT_TOKEN_TTL_SECS: u64 = 14_400;

struct CachedToken {
    secret: SecretString,
    expires_at: DateTime<Utc>,
}

/// Blob store client speaking the provider's OAuth2 + upload + sharing
/// HTTP API. Short-lived access tokens are minted from the stored refresh
/// token and cached; refreshes are serialized behind the mutex so a burst
/// of requests performs one exchange.
pub struct DriveClient {
    http: Client,
    config: DriveConfig,
    credentials: Arc<dyn CredentialStore>,
    token: Mutex<Option<CachedToken>>,
}

impl DriveClient {
    pub fn new(config: DriveConfig, credentials: Arc<dyn CredentialStore>) -> CoreResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(transport)?;
        Ok(DriveClient {
            http,
            config,
            credentials,
            token: Mutex::new(None),
        })
    }

    /// Uploads `bytes` to `path`, overwriting any previous revision.
    /// Returns the stored path. A stale access token is refreshed and the
    /// call replayed exactly once.
    pub async fn upload(&self, path: &str, bytes: Bytes) -> CoreResult<String> {
        let token = self.access_token(false).await?;
        match self.try_upload(&token, path, bytes.clone()).await {
            Err(CoreError::StorageAuth(reason)) => {
                tracing::debug!(%reason, "access token rejected, refreshing once");
                let token = self.access_token(true).await?;
                self.try_upload(&token, path, bytes).await
            }
            other => other,
        }
    }

    /// Returns a shareable URL for `path`: creates a link, or when the
    /// provider reports one already exists, lists direct links and takes
    /// the first. No link either way surfaces as `LinkUnavailable`.
    pub async fn get_or_create_share_link(&self, path: &str) -> CoreResult<String> {
        let token = self.access_token(false).await?;
        match self.try_share_link(&token, path).await {
            Err(CoreError::StorageAuth(reason)) => {
                tracing::debug!(%reason, "access token rejected, refreshing once");
                let token = self.access_token(true).await?;
                self.try_share_link(&token, path).await
            }
            other => other,
        }
    }

    /// Rewrites a share URL so browsers render the file instead of the
    /// provider's download interstitial.
    pub fn to_direct_view(url: &str) -> String {
        if url.contains("?dl=0") {
            url.replace("?dl=0", "?raw=1")
        } else {
            format!("{url}?raw=1")
        }
    }

    /// The provider consent page the connect flow redirects to. Requests
    /// offline access so the callback receives a refresh token.
    pub fn authorize_url(&self) -> String {
        format!(
            "{}?client_id={}&response_type=code&token_access_type=offline&redirect_uri={}",
            self.config.authorize_url,
            urlencoding::encode(&self.config.app_key),
            urlencoding::encode(&self.config.redirect_uri),
        )
    }

    /// Completes the OAuth connect flow, returning the refresh token to
    /// persist in the credential store.
    pub async fn exchange_auth_code(&self, code: &str) -> CoreResult<SecretString> {
        let response = self
            .http
            .post(format!("{}/oauth2/token", self.config.api_base_url))
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("client_id", self.config.app_key.as_str()),
                ("client_secret", self.config.app_secret.expose_secret().as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
            ])
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CoreError::StorageAuth(format!(
                "authorization code exchange failed with {status}: {body}"
            )));
        }
        let token: AuthCodeResponse = response.json().await.map_err(transport)?;
        token
            .refresh_token
            .map(SecretString::new)
            .ok_or_else(|| {
                CoreError::StorageAuth(
                    "provider returned no refresh token; offline access was not granted"
                        .to_string(),
                )
            })
    }

    async fn access_token(&self, force_refresh: bool) -> CoreResult<SecretString> {
        let mut guard = self.token.lock().await;
        if !force_refresh {
            if let Some(cached) = guard.as_ref() {
                if cached.expires_at > Utc::now() {
                    return Ok(SecretString::new(cached.secret.expose_secret().clone()));
                }
            }
        }

        let refreshed = self.exchange_refresh_token().await?;
        let secret = SecretString::new(refreshed.secret.expose_secret().clone());
        *guard = Some(refreshed);
        Ok(secret)
    }

    async fn exchange_refresh_token(&self) -> CoreResult<CachedToken> {
        let refresh = self.credentials.refresh_token().await?;
        let response = self
            .http
            .post(format!("{}/oauth2/token", self.config.api_base_url))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh.expose_secret().as_str()),
                ("client_id", self.config.app_key.as_str()),
                ("client_secret", self.config.app_secret.expose_secret().as_str()),
            ])
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CoreError::StorageAuth(format!(
                "refresh token exchange failed with {status}: {body}"
            )));
        }

        let token: TokenResponse = response.json().await.map_err(transport)?;
        let ttl = token
            .expires_in
            .unwrap_or(DEFAULT_TOKEN_TTL_SECS)
            .saturating_sub(TOKEN_EXPIRY_SLACK_SECS);
        tracing::debug!(ttl_secs = ttl, "drive access token refreshed");
        Ok(CachedToken {
            secret: SecretString::new(token.access_token),
            expires_at: Utc::now() + chrono::Duration::seconds(ttl as i64),
        })
    }

    async fn try_upload(&self, token: &SecretString, path: &str, bytes: Bytes) -> CoreResult<String> {
        let arg = serde_json::to_string(&UploadArg {
            path,
            mode: "overwrite",
            autorename: false,
        })?;
        let response = self
            .http
            .post(format!("{}/2/files/upload", self.config.content_base_url))
            .bearer_auth(token.expose_secret())
            .header("Dropbox-API-Arg", arg)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes)
            .send()
            .await
            .map_err(transport)?;

        let response = fail_for_status(response, path).await?;
        let uploaded: UploadResponse = response.json().await.map_err(transport)?;
        tracing::info!(path = %uploaded.path_lower, "uploaded file to drive");
        Ok(uploaded.path_display.unwrap_or(uploaded.path_lower))
    }

    async fn try_share_link(&self, token: &SecretString, path: &str) -> CoreResult<String> {
        if let Some(url) = self.create_share_link(token, path).await? {
            return Ok(url);
        }
        tracing::debug!(%path, "shared link already exists, listing");
        let mut links = self.list_share_links(token, path).await?;
        if links.is_empty() {
            return Err(CoreError::LinkUnavailable(path.to_string()));
        }
        Ok(links.remove(0))
    }

    async fn create_share_link(&self, token: &SecretString, path: &str) -> CoreResult<Option<String>> {
        let response = self
            .http
            .post(format!(
                "{}/2/sharing/create_shared_link_with_settings",
                self.config.api_base_url
            ))
            .bearer_auth(token.expose_secret())
            .json(&serde_json::json!({ "path": path }))
            .send()
            .await
            .map_err(transport)?;

        if response.status() == StatusCode::CONFLICT {
            let body = response.text().await.unwrap_or_default();
            if body.contains("shared_link_already_exists") {
                return Ok(None);
            }
            return Err(conflict_error(path, body));
        }
        let response = fail_for_status(response, path).await?;
        let link: SharedLink = response.json().await.map_err(transport)?;
        Ok(Some(link.url))
    }

    async fn list_share_links(&self, token: &SecretString, path: &str) -> CoreResult<Vec<String>> {
        let response = self
            .http
            .post(format!("{}/2/sharing/list_shared_links", self.config.api_base_url))
            .bearer_auth(token.expose_secret())
            .json(&serde_json::json!({ "path": path, "direct_only": true }))
            .send()
            .await
            .map_err(transport)?;

        let response = fail_for_status(response, path).await?;
        let listing: ListLinksResponse = response.json().await.map_err(transport)?;
        Ok(listing.links.into_iter().map(|link| link.url).collect())
    }
}

async fn fail_for_status(response: Response, context: &str) -> CoreResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(match status {
        StatusCode::UNAUTHORIZED => CoreError::StorageAuth(format!("unauthorized: {body}")),
        StatusCode::TOO_MANY_REQUESTS => CoreError::RateLimited,
        StatusCode::NOT_FOUND => CoreError::NotFound(context.to_string()),
        StatusCode::CONFLICT => conflict_error(context, body),
        _ => CoreError::Storage(format!("request failed with {status}: {body}")),
    })
}

fn conflict_error(context: &str, body: String) -> CoreError {
    if body.contains("not_found") {
        CoreError::NotFound(context.to_string())
    } else {
        CoreError::Storage(format!("conflict: {body}"))
    }
}

fn transport(err: reqwest::Error) -> CoreError {
    CoreError::Storage(err.to_string())
}

#[derive(Serialize)]
struct UploadArg<'a> {
    path: &'a str,
    mode: &'a str,
    autorename: bool,
}

#[derive(Deserialize)]
struct UploadResponse {
    path_lower: String,
    #[serde(default)]
    path_display: Option<String>,
}

#[derive(Deserialize)]
struct SharedLink {
    url: String,
}

#[derive(Deserialize)]
struct ListLinksResponse {
    #[serde(default)]
    links: Vec<SharedLink>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Deserialize)]
struct AuthCodeResponse {
    #[serde(default)]
    refresh_token: Option<String>,
}
