// --- File: crates/agendify_gcal/src/auth.rs ---
//! OAuth2 credential lifecycle for the shared salon calendar.
//!
//! One credential exists per process. `AuthLifecycle` owns it: the
//! authorization-code exchange installs it, reads refresh it lazily when the
//! expiry has passed, and every mutation is rewritten to durable storage so
//! the authorization survives restarts.

use agendify_config::OAuthConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authorization code exchange rejected: {0}")]
    ExchangeRejected(String),
    #[error("Token refresh rejected: {0}")]
    RefreshRejected(String),
    #[error("Provider granted no refresh token")]
    MissingRefreshToken,
    #[error("Token request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Credential storage error: {0}")]
    Storage(#[from] std::io::Error),
    #[error("Credential serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// The OAuth2 credential acting on the shared calendar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix timestamp after which the access token is no longer valid.
    pub expires_at: i64,
}

impl Credential {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.expires_at
    }
}

/// Durable holder of the single serialized [`Credential`].
///
/// Read once at process start, rewritten on every exchange and refresh.
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        TokenStore {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Loads the persisted credential, if one exists.
    pub fn load(&self) -> Result<Option<Credential>, AuthError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = std::fs::read_to_string(&self.path)?;
        let credential = serde_json::from_str(&json)?;
        Ok(Some(credential))
    }

    /// Persists the credential. Writes to a sibling temp file and renames it
    /// into place, so a crash mid-write never leaves a corrupt record.
    pub fn save(&self, credential: &Credential) -> Result<(), AuthError> {
        let json = serde_json::to_string_pretty(credential)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Raw token-endpoint response for both grant types.
#[derive(Debug, Deserialize)]
struct TokenEndpointResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: i64,
}

/// Manages the authorization-code exchange, credential installation and
/// expiry-triggered refresh.
pub struct AuthLifecycle {
    oauth: OAuthConfig,
    auth_url: String,
    token_url: String,
    http: reqwest::Client,
    store: TokenStore,
    // Held across the refresh round trip: concurrent callers racing an
    // expired credential serialize on one in-flight refresh and all observe
    // its outcome.
    credential: Mutex<Option<Credential>>,
}

impl AuthLifecycle {
    /// Creates the lifecycle, loading any credential persisted by a previous
    /// run.
    pub fn new(oauth: OAuthConfig, store: TokenStore) -> Result<Self, AuthError> {
        let credential = store.load()?;
        if credential.is_some() {
            info!("Loaded persisted calendar credential");
        }
        Ok(AuthLifecycle {
            oauth,
            auth_url: GOOGLE_AUTH_URL.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            http: reqwest::Client::new(),
            store,
            credential: Mutex::new(credential),
        })
    }

    /// Points the lifecycle at alternative provider endpoints.
    pub fn with_endpoints(mut self, auth_url: &str, token_url: &str) -> Self {
        self.auth_url = auth_url.to_string();
        self.token_url = token_url.to_string();
        self
    }

    /// Builds the external authorization redirect target requesting offline
    /// access and the calendar scope. Pure, safe to call in any state.
    pub fn authorization_url(&self) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=offline&prompt=consent",
            self.auth_url,
            urlencoding::encode(&self.oauth.client_id),
            urlencoding::encode(&self.oauth.redirect_uri),
            urlencoding::encode(CALENDAR_SCOPE),
        )
    }

    /// Performs the one-time authorization-code-for-token exchange.
    ///
    /// On success the credential is installed and persisted. A rejected code
    /// (including a code the provider already consumed) surfaces as
    /// [`AuthError::ExchangeRejected`] and the state stays unauthorized; the
    /// exchange is never retried automatically.
    pub async fn exchange_code(&self, code: &str) -> Result<Credential, AuthError> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("client_id", self.oauth.client_id.as_str()),
                ("client_secret", self.oauth.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
                ("redirect_uri", self.oauth.redirect_uri.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AuthError::ExchangeRejected(detail));
        }
        let tokens: TokenEndpointResponse = response.json().await?;

        let mut guard = self.credential.lock().await;
        // Google omits the refresh token on re-consent; keep the one we have.
        let refresh_token = tokens
            .refresh_token
            .or_else(|| guard.as_ref().map(|c| c.refresh_token.clone()))
            .ok_or(AuthError::MissingRefreshToken)?;

        let credential = Credential {
            access_token: tokens.access_token,
            refresh_token,
            expires_at: Utc::now().timestamp() + tokens.expires_in,
        };
        self.store.save(&credential)?;
        *guard = Some(credential.clone());
        info!("Calendar credential installed");
        Ok(credential)
    }

    /// Returns a usable credential, or `None` when the service is
    /// unauthorized.
    ///
    /// An expired credential triggers exactly one refresh attempt under the
    /// lifecycle lock. Refresh success rewrites durable storage; refresh
    /// failure demotes the state to unauthorized and the caller must re-run
    /// the full authorization flow.
    pub async fn current_credential(&self) -> Option<Credential> {
        let mut guard = self.credential.lock().await;
        let credential = guard.as_ref()?.clone();
        if !credential.is_expired(Utc::now()) {
            return Some(credential);
        }

        match self.refresh(&credential).await {
            Ok(refreshed) => {
                if let Err(err) = self.store.save(&refreshed) {
                    // The refreshed token is valid even if persisting it
                    // failed; the next restart will need a new authorization.
                    warn!("Failed to persist refreshed credential: {err}");
                }
                *guard = Some(refreshed.clone());
                info!("Calendar credential refreshed");
                Some(refreshed)
            }
            Err(err) => {
                warn!("Credential refresh failed, re-authorization required: {err}");
                *guard = None;
                None
            }
        }
    }

    async fn refresh(&self, credential: &Credential) -> Result<Credential, AuthError> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("client_id", self.oauth.client_id.as_str()),
                ("client_secret", self.oauth.client_secret.as_str()),
                ("refresh_token", credential.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AuthError::RefreshRejected(detail));
        }
        let tokens: TokenEndpointResponse = response.json().await?;

        Ok(Credential {
            access_token: tokens.access_token,
            refresh_token: tokens
                .refresh_token
                .unwrap_or_else(|| credential.refresh_token.clone()),
            expires_at: Utc::now().timestamp() + tokens.expires_in,
        })
    }
}
