//! OAuth authorized-user token handling.
//!
//! The token file holds long-lived refresh credentials produced by an
//! interactive authorization flow outside this process. Access tokens are
//! short-lived, so they are fetched through the refresh-token grant and
//! cached until shortly before expiry.

use std::path::Path;
use std::time::{Duration, Instant};

use reqwest::Client;
use tokio::sync::Mutex;

use super::api_types::{AuthorizedUser, TokenResponse};
use super::error::SheetsError;

/// Refresh the access token this long before its reported expiry.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// Supplies bearer tokens for Sheets API calls, refreshing as needed.
pub struct TokenManager {
    http: Client,
    credentials: AuthorizedUser,
    token_url: String,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenManager {
    /// Load refresh credentials from a token file.
    ///
    /// # Errors
    ///
    /// Returns `SheetsError::Auth` when the file is missing or malformed.
    pub fn from_file(
        path: impl AsRef<Path>,
        token_url: impl Into<String>,
        http: Client,
    ) -> Result<Self, SheetsError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| SheetsError::Auth(format!("cannot read token file {}: {e}", path.display())))?;
        let credentials: AuthorizedUser = serde_json::from_str(&raw)
            .map_err(|e| SheetsError::Auth(format!("malformed token file {}: {e}", path.display())))?;

        Ok(Self {
            http,
            credentials,
            token_url: token_url.into(),
            cached: Mutex::new(None),
        })
    }

    /// A currently valid access token, refreshed through the OAuth
    /// endpoint when the cached one is absent or near expiry.
    ///
    /// # Errors
    ///
    /// Returns `SheetsError::Auth` when the refresh grant is rejected and
    /// `SheetsError::Network` when the endpoint is unreachable.
    pub async fn access_token(&self) -> Result<String, SheetsError> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref()
            && token.expires_at > Instant::now()
        {
            return Ok(token.access_token.clone());
        }

        let token = self.refresh().await?;
        let access_token = token.access_token.clone();
        *cached = Some(token);
        Ok(access_token)
    }

    async fn refresh(&self) -> Result<CachedToken, SheetsError> {
        tracing::debug!("Refreshing sink access token");

        let params = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("refresh_token", self.credentials.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ];

        let response = self
            .http
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| SheetsError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SheetsError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(SheetsError::Auth(format!(
                "token refresh rejected (status {status}): {body}"
            )));
        }

        let token: TokenResponse =
            serde_json::from_str(&body).map_err(|e| SheetsError::JsonParse(e.to_string()))?;

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(EXPIRY_MARGIN);
        Ok(CachedToken {
            access_token: token.access_token,
            expires_at: Instant::now() + lifetime,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn token_file(dir: &tempfile::TempDir) -> std::path::PathBuf {
        let file_path = dir.path().join("token.json");
        let mut file = std::fs::File::create(&file_path).unwrap();
        write!(
            file,
            r#"{{"client_id": "cid", "client_secret": "secret", "refresh_token": "rt"}}"#
        )
        .unwrap();
        file_path
    }

    #[tokio::test]
    async fn missing_token_file_is_an_auth_error() {
        let result = TokenManager::from_file("/no/such/token.json", "unused", Client::new());
        assert!(matches!(result, Err(SheetsError::Auth(_))));
    }

    #[tokio::test]
    async fn refreshes_and_caches_the_access_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=rt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "at-1",
                "expires_in": 3600,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let manager = TokenManager::from_file(
            token_file(&dir),
            format!("{}/token", server.uri()),
            Client::new(),
        )
        .unwrap();

        assert_eq!(manager.access_token().await.unwrap(), "at-1");
        // Served from cache; the mock expects exactly one call.
        assert_eq!(manager.access_token().await.unwrap(), "at-1");
    }

    #[tokio::test]
    async fn rejected_refresh_is_an_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "invalid_grant",
            })))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let manager = TokenManager::from_file(
            token_file(&dir),
            format!("{}/token", server.uri()),
            Client::new(),
        )
        .unwrap();

        assert!(matches!(
            manager.access_token().await,
            Err(SheetsError::Auth(_))
        ));
    }
}
