//! Sheets values API client with retry logic.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;

use crate::application::ports::{SinkError, TableSinkPort};
use crate::domain::sheet::SheetRow;

use super::api_types::{ApiErrorResponse, AppendBody, AppendResponse, ValueRange};
use super::auth::TokenManager;
use super::config::{RetryConfig, SheetsConfig};
use super::error::SheetsError;

/// Append after existing data and let the sink parse cell contents, so
/// numeric strings become numbers and `=`-prefixed cells become formulas.
const APPEND_QUERY: &str = "valueInputOption=USER_ENTERED&insertDataOption=INSERT_ROWS";

/// `TableSinkPort` adapter over the Sheets v4 values API.
pub struct SheetsSink {
    client: Client,
    tokens: TokenManager,
    spreadsheet_id: String,
    base_url: String,
    retry_config: RetryConfig,
}

impl SheetsSink {
    /// Create a sink from config, loading credentials from the token file.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built or the token
    /// file is missing or malformed.
    pub fn new(config: &SheetsConfig) -> Result<Self, SheetsError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SheetsError::Network(e.to_string()))?;

        let tokens =
            TokenManager::from_file(&config.token_path, config.token_url.clone(), client.clone())?;

        Ok(Self {
            client,
            tokens,
            spreadsheet_id: config.spreadsheet_id.clone(),
            base_url: config.base_url.clone(),
            retry_config: config.retry.clone(),
        })
    }

    fn values_url(&self, suffix: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{suffix}",
            self.base_url, self.spreadsheet_id
        )
    }

    /// Internal request implementation with retry logic.
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<T, SheetsError> {
        let mut backoff = ExponentialBackoff::new(&self.retry_config);

        loop {
            let token = self.tokens.access_token().await?;
            let mut request = self
                .client
                .request(method.clone(), url)
                .bearer_auth(token);
            if let Some(b) = body {
                request = request.json(b);
            }

            let response = match request.send().await {
                Ok(resp) => resp,
                Err(e) => {
                    if let Some(delay) = backoff.next_backoff() {
                        tracing::warn!(
                            error = %e,
                            delay_ms = delay.as_millis(),
                            attempt = backoff.attempt,
                            "Network error, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(SheetsError::MaxRetriesExceeded {
                        attempts: backoff.attempt,
                    });
                }
            };

            let status = response.status();

            if status.is_success() {
                let text = response
                    .text()
                    .await
                    .map_err(|e| SheetsError::Network(e.to_string()))?;
                return serde_json::from_str(&text)
                    .map_err(|e| SheetsError::JsonParse(e.to_string()));
            }

            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok());

            let error_body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiErrorResponse>(&error_body) {
                Ok(err) => err.error.message,
                Err(_) => error_body,
            };

            match categorize_status(status) {
                ErrorCategory::RateLimited => {
                    let delay = retry_after
                        .map(Duration::from_secs)
                        .or_else(|| backoff.next_backoff());
                    if let Some(delay) = delay {
                        tracing::warn!(
                            delay_ms = delay.as_millis(),
                            "Rate limited, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(SheetsError::MaxRetriesExceeded {
                        attempts: backoff.attempt,
                    });
                }
                ErrorCategory::Retryable => {
                    if let Some(delay) = backoff.next_backoff() {
                        tracing::warn!(
                            status = status.as_u16(),
                            message = %message,
                            delay_ms = delay.as_millis(),
                            "Retryable error, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(SheetsError::MaxRetriesExceeded {
                        attempts: backoff.attempt,
                    });
                }
                ErrorCategory::NonRetryable => {
                    return match status {
                        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                            Err(SheetsError::Auth(message))
                        }
                        _ => Err(SheetsError::Api {
                            status: status.as_u16(),
                            message,
                        }),
                    };
                }
            }
        }
    }
}

#[async_trait]
impl TableSinkPort for SheetsSink {
    async fn read(&self, range: &str) -> Result<Vec<Vec<String>>, SinkError> {
        let url = self.values_url(range);
        let value_range: ValueRange = self.request(Method::GET, &url, None).await?;

        Ok(value_range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect())
    }

    async fn append(&self, destination: &str, rows: &[SheetRow]) -> Result<u64, SinkError> {
        let url = format!("{}:append?{APPEND_QUERY}", self.values_url(destination));
        let body = serde_json::to_value(AppendBody { values: rows })
            .map_err(|e| SinkError::InvalidResponse(e.to_string()))?;

        let response: AppendResponse = self.request(Method::POST, &url, Some(&body)).await?;
        Ok(response.updates.updated_cells)
    }
}

/// Text of a cell as the values API returned it. Cells arrive as JSON
/// strings under the default `FORMATTED_VALUE` rendering; other JSON types
/// are stringified.
fn cell_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Error category for determining retry behavior.
enum ErrorCategory {
    RateLimited,
    Retryable,
    NonRetryable,
}

/// Categorize HTTP status code for retry handling.
const fn categorize_status(status: StatusCode) -> ErrorCategory {
    match status.as_u16() {
        429 => ErrorCategory::RateLimited,
        408 | 500 | 502 | 503 | 504 => ErrorCategory::Retryable,
        _ => ErrorCategory::NonRetryable,
    }
}

/// Exponential backoff calculator.
struct ExponentialBackoff {
    attempt: u32,
    max_attempts: u32,
    current_backoff: Duration,
    max_backoff: Duration,
    multiplier: f64,
}

impl ExponentialBackoff {
    const fn new(config: &RetryConfig) -> Self {
        Self {
            attempt: 0,
            max_attempts: config.max_attempts,
            current_backoff: config.initial_backoff,
            max_backoff: config.max_backoff,
            multiplier: config.multiplier,
        }
    }

    fn next_backoff(&mut self) -> Option<Duration> {
        self.attempt += 1;
        if self.attempt >= self.max_attempts {
            return None;
        }

        let backoff = self.current_backoff;
        self.current_backoff = Duration::from_secs_f64(
            (self.current_backoff.as_secs_f64() * self.multiplier)
                .min(self.max_backoff.as_secs_f64()),
        );

        Some(backoff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sheet::CellValue;
    use std::io::Write;
    use wiremock::matchers::{body_string_contains, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mock_sink(server: &MockServer) -> SheetsSink {
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "test-token",
                "expires_in": 3600,
            })))
            .mount(server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let token_path = dir.path().join("token.json");
        let mut file = std::fs::File::create(&token_path).unwrap();
        write!(
            file,
            r#"{{"client_id": "cid", "client_secret": "secret", "refresh_token": "rt"}}"#
        )
        .unwrap();

        let config = SheetsConfig::new("sheet-id", token_path)
            .with_base_url(server.uri())
            .with_token_url(format!("{}/token", server.uri()));
        let config = SheetsConfig {
            retry: RetryConfig {
                initial_backoff: Duration::from_millis(1),
                ..RetryConfig::default()
            },
            ..config
        };

        SheetsSink::new(&config).unwrap()
    }

    #[tokio::test]
    async fn read_returns_cell_texts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v4/spreadsheets/sheet-id/values/Orders!A:A"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "range": "Orders!A1:A3",
                "values": [["id"], ["41"], ["42"]],
            })))
            .mount(&server)
            .await;

        let sink = mock_sink(&server).await;
        let rows = sink.read("Orders!A:A").await.unwrap();
        assert_eq!(rows, vec![vec!["id"], vec!["41"], vec!["42"]]);
    }

    #[tokio::test]
    async fn read_of_an_empty_range_is_no_rows() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v4/spreadsheets/sheet-id/values/Balances!C:C"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "range": "Balances!C1:C1",
            })))
            .mount(&server)
            .await;

        let sink = mock_sink(&server).await;
        let rows = sink.read("Balances!C:C").await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn append_sends_user_entered_rows_and_returns_cell_count() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v4/spreadsheets/sheet-id/values/Orders:append"))
            .and(query_param("valueInputOption", "USER_ENTERED"))
            .and(query_param("insertDataOption", "INSERT_ROWS"))
            .and(body_string_contains("=EPOCHTODATE(L2, 2)"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "updates": { "updatedCells": 2 },
            })))
            .mount(&server)
            .await;

        let sink = mock_sink(&server).await;
        let fulfill_date = crate::domain::sheet::FormulaTemplate::new("EPOCHTODATE(L{row}, 2)");
        let row: SheetRow = vec![
            CellValue::Integer(7),
            CellValue::Formula(fulfill_date.render(2)),
        ];
        let cells = sink.append("Orders", &[row]).await.unwrap();
        assert_eq!(cells, 2);
    }

    #[tokio::test]
    async fn retries_transient_failures() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v4/spreadsheets/sheet-id/values/Orders!A:A"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v4/spreadsheets/sheet-id/values/Orders!A:A"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "values": [["1"]],
            })))
            .mount(&server)
            .await;

        let sink = mock_sink(&server).await;
        let rows = sink.read("Orders!A:A").await.unwrap();
        assert_eq!(rows, vec![vec!["1"]]);
    }

    #[tokio::test]
    async fn client_errors_surface_the_api_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v4/spreadsheets/sheet-id/values/Nope!A:A"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": { "code": 400, "message": "Unable to parse range: Nope!A:A" },
            })))
            .mount(&server)
            .await;

        let sink = mock_sink(&server).await;
        let err = sink.read("Nope!A:A").await.unwrap_err();
        match err {
            SinkError::Api { status, message } => {
                assert_eq!(status, 400);
                assert!(message.contains("Unable to parse range"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
