// roster-client/src/http.rs
// HTTP 客户端 - 带重试与总超时

use reqwest::{Client, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::models::{
    ClientInput, ClientView, DeleteClientRequest, DeleteClientResponse, FormValue,
    ReplaceClientRequest,
};

use crate::{ClientConfig, ClientError, ClientResult};

const CLIENTS_PATH: &str = "clients";

/// Roster HTTP client
///
/// Every operation is retried on retryable failures (503, connect
/// errors) following [`crate::RetryPolicy`], and the whole operation is
/// bounded by `overall_timeout`. Per-attempt timeouts are retried for
/// every verb except POST, whose first attempt may already be stored.
#[derive(Debug, Clone)]
pub struct RosterClient {
    client: Client,
    base_url: String,
    config: ClientConfig,
}

impl RosterClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            config,
        })
    }

    /// GET /clients
    pub async fn list(&self) -> ClientResult<Vec<ClientView>> {
        self.execute(Method::GET, None).await
    }

    /// POST /clients
    pub async fn create(&self, input: &ClientInput) -> ClientResult<ClientView> {
        self.execute(Method::POST, Some(to_body(input)?)).await
    }

    /// PUT /clients (whole-record replace)
    pub async fn replace(&self, id: i64, input: &ClientInput) -> ClientResult<ClientView> {
        let request = ReplaceClientRequest {
            id: Some(FormValue::from(id.to_string())),
            input: input.clone(),
        };
        self.execute(Method::PUT, Some(to_body(&request)?)).await
    }

    /// DELETE /clients
    pub async fn delete(&self, id: i64) -> ClientResult<DeleteClientResponse> {
        let request = DeleteClientRequest {
            id: Some(FormValue::from(id.to_string())),
        };
        self.execute(Method::DELETE, Some(to_body(&request)?)).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        body: Option<Value>,
    ) -> ClientResult<T> {
        tokio::time::timeout(
            self.config.overall_timeout,
            self.with_retry(method.clone(), body.as_ref()),
        )
        .await
        .map_err(|_| {
            tracing::warn!(%method, timeout = ?self.config.overall_timeout, "Roster request timed out");
            ClientError::Timeout
        })?
    }

    async fn with_retry<T: DeserializeOwned>(
        &self,
        method: Method,
        body: Option<&Value>,
    ) -> ClientResult<T> {
        let policy = self.config.retry;
        let idempotent = method != Method::POST;
        let mut attempt = 1;
        loop {
            match self.send_once(method.clone(), body).await {
                Err(e) if e.is_retryable(idempotent) && attempt < policy.max_attempts => {
                    let delay = policy.delay_for(attempt);
                    tracing::debug!(%method, attempt, ?delay, error = %e, "Retrying roster request");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn send_once<T: DeserializeOwned>(
        &self,
        method: Method,
        body: Option<&Value>,
    ) -> ClientResult<T> {
        let url = format!("{}/{}", self.base_url, CLIENTS_PATH);
        let mut req = self.client.request(method, &url);
        if let Some(body) = body {
            req = req.json(body);
        }
        let response = req.send().await?;
        handle_response(response).await
    }
}

fn to_body<B: Serialize>(body: &B) -> ClientResult<Value> {
    serde_json::to_value(body).map_err(|e| ClientError::Validation {
        message: format!("Cannot encode request: {e}"),
        field: None,
    })
}

async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await?;
        return Err(ClientError::from_response(status, &text));
    }
    Ok(response.json().await?)
}
