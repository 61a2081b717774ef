use crate::domain::model::{CheckResult, PhoneNumber};
use crate::domain::ports::CheckService;
use crate::utils::error::{CheckError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct CheckRequest<'a> {
    numbers: &'a [PhoneNumber],
    timeout: u64,
}

#[derive(Debug, Deserialize)]
struct CheckResponse {
    results: Vec<CheckResult>,
}

/// 透過 HTTP POST 呼叫遠端檢查服務
pub struct HttpCheckService {
    client: Client,
    endpoint: String,
    headers: HashMap<String, String>,
}

impl HttpCheckService {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            headers: HashMap::new(),
        }
    }

    /// 設定用戶端請求逾時。`timeout` 參數仍會原樣轉送給服務。
    pub fn with_request_timeout(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: endpoint.into(),
            headers: HashMap::new(),
        })
    }

    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CheckService for HttpCheckService {
    async fn check(&self, numbers: &[PhoneNumber], timeout_seconds: u64) -> Result<Vec<CheckResult>> {
        let mut request = self.client.post(&self.endpoint).json(&CheckRequest {
            numbers,
            timeout: timeout_seconds,
        });

        for (key, value) in &self.headers {
            request = request.header(key, value);
        }

        tracing::debug!("POST {} with {} numbers", self.endpoint, numbers.len());
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("Service response status: {}", status);

        if !status.is_success() {
            return Err(CheckError::ServiceStatusError {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let parsed: CheckResponse =
            serde_json::from_str(&body).map_err(|e| CheckError::MalformedResponse {
                message: e.to_string(),
            })?;

        Ok(parsed.results)
    }
}
