use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::config::{normalize_base_url, Config};
use crate::error::{AppError, AppResult};

pub const NGO_LIST_ENDPOINT: &str = "/api/ngo/list";
pub const DONATION_RECORDS_ENDPOINT: &str = "/api/donations/records";
pub const UTILIZATION_RECORDS_ENDPOINT: &str = "/api/utilization/records";

/// Read-only JSON client for the platform API. Every request is bound to a
/// cancellation token and resolves to `AppError::Cancelled` once it fires.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    pub fn new(config: &Config) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: normalize_base_url(&config.api_base_url),
        })
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        cancel: &CancellationToken,
    ) -> AppResult<T> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(AppError::Cancelled),
            result = self.fetch(endpoint) => result,
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, endpoint: &str) -> AppResult<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Status {
                endpoint: endpoint.to_string(),
                status,
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| AppError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }
}
