//! Vehicle data transport implementation using reqwest.
//!
//! This adapter implements the `VehicleDataTransport` port against the REST
//! backend. Every reqwest failure is mapped to a `TransportError` here, so
//! the application layer never sees a reqwest type.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde_json::Value;
use telemetry_application::ports::{TransportError, VehicleDataTransport};
use telemetry_domain::{ExportFormat, QueryDescriptor, RecordPage, messages};

use crate::settings::{ApiConfig, EndpointConfig};

/// REST transport for the vehicle data backend.
///
/// Wraps `reqwest::Client`. Endpoint paths are appended to the configured
/// base URL.
pub struct ReqwestVehicleTransport {
    client: Client,
    base_url: String,
    endpoints: EndpointConfig,
    timeout_ms: u64,
}

impl ReqwestVehicleTransport {
    /// Creates a transport from the API configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new(config: &ApiConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| TransportError::Network {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self::with_client(client, config))
    }

    /// Creates a transport with a custom reqwest client.
    #[must_use]
    pub fn with_client(client: Client, config: &ApiConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            endpoints: config.endpoints.clone(),
            timeout_ms: config.timeout_ms,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        let raw = format!("{}{path}", self.base_url);
        Url::parse(&raw).map_err(|e| TransportError::Network {
            message: format!("invalid endpoint URL {raw}: {e}"),
        })
    }

    /// Sends a request and rejects non-success statuses.
    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<Response, TransportError> {
        let start = Instant::now();
        let response = builder
            .timeout(Duration::from_millis(self.timeout_ms))
            .send()
            .await
            .map_err(|e| Self::map_error(&e, self.timeout_ms))?;

        let status = response.status();
        tracing::debug!(
            url = %response.url(),
            status = status.as_u16(),
            elapsed_ms = start.elapsed().as_millis(),
            "response received"
        );

        if status.is_success() {
            Ok(response)
        } else {
            Err(Self::server_error(response).await)
        }
    }

    async fn read_body(response: Response, timeout_ms: u64) -> Result<Vec<u8>, TransportError> {
        response
            .bytes()
            .await
            .map(|bytes| bytes.to_vec())
            .map_err(|e| Self::map_error(&e, timeout_ms))
    }

    /// Builds a `Server` error, keeping the body's message if it has one.
    async fn server_error(response: Response) -> TransportError {
        let status = response.status().as_u16();
        let message = response
            .bytes()
            .await
            .ok()
            .and_then(|body| serde_json::from_slice::<Value>(&body).ok())
            .and_then(|body| error_message(&body));
        TransportError::Server { status, message }
    }

    /// Maps reqwest errors to `TransportError`.
    ///
    /// The user-facing message is fixed per failure kind; reqwest's own
    /// detail only goes to the log.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> TransportError {
        if error.is_timeout() {
            tracing::warn!(%error, timeout_ms, "request timed out");
            return TransportError::Timeout {
                timeout_ms,
                message: messages::TIMEOUT.to_string(),
            };
        }

        let host = error.url().and_then(Url::host_str).unwrap_or("unknown");
        tracing::warn!(
            %error,
            host,
            connect = error.is_connect(),
            "request failed without a response"
        );
        TransportError::Network {
            message: messages::NETWORK.to_string(),
        }
    }
}

/// The message a backend error body carries, under `message` or FastAPI's
/// `detail`.
fn error_message(body: &Value) -> Option<String> {
    ["message", "detail"]
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_str))
        .map(str::to_string)
}

#[async_trait]
impl VehicleDataTransport for ReqwestVehicleTransport {
    async fn fetch_vehicle_ids(&self) -> Result<Vec<String>, TransportError> {
        let url = self.endpoint(&self.endpoints.vehicle_ids)?;
        tracing::debug!(%url, "fetching vehicle ids");

        let response = self.send(self.client.get(url)).await?;
        let body = Self::read_body(response, self.timeout_ms).await?;

        serde_json::from_slice(&body)
            .map_err(|e| TransportError::Rejected(Value::String(e.to_string())))
    }

    async fn fetch_page(&self, query: &QueryDescriptor) -> Result<RecordPage, TransportError> {
        let mut url = self.endpoint(&self.endpoints.vehicle_data)?;
        url.query_pairs_mut().extend_pairs(query.to_query_pairs());
        tracing::debug!(%url, page = query.page(), "fetching vehicle data");

        let response = self.send(self.client.get(url)).await?;
        let body = Self::read_body(response, self.timeout_ms).await?;

        let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        Ok(RecordPage::from_value(value))
    }

    async fn populate(&self) -> Result<(), TransportError> {
        let url = self.endpoint(&self.endpoints.populate)?;
        tracing::debug!(%url, "populating sample data");

        self.send(self.client.post(url)).await?;
        Ok(())
    }

    async fn export(
        &self,
        vehicle_id: &str,
        format: ExportFormat,
    ) -> Result<Vec<u8>, TransportError> {
        let mut url = self.endpoint(&self.endpoints.export)?;
        url.query_pairs_mut()
            .append_pair("vehicle_id", vehicle_id)
            .append_pair("export_type", format.as_str());
        tracing::debug!(%url, "exporting vehicle data");

        let response = self.send(self.client.get(url)).await?;
        Self::read_body(response, self.timeout_ms).await
    }
}
