//! Transports that carry lookup requests to the service.

use std::future::Future;

use tracing::debug;

use super::client::LrsConfig;
use super::error::LookupError;
use super::mock::MockTransport;
use super::types::{LookupRequest, Operation};

/// Sends a lookup request and returns the raw response body.
///
/// Implementations make exactly one attempt per call; retry policy
/// belongs to the caller.
pub trait LookupTransport: Send + Sync {
    fn fetch(
        &self,
        request: &LookupRequest,
    ) -> impl Future<Output = Result<String, LookupError>> + Send;
}

/// HTTP transport using reqwest.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
    geometry_to_station_path: String,
    station_to_geometry_path: String,
}

impl HttpTransport {
    pub fn new(config: &LrsConfig) -> Result<Self, LookupError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            geometry_to_station_path: config.geometry_to_station_path.clone(),
            station_to_geometry_path: config.station_to_geometry_path.clone(),
        })
    }

    /// Full endpoint URL for an operation.
    pub fn url(&self, operation: Operation) -> String {
        let path = match operation {
            Operation::GeometryToStation => &self.geometry_to_station_path,
            Operation::StationToGeometry => &self.station_to_geometry_path,
        };
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl LookupTransport for HttpTransport {
    async fn fetch(&self, request: &LookupRequest) -> Result<String, LookupError> {
        let url = self.url(request.operation);
        debug!(%url, operation = request.operation.endpoint(), "sending lookup request");

        let response = self.http.get(&url).query(&request.query()).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LookupError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.text().await?)
    }
}

/// Either a live HTTP transport or canned mock responses, chosen at startup.
#[derive(Debug)]
pub enum AnyTransport {
    Http(HttpTransport),
    Mock(MockTransport),
}

impl LookupTransport for AnyTransport {
    async fn fetch(&self, request: &LookupRequest) -> Result<String, LookupError> {
        match self {
            AnyTransport::Http(http) => http.fetch(request).await,
            AnyTransport::Mock(mock) => mock.fetch(request).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_urls() {
        let config = LrsConfig::new("https://maps.example.org/lrs/");
        let transport = HttpTransport::new(&config).unwrap();
        assert_eq!(
            transport.url(Operation::GeometryToStation),
            "https://maps.example.org/lrs/geometryToStation"
        );
        assert_eq!(
            transport.url(Operation::StationToGeometry),
            "https://maps.example.org/lrs/stationToGeometry"
        );
    }

    #[test]
    fn custom_paths() {
        let config = LrsConfig::new("http://localhost:8080")
            .with_paths("/g2m", "m2g");
        let transport = HttpTransport::new(&config).unwrap();
        assert_eq!(transport.url(Operation::GeometryToStation), "http://localhost:8080/g2m");
        assert_eq!(transport.url(Operation::StationToGeometry), "http://localhost:8080/m2g");
    }

    #[tokio::test]
    async fn any_transport_delegates_to_mock() {
        let mock = MockTransport::new().with_fixture(Operation::StationToGeometry, "{}");
        let transport = AnyTransport::Mock(mock);
        let body = transport
            .fetch(&LookupRequest::station_to_geometry("SR-15", 1.0, 4326))
            .await
            .unwrap();
        assert_eq!(body, "{}");
    }
}
