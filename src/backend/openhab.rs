//! HTTP client for the openHAB items API

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::{debug, info, warn};

use crate::config::BackendConfig;

use super::client::{BackendError, DeviceStateClient, PushStatus};

/// Talks to `/rest/items` on an openHAB server
#[derive(Debug, Clone)]
pub struct OpenHabClient {
    items_url: String,
    client: reqwest::Client,
    /// Echo requests and error bodies at info/warn instead of debug
    verbose: bool,
}

impl OpenHabClient {
    pub fn new(config: &BackendConfig, verbose: bool) -> Result<Self, BackendError> {
        Self::with_url(&config.items_url(), config.timeout(), verbose)
    }

    /// Create a client for an explicit items base URL
    pub fn with_url(
        items_url: &str,
        timeout: std::time::Duration,
        verbose: bool,
    ) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(BackendError::Build)?;

        Ok(Self {
            items_url: items_url.trim_end_matches('/').to_string(),
            client,
            verbose,
        })
    }

    fn item_url(&self, item: &str) -> String {
        format!("{}/{}", self.items_url, item)
    }

    fn echo(&self, method: &str, url: &str, body: Option<&str>) {
        let body = body.unwrap_or_default();
        if self.verbose {
            info!(method, url, body, "backend request");
        } else {
            debug!(method, url, body, "backend request");
        }
    }
}

#[async_trait]
impl DeviceStateClient for OpenHabClient {
    async fn fetch(&self, item: &str) -> Result<String, BackendError> {
        let url = format!("{}/state", self.item_url(item));
        self.echo("GET", &url, None);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| BackendError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                url,
                status: status.as_u16(),
            });
        }

        resp.text()
            .await
            .map_err(|source| BackendError::Transport { url, source })
    }

    async fn push(&self, item: &str, value: &str) -> Result<PushStatus, BackendError> {
        let url = self.item_url(item);
        self.echo("POST", &url, Some(value));

        let resp = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "text/plain")
            .header(ACCEPT, "application/json")
            .body(value.to_string())
            .send()
            .await
            .map_err(|source| BackendError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = PushStatus(resp.status().as_u16());
        if !status.is_accepted() {
            let body = resp.text().await.unwrap_or_default();
            if self.verbose {
                warn!(status = status.0, %url, %body, "backend rejected command");
            } else {
                debug!(status = status.0, %url, %body, "backend rejected command");
            }
        }

        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> OpenHabClient {
        OpenHabClient::with_url(
            &format!("{}/rest/items/", server.uri()),
            Duration::from_secs(2),
            true,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_state() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/items/office_color/state"))
            .respond_with(ResponseTemplate::new(200).set_body_string("260,100,45"))
            .mount(&server)
            .await;

        let state = client_for(&server).fetch("office_color").await.unwrap();
        assert_eq!(state, "260,100,45");
    }

    #[tokio::test]
    async fn test_fetch_unknown_item() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/items/missing/state"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch("missing").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_push_sends_plain_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/items/Lights_ALL"))
            .and(header("content-type", "text/plain"))
            .and(body_string("ON"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let status = client_for(&server).push("Lights_ALL", "ON").await.unwrap();
        assert!(status.is_accepted());
    }

    #[tokio::test]
    async fn test_push_reports_rejection_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/items/office_color"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad state"))
            .mount(&server)
            .await;

        let status = client_for(&server).push("office_color", "purple").await.unwrap();
        assert_eq!(status, PushStatus::BAD_COMMAND);
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        // Nothing listens on port 9 on the test host
        let client =
            OpenHabClient::with_url("http://127.0.0.1:9/rest/items", Duration::from_secs(1), false)
                .unwrap();
        let err = client.push("office_color", "ON").await.unwrap_err();
        assert!(matches!(err, BackendError::Transport { .. }));
        assert_eq!(err.status(), None);
    }
}
