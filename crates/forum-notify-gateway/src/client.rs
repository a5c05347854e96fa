//! HTTP implementation of the notification gateway.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use tracing::{debug, warn};

use crate::{GatewayError, NotificationId, NotificationRecord, SyncGateway};

/// Name of the forum's session cookie.
const SESSION_COOKIE: &str = "session_id";

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the forum's notification endpoints.
#[derive(Debug, Clone)]
pub struct ForumClient {
    http: Client,
    base_url: String,
    session_id: Option<String>,
}

impl ForumClient {
    /// Create a client for the given forum URL with default timeouts.
    pub fn new(base_url: impl Into<String>) -> Result<Self, GatewayError> {
        ForumClientBuilder::new(base_url).build()
    }

    /// Start configuring a client.
    pub fn builder(base_url: impl Into<String>) -> ForumClientBuilder {
        ForumClientBuilder::new(base_url)
    }

    /// Get the forum base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the session cookie, if any.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.session_id {
            Some(session) => request.header(
                reqwest::header::COOKIE,
                format!("{}={}", SESSION_COOKIE, session),
            ),
            None => request,
        }
    }

    /// Turn a non-2xx response into a server error.
    async fn check_status(response: Response) -> Result<Response, GatewayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_else(|e| {
            warn!(error = %e, "failed to read error response body");
            String::new()
        });
        Err(GatewayError::server(status.as_u16(), &text))
    }
}

#[async_trait]
impl SyncGateway for ForumClient {
    #[tracing::instrument(skip(self), fields(base_url = %self.base_url))]
    async fn fetch_list(&self) -> Result<Vec<NotificationRecord>, GatewayError> {
        let response = self
            .authorize(self.http.get(self.url("/notifications")))
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        let body = response.text().await?;

        // The server encodes an empty list as `null`
        let records: Option<Vec<NotificationRecord>> = serde_json::from_str(&body)?;
        let records = records.unwrap_or_default();

        debug!(count = records.len(), "fetched notifications");
        Ok(records)
    }

    #[tracing::instrument(skip(self), fields(base_url = %self.base_url))]
    async fn mark_one(&self, id: &NotificationId) -> Result<(), GatewayError> {
        #[derive(Serialize)]
        struct MarkReadRequest<'a> {
            notification_id: &'a NotificationId,
        }

        let response = self
            .authorize(self.http.post(self.url("/notifications/read")))
            .json(&MarkReadRequest {
                notification_id: id,
            })
            .send()
            .await?;
        Self::check_status(response).await?;

        debug!(%id, "marked notification read");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(base_url = %self.base_url))]
    async fn mark_all(&self) -> Result<(), GatewayError> {
        let response = self
            .authorize(self.http.post(self.url("/notifications/read-all")))
            .header("X-Requested-With", "XMLHttpRequest")
            .send()
            .await?;
        Self::check_status(response).await?;

        debug!("marked all notifications read");
        Ok(())
    }
}

/// Builder for [`ForumClient`].
pub struct ForumClientBuilder {
    base_url: String,
    session_id: Option<String>,
    connect_timeout: Duration,
    timeout: Duration,
}

impl ForumClientBuilder {
    /// Create a new builder.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session_id: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Send this session id with every request.
    pub fn session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Total per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<ForumClient, GatewayError> {
        let http = Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.timeout)
            .build()?;

        Ok(ForumClient {
            http,
            base_url: self.base_url,
            session_id: self.session_id,
        })
    }
}
