//! Error types for the notification gateway.

use thiserror::Error;

/// Errors that can occur when talking to the forum server.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request could not be sent or the response could not be received.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The response payload does not match the expected record shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl GatewayError {
    /// Build a server error from a status and response body.
    ///
    /// The forum answers failures with `{"error": "..."}`; that message is
    /// used when present, otherwise the raw body.
    pub fn server(status: u16, body: &str) -> Self {
        #[derive(serde::Deserialize)]
        struct ErrorBody {
            error: String,
        }

        let message = match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => parsed.error,
            Err(_) => body.trim().to_string(),
        };

        GatewayError::Server { status, message }
    }

    /// HTTP status code for server errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Server { status, .. } => Some(*status),
            GatewayError::Network(e) => e.status().map(|s| s.as_u16()),
            GatewayError::MalformedResponse(_) => None,
        }
    }

    /// Whether the session is missing or expired.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(e: serde_json::Error) -> Self {
        GatewayError::MalformedResponse(e.to_string())
    }
}
